//! Subscription database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the subscriptions table
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionModel {
    pub id: Uuid,
    pub donor_id: Uuid,
    /// Processor subscription reference, unique per plan
    pub processor_ref: String,
    /// Billing frequency: 'weekly', 'monthly', 'quarterly', 'yearly'
    pub frequency: String,
    pub amount: i64,
    pub currency: String,
    /// Plan status: 'active', 'paused', 'cancelled'
    pub status: String,
    pub next_payment_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionModel {
    /// Check if the plan is still billing
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}
