//! Appeal database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the appeals table
#[derive(Debug, Clone, FromRow)]
pub struct AppealModel {
    pub id: Uuid,
    pub name: String,
    pub target_amount: Option<i64>,
    pub raised_amount: i64,
    pub donor_count: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppealModel {
    /// Check if the campaign reached its target
    #[inline]
    pub fn is_fully_funded(&self) -> bool {
        self.target_amount
            .is_some_and(|target| self.raised_amount >= target)
    }
}
