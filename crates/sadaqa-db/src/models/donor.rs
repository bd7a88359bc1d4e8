//! Donor database model

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the donors table
#[derive(Debug, Clone, FromRow)]
pub struct DonorModel {
    pub id: Uuid,
    /// Normalized (trimmed, lowercased) email, unique per donor
    pub email: String,
    /// Payment processor customer reference, set once per donor
    pub customer_ref: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub anonymous: bool,
    pub phone: Option<String>,
    /// Postal address stored as JSONB
    pub address: Option<Value>,
    pub gift_aid_eligible: bool,
    pub gift_aid_declared_at: Option<DateTime<Utc>>,
    pub marketing_consent: bool,
    pub total_donated: i64,
    pub donation_count: i64,
    pub last_donation_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DonorModel {
    /// Check if a processor customer is already attached
    #[inline]
    pub fn has_customer(&self) -> bool {
        self.customer_ref.is_some()
    }
}
