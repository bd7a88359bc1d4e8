//! Donation database model

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the donations table
///
/// The row keeps a full snapshot of the submission (contact details, fee and
/// gift aid breakdown, processor references) so a receipt can be rebuilt even
/// after the donor record changes.
#[derive(Debug, Clone, FromRow)]
pub struct DonationModel {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub appeal_id: Option<Uuid>,
    /// Human-facing reference code, unique per donation
    pub reference: String,
    pub amount: i64,
    pub currency: String,
    /// Billing frequency: 'one-time', 'weekly', 'monthly', 'quarterly', 'yearly'
    pub frequency: String,
    pub donation_type: String,
    pub contact_email: String,
    pub contact_first_name: Option<String>,
    pub contact_last_name: Option<String>,
    pub contact_phone: Option<String>,
    /// Contact postal address stored as JSONB
    pub contact_address: Option<Value>,
    pub anonymous: bool,
    pub display_name: Option<String>,
    pub gift_aid_enabled: bool,
    pub gift_aid_amount: i64,
    pub gift_aid_declared: bool,
    pub fee_enabled: bool,
    pub fee_basis_points: i64,
    pub fee_amount: i64,
    pub payment_method: String,
    /// Processor payment-intent reference, unique when present
    pub intent_ref: Option<String>,
    pub subscription_ref: Option<String>,
    pub customer_ref: Option<String>,
    /// Donation status: 'pending', 'completed', 'failed'
    pub status: String,
    pub total: i64,
    pub marketing_consent: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl DonationModel {
    /// Check if the donation is still awaiting settlement
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == "pending"
    }

    /// Check if the donation reached a terminal status
    #[inline]
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }
}
