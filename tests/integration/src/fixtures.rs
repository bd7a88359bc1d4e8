//! Test fixtures and data generators
//!
//! Request builders, response mirror types, and webhook event bodies
//! shaped exactly like processor deliveries.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

// ============================================================================
// Intake requests
// ============================================================================

/// Donation intake request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub frequency: String,
    pub donation_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appeal_id: Option<Uuid>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub anonymous: bool,
    pub gift_aid: bool,
    pub marketing_consent: bool,
    pub platform_fee_percentage: f64,
    pub payment_method: String,
}

impl DonationRequest {
    /// One-time gift from a fresh donor
    pub fn one_time(amount: i64) -> Self {
        let suffix = unique_suffix();
        Self {
            amount,
            currency: None,
            frequency: "one-time".to_string(),
            donation_type: "general".to_string(),
            appeal_id: None,
            email: format!("donor{suffix}@example.com"),
            first_name: Some("Aisha".to_string()),
            last_name: Some("Rahman".to_string()),
            phone: None,
            display_name: None,
            anonymous: false,
            gift_aid: false,
            marketing_consent: false,
            platform_fee_percentage: 0.0,
            payment_method: "card".to_string(),
        }
    }

    /// Recurring gift from a fresh donor
    pub fn recurring(amount: i64, frequency: &str) -> Self {
        let mut request = Self::one_time(amount);
        request.frequency = frequency.to_string();
        request
    }

    pub fn with_fee(mut self, percent: f64) -> Self {
        self.platform_fee_percentage = percent;
        self
    }

    pub fn with_gift_aid(mut self) -> Self {
        self.gift_aid = true;
        self
    }

    pub fn with_appeal(mut self, appeal_id: Uuid) -> Self {
        self.appeal_id = Some(appeal_id);
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }
}

// ============================================================================
// Response bodies
// ============================================================================

/// Money breakdown echoed by intake and lookup responses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountsBody {
    pub donation: i64,
    pub platform_fee: i64,
    pub gift_aid: i64,
    pub total: i64,
}

/// Successful intake response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreatedBody {
    pub success: bool,
    #[serde(rename = "type")]
    pub payment_type: String,
    pub client_secret: Option<String>,
    pub donation_id: Uuid,
    pub reference: String,
    pub amounts: AmountsBody,
}

/// Donation lookup response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationBody {
    pub donation_id: Uuid,
    pub reference: String,
    pub status: String,
    pub frequency: String,
    pub donation_type: String,
    pub currency: String,
    pub amounts: AmountsBody,
    pub appeal_id: Option<Uuid>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

/// Appeal lookup response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealBody {
    pub appeal_id: Uuid,
    pub name: String,
    pub target_amount: Option<i64>,
    pub raised_amount: i64,
    pub donor_count: i64,
    pub percent_funded: Option<f64>,
    pub active: bool,
}

/// Webhook acknowledgement
#[derive(Debug, Deserialize)]
pub struct AckBody {
    pub received: bool,
}

/// Error response
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

// ============================================================================
// Webhook event bodies
// ============================================================================

/// Processor delivery for a settled one-time charge
pub fn payment_succeeded_event(intent_ref: &str) -> Value {
    json!({
        "id": format!("evt_{}", unique_suffix()),
        "type": "payment_intent.succeeded",
        "data": {"object": {"id": intent_ref}}
    })
}

/// Processor delivery for a declined charge
pub fn payment_failed_event(intent_ref: &str, reason: &str) -> Value {
    json!({
        "id": format!("evt_{}", unique_suffix()),
        "type": "payment_intent.payment_failed",
        "data": {"object": {
            "id": intent_ref,
            "last_payment_error": {"message": reason}
        }}
    })
}

/// Processor delivery for a paid recurring invoice
pub fn invoice_paid_event(
    invoice_ref: &str,
    subscription_ref: &str,
    amount: i64,
    currency: &str,
) -> Value {
    json!({
        "id": format!("evt_{}", unique_suffix()),
        "type": "invoice.paid",
        "data": {"object": {
            "id": invoice_ref,
            "subscription": subscription_ref,
            "amount_paid": amount,
            "currency": currency
        }}
    })
}

/// Processor delivery for a subscription status change
pub fn subscription_updated_event(subscription_ref: &str, status: &str, period_end: i64) -> Value {
    json!({
        "id": format!("evt_{}", unique_suffix()),
        "type": "customer.subscription.updated",
        "data": {"object": {
            "id": subscription_ref,
            "status": status,
            "current_period_end": period_end
        }}
    })
}

/// Processor delivery for a cancelled subscription
pub fn subscription_deleted_event(subscription_ref: &str) -> Value {
    json!({
        "id": format!("evt_{}", unique_suffix()),
        "type": "customer.subscription.deleted",
        "data": {"object": {"id": subscription_ref, "status": "canceled"}}
    })
}
