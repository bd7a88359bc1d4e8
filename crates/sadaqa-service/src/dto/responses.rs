//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output. Field names follow
//! the camelCase wire format the wizard consumes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Donation Responses
// ============================================================================

/// Money breakdown echoed back to the wizard, minor units
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountBreakdown {
    /// Base gift.
    pub donation: i64,
    /// Optional processing contribution.
    pub platform_fee: i64,
    /// Reclaimed from the tax authority, never charged to the payer.
    pub gift_aid: i64,
    /// Charged to the payer: donation + platformFee.
    pub total: i64,
}

/// Successful intake response carrying what the browser needs to confirm
/// payment with the processor
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationResponse {
    pub success: bool,
    /// "payment_intent" for one-time gifts, "subscription" for recurring.
    #[serde(rename = "type")]
    pub payment_type: String,
    /// Processor client secret; absent when the first recurring invoice
    /// needs no browser confirmation.
    pub client_secret: Option<String>,
    pub donation_id: Uuid,
    /// Human-readable reference carried on receipts.
    pub reference: String,
    pub amounts: AmountBreakdown,
}

impl CreateDonationResponse {
    pub fn payment_intent(
        donation_id: Uuid,
        reference: String,
        client_secret: String,
        amounts: AmountBreakdown,
    ) -> Self {
        Self {
            success: true,
            payment_type: "payment_intent".to_string(),
            client_secret: Some(client_secret),
            donation_id,
            reference,
            amounts,
        }
    }

    pub fn subscription(
        donation_id: Uuid,
        reference: String,
        client_secret: Option<String>,
        amounts: AmountBreakdown,
    ) -> Self {
        Self {
            success: true,
            payment_type: "subscription".to_string(),
            client_secret,
            donation_id,
            reference,
            amounts,
        }
    }
}

/// Donation status view for the wizard's completion step
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationResponse {
    pub donation_id: Uuid,
    pub reference: String,
    pub status: String,
    pub frequency: String,
    pub donation_type: String,
    pub currency: String,
    pub amounts: AmountBreakdown,
    pub appeal_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Appeal Responses
// ============================================================================

/// Campaign progress view
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealResponse {
    pub appeal_id: Uuid,
    pub name: String,
    pub target_amount: Option<i64>,
    pub raised_amount: i64,
    pub donor_count: i64,
    /// 0-100, capped; absent when the appeal has no target.
    pub percent_funded: Option<f64>,
    pub active: bool,
}

// ============================================================================
// Webhook Responses
// ============================================================================

/// Acknowledgement the processor expects for any handled-or-ignored event
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WebhookAckResponse {
    pub received: bool,
}

impl WebhookAckResponse {
    pub fn received() -> Self {
        Self { received: true }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: ReadinessChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: ReadinessChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}
