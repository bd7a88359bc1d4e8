//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Field names follow the camelCase wire format the wizard submits.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use sadaqa_core::entities::PostalAddress;

// ============================================================================
// Donation Requests
// ============================================================================

/// Donation intake request, as submitted by the final wizard step
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    /// Base gift in minor currency units (pence), before any fee.
    #[validate(range(min = 1, message = "Amount must be a positive number of minor units"))]
    pub amount: i64,

    /// ISO currency code; the configured default applies when omitted.
    #[validate(length(equal = 3, message = "Currency must be a 3-letter ISO code"))]
    pub currency: Option<String>,

    /// "one-time", "weekly", "monthly", "quarterly" or "yearly".
    pub frequency: String,

    #[serde(default = "default_donation_type")]
    #[validate(length(min = 1, max = 64, message = "Donation type must be 1-64 characters"))]
    pub donation_type: String,

    /// Campaign this gift counts towards, if any.
    pub appeal_id: Option<Uuid>,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: Option<String>,

    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,

    pub address: Option<PostalAddressDto>,

    #[serde(default)]
    pub anonymous: bool,

    /// Name shown on public donor walls when not anonymous.
    #[validate(length(max = 100, message = "Display name must be at most 100 characters"))]
    pub display_name: Option<String>,

    /// Gift Aid declaration for this gift.
    #[serde(default)]
    pub gift_aid: bool,

    /// Processing contribution the donor agreed to add, percent of the gift.
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0, message = "Fee percentage must be between 0 and 100"))]
    pub platform_fee_percentage: f64,

    #[serde(default)]
    pub marketing_consent: bool,

    #[serde(default = "default_payment_method")]
    #[validate(length(min = 1, max = 32, message = "Payment method must be 1-32 characters"))]
    pub payment_method: String,
}

fn default_donation_type() -> String {
    "general".to_string()
}

fn default_payment_method() -> String {
    "card".to_string()
}

/// Postal address as submitted by the wizard's details step
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddressDto {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

impl From<PostalAddressDto> for PostalAddress {
    fn from(dto: PostalAddressDto) -> Self {
        Self {
            line1: dto.line1,
            line2: dto.line2,
            city: dto.city,
            postcode: dto.postcode,
            country: dto.country,
        }
    }
}

impl CreateDonationRequest {
    /// Address converted to the domain type, `None` when every field is blank
    pub fn postal_address(&self) -> Option<PostalAddress> {
        let address: PostalAddress = self.address.clone()?.into();
        if address.is_empty() {
            None
        } else {
            Some(address)
        }
    }
}
