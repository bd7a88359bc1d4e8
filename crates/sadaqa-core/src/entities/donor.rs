//! Donor entity - a giving household identified by email

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::{EmailAddress, MinorUnits};

/// Postal address captured for Gift Aid declarations and receipts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl PostalAddress {
    pub fn is_empty(&self) -> bool {
        self.line1.is_none()
            && self.line2.is_none()
            && self.city.is_none()
            && self.postcode.is_none()
            && self.country.is_none()
    }
}

/// Donor entity
///
/// Exactly one donor exists per normalized email. Lifetime totals are cached
/// projections over completed donations; `record_completed` mirrors the
/// storage-layer atomic increment so in-memory stores stay consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct Donor {
    pub id: Uuid,
    pub email: EmailAddress,
    /// Processor-side customer reference, set on first gateway contact.
    pub customer_ref: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub anonymous: bool,
    pub phone: Option<String>,
    pub address: Option<PostalAddress>,
    pub gift_aid_eligible: bool,
    pub gift_aid_declared_at: Option<DateTime<Utc>>,
    pub marketing_consent: bool,
    /// Lifetime donated, minor units. Monotone non-decreasing.
    pub total_donated: MinorUnits,
    /// Lifetime completed donation count. Monotone non-decreasing.
    pub donation_count: i64,
    pub last_donation_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Donor {
    /// Create a new Donor with empty history
    pub fn new(id: Uuid, email: EmailAddress) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            customer_ref: None,
            first_name: None,
            last_name: None,
            display_name: None,
            anonymous: false,
            phone: None,
            address: None,
            gift_aid_eligible: false,
            gift_aid_declared_at: None,
            marketing_consent: false,
            total_donated: 0,
            donation_count: 0,
            last_donation_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full name from first/last parts, if any were given
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }

    /// Name shown on public donor walls; `None` for anonymous donors
    pub fn public_name(&self) -> Option<String> {
        if self.anonymous {
            return None;
        }
        self.display_name.clone().or_else(|| self.full_name())
    }

    /// Record a Gift Aid declaration
    pub fn declare_gift_aid(&mut self, at: DateTime<Utc>) {
        self.gift_aid_eligible = true;
        self.gift_aid_declared_at = Some(at);
        self.updated_at = at;
    }

    /// Fold one completed donation into the lifetime aggregates
    pub fn record_completed(&mut self, amount: MinorUnits, at: DateTime<Utc>) {
        self.total_donated += amount;
        self.donation_count += 1;
        self.last_donation_at = Some(at);
        self.updated_at = at;
    }

    /// Whether this donor has ever completed a donation
    pub fn has_donated(&self) -> bool {
        self.donation_count > 0
    }
}
