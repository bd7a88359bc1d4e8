//! Donation entity - one giving transaction and its money breakdown

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::PostalAddress;
use crate::error::DomainError;
use crate::value_objects::{
    DonationStatus, EmailAddress, FeePercent, Frequency, MinorUnits, ReferenceCode,
};

/// Gift Aid sub-record. The amount is what the charity reclaims from the tax
/// authority; it is never added to the charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftAidDetail {
    pub enabled: bool,
    pub amount: MinorUnits,
    pub declared: bool,
}

impl GiftAidDetail {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            amount: 0,
            declared: false,
        }
    }
}

/// Platform fee sub-record: the optional processing contribution the donor
/// agreed to add on top of the donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformFeeDetail {
    pub enabled: bool,
    pub percent: FeePercent,
    pub amount: MinorUnits,
}

impl PlatformFeeDetail {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            percent: FeePercent::ZERO,
            amount: 0,
        }
    }
}

/// Processor-side references for the charge backing this donation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetail {
    /// e.g. "card"
    pub method: String,
    pub intent_ref: Option<String>,
    pub subscription_ref: Option<String>,
    pub customer_ref: Option<String>,
}

/// Donor contact details frozen at creation time, independent of later
/// Donor record mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSnapshot {
    pub email: EmailAddress,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<PostalAddress>,
}

impl ContactSnapshot {
    /// Full name from first/last parts, if any were given
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }
}

/// Donation entity
///
/// `total = amount + platform_fee.amount` always; Gift Aid is informational.
/// Status moves `pending -> completed | failed` exactly once and never back.
#[derive(Debug, Clone, PartialEq)]
pub struct Donation {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub appeal_id: Option<Uuid>,
    pub reference: ReferenceCode,
    /// Base gift, minor units, before any fee.
    pub amount: MinorUnits,
    /// Lowercase ISO currency code, e.g. "gbp".
    pub currency: String,
    pub frequency: Frequency,
    /// Category chosen in the wizard, e.g. "general", "zakat".
    pub donation_type: String,
    pub contact: ContactSnapshot,
    pub anonymous: bool,
    pub display_name: Option<String>,
    pub gift_aid: GiftAidDetail,
    pub platform_fee: PlatformFeeDetail,
    pub payment: PaymentDetail,
    pub status: DonationStatus,
    /// Charged to the payer: `amount + platform_fee.amount`.
    pub total: MinorUnits,
    pub marketing_consent: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Donation {
    /// Transition to `completed`, guarding monotonicity
    pub fn mark_completed(&mut self, at: DateTime<Utc>) -> Result<(), DomainError> {
        if !self.status.can_transition_to(DonationStatus::Completed) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: DonationStatus::Completed,
            });
        }
        self.status = DonationStatus::Completed;
        self.completed_at = Some(at);
        Ok(())
    }

    /// Transition to `failed`, recording the processor's reason
    pub fn mark_failed(&mut self, reason: Option<&str>) -> Result<(), DomainError> {
        if !self.status.can_transition_to(DonationStatus::Failed) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: DonationStatus::Failed,
            });
        }
        self.status = DonationStatus::Failed;
        if let Some(reason) = reason {
            self.notes = Some(reason.to_string());
        }
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Check the money breakdown invariant
    pub fn amounts_consistent(&self) -> bool {
        self.total == self.amount + self.platform_fee.amount
    }
}
