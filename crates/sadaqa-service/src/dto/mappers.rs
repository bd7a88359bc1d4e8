//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use sadaqa_core::entities::{Appeal, Donation};

use super::responses::{AmountBreakdown, AppealResponse, DonationResponse};

// ============================================================================
// Donation Mappers
// ============================================================================

impl From<&Donation> for AmountBreakdown {
    fn from(donation: &Donation) -> Self {
        Self {
            donation: donation.amount,
            platform_fee: donation.platform_fee.amount,
            gift_aid: donation.gift_aid.amount,
            total: donation.total,
        }
    }
}

impl From<&Donation> for DonationResponse {
    fn from(donation: &Donation) -> Self {
        Self {
            donation_id: donation.id,
            reference: donation.reference.as_str().to_string(),
            status: donation.status.as_str().to_string(),
            frequency: donation.frequency.as_str().to_string(),
            donation_type: donation.donation_type.clone(),
            currency: donation.currency.clone(),
            amounts: AmountBreakdown::from(donation),
            appeal_id: donation.appeal_id,
            created_at: donation.created_at,
            completed_at: donation.completed_at,
        }
    }
}

impl From<Donation> for DonationResponse {
    fn from(donation: Donation) -> Self {
        Self::from(&donation)
    }
}

// ============================================================================
// Appeal Mappers
// ============================================================================

impl From<&Appeal> for AppealResponse {
    fn from(appeal: &Appeal) -> Self {
        Self {
            appeal_id: appeal.id,
            name: appeal.name.clone(),
            target_amount: appeal.target_amount,
            raised_amount: appeal.raised_amount,
            donor_count: appeal.donor_count,
            percent_funded: appeal.percent_funded(),
            active: appeal.active,
        }
    }
}

impl From<Appeal> for AppealResponse {
    fn from(appeal: Appeal) -> Self {
        Self::from(&appeal)
    }
}
