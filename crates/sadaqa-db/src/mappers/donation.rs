//! Donation entity <-> model mapper

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use sadaqa_core::entities::{
    ContactSnapshot, Donation, GiftAidDetail, PaymentDetail, PlatformFeeDetail,
};
use sadaqa_core::value_objects::{
    DonationStatus, EmailAddress, FeePercent, Frequency, ReferenceCode,
};

use crate::models::DonationModel;

use super::donor::{address_json, parse_address};

/// Convert a stored frequency string to the Frequency enum
fn parse_frequency(frequency: &str) -> Frequency {
    frequency.parse().unwrap_or(Frequency::OneTime)
}

/// Convert a stored status string to the DonationStatus enum
fn parse_status(status: &str) -> DonationStatus {
    status.parse().unwrap_or(DonationStatus::Pending)
}

/// Convert DonationModel to Donation entity
impl From<DonationModel> for Donation {
    fn from(model: DonationModel) -> Self {
        Donation {
            id: model.id,
            donor_id: model.donor_id,
            appeal_id: model.appeal_id,
            reference: ReferenceCode::from_stored(model.reference),
            amount: model.amount,
            currency: model.currency,
            frequency: parse_frequency(&model.frequency),
            donation_type: model.donation_type,
            contact: ContactSnapshot {
                email: EmailAddress::from_stored(model.contact_email),
                first_name: model.contact_first_name,
                last_name: model.contact_last_name,
                phone: model.contact_phone,
                address: parse_address(model.contact_address),
            },
            anonymous: model.anonymous,
            display_name: model.display_name,
            gift_aid: GiftAidDetail {
                enabled: model.gift_aid_enabled,
                amount: model.gift_aid_amount,
                declared: model.gift_aid_declared,
            },
            platform_fee: PlatformFeeDetail {
                enabled: model.fee_enabled,
                percent: FeePercent::from_basis_points(model.fee_basis_points)
                    .unwrap_or(FeePercent::ZERO),
                amount: model.fee_amount,
            },
            payment: PaymentDetail {
                method: model.payment_method,
                intent_ref: model.intent_ref,
                subscription_ref: model.subscription_ref,
                customer_ref: model.customer_ref,
            },
            status: parse_status(&model.status),
            total: model.total,
            marketing_consent: model.marketing_consent,
            notes: model.notes,
            created_at: model.created_at,
            completed_at: model.completed_at,
        }
    }
}

/// Convert Donation entity reference to values for database insertion
pub struct DonationInsert<'a> {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub appeal_id: Option<Uuid>,
    pub reference: &'a str,
    pub amount: i64,
    pub currency: &'a str,
    pub frequency: &'static str,
    pub donation_type: &'a str,
    pub contact_email: &'a str,
    pub contact_first_name: Option<&'a str>,
    pub contact_last_name: Option<&'a str>,
    pub contact_phone: Option<&'a str>,
    pub contact_address: Option<Value>,
    pub anonymous: bool,
    pub display_name: Option<&'a str>,
    pub gift_aid_enabled: bool,
    pub gift_aid_amount: i64,
    pub gift_aid_declared: bool,
    pub fee_enabled: bool,
    pub fee_basis_points: i64,
    pub fee_amount: i64,
    pub payment_method: &'a str,
    pub intent_ref: Option<&'a str>,
    pub subscription_ref: Option<&'a str>,
    pub customer_ref: Option<&'a str>,
    pub status: &'static str,
    pub total: i64,
    pub marketing_consent: bool,
    pub notes: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl<'a> DonationInsert<'a> {
    pub fn new(donation: &'a Donation) -> Self {
        Self {
            id: donation.id,
            donor_id: donation.donor_id,
            appeal_id: donation.appeal_id,
            reference: donation.reference.as_str(),
            amount: donation.amount,
            currency: &donation.currency,
            frequency: donation.frequency.as_str(),
            donation_type: &donation.donation_type,
            contact_email: donation.contact.email.as_str(),
            contact_first_name: donation.contact.first_name.as_deref(),
            contact_last_name: donation.contact.last_name.as_deref(),
            contact_phone: donation.contact.phone.as_deref(),
            contact_address: address_json(donation.contact.address.as_ref()),
            anonymous: donation.anonymous,
            display_name: donation.display_name.as_deref(),
            gift_aid_enabled: donation.gift_aid.enabled,
            gift_aid_amount: donation.gift_aid.amount,
            gift_aid_declared: donation.gift_aid.declared,
            fee_enabled: donation.platform_fee.enabled,
            fee_basis_points: donation.platform_fee.percent.basis_points(),
            fee_amount: donation.platform_fee.amount,
            payment_method: &donation.payment.method,
            intent_ref: donation.payment.intent_ref.as_deref(),
            subscription_ref: donation.payment.subscription_ref.as_deref(),
            customer_ref: donation.payment.customer_ref.as_deref(),
            status: donation.status.as_str(),
            total: donation.total,
            marketing_consent: donation.marketing_consent,
            notes: donation.notes.as_deref(),
            created_at: donation.created_at,
            completed_at: donation.completed_at,
        }
    }
}
