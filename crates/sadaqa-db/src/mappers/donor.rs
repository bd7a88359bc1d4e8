//! Donor entity <-> model mapper

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use sadaqa_core::entities::{Donor, PostalAddress};
use sadaqa_core::value_objects::EmailAddress;

use crate::models::DonorModel;

/// Decode a JSONB address column, dropping values that fail to parse
pub fn parse_address(value: Option<Value>) -> Option<PostalAddress> {
    let address: PostalAddress = serde_json::from_value(value?).ok()?;
    (!address.is_empty()).then_some(address)
}

/// Encode a postal address for a JSONB column
pub fn address_json(address: Option<&PostalAddress>) -> Option<Value> {
    address.and_then(|a| serde_json::to_value(a).ok())
}

/// Convert DonorModel to Donor entity
impl From<DonorModel> for Donor {
    fn from(model: DonorModel) -> Self {
        Donor {
            id: model.id,
            email: EmailAddress::from_stored(model.email),
            customer_ref: model.customer_ref,
            first_name: model.first_name,
            last_name: model.last_name,
            display_name: model.display_name,
            anonymous: model.anonymous,
            phone: model.phone,
            address: parse_address(model.address),
            gift_aid_eligible: model.gift_aid_eligible,
            gift_aid_declared_at: model.gift_aid_declared_at,
            marketing_consent: model.marketing_consent,
            total_donated: model.total_donated,
            donation_count: model.donation_count,
            last_donation_at: model.last_donation_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Convert Donor entity reference to values for database insertion
///
/// Lifetime aggregates are not part of the insert; they start at the
/// schema defaults and only move through `record_completed_donation`.
pub struct DonorInsert<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub customer_ref: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub display_name: Option<&'a str>,
    pub anonymous: bool,
    pub phone: Option<&'a str>,
    pub address: Option<Value>,
    pub gift_aid_eligible: bool,
    pub gift_aid_declared_at: Option<DateTime<Utc>>,
    pub marketing_consent: bool,
}

impl<'a> DonorInsert<'a> {
    pub fn new(donor: &'a Donor) -> Self {
        Self {
            id: donor.id,
            email: donor.email.as_str(),
            customer_ref: donor.customer_ref.as_deref(),
            first_name: donor.first_name.as_deref(),
            last_name: donor.last_name.as_deref(),
            display_name: donor.display_name.as_deref(),
            anonymous: donor.anonymous,
            phone: donor.phone.as_deref(),
            address: address_json(donor.address.as_ref()),
            gift_aid_eligible: donor.gift_aid_eligible,
            gift_aid_declared_at: donor.gift_aid_declared_at,
            marketing_consent: donor.marketing_consent,
        }
    }
}

/// Convert Donor entity reference to values for a contact refresh
pub struct DonorContactUpdate<'a> {
    pub id: Uuid,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub display_name: Option<&'a str>,
    pub anonymous: bool,
    pub phone: Option<&'a str>,
    pub address: Option<Value>,
    pub gift_aid_eligible: bool,
    pub gift_aid_declared_at: Option<DateTime<Utc>>,
    pub marketing_consent: bool,
}

impl<'a> DonorContactUpdate<'a> {
    pub fn new(donor: &'a Donor) -> Self {
        Self {
            id: donor.id,
            first_name: donor.first_name.as_deref(),
            last_name: donor.last_name.as_deref(),
            display_name: donor.display_name.as_deref(),
            anonymous: donor.anonymous,
            phone: donor.phone.as_deref(),
            address: address_json(donor.address.as_ref()),
            gift_aid_eligible: donor.gift_aid_eligible,
            gift_aid_declared_at: donor.gift_aid_declared_at,
            marketing_consent: donor.marketing_consent,
        }
    }
}
