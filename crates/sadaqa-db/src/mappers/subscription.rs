//! Subscription entity <-> model mapper

use chrono::{DateTime, Utc};
use uuid::Uuid;

use sadaqa_core::entities::Subscription;
use sadaqa_core::value_objects::{Frequency, SubscriptionStatus};

use crate::models::SubscriptionModel;

/// Convert a stored status string to the SubscriptionStatus enum
fn parse_status(status: &str) -> SubscriptionStatus {
    status.parse().unwrap_or(SubscriptionStatus::Active)
}

/// Convert SubscriptionModel to Subscription entity
impl From<SubscriptionModel> for Subscription {
    fn from(model: SubscriptionModel) -> Self {
        Subscription {
            id: model.id,
            donor_id: model.donor_id,
            processor_ref: model.processor_ref,
            frequency: model.frequency.parse().unwrap_or(Frequency::Monthly),
            amount: model.amount,
            currency: model.currency,
            status: parse_status(&model.status),
            next_payment_at: model.next_payment_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Convert Subscription entity reference to values for database insertion
pub struct SubscriptionInsert<'a> {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub processor_ref: &'a str,
    pub frequency: &'static str,
    pub amount: i64,
    pub currency: &'a str,
    pub status: &'static str,
    pub next_payment_at: Option<DateTime<Utc>>,
}

impl<'a> SubscriptionInsert<'a> {
    pub fn new(subscription: &'a Subscription) -> Self {
        Self {
            id: subscription.id,
            donor_id: subscription.donor_id,
            processor_ref: &subscription.processor_ref,
            frequency: subscription.frequency.as_str(),
            amount: subscription.amount,
            currency: &subscription.currency,
            status: subscription.status.as_str(),
            next_payment_at: subscription.next_payment_at,
        }
    }
}
