//! Subscription entity - a donor's recurring giving plan

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::{Frequency, MinorUnits, SubscriptionStatus};

/// Subscription entity
///
/// One row per recurring donation plan, keyed by the processor-side
/// subscription reference. Each billing cycle produces its own Donation row;
/// this entry only tracks the plan itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: Uuid,
    pub donor_id: Uuid,
    /// Processor-side subscription reference ("sub_...").
    pub processor_ref: String,
    pub frequency: Frequency,
    /// Charged per cycle, minor units (donation plus platform fee).
    pub amount: MinorUnits,
    pub currency: String,
    pub status: SubscriptionStatus,
    pub next_payment_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Create a new active Subscription
    pub fn new(
        id: Uuid,
        donor_id: Uuid,
        processor_ref: String,
        frequency: Frequency,
        amount: MinorUnits,
        currency: String,
    ) -> Self {
        let now = Utc::now();
        let next_payment_at = frequency
            .billing_interval()
            .map(|interval| interval.next_occurrence(now));
        Self {
            id,
            donor_id,
            processor_ref,
            frequency,
            amount,
            currency,
            status: SubscriptionStatus::Active,
            next_payment_at,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// Apply a processor-reported status/schedule change
    pub fn apply_update(
        &mut self,
        status: SubscriptionStatus,
        next_payment_at: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    ) {
        self.status = status;
        if next_payment_at.is_some() {
            self.next_payment_at = next_payment_at;
        }
        self.updated_at = at;
    }

    /// Cancel the plan
    pub fn cancel(&mut self, at: DateTime<Utc>) {
        self.status = SubscriptionStatus::Cancelled;
        self.next_payment_at = None;
        self.updated_at = at;
    }
}
