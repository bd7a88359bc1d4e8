//! Webhook reconciliation service
//!
//! Receives asynchronous processor events, verifies their authenticity, and
//! transitions donation, donor, and appeal state. Every handler is idempotent
//! under redelivery: settled donations are guarded by their status, recurring
//! cycle charges by the processed-event ledger.

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use sadaqa_core::entities::{
    ContactSnapshot, Donation, Donor, GiftAidDetail, PaymentDetail, PlatformFeeDetail,
    Subscription,
};
use sadaqa_core::traits::{DonationReceipt, EventPayload, GatewayEvent};
use sadaqa_core::value_objects::{DonationStatus, MinorUnits, ReferenceCode, SubscriptionStatus};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// What a delivered event did to local state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The event mutated local records.
    Processed,
    /// A redelivery of an event that already took effect.
    AlreadyProcessed,
    /// The event references nothing the core tracks; acknowledged as-is.
    Ignored,
}

impl ReconcileOutcome {
    /// Short name for logging
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::AlreadyProcessed => "already_processed",
            Self::Ignored => "ignored",
        }
    }
}

/// Webhook reconciliation service
pub struct WebhookService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> WebhookService<'a> {
    /// Create a new WebhookService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Verify and apply one delivered event
    ///
    /// Signature verification runs before anything else; a failure there
    /// reaches the caller as an authenticity error with no state touched.
    #[instrument(skip(self, payload, signature_header), fields(payload_len = payload.len()))]
    pub async fn process_event(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> ServiceResult<ReconcileOutcome> {
        let event = match self.ctx.gateway().verify_event(payload, signature_header) {
            Ok(event) => event,
            Err(e) if e.is_authenticity() => {
                warn!(error = %e, "Rejected webhook delivery");
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };

        let kind = event.payload.kind().to_string();
        let outcome = self.apply(event).await?;
        info!(kind = %kind, outcome = outcome.as_str(), "Webhook event handled");
        Ok(outcome)
    }

    async fn apply(&self, event: GatewayEvent) -> ServiceResult<ReconcileOutcome> {
        match event.payload {
            EventPayload::PaymentSucceeded { intent_ref } => {
                self.settle_payment(&intent_ref).await
            }
            EventPayload::PaymentFailed { intent_ref, reason } => {
                self.fail_payment(&intent_ref, reason.as_deref()).await
            }
            EventPayload::InvoicePaid {
                invoice_ref,
                subscription_ref,
                amount,
                currency,
            } => {
                self.record_cycle_charge(&invoice_ref, &subscription_ref, amount, currency)
                    .await
            }
            EventPayload::SubscriptionUpdated {
                subscription_ref,
                status,
                next_payment_at,
            } => {
                self.update_subscription(&subscription_ref, &status, next_payment_at)
                    .await
            }
            EventPayload::SubscriptionDeleted { subscription_ref } => {
                self.cancel_subscription(&subscription_ref).await
            }
            EventPayload::Unrecognized { kind } => {
                info!(kind = %kind, "Ignoring unrecognized gateway event");
                Ok(ReconcileOutcome::Ignored)
            }
        }
    }

    /// The payer completed a one-time charge
    async fn settle_payment(&self, intent_ref: &str) -> ServiceResult<ReconcileOutcome> {
        let Some(donation) = self.ctx.donation_repo().find_by_intent_ref(intent_ref).await? else {
            info!(intent_ref = %intent_ref, "Payment succeeded for unknown payment intent");
            return Ok(ReconcileOutcome::Ignored);
        };

        let now = Utc::now();
        // The status guard makes redelivery a no-op; only the first
        // delivery crosses it and credits the aggregates.
        if !self.ctx.donation_repo().complete(donation.id, now).await? {
            info!(donation_id = %donation.id, "Donation already settled");
            return Ok(ReconcileOutcome::AlreadyProcessed);
        }

        self.ctx
            .donor_repo()
            .record_completed_donation(donation.donor_id, donation.amount, now)
            .await?;

        if let Some(appeal_id) = donation.appeal_id {
            self.ctx
                .appeal_repo()
                .record_donation(appeal_id, donation.amount)
                .await?;
        }

        info!(
            donation_id = %donation.id,
            reference = %donation.reference,
            amount = donation.amount,
            "Donation completed"
        );

        self.dispatch_receipt(&donation, now).await;
        Ok(ReconcileOutcome::Processed)
    }

    /// The processor gave up on a charge
    async fn fail_payment(
        &self,
        intent_ref: &str,
        reason: Option<&str>,
    ) -> ServiceResult<ReconcileOutcome> {
        let Some(donation) = self.ctx.donation_repo().find_by_intent_ref(intent_ref).await? else {
            info!(intent_ref = %intent_ref, "Payment failed for unknown payment intent");
            return Ok(ReconcileOutcome::Ignored);
        };

        if !self.ctx.donation_repo().fail(donation.id, reason).await? {
            info!(donation_id = %donation.id, "Donation already settled");
            return Ok(ReconcileOutcome::AlreadyProcessed);
        }

        warn!(
            donation_id = %donation.id,
            reference = %donation.reference,
            reason = reason.unwrap_or("unspecified"),
            "Donation failed"
        );
        Ok(ReconcileOutcome::Processed)
    }

    /// A recurring subscription charged another cycle; record it as its own
    /// completed donation
    async fn record_cycle_charge(
        &self,
        invoice_ref: &str,
        subscription_ref: &str,
        amount: Option<MinorUnits>,
        currency: Option<String>,
    ) -> ServiceResult<ReconcileOutcome> {
        let Some(subscription) = self
            .ctx
            .subscription_repo()
            .find_by_processor_ref(subscription_ref)
            .await?
        else {
            info!(subscription_ref = %subscription_ref, "Invoice paid for unknown subscription");
            return Ok(ReconcileOutcome::Ignored);
        };

        let Some(donor) = self.ctx.donor_repo().find_by_id(subscription.donor_id).await? else {
            info!(donor_id = %subscription.donor_id, "Invoice paid for unknown donor");
            return Ok(ReconcileOutcome::Ignored);
        };

        // The ledger claim is keyed by invoice reference, so a redelivered
        // or re-sent invoice event cannot create a second row.
        if !self
            .ctx
            .event_ledger()
            .claim(invoice_ref, "invoice_paid")
            .await?
        {
            info!(invoice_ref = %invoice_ref, "Invoice already recorded");
            return Ok(ReconcileOutcome::AlreadyProcessed);
        }

        let now = Utc::now();
        let charged = amount.unwrap_or(subscription.amount);
        let donation = cycle_donation(&subscription, &donor, invoice_ref, charged, currency, now);
        self.ctx.donation_repo().create(&donation).await?;

        self.ctx
            .donor_repo()
            .record_completed_donation(donor.id, donation.amount, now)
            .await?;

        info!(
            donation_id = %donation.id,
            subscription_ref = %subscription_ref,
            invoice_ref = %invoice_ref,
            amount = donation.amount,
            "Recurring cycle recorded"
        );

        self.dispatch_receipt(&donation, now).await;
        Ok(ReconcileOutcome::Processed)
    }

    /// The processor changed a subscription's status or schedule
    async fn update_subscription(
        &self,
        subscription_ref: &str,
        status: &str,
        next_payment_at: Option<DateTime<Utc>>,
    ) -> ServiceResult<ReconcileOutcome> {
        let Some(status) = SubscriptionStatus::from_processor(status) else {
            info!(
                subscription_ref = %subscription_ref,
                status = %status,
                "Ignoring unmapped subscription status"
            );
            return Ok(ReconcileOutcome::Ignored);
        };

        if !self
            .ctx
            .subscription_repo()
            .update_cycle(subscription_ref, status, next_payment_at)
            .await?
        {
            info!(subscription_ref = %subscription_ref, "Update for unknown subscription");
            return Ok(ReconcileOutcome::Ignored);
        }

        info!(
            subscription_ref = %subscription_ref,
            status = %status,
            "Subscription updated"
        );
        Ok(ReconcileOutcome::Processed)
    }

    /// The processor ended a subscription
    async fn cancel_subscription(&self, subscription_ref: &str) -> ServiceResult<ReconcileOutcome> {
        if self.ctx.subscription_repo().cancel(subscription_ref).await? {
            info!(subscription_ref = %subscription_ref, "Subscription cancelled");
            return Ok(ReconcileOutcome::Processed);
        }

        // Distinguish a redelivered deletion from a subscription the core
        // never tracked.
        if self
            .ctx
            .subscription_repo()
            .find_by_processor_ref(subscription_ref)
            .await?
            .is_some()
        {
            info!(subscription_ref = %subscription_ref, "Subscription already cancelled");
            Ok(ReconcileOutcome::AlreadyProcessed)
        } else {
            info!(subscription_ref = %subscription_ref, "Deletion for unknown subscription");
            Ok(ReconcileOutcome::Ignored)
        }
    }

    /// Best-effort receipt dispatch; failures are logged and never surface
    /// into the webhook response
    async fn dispatch_receipt(&self, donation: &Donation, completed_at: DateTime<Utc>) {
        let receipt = DonationReceipt {
            email: donation.contact.email.as_str().to_string(),
            donor_name: donation.contact.full_name(),
            reference: donation.reference.as_str().to_string(),
            amount: donation.amount,
            platform_fee: donation.platform_fee.amount,
            total: donation.total,
            gift_aid: donation.gift_aid.amount,
            currency: donation.currency.clone(),
            frequency: donation.frequency,
            donation_type: donation.donation_type.clone(),
            completed_at,
        };

        if let Err(e) = self.ctx.notifier().send_receipt(&receipt).await {
            warn!(
                donation_id = %donation.id,
                reference = %donation.reference,
                error = %e,
                "Receipt dispatch failed"
            );
        }
    }
}

/// Build the completed donation row for one recurring cycle charge
fn cycle_donation(
    subscription: &Subscription,
    donor: &Donor,
    invoice_ref: &str,
    charged: MinorUnits,
    currency: Option<String>,
    at: DateTime<Utc>,
) -> Donation {
    Donation {
        id: Uuid::new_v4(),
        donor_id: donor.id,
        appeal_id: None,
        reference: ReferenceCode::generate(),
        amount: charged,
        currency: currency.unwrap_or_else(|| subscription.currency.clone()),
        frequency: subscription.frequency,
        donation_type: "recurring".to_string(),
        contact: ContactSnapshot {
            email: donor.email.clone(),
            first_name: donor.first_name.clone(),
            last_name: donor.last_name.clone(),
            phone: donor.phone.clone(),
            address: donor.address.clone(),
        },
        anonymous: donor.anonymous,
        display_name: donor.display_name.clone(),
        gift_aid: GiftAidDetail::disabled(),
        platform_fee: PlatformFeeDetail::disabled(),
        payment: PaymentDetail {
            method: "card".to_string(),
            intent_ref: Some(invoice_ref.to_string()),
            subscription_ref: Some(subscription.processor_ref.clone()),
            customer_ref: donor.customer_ref.clone(),
        },
        status: DonationStatus::Completed,
        total: charged,
        marketing_consent: donor.marketing_consent,
        notes: None,
        created_at: at,
        completed_at: Some(at),
    }
}
