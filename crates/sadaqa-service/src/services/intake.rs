//! Donation intake service
//!
//! Turns a validated donation request into processor-side payment objects and
//! a `pending` donation row. The donation row is written only after every
//! gateway call has succeeded, so a processor failure never leaves an
//! orphaned record behind.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{info, instrument};
use uuid::Uuid;

use sadaqa_core::entities::{
    ContactSnapshot, Donation, Donor, GiftAidDetail, PaymentDetail, PlatformFeeDetail,
    Subscription,
};
use sadaqa_core::error::DomainError;
use sadaqa_core::traits::{
    CreateCustomer, CreatePaymentIntent, CreateRecurringPrice, CreateSubscription,
};
use sadaqa_core::value_objects::money;
use sadaqa_core::value_objects::{
    DonationStatus, EmailAddress, FeePercent, Frequency, MinorUnits, ReferenceCode,
};

use crate::dto::{AmountBreakdown, CreateDonationRequest, CreateDonationResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Seconds per idempotency bucket; create calls repeated inside one bucket
/// carry the same key and cannot double-charge.
const IDEMPOTENCY_BUCKET_SECS: i64 = 300;

/// Donation intake service
pub struct DonationIntakeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DonationIntakeService<'a> {
    /// Create a new DonationIntakeService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Accept a donation request and open the matching payment object at
    /// the processor
    #[instrument(skip(self, request), fields(frequency = %request.frequency, amount = request.amount))]
    pub async fn create_payment(
        &self,
        request: CreateDonationRequest,
    ) -> ServiceResult<CreateDonationResponse> {
        if request.amount <= 0 {
            return Err(DomainError::InvalidAmount(request.amount).into());
        }
        let email = EmailAddress::parse(&request.email)?;
        let frequency: Frequency = request.frequency.parse()?;
        let fee_percent = FeePercent::from_percent(request.platform_fee_percentage)?;
        let currency = request
            .currency
            .clone()
            .unwrap_or_else(|| self.ctx.donation_config().default_currency.clone())
            .to_lowercase();

        // The appeal must exist before any money moves.
        if let Some(appeal_id) = request.appeal_id {
            self.ctx
                .appeal_repo()
                .find_by_id(appeal_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Appeal", appeal_id.to_string()))?;
        }

        let donor = self.resolve_donor(&email, &request).await?;
        let customer_ref = self.ensure_customer_ref(&donor).await?;

        let fee = money::platform_fee(request.amount, fee_percent);
        let total = money::total(request.amount, fee);
        let gift_aid_amount = money::gift_aid(request.amount, request.gift_aid);
        let idempotency_key = derive_idempotency_key(donor.id, total, frequency, Utc::now());

        let (payment, client_secret) = if frequency.is_recurring() {
            self.open_subscription(
                donor.id,
                frequency,
                total,
                &currency,
                &customer_ref,
                &request.payment_method,
                idempotency_key,
            )
            .await?
        } else {
            self.open_payment_intent(
                total,
                &currency,
                &customer_ref,
                &request.donation_type,
                &request.payment_method,
                idempotency_key,
            )
            .await?
        };

        let now = Utc::now();
        let donation = Donation {
            id: Uuid::new_v4(),
            donor_id: donor.id,
            appeal_id: request.appeal_id,
            reference: ReferenceCode::generate(),
            amount: request.amount,
            currency,
            frequency,
            donation_type: request.donation_type.clone(),
            contact: ContactSnapshot {
                email,
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                phone: request.phone.clone(),
                address: request.postal_address(),
            },
            anonymous: request.anonymous,
            display_name: request.display_name.clone(),
            gift_aid: GiftAidDetail {
                enabled: request.gift_aid,
                amount: gift_aid_amount,
                declared: request.gift_aid,
            },
            platform_fee: PlatformFeeDetail {
                enabled: !fee_percent.is_zero(),
                percent: fee_percent,
                amount: fee,
            },
            payment,
            status: DonationStatus::Pending,
            total,
            marketing_consent: request.marketing_consent,
            notes: None,
            created_at: now,
            completed_at: None,
        };
        self.ctx.donation_repo().create(&donation).await?;

        info!(
            donation_id = %donation.id,
            reference = %donation.reference,
            donor_id = %donor.id,
            total = donation.total,
            "Donation recorded pending payment"
        );

        let reference = donation.reference.as_str().to_string();
        let amounts = AmountBreakdown::from(&donation);
        Ok(if frequency.is_recurring() {
            CreateDonationResponse::subscription(donation.id, reference, client_secret, amounts)
        } else {
            let secret = client_secret
                .ok_or_else(|| ServiceError::internal("Payment intent returned no client secret"))?;
            CreateDonationResponse::payment_intent(donation.id, reference, secret, amounts)
        })
    }

    /// Reuse the donor for this email, or create one; a lost insert race
    /// falls back to the winner's row
    async fn resolve_donor(
        &self,
        email: &EmailAddress,
        request: &CreateDonationRequest,
    ) -> ServiceResult<Donor> {
        let repo = self.ctx.donor_repo();
        let now = Utc::now();

        if let Some(mut existing) = repo.find_by_email(email).await? {
            refresh_contact(&mut existing, request, now);
            repo.update_contact(&existing).await?;
            return Ok(existing);
        }

        let mut donor = Donor::new(Uuid::new_v4(), email.clone());
        refresh_contact(&mut donor, request, now);
        match repo.create(&donor).await {
            Ok(()) => {
                info!(donor_id = %donor.id, "Donor created");
                Ok(donor)
            }
            Err(DomainError::EmailAlreadyExists) => {
                let mut existing = repo.find_by_email(email).await?.ok_or_else(|| {
                    ServiceError::internal("Donor missing after duplicate-email insert")
                })?;
                refresh_contact(&mut existing, request, now);
                repo.update_contact(&existing).await?;
                Ok(existing)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Return the donor's processor customer reference, creating the
    /// customer on first contact
    async fn ensure_customer_ref(&self, donor: &Donor) -> ServiceResult<String> {
        if let Some(existing) = &donor.customer_ref {
            return Ok(existing.clone());
        }

        let handle = self
            .ctx
            .gateway()
            .create_customer(CreateCustomer {
                email: donor.email.as_str().to_string(),
                name: donor.full_name(),
            })
            .await?;

        // The store keeps the first writer's reference if two intakes race;
        // adopt whichever reference stuck.
        let attached = self
            .ctx
            .donor_repo()
            .set_customer_ref(donor.id, &handle.customer_ref)
            .await?;
        Ok(attached)
    }

    async fn open_payment_intent(
        &self,
        total: MinorUnits,
        currency: &str,
        customer_ref: &str,
        donation_type: &str,
        payment_method: &str,
        idempotency_key: String,
    ) -> ServiceResult<(PaymentDetail, Option<String>)> {
        let intent = self
            .ctx
            .gateway()
            .create_payment_intent(CreatePaymentIntent {
                amount: total,
                currency: currency.to_string(),
                customer_ref: customer_ref.to_string(),
                description: Some(format!("{donation_type} donation")),
                idempotency_key,
            })
            .await?;

        Ok((
            PaymentDetail {
                method: payment_method.to_string(),
                intent_ref: Some(intent.intent_ref),
                subscription_ref: None,
                customer_ref: Some(customer_ref.to_string()),
            },
            Some(intent.client_secret),
        ))
    }

    #[allow(clippy::too_many_arguments)]
    async fn open_subscription(
        &self,
        donor_id: Uuid,
        frequency: Frequency,
        total: MinorUnits,
        currency: &str,
        customer_ref: &str,
        payment_method: &str,
        idempotency_key: String,
    ) -> ServiceResult<(PaymentDetail, Option<String>)> {
        let interval = frequency
            .billing_interval()
            .ok_or_else(|| ServiceError::validation("One-time gifts cannot open a subscription"))?;

        let price = self
            .ctx
            .gateway()
            .create_recurring_price(CreateRecurringPrice {
                amount: total,
                currency: currency.to_string(),
                interval,
                product_name: self.ctx.donation_config().recurring_product_name.clone(),
            })
            .await?;

        let handle = self
            .ctx
            .gateway()
            .create_subscription(CreateSubscription {
                customer_ref: customer_ref.to_string(),
                price_ref: price.price_ref,
                idempotency_key,
            })
            .await?;

        let subscription = Subscription::new(
            Uuid::new_v4(),
            donor_id,
            handle.subscription_ref.clone(),
            frequency,
            total,
            currency.to_string(),
        );
        self.ctx.subscription_repo().create(&subscription).await?;

        info!(
            subscription_ref = %handle.subscription_ref,
            donor_id = %donor_id,
            frequency = %frequency,
            "Recurring plan opened"
        );

        Ok((
            PaymentDetail {
                method: payment_method.to_string(),
                intent_ref: handle.intent_ref,
                subscription_ref: Some(handle.subscription_ref),
                customer_ref: Some(customer_ref.to_string()),
            },
            handle.client_secret,
        ))
    }
}

/// Fold the submitted contact details into the donor record. Absent fields
/// never clear stored values; checkbox states always apply.
fn refresh_contact(donor: &mut Donor, request: &CreateDonationRequest, at: DateTime<Utc>) {
    if let Some(first) = &request.first_name {
        donor.first_name = Some(first.clone());
    }
    if let Some(last) = &request.last_name {
        donor.last_name = Some(last.clone());
    }
    if let Some(phone) = &request.phone {
        donor.phone = Some(phone.clone());
    }
    if let Some(display) = &request.display_name {
        donor.display_name = Some(display.clone());
    }
    if let Some(address) = request.postal_address() {
        donor.address = Some(address);
    }
    donor.anonymous = request.anonymous;
    donor.marketing_consent = request.marketing_consent;
    if request.gift_aid {
        donor.declare_gift_aid(at);
    }
    donor.updated_at = at;
}

/// Key sent with every processor create call; stable within a five-minute
/// bucket for the same donor, charge, and cadence
fn derive_idempotency_key(
    donor_id: Uuid,
    total: MinorUnits,
    frequency: Frequency,
    at: DateTime<Utc>,
) -> String {
    let bucket = at.timestamp().div_euclid(IDEMPOTENCY_BUCKET_SECS);
    let mut hasher = Sha256::new();
    hasher.update(donor_id.as_bytes());
    hasher.update(total.to_be_bytes());
    hasher.update(frequency.as_str().as_bytes());
    hasher.update(bucket.to_be_bytes());
    hex::encode(hasher.finalize())
}
