//! In-memory port implementations for hermetic end-to-end tests
//!
//! These adapters mirror the semantics of the PostgreSQL repositories
//! (status-guarded transitions, first-writer-wins customer refs, unique
//! emails) while keeping the whole suite runnable without external
//! services. The gateway double records outbound create calls and reuses
//! the real webhook signature verifier, so tests sign deliveries exactly
//! the way the processor would.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use sadaqa_core::entities::{Appeal, Donation, Donor, Subscription};
use sadaqa_core::error::DomainError;
use sadaqa_core::traits::{
    AppealRepository, CreateCustomer, CreatePaymentIntent, CreateRecurringPrice,
    CreateSubscription, CustomerHandle, DonationReceipt, DonationRepository, DonorRepository,
    EventLedger, GatewayEvent, GatewayResult, NotifyError, NotifyResult, PaymentGateway,
    PaymentIntentHandle, PriceHandle, ReceiptNotifier, RepoResult, SubscriptionHandle,
    SubscriptionRepository,
};
use sadaqa_core::value_objects::{DonationStatus, EmailAddress, MinorUnits, SubscriptionStatus};
use sadaqa_pay::{parse_event, WebhookVerifier};

// ============================================================================
// Donor repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryDonorRepository {
    donors: Mutex<HashMap<Uuid, Donor>>,
}

impl InMemoryDonorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot a donor row for assertions
    pub fn get(&self, id: Uuid) -> Option<Donor> {
        self.donors.lock().get(&id).cloned()
    }

    /// Snapshot a donor row by raw email for assertions
    pub fn get_by_email(&self, email: &str) -> Option<Donor> {
        self.donors
            .lock()
            .values()
            .find(|d| d.email.as_str() == email)
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.donors.lock().len()
    }
}

#[async_trait]
impl DonorRepository for InMemoryDonorRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Donor>> {
        Ok(self.donors.lock().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> RepoResult<Option<Donor>> {
        Ok(self
            .donors
            .lock()
            .values()
            .find(|d| d.email == *email)
            .cloned())
    }

    async fn create(&self, donor: &Donor) -> RepoResult<()> {
        let mut donors = self.donors.lock();
        if donors.values().any(|d| d.email == donor.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        donors.insert(donor.id, donor.clone());
        Ok(())
    }

    async fn update_contact(&self, donor: &Donor) -> RepoResult<()> {
        let mut donors = self.donors.lock();
        let row = donors
            .get_mut(&donor.id)
            .ok_or(DomainError::DonorNotFound(donor.id))?;

        row.first_name = donor.first_name.clone();
        row.last_name = donor.last_name.clone();
        row.display_name = donor.display_name.clone();
        row.anonymous = donor.anonymous;
        row.phone = donor.phone.clone();
        row.address = donor.address.clone();
        row.gift_aid_eligible = donor.gift_aid_eligible;
        row.gift_aid_declared_at = donor.gift_aid_declared_at;
        row.marketing_consent = donor.marketing_consent;
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn set_customer_ref(&self, id: Uuid, customer_ref: &str) -> RepoResult<String> {
        let mut donors = self.donors.lock();
        let row = donors.get_mut(&id).ok_or(DomainError::DonorNotFound(id))?;

        // First writer wins, matching the COALESCE in the SQL implementation.
        if row.customer_ref.is_none() {
            row.customer_ref = Some(customer_ref.to_string());
        }
        row.updated_at = Utc::now();
        Ok(row.customer_ref.clone().unwrap_or_default())
    }

    async fn record_completed_donation(
        &self,
        id: Uuid,
        amount: MinorUnits,
        at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let mut donors = self.donors.lock();
        let row = donors.get_mut(&id).ok_or(DomainError::DonorNotFound(id))?;

        row.total_donated += amount;
        row.donation_count += 1;
        row.last_donation_at = Some(row.last_donation_at.map_or(at, |prev| prev.max(at)));
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn recompute_totals(&self, _id: Uuid) -> RepoResult<()> {
        // The memory store has no donation rows to fold; aggregates are
        // maintained incrementally above.
        Ok(())
    }
}

// ============================================================================
// Donation repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryDonationRepository {
    donations: Mutex<HashMap<Uuid, Donation>>,
}

impl InMemoryDonationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot a donation row for assertions
    pub fn get(&self, id: Uuid) -> Option<Donation> {
        self.donations.lock().get(&id).cloned()
    }

    /// Snapshot every donation row for assertions
    pub fn all(&self) -> Vec<Donation> {
        self.donations.lock().values().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.donations.lock().len()
    }
}

#[async_trait]
impl DonationRepository for InMemoryDonationRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Donation>> {
        Ok(self.donations.lock().get(&id).cloned())
    }

    async fn find_by_intent_ref(&self, intent_ref: &str) -> RepoResult<Option<Donation>> {
        Ok(self
            .donations
            .lock()
            .values()
            .find(|d| d.payment.intent_ref.as_deref() == Some(intent_ref))
            .cloned())
    }

    async fn create(&self, donation: &Donation) -> RepoResult<()> {
        self.donations.lock().insert(donation.id, donation.clone());
        Ok(())
    }

    async fn complete(&self, id: Uuid, at: DateTime<Utc>) -> RepoResult<bool> {
        let mut donations = self.donations.lock();
        let Some(row) = donations.get_mut(&id) else {
            return Ok(false);
        };
        if row.status != DonationStatus::Pending {
            return Ok(false);
        }
        row.status = DonationStatus::Completed;
        row.completed_at = Some(at);
        Ok(true)
    }

    async fn fail(&self, id: Uuid, reason: Option<&str>) -> RepoResult<bool> {
        let mut donations = self.donations.lock();
        let Some(row) = donations.get_mut(&id) else {
            return Ok(false);
        };
        if row.status != DonationStatus::Pending {
            return Ok(false);
        }
        row.status = DonationStatus::Failed;
        if let Some(reason) = reason {
            row.notes = Some(reason.to_string());
        }
        Ok(true)
    }
}

// ============================================================================
// Appeal repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryAppealRepository {
    appeals: Mutex<HashMap<Uuid, Appeal>>,
}

impl InMemoryAppealRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot an appeal row for assertions
    pub fn get(&self, id: Uuid) -> Option<Appeal> {
        self.appeals.lock().get(&id).cloned()
    }
}

#[async_trait]
impl AppealRepository for InMemoryAppealRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Appeal>> {
        Ok(self.appeals.lock().get(&id).cloned())
    }

    async fn create(&self, appeal: &Appeal) -> RepoResult<()> {
        self.appeals.lock().insert(appeal.id, appeal.clone());
        Ok(())
    }

    async fn record_donation(&self, id: Uuid, amount: MinorUnits) -> RepoResult<()> {
        let mut appeals = self.appeals.lock();
        let row = appeals.get_mut(&id).ok_or(DomainError::AppealNotFound(id))?;
        row.record_donation(amount, Utc::now());
        Ok(())
    }

    async fn recompute_totals(&self, _id: Uuid) -> RepoResult<()> {
        Ok(())
    }
}

// ============================================================================
// Subscription repository
// ============================================================================

#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: Mutex<HashMap<String, Subscription>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot a subscription row for assertions
    pub fn get(&self, processor_ref: &str) -> Option<Subscription> {
        self.subscriptions.lock().get(processor_ref).cloned()
    }

    /// Snapshot every subscription row for assertions
    pub fn all(&self) -> Vec<Subscription> {
        self.subscriptions.lock().values().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.subscriptions.lock().len()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn find_by_processor_ref(
        &self,
        processor_ref: &str,
    ) -> RepoResult<Option<Subscription>> {
        Ok(self.subscriptions.lock().get(processor_ref).cloned())
    }

    async fn list_for_donor(&self, donor_id: Uuid) -> RepoResult<Vec<Subscription>> {
        Ok(self
            .subscriptions
            .lock()
            .values()
            .filter(|s| s.donor_id == donor_id)
            .cloned()
            .collect())
    }

    async fn create(&self, subscription: &Subscription) -> RepoResult<()> {
        self.subscriptions
            .lock()
            .insert(subscription.processor_ref.clone(), subscription.clone());
        Ok(())
    }

    async fn update_cycle(
        &self,
        processor_ref: &str,
        status: SubscriptionStatus,
        next_payment_at: Option<DateTime<Utc>>,
    ) -> RepoResult<bool> {
        let mut subscriptions = self.subscriptions.lock();
        let Some(row) = subscriptions.get_mut(processor_ref) else {
            return Ok(false);
        };
        row.apply_update(status, next_payment_at, Utc::now());
        Ok(true)
    }

    async fn cancel(&self, processor_ref: &str) -> RepoResult<bool> {
        let mut subscriptions = self.subscriptions.lock();
        let Some(row) = subscriptions.get_mut(processor_ref) else {
            return Ok(false);
        };
        if row.status == SubscriptionStatus::Cancelled {
            return Ok(false);
        }
        row.cancel(Utc::now());
        Ok(true)
    }
}

// ============================================================================
// Event ledger
// ============================================================================

#[derive(Default)]
pub struct InMemoryEventLedger {
    claims: Mutex<HashSet<String>>,
}

impl InMemoryEventLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claimed(&self, event_ref: &str) -> bool {
        self.claims.lock().contains(event_ref)
    }
}

#[async_trait]
impl EventLedger for InMemoryEventLedger {
    async fn claim(&self, event_ref: &str, _kind: &str) -> RepoResult<bool> {
        Ok(self.claims.lock().insert(event_ref.to_string()))
    }
}

// ============================================================================
// Payment gateway
// ============================================================================

/// Gateway double that records outbound create calls and verifies webhook
/// signatures with the real verifier
pub struct RecordingGateway {
    verifier: WebhookVerifier,
    counter: AtomicU64,
    customers: Mutex<Vec<CreateCustomer>>,
    intents: Mutex<Vec<CreatePaymentIntent>>,
    prices: Mutex<Vec<CreateRecurringPrice>>,
    subscriptions: Mutex<Vec<CreateSubscription>>,
}

impl RecordingGateway {
    pub fn new(webhook_secret: &str) -> Self {
        Self {
            verifier: WebhookVerifier::new(webhook_secret),
            counter: AtomicU64::new(1),
            customers: Mutex::new(Vec::new()),
            intents: Mutex::new(Vec::new()),
            prices: Mutex::new(Vec::new()),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }

    pub fn customers(&self) -> Vec<CreateCustomer> {
        self.customers.lock().clone()
    }

    pub fn intents(&self) -> Vec<CreatePaymentIntent> {
        self.intents.lock().clone()
    }

    pub fn prices(&self) -> Vec<CreateRecurringPrice> {
        self.prices.lock().clone()
    }

    pub fn subscriptions(&self) -> Vec<CreateSubscription> {
        self.subscriptions.lock().clone()
    }
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn create_customer(&self, request: CreateCustomer) -> GatewayResult<CustomerHandle> {
        self.customers.lock().push(request);
        Ok(CustomerHandle {
            customer_ref: format!("cus_test_{}", self.next()),
        })
    }

    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntent,
    ) -> GatewayResult<PaymentIntentHandle> {
        self.intents.lock().push(request);
        let n = self.next();
        Ok(PaymentIntentHandle {
            intent_ref: format!("pi_test_{n}"),
            client_secret: format!("pi_test_{n}_secret"),
        })
    }

    async fn create_recurring_price(
        &self,
        request: CreateRecurringPrice,
    ) -> GatewayResult<PriceHandle> {
        self.prices.lock().push(request);
        Ok(PriceHandle {
            price_ref: format!("price_test_{}", self.next()),
        })
    }

    async fn create_subscription(
        &self,
        request: CreateSubscription,
    ) -> GatewayResult<SubscriptionHandle> {
        self.subscriptions.lock().push(request);
        let n = self.next();
        Ok(SubscriptionHandle {
            subscription_ref: format!("sub_test_{n}"),
            intent_ref: Some(format!("pi_sub_test_{n}")),
            client_secret: Some(format!("pi_sub_test_{n}_secret")),
        })
    }

    fn verify_event(&self, payload: &[u8], signature_header: &str) -> GatewayResult<GatewayEvent> {
        self.verifier.verify(payload, signature_header)?;
        parse_event(payload)
    }
}

// ============================================================================
// Receipt notifier
// ============================================================================

/// Notifier double that captures receipts, optionally rejecting them to
/// exercise the webhook's best-effort dispatch path
#[derive(Default)]
pub struct CaptureNotifier {
    receipts: Mutex<Vec<DonationReceipt>>,
    rejecting: AtomicBool,
}

impl CaptureNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail with a transport error
    pub fn reject_sends(&self) {
        self.rejecting.store(true, Ordering::SeqCst);
    }

    pub fn receipts(&self) -> Vec<DonationReceipt> {
        self.receipts.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.receipts.lock().len()
    }
}

#[async_trait]
impl ReceiptNotifier for CaptureNotifier {
    async fn send_receipt(&self, receipt: &DonationReceipt) -> NotifyResult<()> {
        if self.rejecting.load(Ordering::SeqCst) {
            return Err(NotifyError::Transport("connection refused".to_string()));
        }
        self.receipts.lock().push(receipt.clone());
        Ok(())
    }
}
