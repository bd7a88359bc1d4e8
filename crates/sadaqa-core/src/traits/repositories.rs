//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{Appeal, Donation, Donor, Subscription};
use crate::error::DomainError;
use crate::value_objects::{EmailAddress, MinorUnits, SubscriptionStatus};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Donor Repository
// ============================================================================

#[async_trait]
pub trait DonorRepository: Send + Sync {
    /// Find donor by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Donor>>;

    /// Find donor by normalized email
    async fn find_by_email(&self, email: &EmailAddress) -> RepoResult<Option<Donor>>;

    /// Create a new donor
    ///
    /// Fails with `EmailAlreadyExists` when a concurrent request created the
    /// same normalized email first; callers reload and continue.
    async fn create(&self, donor: &Donor) -> RepoResult<()>;

    /// Refresh contact and consent fields from a later donation submission
    async fn update_contact(&self, donor: &Donor) -> RepoResult<()>;

    /// Persist the processor customer reference, first writer wins
    ///
    /// Returns the reference now stored on the row (ours or the winner's).
    async fn set_customer_ref(&self, id: Uuid, customer_ref: &str) -> RepoResult<String>;

    /// Atomically fold one completed donation into the lifetime aggregates
    async fn record_completed_donation(
        &self,
        id: Uuid,
        amount: MinorUnits,
        at: DateTime<Utc>,
    ) -> RepoResult<()>;

    /// Recompute the cached aggregates from completed donation rows
    async fn recompute_totals(&self, id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Donation Repository
// ============================================================================

#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// Find donation by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Donation>>;

    /// Find donation by processor payment-intent reference
    async fn find_by_intent_ref(&self, intent_ref: &str) -> RepoResult<Option<Donation>>;

    /// Create a new donation row
    async fn create(&self, donation: &Donation) -> RepoResult<()>;

    /// Transition `pending -> completed`, status-guarded at the storage layer
    ///
    /// Returns `true` only for the call that performed the transition, so a
    /// redelivered webhook cannot credit twice.
    async fn complete(&self, id: Uuid, at: DateTime<Utc>) -> RepoResult<bool>;

    /// Transition `pending -> failed` with the processor's reason
    ///
    /// Returns `true` only for the call that performed the transition.
    async fn fail(&self, id: Uuid, reason: Option<&str>) -> RepoResult<bool>;
}

// ============================================================================
// Appeal Repository
// ============================================================================

#[async_trait]
pub trait AppealRepository: Send + Sync {
    /// Find appeal by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Appeal>>;

    /// Create a new appeal
    async fn create(&self, appeal: &Appeal) -> RepoResult<()>;

    /// Atomically add one completed donation to the campaign totals
    async fn record_donation(&self, id: Uuid, amount: MinorUnits) -> RepoResult<()>;

    /// Recompute the cached totals from completed donation rows
    async fn recompute_totals(&self, id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Subscription Repository
// ============================================================================

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Find subscription by processor reference
    async fn find_by_processor_ref(&self, processor_ref: &str)
        -> RepoResult<Option<Subscription>>;

    /// List all subscriptions belonging to a donor
    async fn list_for_donor(&self, donor_id: Uuid) -> RepoResult<Vec<Subscription>>;

    /// Create a new subscription entry
    async fn create(&self, subscription: &Subscription) -> RepoResult<()>;

    /// Apply a processor-reported status/schedule change
    ///
    /// Returns `false` when no row matches the reference.
    async fn update_cycle(
        &self,
        processor_ref: &str,
        status: SubscriptionStatus,
        next_payment_at: Option<DateTime<Utc>>,
    ) -> RepoResult<bool>;

    /// Mark the plan cancelled
    ///
    /// Returns `false` when no row matches the reference.
    async fn cancel(&self, processor_ref: &str) -> RepoResult<bool>;
}

// ============================================================================
// Event Ledger
// ============================================================================

/// Processed-event ledger backing webhook idempotency
///
/// Row-creating webhook effects (recurring invoice charges) claim their event
/// reference here before acting; a redelivery finds the claim and skips.
#[async_trait]
pub trait EventLedger: Send + Sync {
    /// Claim an event reference
    ///
    /// Returns `true` when this call made the claim, `false` when the event
    /// was already processed.
    async fn claim(&self, event_ref: &str, kind: &str) -> RepoResult<bool>;
}
