//! Service context - dependency container for services
//!
//! Holds the repositories, payment gateway, and notifier ports every service
//! needs, plus the donation settings they share.

use std::sync::Arc;

use sadaqa_common::config::DonationConfig;
use sadaqa_core::traits::{
    AppealRepository, DonationRepository, DonorRepository, EventLedger, PaymentGateway,
    ReceiptNotifier, SubscriptionRepository,
};
use sadaqa_db::PgPool;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Record store repositories (donors, donations, appeals, subscriptions)
/// - The processed-event ledger backing webhook idempotency
/// - The payment gateway port
/// - The receipt notifier port
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: PgPool,

    // Repositories
    donor_repo: Arc<dyn DonorRepository>,
    donation_repo: Arc<dyn DonationRepository>,
    appeal_repo: Arc<dyn AppealRepository>,
    subscription_repo: Arc<dyn SubscriptionRepository>,
    event_ledger: Arc<dyn EventLedger>,

    // External collaborators
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn ReceiptNotifier>,

    // Settings
    donation_config: DonationConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        donor_repo: Arc<dyn DonorRepository>,
        donation_repo: Arc<dyn DonationRepository>,
        appeal_repo: Arc<dyn AppealRepository>,
        subscription_repo: Arc<dyn SubscriptionRepository>,
        event_ledger: Arc<dyn EventLedger>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn ReceiptNotifier>,
        donation_config: DonationConfig,
    ) -> Self {
        Self {
            pool,
            donor_repo,
            donation_repo,
            appeal_repo,
            subscription_repo,
            event_ledger,
            gateway,
            notifier,
            donation_config,
        }
    }

    // === Database Pool ===

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Repositories ===

    /// Get the donor repository
    pub fn donor_repo(&self) -> &dyn DonorRepository {
        self.donor_repo.as_ref()
    }

    /// Get the donation repository
    pub fn donation_repo(&self) -> &dyn DonationRepository {
        self.donation_repo.as_ref()
    }

    /// Get the appeal repository
    pub fn appeal_repo(&self) -> &dyn AppealRepository {
        self.appeal_repo.as_ref()
    }

    /// Get the subscription repository
    pub fn subscription_repo(&self) -> &dyn SubscriptionRepository {
        self.subscription_repo.as_ref()
    }

    /// Get the processed-event ledger
    pub fn event_ledger(&self) -> &dyn EventLedger {
        self.event_ledger.as_ref()
    }

    // === External Collaborators ===

    /// Get the payment gateway
    pub fn gateway(&self) -> &dyn PaymentGateway {
        self.gateway.as_ref()
    }

    /// Get the receipt notifier
    pub fn notifier(&self) -> &dyn ReceiptNotifier {
        self.notifier.as_ref()
    }

    // === Settings ===

    /// Get the donation settings
    pub fn donation_config(&self) -> &DonationConfig {
        &self.donation_config
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    donor_repo: Option<Arc<dyn DonorRepository>>,
    donation_repo: Option<Arc<dyn DonationRepository>>,
    appeal_repo: Option<Arc<dyn AppealRepository>>,
    subscription_repo: Option<Arc<dyn SubscriptionRepository>>,
    event_ledger: Option<Arc<dyn EventLedger>>,
    gateway: Option<Arc<dyn PaymentGateway>>,
    notifier: Option<Arc<dyn ReceiptNotifier>>,
    donation_config: Option<DonationConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            donor_repo: None,
            donation_repo: None,
            appeal_repo: None,
            subscription_repo: None,
            event_ledger: None,
            gateway: None,
            notifier: None,
            donation_config: None,
        }
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn donor_repo(mut self, repo: Arc<dyn DonorRepository>) -> Self {
        self.donor_repo = Some(repo);
        self
    }

    pub fn donation_repo(mut self, repo: Arc<dyn DonationRepository>) -> Self {
        self.donation_repo = Some(repo);
        self
    }

    pub fn appeal_repo(mut self, repo: Arc<dyn AppealRepository>) -> Self {
        self.appeal_repo = Some(repo);
        self
    }

    pub fn subscription_repo(mut self, repo: Arc<dyn SubscriptionRepository>) -> Self {
        self.subscription_repo = Some(repo);
        self
    }

    pub fn event_ledger(mut self, ledger: Arc<dyn EventLedger>) -> Self {
        self.event_ledger = Some(ledger);
        self
    }

    pub fn gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn ReceiptNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn donation_config(mut self, config: DonationConfig) -> Self {
        self.donation_config = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.pool.ok_or_else(|| super::error::ServiceError::validation("pool is required"))?,
            self.donor_repo.ok_or_else(|| super::error::ServiceError::validation("donor_repo is required"))?,
            self.donation_repo.ok_or_else(|| super::error::ServiceError::validation("donation_repo is required"))?,
            self.appeal_repo.ok_or_else(|| super::error::ServiceError::validation("appeal_repo is required"))?,
            self.subscription_repo.ok_or_else(|| super::error::ServiceError::validation("subscription_repo is required"))?,
            self.event_ledger.ok_or_else(|| super::error::ServiceError::validation("event_ledger is required"))?,
            self.gateway.ok_or_else(|| super::error::ServiceError::validation("gateway is required"))?,
            self.notifier.ok_or_else(|| super::error::ServiceError::validation("notifier is required"))?,
            self.donation_config.ok_or_else(|| super::error::ServiceError::validation("donation_config is required"))?,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
