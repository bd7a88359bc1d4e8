//! Payment gateway port - the processor operations the core depends on
//!
//! The domain layer defines the calls and the event vocabulary; the gateway
//! crate supplies the HTTP implementation and the signature scheme.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::value_objects::{BillingInterval, MinorUnits};

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors from the payment processor boundary
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway connection failed: {0}")]
    Connection(String),

    #[error("Gateway request timed out")]
    Timeout,

    #[error("Gateway rejected the request: {message}")]
    Api {
        code: Option<String>,
        message: String,
    },

    #[error("Webhook signature header missing")]
    SignatureMissing,

    #[error("Webhook signature header malformed: {0}")]
    SignatureMalformed(String),

    #[error("Webhook signature timestamp outside tolerance")]
    SignatureExpired,

    #[error("Webhook signature mismatch")]
    SignatureMismatch,

    #[error("Webhook payload malformed: {0}")]
    MalformedEvent(String),
}

impl GatewayError {
    /// Whether this error means the webhook could not be authenticated.
    ///
    /// Authenticity failures are the caller's 400 path; everything else on
    /// the webhook route is a processing failure.
    pub fn is_authenticity(&self) -> bool {
        matches!(
            self,
            Self::SignatureMissing
                | Self::SignatureMalformed(_)
                | Self::SignatureExpired
                | Self::SignatureMismatch
                | Self::MalformedEvent(_)
        )
    }
}

// ============================================================================
// Request / response types
// ============================================================================

/// Create a processor-side customer for a donor
#[derive(Debug, Clone)]
pub struct CreateCustomer {
    pub email: String,
    pub name: Option<String>,
}

/// Reference to a processor-side customer
#[derive(Debug, Clone)]
pub struct CustomerHandle {
    pub customer_ref: String,
}

/// Create a single charge for a one-time donation
#[derive(Debug, Clone)]
pub struct CreatePaymentIntent {
    /// Total charged to the payer, minor units.
    pub amount: MinorUnits,
    pub currency: String,
    pub customer_ref: String,
    pub description: Option<String>,
    /// Dedupe key so a resubmitted create cannot double-charge.
    pub idempotency_key: String,
}

/// Reference to a processor-side payment intent plus the client secret the
/// browser needs to confirm it
#[derive(Debug, Clone)]
pub struct PaymentIntentHandle {
    pub intent_ref: String,
    pub client_secret: String,
}

/// Create a recurring billing plan priced per cycle
#[derive(Debug, Clone)]
pub struct CreateRecurringPrice {
    /// Charged each cycle, minor units.
    pub amount: MinorUnits,
    pub currency: String,
    pub interval: BillingInterval,
    pub product_name: String,
}

/// Reference to a processor-side recurring price
#[derive(Debug, Clone)]
pub struct PriceHandle {
    pub price_ref: String,
}

/// Create a subscription against a recurring price
#[derive(Debug, Clone)]
pub struct CreateSubscription {
    pub customer_ref: String,
    pub price_ref: String,
    /// Dedupe key so a resubmitted create cannot double-subscribe.
    pub idempotency_key: String,
}

/// Reference to a processor-side subscription and its first invoice's
/// payment intent
#[derive(Debug, Clone)]
pub struct SubscriptionHandle {
    pub subscription_ref: String,
    pub intent_ref: Option<String>,
    pub client_secret: Option<String>,
}

// ============================================================================
// Webhook events
// ============================================================================

/// A verified webhook event from the processor
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayEvent {
    /// Processor event id, stable across redeliveries.
    pub event_ref: String,
    pub payload: EventPayload,
}

/// The event kinds the reconciliation service acts on
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    PaymentSucceeded {
        intent_ref: String,
    },
    PaymentFailed {
        intent_ref: String,
        reason: Option<String>,
    },
    InvoicePaid {
        invoice_ref: String,
        subscription_ref: String,
        amount: Option<MinorUnits>,
        currency: Option<String>,
    },
    SubscriptionUpdated {
        subscription_ref: String,
        status: String,
        next_payment_at: Option<DateTime<Utc>>,
    },
    SubscriptionDeleted {
        subscription_ref: String,
    },
    /// An event kind the core does not track; acknowledged without action.
    Unrecognized {
        kind: String,
    },
}

impl EventPayload {
    /// Short name for logging
    pub fn kind(&self) -> &str {
        match self {
            Self::PaymentSucceeded { .. } => "payment_succeeded",
            Self::PaymentFailed { .. } => "payment_failed",
            Self::InvoicePaid { .. } => "invoice_paid",
            Self::SubscriptionUpdated { .. } => "subscription_updated",
            Self::SubscriptionDeleted { .. } => "subscription_deleted",
            Self::Unrecognized { kind } => kind,
        }
    }
}

// ============================================================================
// Gateway port
// ============================================================================

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a processor-side customer
    async fn create_customer(&self, request: CreateCustomer) -> GatewayResult<CustomerHandle>;

    /// Create a payment intent for a one-time charge
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntent,
    ) -> GatewayResult<PaymentIntentHandle>;

    /// Create a recurring price (billing plan)
    async fn create_recurring_price(
        &self,
        request: CreateRecurringPrice,
    ) -> GatewayResult<PriceHandle>;

    /// Create a subscription against a price
    async fn create_subscription(
        &self,
        request: CreateSubscription,
    ) -> GatewayResult<SubscriptionHandle>;

    /// Verify a webhook's signature header and parse the event
    ///
    /// Must reject before any state is touched; callers map authenticity
    /// failures to HTTP 400.
    fn verify_event(&self, payload: &[u8], signature_header: &str) -> GatewayResult<GatewayEvent>;
}
