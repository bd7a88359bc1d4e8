//! # sadaqa-core
//!
//! Domain layer containing entities, value objects, repository and gateway traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Appeal, ContactSnapshot, Donation, Donor, GiftAidDetail, PaymentDetail, PlatformFeeDetail,
    PostalAddress, Subscription,
};
pub use error::DomainError;
pub use traits::{
    AppealRepository, CreateCustomer, CreatePaymentIntent, CreateRecurringPrice,
    CreateSubscription, CustomerHandle, DonationReceipt, DonationRepository, DonorRepository,
    EventLedger, EventPayload, GatewayError, GatewayEvent, GatewayResult, NotifyError,
    NotifyResult, PaymentGateway, PaymentIntentHandle, PriceHandle, ReceiptNotifier, RepoResult,
    SubscriptionHandle, SubscriptionRepository,
};
pub use value_objects::{
    BillingInterval, DonationStatus, EmailAddress, FeePercent, Frequency, IntervalUnit,
    MinorUnits, ReferenceCode, SubscriptionStatus,
};
