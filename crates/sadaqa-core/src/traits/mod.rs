//! Port traits - interfaces the infrastructure layers implement

mod gateway;
mod notifier;
mod repositories;

pub use gateway::{
    CreateCustomer, CreatePaymentIntent, CreateRecurringPrice, CreateSubscription, CustomerHandle,
    EventPayload, GatewayError, GatewayEvent, GatewayResult, PaymentGateway, PaymentIntentHandle,
    PriceHandle, SubscriptionHandle,
};
pub use notifier::{DonationReceipt, NotifyError, NotifyResult, ReceiptNotifier};
pub use repositories::{
    AppealRepository, DonationRepository, DonorRepository, EventLedger, RepoResult,
    SubscriptionRepository,
};
