//! Value objects - immutable types that represent domain concepts

mod email;
mod frequency;
pub mod money;
mod reference;
mod status;

pub use email::EmailAddress;
pub use frequency::{BillingInterval, Frequency, IntervalUnit};
pub use money::{FeePercent, MinorUnits};
pub use reference::ReferenceCode;
pub use status::{DonationStatus, SubscriptionStatus};
