//! Domain entities - core business objects

mod appeal;
mod donation;
mod donor;
mod subscription;

pub use appeal::Appeal;
pub use donation::{ContactSnapshot, Donation, GiftAidDetail, PaymentDetail, PlatformFeeDetail};
pub use donor::{Donor, PostalAddress};
pub use subscription::Subscription;
