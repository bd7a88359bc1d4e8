//! Database models - SQLx-compatible structs for PostgreSQL tables

mod appeal;
mod donation;
mod donor;
mod gateway_event;
mod subscription;

pub use appeal::AppealModel;
pub use donation::DonationModel;
pub use donor::DonorModel;
pub use gateway_event::GatewayEventModel;
pub use subscription::SubscriptionModel;
