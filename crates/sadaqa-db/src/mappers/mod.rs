//! Entity to model mappers
//!
//! This module provides conversions between domain entities (sadaqa-core) and database models.
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `*Insert`/`*Update` structs: Prepare entity data for database operations

mod appeal;
mod donation;
mod donor;
mod subscription;

pub use appeal::AppealInsert;
pub use donation::DonationInsert;
pub use donor::{address_json, parse_address, DonorContactUpdate, DonorInsert};
pub use subscription::SubscriptionInsert;
