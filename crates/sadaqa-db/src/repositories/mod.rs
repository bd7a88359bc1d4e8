//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in sadaqa-core.
//! Each repository handles database operations for a specific domain entity.

mod appeal;
mod donation;
mod donor;
mod error;
mod event_ledger;
mod subscription;

pub use appeal::PgAppealRepository;
pub use donation::PgDonationRepository;
pub use donor::PgDonorRepository;
pub use event_ledger::PgEventLedger;
pub use subscription::PgSubscriptionRepository;
