//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod appeal;
pub mod context;
pub mod donation;
pub mod error;
pub mod intake;
pub mod webhook;

// Re-export all services for convenience
pub use appeal::AppealService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use donation::DonationService;
pub use error::{ServiceError, ServiceResult};
pub use intake::DonationIntakeService;
pub use webhook::{ReconcileOutcome, WebhookService};
