//! # sadaqa-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `sadaqa-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations, including the processed-event ledger
//!
//! Schema migrations live under `migrations/` and are applied with
//! `sqlx migrate run` before the server starts.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sadaqa_db::pool::{create_pool, DatabaseConfig};
//! use sadaqa_db::repositories::PgDonorRepository;
//! use sadaqa_core::traits::DonorRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let donor_repo = PgDonorRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, ping, DatabaseConfig, PgPool};
pub use repositories::{
    PgAppealRepository, PgDonationRepository, PgDonorRepository, PgEventLedger,
    PgSubscriptionRepository,
};
