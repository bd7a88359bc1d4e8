//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod appeals;
pub mod donations;
pub mod health;
pub mod webhooks;
