//! Integration test utilities for the donation platform
//!
//! This crate provides helpers for running end-to-end tests against the
//! REST API with in-memory infrastructure. No external services are
//! required: tests exercise the real router, extractors, and services,
//! while storage, the payment processor, and mail are doubles.

pub mod fixtures;
pub mod helpers;
pub mod memory;

pub use fixtures::*;
pub use helpers::*;
pub use memory::*;
