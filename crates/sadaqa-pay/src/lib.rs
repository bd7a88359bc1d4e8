//! # sadaqa-pay
//!
//! Payment processor integration for the donation platform.
//!
//! ## Overview
//!
//! This crate implements the `PaymentGateway` port defined in `sadaqa-core`:
//!
//! - **client**: HTTP client for the processor's form-encoded REST API
//! - **signature**: webhook signature verification (HMAC-SHA256 over
//!   `"{timestamp}.{body}"`, carried as `t=...,v1=...`)
//! - **events**: delivery envelope parsing into typed gateway events
//!
//! Verification always happens before parsing, and both happen before any
//! application state is touched.

pub mod client;
pub mod events;
pub mod signature;

pub use client::HttpPaymentGateway;
pub use events::parse_event;
pub use signature::{WebhookVerifier, SIGNATURE_TOLERANCE_SECS};
