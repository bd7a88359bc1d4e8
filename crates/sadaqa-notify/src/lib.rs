//! # sadaqa-notify
//!
//! Outbound mail for the donation platform.
//!
//! ## Overview
//!
//! This crate implements the `ReceiptNotifier` port defined in `sadaqa-core`:
//!
//! - **receipt**: plain-text receipt rendering
//! - **smtp**: delivery over SMTP via lettre
//! - **log**: a notifier that only logs, for development and disabled mail
//!
//! Receipts are best-effort. Senders report failures through `NotifyError`
//! and callers log them without unwinding the financial transition that
//! triggered the receipt.

pub mod log;
pub mod receipt;
pub mod smtp;

pub use log::LogReceiptNotifier;
pub use receipt::{format_amount, receipt_subject, render_receipt};
pub use smtp::SmtpReceiptNotifier;
