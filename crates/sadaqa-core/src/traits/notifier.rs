//! Receipt notifier port - best-effort outbound mail
//!
//! Notification is a secondary effect: the financial transition commits
//! whether or not the receipt goes out, so implementations never get to veto
//! webhook processing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::value_objects::{Frequency, MinorUnits};

/// Result type for notifier operations
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Errors from the outbound mail boundary
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Mail transport failed: {0}")]
    Transport(String),

    #[error("Recipient rejected: {0}")]
    Rejected(String),

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),
}

/// Everything a donation receipt needs to render
#[derive(Debug, Clone)]
pub struct DonationReceipt {
    pub email: String,
    pub donor_name: Option<String>,
    pub reference: String,
    /// Base gift, minor units.
    pub amount: MinorUnits,
    pub platform_fee: MinorUnits,
    /// Charged total, minor units.
    pub total: MinorUnits,
    /// Gift Aid reclaim amount; zero when not declared.
    pub gift_aid: MinorUnits,
    pub currency: String,
    pub frequency: Frequency,
    pub donation_type: String,
    pub completed_at: DateTime<Utc>,
}

#[async_trait]
pub trait ReceiptNotifier: Send + Sync {
    /// Send a donation receipt
    async fn send_receipt(&self, receipt: &DonationReceipt) -> NotifyResult<()>;
}
