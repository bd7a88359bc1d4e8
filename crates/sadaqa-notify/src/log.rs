//! Logging notifier for development and disabled mail

use async_trait::async_trait;
use tracing::{debug, info};

use sadaqa_core::traits::{DonationReceipt, NotifyResult, ReceiptNotifier};

use crate::receipt::render_receipt;

/// Notifier that logs receipts instead of sending them
///
/// Used when mail is disabled in configuration, so the webhook path behaves
/// the same in development as in production.
#[derive(Debug, Clone, Default)]
pub struct LogReceiptNotifier;

impl LogReceiptNotifier {
    /// Create a new LogReceiptNotifier
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReceiptNotifier for LogReceiptNotifier {
    async fn send_receipt(&self, receipt: &DonationReceipt) -> NotifyResult<()> {
        info!(
            email = %receipt.email,
            reference = %receipt.reference,
            total = receipt.total,
            "Receipt suppressed (mail disabled)"
        );
        debug!(body = %render_receipt(receipt), "Rendered receipt");
        Ok(())
    }
}
