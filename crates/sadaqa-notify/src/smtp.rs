//! SMTP receipt delivery via lettre

use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, instrument};

use sadaqa_common::config::MailConfig;
use sadaqa_core::traits::{DonationReceipt, NotifyError, NotifyResult, ReceiptNotifier};

use crate::receipt::{receipt_subject, render_receipt};

/// SMTP implementation of ReceiptNotifier
pub struct SmtpReceiptNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpReceiptNotifier {
    /// Build the notifier from mail configuration
    pub fn new(config: &MailConfig) -> NotifyResult<Self> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| NotifyError::Transport(e.to_string()))?
                .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|e: AddressError| {
                NotifyError::InvalidRecipient(format!("from address: {e}"))
            })?;

        info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            "SMTP transport initialized"
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl ReceiptNotifier for SmtpReceiptNotifier {
    #[instrument(skip(self, receipt), fields(reference = %receipt.reference))]
    async fn send_receipt(&self, receipt: &DonationReceipt) -> NotifyResult<()> {
        let to: Mailbox = receipt
            .email
            .parse()
            .map_err(|e: AddressError| NotifyError::InvalidRecipient(e.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(receipt_subject(receipt))
            .body(render_receipt(receipt))
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        self.transport.send(message).await.map_err(map_smtp_error)?;

        debug!("Receipt mail sent");
        Ok(())
    }
}

fn map_smtp_error(e: lettre::transport::smtp::Error) -> NotifyError {
    if e.is_permanent() {
        NotifyError::Rejected(e.to_string())
    } else {
        NotifyError::Transport(e.to_string())
    }
}
