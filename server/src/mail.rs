use anyhow::{Result, bail};
use tracing::info;

use tollgate_shared::types::server_config::MailConfig;
use tollgate_shared::types::{MailMessage, MailReceipt};

use crate::utils::generate_uuid_token;

/// Outbound mail transport used by `/email`.
///
/// `send` is blocking; callers run it off the async executor.
pub trait Mailer: Send + Sync {
    fn send(&self, message: &MailMessage) -> Result<MailReceipt>;
}

/// Stand-in for an SMTP transport: accepts every well-formed message, reports it
/// through `tracing` and delivers nothing. Receipts carry `delivered: false`.
#[derive(Debug, Default, Clone)]
pub struct LogOnlyMailer;

impl Mailer for LogOnlyMailer {
    fn send(&self, message: &MailMessage) -> Result<MailReceipt> {
        if message.to.is_empty() {
            bail!("No recipients configured");
        }
        if message.from.trim().is_empty() {
            bail!("No sender configured");
        }

        let receipt = MailReceipt {
            message_id: format!("<{}@tollgate>", generate_uuid_token()),
            accepted: message.to.clone(),
            delivered: false,
        };

        info!(
            message_id = %receipt.message_id,
            recipients = message.to.len(),
            subject = %message.subject,
            "Mail recorded, not delivered"
        );

        Ok(receipt)
    }
}

/// The fixed message configured under `[mail]`.
pub fn configured_message(config: &MailConfig) -> MailMessage {
    MailMessage {
        from: config.from.clone(),
        to: config.to.clone(),
        subject: config.subject.clone(),
        text: config.text.clone(),
        html: config.html.clone(),
    }
}
