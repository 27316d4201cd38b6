use serde::{Deserialize, Serialize};

/// One outbound message, as handed to a mailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// What the mailer reports back after accepting a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailReceipt {
    pub message_id: String,
    pub accepted: Vec<String>,
    /// False when the mailer only recorded the message and nothing left the process.
    pub delivered: bool,
}
