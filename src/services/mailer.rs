//! Outgoing mail.
//!
//! Only password reset mail is sent. [`LogMailer`] writes the message to the
//! log instead of delivering it.

use async_trait::async_trait;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> anyhow::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> anyhow::Result<()> {
        info!(
            from = %email.sender,
            to = %email.recipient,
            subject = %email.subject,
            "Outgoing mail:\n{}",
            email.body
        );
        Ok(())
    }
}

#[must_use]
pub fn reset_password_email(
    sender: &str,
    recipient: &str,
    username: &str,
    reset_url: &str,
) -> Email {
    Email {
        sender: sender.to_string(),
        recipient: recipient.to_string(),
        subject: "[Microblog] Reset Your Password".to_string(),
        body: format!(
            "Dear {username},\n\n\
             To reset your password open the following link:\n\n\
             {reset_url}\n\n\
             If you have not requested a password reset simply ignore this message.\n"
        ),
    }
}
