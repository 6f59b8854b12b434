//! Mailer port

mod errors;
mod message;

pub use errors::{MailerError, SmtpStage};
pub use message::Message;

/// Delivery identifier returned by transports that have no message ID
pub const SMTP_SUCCESS_ID: &str = "ok";

/// Something that can deliver a [`Message`]
pub trait Mailer: Send + Sync {
    /// Send an email
    ///
    /// # Arguments
    /// * `message` - The [`Message`] to deliver.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] containing a provider-specific delivery
    /// identifier, or an [`Err`] containing a [`MailerError`] naming the stage
    /// that failed.
    fn send_email(&self, message: &Message) -> Result<String, MailerError>;
}
