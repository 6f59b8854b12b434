//! Mailer errors

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::domain::communication::{email_addresses::EmailAddressError, mime::MimeError};

/// A step of the SMTP exchange
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmtpStage {
    /// TCP connect, TLS handshake and greeting
    Connect,
    /// `AUTH PLAIN`
    Auth,
    /// `MAIL FROM`
    MailFrom,
    /// `RCPT TO`
    RcptTo,
    /// `DATA`
    Data,
    /// Message content and end-of-data
    Message,
}

impl fmt::Display for SmtpStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SmtpStage::Connect => "connect",
            SmtpStage::Auth => "AUTH",
            SmtpStage::MailFrom => "MAIL FROM",
            SmtpStage::RcptTo => "RCPT TO",
            SmtpStage::Data => "DATA",
            SmtpStage::Message => "message transfer",
        };

        f.write_str(name)
    }
}

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// Username or password is not set
    #[error("SMTP username or password is not set")]
    MissingCredentials,

    /// The configuration cannot be used
    #[error("invalid mailer configuration: {0}")]
    InvalidConfiguration(String),

    /// Invalid email address
    #[error(transparent)]
    InvalidEmail(#[from] EmailAddressError),

    /// The MIME payload could not be built
    #[error("could not compose message")]
    Composition(#[from] MimeError),

    /// An SMTP step failed
    #[error("SMTP {stage} failed")]
    Transport {
        /// The step that failed
        stage: SmtpStage,
        /// The underlying failure
        #[source]
        source: anyhow::Error,
    },

    /// The hosted API rejected or failed the delivery
    #[error("could not send message: {reason}, ID {id:?}, {response}")]
    Delivery {
        /// The upstream error
        reason: anyhow::Error,
        /// The provider's response message
        response: String,
        /// The provider-assigned ID, when one was returned
        id: Option<String>,
    },

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl MailerError {
    /// Wrap a failed SMTP step
    pub fn transport(stage: SmtpStage, source: impl Into<anyhow::Error>) -> Self {
        let source = source.into();

        debug!(%stage, error = %source, "SMTP step failed");

        MailerError::Transport { stage, source }
    }

    /// The SMTP stage that failed, for transport errors
    pub fn stage(&self) -> Option<SmtpStage> {
        match self {
            MailerError::Transport { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}
