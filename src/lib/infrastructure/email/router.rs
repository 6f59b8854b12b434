//! Delivery router

use clap::Parser;
use tracing::debug;

use crate::domain::communication::mailer::{Mailer, MailerError, Message};

use super::{
    hosted_api::{HostedApiClient, HostedApiConfig, HostedApiMailer},
    smtp::{SMTPConfig, SMTPMailer},
};

/// Configuration for both delivery paths
#[derive(Clone, Debug, Default, Parser)]
pub struct EmailConfig {
    /// SMTP settings
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// Hosted API credentials
    #[clap(flatten)]
    pub hosted_api: HostedApiConfig,
}

/// The delivery path chosen for a message
#[derive(Debug)]
pub enum Delivery<C> {
    /// Direct SMTP over TLS
    Smtp(SMTPMailer),

    /// Hosted transactional-email API
    HostedApi(HostedApiMailer<C>),
}

impl<C: HostedApiClient> Delivery<C> {
    /// Choose the hosted API when its credentials resolve (explicit values
    /// first, then the variables `lookup` returns), SMTP otherwise.
    ///
    /// Pass `|name| std::env::var(name).ok()` to read the process environment.
    pub fn select(
        config: &EmailConfig,
        client: C,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        match config.hosted_api.resolve(lookup) {
            Some(credentials) => {
                debug!("selected hosted API delivery");
                Delivery::HostedApi(HostedApiMailer::new(credentials, client))
            }
            None => {
                debug!("selected SMTP delivery");
                Delivery::Smtp(SMTPMailer::new(config.smtp.clone()))
            }
        }
    }
}

impl<C: HostedApiClient> Mailer for Delivery<C> {
    fn send_email(&self, message: &Message) -> Result<String, MailerError> {
        match self {
            Delivery::Smtp(mailer) => mailer.send_email(message),
            Delivery::HostedApi(mailer) => mailer.send_email(message),
        }
    }
}
