//! Hosted transactional-email API delivery.
//!
//! The HTTP client itself is provided by the caller through
//! [`HostedApiClient`]; this module resolves credentials and maps failures.

use std::fmt;

use clap::Parser;
use tracing::{debug, info};

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::mailer::{Mailer, MailerError, Message};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "MG_API_KEY";

/// Environment variable holding the sending domain
pub const DOMAIN_ENV: &str = "MG_DOMAIN";

/// Environment variable holding the public API key
pub const PUBLIC_KEY_ENV: &str = "MG_PUBLIC_API_KEY";

/// Hosted API credentials
#[derive(Clone, Default, PartialEq, Eq, Parser)]
pub struct HostedApiConfig {
    /// The private API key
    #[arg(long = "api-key", default_value = "", hide_default_value = true)]
    pub api_key: String,

    /// The public API key
    #[arg(long = "api-public-key", default_value = "", hide_default_value = true)]
    pub public_key: String,

    /// The sending domain
    #[arg(long = "api-domain", default_value = "", hide_default_value = true)]
    pub domain: String,
}

impl HostedApiConfig {
    /// Credentials from explicit values
    pub fn new(
        api_key: impl Into<String>,
        public_key: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            public_key: public_key.into(),
            domain: domain.into(),
        }
    }

    /// Whether all three values are set
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.public_key.is_empty() && !self.domain.is_empty()
    }

    /// Credentials read through `lookup`, when all three variables are set
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let config = Self {
            api_key: lookup(API_KEY_ENV).unwrap_or_default(),
            public_key: lookup(PUBLIC_KEY_ENV).unwrap_or_default(),
            domain: lookup(DOMAIN_ENV).unwrap_or_default(),
        };

        config.is_complete().then_some(config)
    }

    /// The credentials to use: these when complete, otherwise the ones read
    /// through `lookup`, otherwise none.
    pub fn resolve(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        if self.is_complete() {
            debug!("using explicitly configured hosted API credentials");
            return Some(self.clone());
        }

        let resolved = Self::from_lookup(lookup);

        if resolved.is_some() {
            debug!("using hosted API credentials from the environment");
        }

        resolved
    }
}

impl fmt::Debug for HostedApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostedApiConfig")
            .field("api_key", &"********")
            .field("public_key", &self.public_key)
            .field("domain", &self.domain)
            .finish()
    }
}

/// A failed hosted API call
#[derive(Debug)]
pub struct HostedApiFailure {
    /// The upstream error
    pub reason: anyhow::Error,

    /// The provider's response message
    pub response: String,

    /// The provider-assigned ID, when one was returned
    pub id: Option<String>,
}

impl From<HostedApiFailure> for MailerError {
    fn from(failure: HostedApiFailure) -> Self {
        debug!("HostedApiFailure -> MailerError");

        MailerError::Delivery {
            reason: failure.reason,
            response: failure.response,
            id: failure.id,
        }
    }
}

/// Client for a hosted transactional-email API
pub trait HostedApiClient: Send + Sync {
    /// Send `message` with `config`'s credentials, returning the provider's
    /// message ID
    fn send(&self, config: &HostedApiConfig, message: &Message) -> Result<String, HostedApiFailure>;
}

#[cfg(test)]
mock! {
    pub HostedApiClient {}

    impl HostedApiClient for HostedApiClient {
        fn send(&self, config: &HostedApiConfig, message: &Message) -> Result<String, HostedApiFailure>;
    }
}

/// Mailer delivering through a [`HostedApiClient`]
#[derive(Debug)]
pub struct HostedApiMailer<C> {
    config: HostedApiConfig,
    client: C,
}

impl<C: HostedApiClient> HostedApiMailer<C> {
    /// Create a new hosted API mailer
    pub fn new(config: HostedApiConfig, client: C) -> Self {
        Self { config, client }
    }

    /// The credentials in use
    pub fn config(&self) -> &HostedApiConfig {
        &self.config
    }
}

impl<C: HostedApiClient> Mailer for HostedApiMailer<C> {
    fn send_email(&self, message: &Message) -> Result<String, MailerError> {
        info!(domain = %self.config.domain, to = %message.to_email, "sending email through hosted API");

        Ok(self.client.send(&self.config, message)?)
    }
}
