//! SMTP email service implementation

use std::{fmt, time::Duration};

use clap::{ArgAction, Parser};
use lettre::transport::smtp::authentication::Credentials;
use tracing::info;

use crate::domain::communication::{
    mailer::{Mailer, MailerError, Message, SMTP_SUCCESS_ID},
    mime::compose,
};

mod session;

pub use session::{deliver, LettreSession, SmtpSession};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// SMTP configuration
#[derive(Clone, Parser)]
pub struct SMTPConfig {
    /// The SMTP server as `host:port`, e.g. `smtp.example.com:465`
    #[arg(long = "smtp-server", env = "SMTP_SERVER", default_value = "")]
    pub server_address: String,

    /// The SMTP username
    #[arg(long = "smtp-user", env = "SMTP_USER", default_value = "")]
    pub username: String,

    /// The SMTP password
    #[arg(
        long = "smtp-password",
        env = "SMTP_PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,

    /// Verify the server's TLS certificate
    #[arg(
        long = "smtp-verify-tls",
        env = "SMTP_VERIFY_TLS",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub verify_tls: bool,

    /// Connection and I/O timeout, in seconds
    #[arg(long = "smtp-timeout", env = "SMTP_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl SMTPConfig {
    /// Configuration for `server_address` with the given credentials
    pub fn new(
        server_address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server_address: server_address.into(),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// The timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl Default for SMTPConfig {
    fn default() -> Self {
        Self {
            server_address: String::new(),
            username: String::new(),
            password: String::new(),
            verify_tls: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for SMTPConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SMTPConfig")
            .field("server_address", &self.server_address)
            .field("username", &self.username)
            .field("password", &"********")
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Split `host:port` (or `[ipv6]:port`) into its host and port
pub fn split_host_port(address: &str) -> Result<(&str, u16), MailerError> {
    let invalid = || {
        MailerError::InvalidConfiguration(format!(
            "SMTP server address \"{}\" is not of the form host:port",
            address
        ))
    };

    let (host, port) = match address.strip_prefix('[') {
        Some(rest) => rest.split_once("]:").ok_or_else(invalid)?,
        None => {
            let (host, port) = address.rsplit_once(':').ok_or_else(invalid)?;

            if host.contains(':') {
                return Err(invalid());
            }

            (host, port)
        }
    };

    if host.is_empty() {
        return Err(invalid());
    }

    let port = port.parse::<u16>().map_err(|_| invalid())?;

    Ok((host, port))
}

/// SMTP mailer
#[derive(Debug, Default, Clone)]
pub struct SMTPMailer {
    config: SMTPConfig,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SMTPConfig) -> Self {
        Self { config }
    }

    /// The mailer's configuration
    pub fn config(&self) -> &SMTPConfig {
        &self.config
    }

    fn credentials(&self) -> Credentials {
        Credentials::new(self.config.username.clone(), self.config.password.clone())
    }
}

impl Mailer for SMTPMailer {
    fn send_email(&self, message: &Message) -> Result<String, MailerError> {
        if !self.config.has_credentials() {
            return Err(MailerError::MissingCredentials);
        }

        let payload = compose(message)?;

        let (host, port) = split_host_port(&self.config.server_address)?;

        info!(host, port, to = %message.to_email, "sending email over SMTP");

        let mut session = LettreSession::connect(
            &self.config.server_address,
            host,
            self.config.verify_tls,
            self.config.timeout(),
        )?;

        deliver(
            &mut session,
            &self.credentials(),
            message.from_email.as_address(),
            message.to_email.as_address(),
            &payload,
        )?;

        Ok(SMTP_SUCCESS_ID.to_string())
    }
}
