//! SMTP session

use std::{fmt, time::Duration};

use lettre::{
    transport::smtp::{
        authentication::{Credentials, Mechanism},
        client::{SmtpConnection, TlsParameters},
        commands::{Data, Mail, Rcpt},
        extension::ClientId,
    },
    Address,
};
use tracing::{debug, warn};

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::mailer::{MailerError, SmtpStage};

/// The commands of one SMTP exchange.
///
/// Each method performs a single protocol step and fails when the server
/// answers with a negative reply.
pub trait SmtpSession {
    /// `AUTH PLAIN` with the given credentials
    fn auth(&mut self, credentials: &Credentials) -> anyhow::Result<()>;

    /// `MAIL FROM:<from>`
    fn mail_from(&mut self, from: &Address) -> anyhow::Result<()>;

    /// `RCPT TO:<to>`
    fn rcpt_to(&mut self, to: &Address) -> anyhow::Result<()>;

    /// `DATA`, opening the message stream
    fn data(&mut self) -> anyhow::Result<()>;

    /// Message content followed by the end-of-data marker
    fn message(&mut self, payload: &[u8]) -> anyhow::Result<()>;

    /// `QUIT`
    fn quit(&mut self) -> anyhow::Result<()>;
}

#[cfg(test)]
mock! {
    pub SmtpSession {}

    impl SmtpSession for SmtpSession {
        fn auth(&mut self, credentials: &Credentials) -> anyhow::Result<()>;
        fn mail_from(&mut self, from: &Address) -> anyhow::Result<()>;
        fn rcpt_to(&mut self, to: &Address) -> anyhow::Result<()>;
        fn data(&mut self) -> anyhow::Result<()>;
        fn message(&mut self, payload: &[u8]) -> anyhow::Result<()>;
        fn quit(&mut self) -> anyhow::Result<()>;
    }
}

/// Runs the exchange for one message: authenticate, `MAIL FROM`, `RCPT TO`,
/// `DATA`, the payload, then `QUIT`.
///
/// The first failing step ends the exchange and its error is returned tagged
/// with the [`SmtpStage`]. A failed `QUIT` after the message was accepted is
/// only logged.
pub fn deliver<S: SmtpSession>(
    session: &mut S,
    credentials: &Credentials,
    from: &Address,
    to: &Address,
    payload: &[u8],
) -> Result<(), MailerError> {
    session
        .auth(credentials)
        .map_err(|e| MailerError::transport(SmtpStage::Auth, e))?;

    session
        .mail_from(from)
        .map_err(|e| MailerError::transport(SmtpStage::MailFrom, e))?;

    session
        .rcpt_to(to)
        .map_err(|e| MailerError::transport(SmtpStage::RcptTo, e))?;

    session
        .data()
        .map_err(|e| MailerError::transport(SmtpStage::Data, e))?;

    session
        .message(payload)
        .map_err(|e| MailerError::transport(SmtpStage::Message, e))?;

    debug!(bytes = payload.len(), "message accepted");

    if let Err(e) = session.quit() {
        warn!(error = %e, "QUIT failed after the message was accepted");
    }

    Ok(())
}

/// An SMTP session over implicit TLS, backed by a lettre connection.
///
/// Dropping the session closes the socket without sending `QUIT`.
pub struct LettreSession {
    connection: SmtpConnection,
}

impl LettreSession {
    /// Dial `server_address` and complete the TLS handshake and `EHLO`.
    ///
    /// `host` is the name the server certificate is checked against.
    pub fn connect(
        server_address: &str,
        host: &str,
        verify_tls: bool,
        timeout: Duration,
    ) -> Result<Self, MailerError> {
        if !verify_tls {
            warn!(host, "TLS certificate verification is disabled");
        }

        let tls = TlsParameters::builder(host.to_string())
            .dangerous_accept_invalid_certs(!verify_tls)
            .build()
            .map_err(|e| MailerError::transport(SmtpStage::Connect, e))?;

        let connection = SmtpConnection::connect(
            server_address,
            Some(timeout),
            &ClientId::default(),
            Some(&tls),
            None,
        )
        .map_err(|e| MailerError::transport(SmtpStage::Connect, e))?;

        debug!(server_address, "SMTP connection established");

        Ok(Self { connection })
    }
}

impl SmtpSession for LettreSession {
    fn auth(&mut self, credentials: &Credentials) -> anyhow::Result<()> {
        self.connection.auth(&[Mechanism::Plain], credentials)?;

        Ok(())
    }

    fn mail_from(&mut self, from: &Address) -> anyhow::Result<()> {
        self.connection.command(Mail::new(Some(from.clone()), vec![]))?;

        Ok(())
    }

    fn rcpt_to(&mut self, to: &Address) -> anyhow::Result<()> {
        self.connection.command(Rcpt::new(to.clone(), vec![]))?;

        Ok(())
    }

    fn data(&mut self) -> anyhow::Result<()> {
        self.connection.command(Data)?;

        Ok(())
    }

    fn message(&mut self, payload: &[u8]) -> anyhow::Result<()> {
        self.connection.message(payload)?;

        Ok(())
    }

    fn quit(&mut self) -> anyhow::Result<()> {
        self.connection.quit()?;

        Ok(())
    }
}

impl fmt::Debug for LettreSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LettreSession").finish_non_exhaustive()
    }
}
