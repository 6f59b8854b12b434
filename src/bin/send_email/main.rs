#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Send a single transactional email over SMTP

use std::{fs, io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use transactional_mailer::{
    domain::communication::{
        email_addresses::EmailAddress,
        mailer::{Mailer, Message},
        mime::compose,
    },
    infrastructure::email::smtp::{SMTPConfig, SMTPMailer},
};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
#[command(name = "send-email")]
pub struct Args {
    /// The SMTP configuration
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// Read the whole message from a JSON file instead of the flags below
    #[arg(long, conflicts_with = "to")]
    pub message_file: Option<PathBuf>,

    /// Recipient address
    #[arg(long, required_unless_present = "message_file")]
    pub to: Option<String>,

    /// Recipient display name
    #[arg(long)]
    pub to_name: Option<String>,

    /// Sender address
    #[arg(long, env = "MAIL_FROM", required_unless_present = "message_file")]
    pub from: Option<String>,

    /// Sender display name
    #[arg(long, env = "MAIL_FROM_NAME")]
    pub from_name: Option<String>,

    /// Message subject
    #[arg(long, default_value = "")]
    pub subject: String,

    /// File holding the HTML body
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// File holding the plain text body
    #[arg(long)]
    pub text: Option<PathBuf>,

    /// Print the composed MIME message instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    fn message(&self) -> Result<Message> {
        if let Some(path) = &self.message_file {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;

            return serde_json::from_str(&json)
                .with_context(|| format!("failed to parse message in {}", path.display()));
        }

        Ok(Message {
            html: read_body(self.html.as_ref())?,
            text: read_body(self.text.as_ref())?,
            subject: self.subject.clone(),
            from_email: EmailAddress::new(self.from.as_deref().unwrap_or_default())?,
            from_name: self.from_name.clone(),
            to_email: EmailAddress::new(self.to.as_deref().unwrap_or_default())?,
            to_name: self.to_name.clone(),
        })
    }
}

fn read_body(path: Option<&PathBuf>) -> Result<Option<String>> {
    path.map(|path| {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    })
    .transpose()
}

#[mutants::skip]
fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let message = args.message()?;

    if args.dry_run {
        let payload = compose(&message)?;
        std::io::stdout().write_all(&payload)?;

        return Ok(());
    }

    let id = SMTPMailer::new(args.smtp).send_email(&message)?;

    info!(%id, "email sent");
    println!("{}", id);

    Ok(())
}
