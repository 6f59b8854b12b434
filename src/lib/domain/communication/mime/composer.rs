//! Message composer

use std::io::Write;

use tracing::debug;

use crate::domain::communication::{email_addresses::MailAddress, mailer::Message};

use super::{
    encode_header_word, write_base64, write_headers, write_quoted_printable, Boundary, HeaderSet, MimeError,
    Multipart,
};

/// Render `message` as a complete MIME payload.
///
/// The envelope headers are followed by a `multipart/mixed` container whose
/// only part is a `multipart/alternative` section holding the text part
/// (quoted-printable) and the HTML part (base64). The alternative section is
/// omitted when the message has neither body.
pub fn compose(message: &Message) -> Result<Vec<u8>, MimeError> {
    let text = message.text_body();
    let html = message.html_body();
    let bodies: Vec<&str> = text.into_iter().chain(html).collect();

    let mut out = Vec::new();

    let mut mixed = Multipart::new(Boundary::generate_avoiding(&bodies));

    let mut headers = HeaderSet::new();
    headers.add("To", mailbox("To", message.recipient())?);
    headers.add("From", mailbox("From", message.sender())?);
    headers.add("Subject", encode_header_word(&message.subject));
    headers.add("MIME-Version", "1.0");
    headers.add("Content-Type", mixed.content_type("mixed"));

    write_headers(&mut out, &headers)?;
    mixed.begin_part(&mut out)?;

    if !bodies.is_empty() {
        let mut avoid = bodies.clone();
        avoid.push(mixed.boundary().as_str());

        let mut alternative = Multipart::new(Boundary::generate_avoiding(&avoid));

        let headers = HeaderSet::from_iter([("Content-Type", alternative.content_type("alternative"))]);
        write_headers(&mut out, &headers)?;

        if let Some(text) = text {
            alternative.create_part(
                &mut out,
                &HeaderSet::from_iter([
                    ("Content-Type", "text/plain; charset=utf-8"),
                    ("Content-Transfer-Encoding", "quoted-printable"),
                ]),
            )?;
            write_quoted_printable(&mut out, text.as_bytes())?;
        }

        if let Some(html) = html {
            alternative.create_part(
                &mut out,
                &HeaderSet::from_iter([
                    ("Content-Type", "text/html; charset=utf-8"),
                    ("Content-Transfer-Encoding", "base64"),
                ]),
            )?;
            write_base64(&mut out, html.as_bytes())?;
        }

        alternative.close(&mut out)?;
    }

    mixed.close(&mut out)?;
    out.flush()?;

    debug!(bytes = out.len(), "composed MIME payload");

    Ok(out)
}

fn mailbox(header: &str, address: MailAddress) -> Result<String, MimeError> {
    if address.name().is_some_and(|name| name.contains(['\r', '\n'])) {
        return Err(MimeError::InvalidHeaderValue {
            name: header.to_string(),
        });
    }

    Ok(address.to_string())
}
