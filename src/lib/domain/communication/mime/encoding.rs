//! Content-transfer encodings for part bodies

use std::{
    borrow::Cow,
    io::{self, Write},
};

use base64::{engine::general_purpose::STANDARD, write::EncoderWriter, Engine as _};

use super::{MimeError, CRLF};

/// Maximum length of an encoded body line, excluding the CRLF (RFC 2045)
pub const MAX_LINE_LENGTH: usize = 76;

/// Streams `body` to `out` as base64, broken into lines of
/// [`MAX_LINE_LENGTH`] characters. No line break follows the last line.
pub fn write_base64<W: Write>(out: &mut W, body: &[u8]) -> Result<(), MimeError> {
    let mut encoder = EncoderWriter::new(LineWrapper::new(out), &STANDARD);

    encoder.write_all(body)?;
    encoder.finish()?.flush()?;

    Ok(())
}

/// Writes `body` to `out` as quoted-printable with soft line breaks.
///
/// Bare LF line endings are written as CRLF so they stay hard line breaks.
pub fn write_quoted_printable<W: Write>(out: &mut W, body: &[u8]) -> Result<(), MimeError> {
    out.write_all(&quoted_printable::encode(normalize_line_breaks(body)))?;

    Ok(())
}

fn normalize_line_breaks(body: &[u8]) -> Cow<'_, [u8]> {
    let bare_lf = |(i, b): (usize, &u8)| *b == b'\n' && (i == 0 || body[i - 1] != b'\r');

    if !body.iter().enumerate().any(bare_lf) {
        return Cow::Borrowed(body);
    }

    let mut normalized = Vec::with_capacity(body.len() + body.len() / 16);

    for (i, b) in body.iter().enumerate() {
        if bare_lf((i, b)) {
            normalized.push(b'\r');
        }
        normalized.push(*b);
    }

    Cow::Owned(normalized)
}

// 45 bytes encode to 60 base64 characters, keeping each word under 75
const ENCODED_WORD_BYTES: usize = 45;

/// Encodes a header value as RFC 2047 `=?utf-8?b?...?=` words when it is not
/// plain ASCII.
pub fn encode_header_word(value: &str) -> Cow<'_, str> {
    if value.is_ascii() {
        return Cow::Borrowed(value);
    }

    Cow::Owned(encoded_words(value))
}

/// Encodes `value` as RFC 2047 `=?utf-8?b?...?=` words whatever its content.
/// Long values are split on character boundaries into several words
/// separated by a space.
pub fn encoded_words(value: &str) -> String {
    let mut words = Vec::new();
    let mut start = 0;

    while start < value.len() {
        let mut end = (start + ENCODED_WORD_BYTES).min(value.len());
        while !value.is_char_boundary(end) {
            end -= 1;
        }

        words.push(format!("=?utf-8?b?{}?=", STANDARD.encode(&value[start..end])));
        start = end;
    }

    words.join(" ")
}

struct LineWrapper<W> {
    inner: W,
    column: usize,
}

impl<W: Write> LineWrapper<W> {
    fn new(inner: W) -> Self {
        Self { inner, column: 0 }
    }
}

impl<W: Write> Write for LineWrapper<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;

        while !rest.is_empty() {
            if self.column == MAX_LINE_LENGTH {
                self.inner.write_all(CRLF.as_bytes())?;
                self.column = 0;
            }

            let take = (MAX_LINE_LENGTH - self.column).min(rest.len());
            self.inner.write_all(&rest[..take])?;
            self.column += take;
            rest = &rest[take..];
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;
    use quoted_printable::ParseMode;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_base64_lines_are_wrapped() -> TestResult {
        let body = vec![b'x'; 100];
        let mut out = Vec::new();

        write_base64(&mut out, &body)?;

        let encoded = String::from_utf8(out)?;
        let lines: Vec<&str> = encoded.split(CRLF).collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), MAX_LINE_LENGTH);
        assert!(!encoded.ends_with(CRLF));
        assert_eq!(STANDARD.decode(lines.concat())?, body);

        Ok(())
    }

    #[test]
    fn test_base64_exact_line_has_no_trailing_break() -> TestResult {
        // 57 input bytes encode to exactly one 76 character line
        let body = vec![b'y'; 57];
        let mut out = Vec::new();

        write_base64(&mut out, &body)?;

        assert_eq!(out.len(), MAX_LINE_LENGTH);
        assert!(!out.contains(&b'\r'));

        Ok(())
    }

    #[test]
    fn test_base64_of_empty_body_is_empty() -> TestResult {
        let mut out = Vec::new();

        write_base64(&mut out, b"")?;

        assert!(out.is_empty());

        Ok(())
    }

    #[test]
    fn test_ascii_header_word_is_unchanged() {
        assert!(matches!(encode_header_word("Hello"), Cow::Borrowed("Hello")));
    }

    #[test]
    fn test_non_ascii_header_word_is_encoded() {
        assert_eq!(encode_header_word("Zoë"), "=?utf-8?b?Wm/Dqw==?=");
    }

    #[test]
    fn test_long_header_word_is_split() -> TestResult {
        let subject = "é".repeat(40);

        let encoded = encode_header_word(&subject);
        let words: Vec<&str> = encoded.split(' ').collect();

        assert_eq!(words.len(), 2);

        let mut decoded = Vec::new();
        for word in words {
            assert!(word.len() <= 75);
            let payload = word
                .strip_prefix("=?utf-8?b?")
                .and_then(|rest| rest.strip_suffix("?="))
                .expect("encoded word");
            decoded.extend(STANDARD.decode(payload)?);
        }

        assert_eq!(String::from_utf8(decoded)?, subject);

        Ok(())
    }

    #[test]
    fn test_quoted_printable_escapes_non_ascii() -> TestResult {
        let mut out = Vec::new();

        write_quoted_printable(&mut out, "café".as_bytes())?;

        assert_eq!(out, b"caf=C3=A9");

        Ok(())
    }

    #[test]
    fn test_quoted_printable_keeps_unix_line_breaks_hard() -> TestResult {
        let mut out = Vec::new();

        write_quoted_printable(&mut out, b"line one\nline two\r\nline three\n.\nend")?;

        assert_eq!(out, b"line one\r\nline two\r\nline three\r\n.\r\nend");

        Ok(())
    }

    #[test]
    fn test_control_characters_are_encoded_on_request() {
        assert_eq!(encoded_words("A\u{1}B"), "=?utf-8?b?QQFC?=");
    }

    #[test]
    fn test_quoted_printable_round_trip() -> TestResult {
        let body = "Bonjour, voilà un très long paragraphe qui dépasse largement la limite de soixante-seize caractères par ligne.";
        let mut out = Vec::new();

        write_quoted_printable(&mut out, body.as_bytes())?;

        assert!(out.split(|b| *b == b'\n').all(|line| line.len() <= MAX_LINE_LENGTH + 1));
        assert_eq!(quoted_printable::decode(&out, ParseMode::Robust)?, body.as_bytes());

        Ok(())
    }
}
