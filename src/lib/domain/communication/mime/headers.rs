//! Header block serialization

use std::io::Write;

use super::{MimeError, CRLF};

/// Header names mapped to their values, in insertion order.
///
/// Lookups are case-insensitive. Several values may be recorded for one
/// name, but [`write_headers`] refuses to serialize them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderSet {
    /// Create an empty header set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to a header, creating it if needed
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        match self.position(name) {
            Some(index) => self.entries[index].1.push(value.into()),
            None => self.entries.push((name.to_string(), vec![value.into()])),
        }
    }

    /// Replace all values of a header with a single one
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        match self.position(name) {
            Some(index) => self.entries[index].1 = vec![value.into()],
            None => self.entries.push((name.to_string(), vec![value.into()])),
        }
    }

    /// First value of a header
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values(name).first().map(String::as_str)
    }

    /// All values of a header
    pub fn values(&self, name: &str) -> &[String] {
        self.position(name)
            .map(|index| self.entries[index].1.as_slice())
            .unwrap_or_default()
    }

    /// Number of distinct header names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no headers
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over header names and their values
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }
}

impl<N: AsRef<str>, V: Into<String>> FromIterator<(N, V)> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = HeaderSet::new();

        for (name, value) in iter {
            headers.add(name.as_ref(), value);
        }

        headers
    }
}

/// Writes `headers` as `Name: value` lines followed by the blank line that
/// ends a header block.
///
/// Values are trimmed of surrounding whitespace. A header holding more than
/// one value fails with [`MimeError::MultipleHeaderValues`]; callers merge
/// values beforehand.
pub fn write_headers<W: Write>(out: &mut W, headers: &HeaderSet) -> Result<(), MimeError> {
    for (name, values) in headers.iter() {
        let value = match values {
            [value] => trim(value),
            [] => "",
            _ => {
                return Err(MimeError::MultipleHeaderValues {
                    name: name.to_string(),
                })
            }
        };

        if value.contains(['\r', '\n']) {
            return Err(MimeError::InvalidHeaderValue {
                name: name.to_string(),
            });
        }

        write!(out, "{}: {}{}", name, value, CRLF)?;
    }

    out.write_all(CRLF.as_bytes())?;

    Ok(())
}

fn trim(value: &str) -> &str {
    value.trim_matches([' ', '\t', '\r', '\n'])
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_write_single_value_headers() -> TestResult {
        let headers = HeaderSet::from_iter([("Subject", "Hello"), ("MIME-Version", "1.0")]);
        let mut out = Vec::new();

        write_headers(&mut out, &headers)?;

        assert_eq!(out, b"Subject: Hello\r\nMIME-Version: 1.0\r\n\r\n");

        Ok(())
    }

    #[test]
    fn test_values_are_trimmed() -> TestResult {
        let headers = HeaderSet::from_iter([("Subject", " \t Hello world \r\n")]);
        let mut out = Vec::new();

        write_headers(&mut out, &headers)?;

        assert_eq!(out, b"Subject: Hello world\r\n\r\n");

        Ok(())
    }

    #[test]
    fn test_empty_set_writes_blank_line() -> TestResult {
        let mut out = Vec::new();

        write_headers(&mut out, &HeaderSet::new())?;

        assert_eq!(out, b"\r\n");

        Ok(())
    }

    #[test]
    fn test_multiple_values_are_rejected() {
        let mut headers = HeaderSet::new();
        headers.add("To", "a@example.com");
        headers.add("to", "b@example.com");

        let result = write_headers(&mut Vec::new(), &headers);

        assert!(matches!(
            result,
            Err(MimeError::MultipleHeaderValues { name }) if name == "To"
        ));
    }

    #[test]
    fn test_line_break_inside_value_is_rejected() {
        let headers = HeaderSet::from_iter([("Subject", "Hi\r\nBcc: everyone@example.com")]);

        let result = write_headers(&mut Vec::new(), &headers);

        assert!(matches!(result, Err(MimeError::InvalidHeaderValue { .. })));
    }

    #[test]
    fn test_set_replaces_existing_values() {
        let mut headers = HeaderSet::new();
        headers.add("Content-Type", "text/plain");
        headers.add("Content-Type", "text/html");
        headers.set("content-type", "text/html; charset=utf-8");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.values("Content-Type"), ["text/html; charset=utf-8"]);
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/html; charset=utf-8"));
    }
}
