//! Mailbox formatting for the `To` and `From` headers

use std::fmt;

use lettre::message::Mailbox;

use crate::domain::communication::mime::encoded_words;

use super::EmailAddress;

/// An email address with an optional display name.
///
/// Formats as the bare address when there is no display name, otherwise as
/// `Name <address>`. Printable ASCII display names are quoted when they are
/// not a plain atom; anything else, control characters included, is written
/// as an RFC 2047 encoded-word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailAddress {
    name: Option<String>,
    email: EmailAddress,
}

impl MailAddress {
    /// Create a new mail address. Blank display names are dropped.
    pub fn new(name: Option<&str>, email: EmailAddress) -> Self {
        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Self { name, email }
    }

    /// The display name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for MailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            None => write!(f, "{}", self.email),
            Some(name) if name.is_ascii() && !name.contains(|c: char| c.is_ascii_control()) => {
                let mailbox = Mailbox::new(Some(name.clone()), self.email.as_address().clone());

                write!(f, "{}", mailbox)
            }
            Some(name) => write!(f, "{} <{}>", encoded_words(name), self.email),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_bare_address_without_display_name() -> TestResult {
        let address = MailAddress::new(None, EmailAddress::new("jane@example.com")?);

        assert_eq!(address.to_string(), "jane@example.com");

        Ok(())
    }

    #[test]
    fn test_blank_display_name_is_dropped() -> TestResult {
        let address = MailAddress::new(Some("   "), EmailAddress::new("jane@example.com")?);

        assert_eq!(address.name(), None);
        assert_eq!(address.to_string(), "jane@example.com");

        Ok(())
    }

    #[test]
    fn test_display_name_wraps_address_in_angle_brackets() -> TestResult {
        let address = MailAddress::new(Some("Jane"), EmailAddress::new("jane@example.com")?);

        assert_eq!(address.to_string(), "Jane <jane@example.com>");

        Ok(())
    }

    #[test]
    fn test_display_name_with_specials_is_quoted() -> TestResult {
        let address = MailAddress::new(Some("Doe, Jane"), EmailAddress::new("jane@example.com")?);

        assert_eq!(address.to_string(), "\"Doe, Jane\" <jane@example.com>");

        Ok(())
    }

    #[test]
    fn test_non_ascii_display_name_is_encoded() -> TestResult {
        let address = MailAddress::new(Some("Zoë"), EmailAddress::new("zoe@example.com")?);

        let encoded = address.to_string();

        assert_eq!(encoded, "=?utf-8?b?Wm/Dqw==?= <zoe@example.com>");
        assert!(encoded.is_ascii());

        Ok(())
    }

    #[test]
    fn test_display_name_with_control_characters_is_encoded() -> TestResult {
        for name in ["A\tB", "A\u{1}B", "A\u{7f}B", "A\r\nB"] {
            let address = MailAddress::new(Some(name), EmailAddress::new("jane@example.com")?);

            let formatted = address.to_string();

            assert!(formatted.starts_with("=?utf-8?b?"), "{formatted}");
            assert!(!formatted.contains(|c: char| c.is_ascii_control()));
        }

        Ok(())
    }
}
