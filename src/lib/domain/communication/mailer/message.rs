//! Email message

use serde::{Deserialize, Serialize};

use crate::domain::communication::email_addresses::{EmailAddress, MailAddress};

/// Email message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The full HTML body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    /// The plain text body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// The subject of the email
    #[serde(default)]
    pub subject: String,

    /// The sender's address
    pub from_email: EmailAddress,

    /// The sender's display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,

    /// The recipient's address
    #[serde(rename = "email")]
    pub to_email: EmailAddress,

    /// The recipient's display name
    #[serde(default, rename = "name", skip_serializing_if = "Option::is_none")]
    pub to_name: Option<String>,
}

impl Message {
    /// The HTML body, if present and not empty
    pub fn html_body(&self) -> Option<&str> {
        non_empty(&self.html)
    }

    /// The plain text body, if present and not empty
    pub fn text_body(&self) -> Option<&str> {
        non_empty(&self.text)
    }

    /// The `From` mailbox
    pub fn sender(&self) -> MailAddress {
        MailAddress::new(self.from_name.as_deref(), self.from_email.clone())
    }

    /// The `To` mailbox
    pub fn recipient(&self) -> MailAddress {
        MailAddress::new(self.to_name.as_deref(), self.to_email.clone())
    }
}

fn non_empty(body: &Option<String>) -> Option<&str> {
    body.as_deref().filter(|body| !body.is_empty())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_deserialize_from_json() -> TestResult {
        let message: Message = serde_json::from_str(
            r#"{
                "html": "<p>Please confirm your email</p>",
                "text": "Please confirm your email",
                "subject": "Confirm",
                "from_email": "noreply@example.com",
                "from_name": "Example",
                "email": "jane@example.com"
            }"#,
        )?;

        assert_eq!(message.to_email, EmailAddress::new("jane@example.com")?);
        assert_eq!(message.to_name, None);
        assert_eq!(message.sender().to_string(), "Example <noreply@example.com>");
        assert_eq!(message.recipient().to_string(), "jane@example.com");

        Ok(())
    }

    #[test]
    fn test_empty_bodies_are_absent() -> TestResult {
        let message = Message {
            html: Some(String::new()),
            text: None,
            subject: "Confirm".to_string(),
            from_email: EmailAddress::new("noreply@example.com")?,
            from_name: None,
            to_email: EmailAddress::new("jane@example.com")?,
            to_name: None,
        };

        assert_eq!(message.html_body(), None);
        assert_eq!(message.text_body(), None);

        Ok(())
    }
}
