//! Email addresses module.

mod email_address;
mod mail_address;

pub use email_address::{EmailAddress, EmailAddressError};
pub use mail_address::MailAddress;
