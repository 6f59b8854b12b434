//! Communication module: everything needed to describe and encode an email.

pub mod email_addresses;
pub mod mailer;
pub mod mime;
