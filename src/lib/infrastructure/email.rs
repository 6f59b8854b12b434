//! Email delivery: SMTP, a hosted transactional-email API, and the router
//! choosing between them

pub mod hosted_api;
pub mod router;
pub mod smtp;
