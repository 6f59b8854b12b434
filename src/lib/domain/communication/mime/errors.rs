//! MIME errors

use thiserror::Error;

/// Errors raised while composing a MIME payload
#[derive(Debug, Error)]
pub enum MimeError {
    /// A header was given more than one value
    #[error("multiple values for header \"{name}\" are not supported")]
    MultipleHeaderValues {
        /// Header name
        name: String,
    },

    /// A header value contains a line break
    #[error("value of header \"{name}\" contains a line break")]
    InvalidHeaderValue {
        /// Header name
        name: String,
    },

    /// The output sink failed
    #[error("failed to write MIME output")]
    Io(#[from] std::io::Error),
}
