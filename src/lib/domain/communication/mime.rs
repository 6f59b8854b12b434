//! MIME payload construction.
//!
//! A message is rendered as a `multipart/mixed` container holding a single
//! `multipart/alternative` section with the plain text and HTML renderings.
//! All lines end in CRLF.

mod boundary;
mod composer;
mod encoding;
mod errors;
mod headers;

pub use boundary::{Boundary, Multipart};
pub use composer::compose;
pub use encoding::{
    encode_header_word, encoded_words, write_base64, write_quoted_printable, MAX_LINE_LENGTH,
};
pub use errors::MimeError;
pub use headers::{write_headers, HeaderSet};

/// Line terminator used throughout the payload
pub const CRLF: &str = "\r\n";
