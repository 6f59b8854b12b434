//! Multipart boundaries and delimiter writing

use std::{fmt, io::Write};

use rand::Rng;

use super::{write_headers, HeaderSet, MimeError, CRLF};

const BOUNDARY_BYTES: usize = 30;

/// A multipart boundary token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Boundary(String);

impl Boundary {
    /// Generate a random boundary of 60 lowercase hex characters
    pub fn generate() -> Self {
        let bytes: [u8; BOUNDARY_BYTES] = rand::thread_rng().gen();

        Self(bytes.iter().map(|byte| format!("{:02x}", byte)).collect())
    }

    /// Generate a boundary that does not occur in any of `contents`
    pub fn generate_avoiding(contents: &[&str]) -> Self {
        loop {
            let boundary = Self::generate();

            if !contents.iter().any(|content| content.contains(boundary.as_str())) {
                return boundary;
            }
        }
    }

    /// The boundary token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Writes the delimiters of one multipart container.
///
/// The first part opens with `--boundary`, later ones with a preceding CRLF,
/// and [`Multipart::close`] writes the `--boundary--` terminator.
#[derive(Debug)]
pub struct Multipart {
    boundary: Boundary,
    parts: usize,
}

impl Multipart {
    /// Start a container delimited by `boundary`
    pub fn new(boundary: Boundary) -> Self {
        Self { boundary, parts: 0 }
    }

    /// The container's boundary
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// `Content-Type` value announcing this container
    pub fn content_type(&self, subtype: &str) -> String {
        format!("multipart/{}; boundary={}", subtype, self.boundary)
    }

    /// Write the delimiter line opening the next part
    pub fn begin_part<W: Write>(&mut self, out: &mut W) -> Result<(), MimeError> {
        if self.parts > 0 {
            out.write_all(CRLF.as_bytes())?;
        }

        write!(out, "--{}{}", self.boundary, CRLF)?;
        self.parts += 1;

        Ok(())
    }

    /// Write the delimiter and header block of the next part
    pub fn create_part<W: Write>(
        &mut self,
        out: &mut W,
        headers: &HeaderSet,
    ) -> Result<(), MimeError> {
        self.begin_part(out)?;
        write_headers(out, headers)
    }

    /// Write the closing delimiter
    pub fn close<W: Write>(self, out: &mut W) -> Result<(), MimeError> {
        write!(out, "{}--{}--{}", CRLF, self.boundary, CRLF)?;

        Ok(())
    }
}
