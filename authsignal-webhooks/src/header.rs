//! Signature header parsing
//!
//! The header carries one timestamp and one or more signatures:
//!
//! ```text
//! t=1740016316,v2=89vWAaNuB+MoOqeOFdINSi6VRGlT1OkeJIi9PPZkk/8[,v2=...]
//! ```

use crate::{Result, WebhookError};

/// Key of the timestamp fragment
pub const TIMESTAMP_KEY: &str = "t";

/// Key of the signature fragments for the current protocol version
pub const SIGNATURE_VERSION: &str = "v2";

/// Timestamp value meaning "no timestamp seen"
const ABSENT_TIMESTAMP: i64 = -1;

/// A structurally valid signature header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp (seconds) the sender signed at
    pub timestamp: i64,

    /// Candidate signatures, one per active signing key
    pub signatures: Vec<String>,
}

/// One comma-separated piece of the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fragment<'a> {
    Timestamp(i64),
    Signature(&'a str),
    Unknown,
    Malformed,
}

impl<'a> Fragment<'a> {
    fn classify(raw: &'a str) -> Self {
        let Some((key, value)) = raw.split_once('=') else {
            return Self::Malformed;
        };
        if key.is_empty() || value.is_empty() {
            return Self::Malformed;
        }

        match key {
            TIMESTAMP_KEY => match value.parse::<i64>() {
                Ok(timestamp) => Self::Timestamp(timestamp),
                // An unparsable timestamp leaves the header without one
                Err(_) => Self::Malformed,
            },
            SIGNATURE_VERSION => Self::Signature(value),
            _ => Self::Unknown,
        }
    }
}

impl SignatureHeader {
    /// Parse a raw header value
    ///
    /// A missing header, a header without a timestamp, or a header without a
    /// single `v2` signature is rejected with
    /// [`WebhookError::InvalidSignatureFormat`].
    pub fn parse(header: Option<&str>) -> Result<Self> {
        let header = header.ok_or(WebhookError::InvalidSignatureFormat)?;

        let mut timestamp = ABSENT_TIMESTAMP;
        let mut signatures = Vec::new();

        for raw in header.split(',') {
            match Fragment::classify(raw) {
                Fragment::Timestamp(t) => timestamp = t,
                Fragment::Signature(sig) => signatures.push(sig.to_string()),
                Fragment::Unknown | Fragment::Malformed => {}
            }
        }

        if timestamp == ABSENT_TIMESTAMP || signatures.is_empty() {
            return Err(WebhookError::InvalidSignatureFormat);
        }

        Ok(Self {
            timestamp,
            signatures,
        })
    }

    /// Render the header back into its wire form
    pub fn to_header_value(&self) -> String {
        let mut value = format!("{}={}", TIMESTAMP_KEY, self.timestamp);
        for sig in &self.signatures {
            value.push(',');
            value.push_str(SIGNATURE_VERSION);
            value.push('=');
            value.push_str(sig);
        }
        value
    }
}

impl std::str::FromStr for SignatureHeader {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(Some(s))
    }
}
