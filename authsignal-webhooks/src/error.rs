//! Error types for webhook verification

use thiserror::Error;

/// Errors that can occur while verifying an incoming webhook
///
/// The `Display` text is meant for local logs. Responses sent back to the
/// webhook sender should use [`WebhookError::public_message`] so a remote
/// caller cannot tell which check rejected the request.
#[derive(Error, Debug)]
pub enum WebhookError {
    /// Header missing, or no timestamp / signature after parsing
    #[error("Signature format is invalid.")]
    InvalidSignatureFormat,

    /// Timestamp older than the tolerance window allows
    #[error("Timestamp is outside the tolerance zone.")]
    TimestampOutOfTolerance {
        /// Timestamp carried by the header
        timestamp: i64,
        /// Oldest timestamp that would have been accepted
        oldest_accepted: i64,
    },

    /// No candidate signature matched the computed one
    #[error("Signature mismatch.")]
    SignatureMismatch,

    /// Payload passed verification but is not valid JSON
    #[error("Payload could not be decoded: {0}")]
    PayloadDecodeError(#[from] serde_json::Error),
}

/// Failure kind without any attached detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidSignatureFormat,
    TimestampOutOfTolerance,
    SignatureMismatch,
    PayloadDecodeError,
}

impl ErrorKind {
    /// Stable identifier, suitable as a log field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidSignatureFormat => "invalid_signature_format",
            Self::TimestampOutOfTolerance => "timestamp_out_of_tolerance",
            Self::SignatureMismatch => "signature_mismatch",
            Self::PayloadDecodeError => "payload_decode_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WebhookError {
    /// The kind of failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSignatureFormat => ErrorKind::InvalidSignatureFormat,
            Self::TimestampOutOfTolerance { .. } => ErrorKind::TimestampOutOfTolerance,
            Self::SignatureMismatch => ErrorKind::SignatureMismatch,
            Self::PayloadDecodeError(_) => ErrorKind::PayloadDecodeError,
        }
    }

    /// HTTP status to answer the webhook sender with
    pub fn status_code(&self) -> u16 {
        400
    }

    /// Message safe to return to the webhook sender
    pub fn public_message(&self) -> &'static str {
        "Invalid webhook request"
    }

    /// True when the request was rejected before the payload was trusted
    pub fn is_verification_failure(&self) -> bool {
        !matches!(self, Self::PayloadDecodeError(_))
    }
}
