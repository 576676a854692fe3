//! Error types for the TigoPesa gateway.

use crate::domain::ResponseCode;

/// Domain-level errors (local validation failures).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid MSISDN '{0}': expected 255 followed by nine digits")]
    InvalidMsisdn(String),

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    #[error("Charge reference cannot be empty")]
    EmptyReference,
}

/// Errors surfaced by provider-facing operations.
///
/// Every variant reports a normalized [`ResponseCode`] through
/// [`ProviderError::code`]: transport failures and unrecognized responses
/// degrade to `UNKNOWN_ERROR`, local validation of a response degrades to
/// `INVALID_RESPONSE`.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider returned a well-formed error envelope.
    #[error("provider rejected request ({code}): {message}")]
    Rejected {
        code: ResponseCode,
        message: String,
        /// ReferenceID attached by biller-style envelopes
        reference: Option<String>,
    },

    /// Network failure or timeout; no usable response was received.
    #[error("transport failure: {message}")]
    Transport { message: String },

    /// The response was structurally valid but not what was expected.
    #[error("invalid provider response: {message}")]
    InvalidResponse { message: String },

    /// The response shape was not recognized at all.
    #[error("unknown provider error: {message}")]
    Unknown { message: String },
}

impl ProviderError {
    pub fn rejected(code: ResponseCode, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
            reference: None,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// The normalized response code for this error.
    pub fn code(&self) -> ResponseCode {
        match self {
            Self::Rejected { code, .. } => *code,
            Self::Transport { .. } | Self::Unknown { .. } => ResponseCode::UnknownError,
            Self::InvalidResponse { .. } => ResponseCode::InvalidResponse,
        }
    }

    /// The human-readable message carried by this error.
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected { message, .. }
            | Self::Transport { message }
            | Self::InvalidResponse { message }
            | Self::Unknown { message } => message,
        }
    }

    /// The provider ReferenceID, if the error envelope carried one.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Rejected { reference, .. } => reference.as_deref(),
            _ => None,
        }
    }
}

/// Errors from the job queue adapter.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("queue connection error: {0}")]
    Connection(String),

    #[error("job codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Errors from the webhook confirmation callback.
///
/// The webhook receiver never swallows these; they propagate to the host's
/// generic error handling path.
#[derive(Debug, thiserror::Error)]
pub enum ConfirmError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("confirmation failed: {0}")]
    Other(String),
}
