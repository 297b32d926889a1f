use serde_json::{Map, Value};

/// Message sent to clients in place of any 500 detail.
pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

pub type ApiResult<T> = Result<T, ApiError>;

/// Classified error raised by validators, handlers and the storage adapter.
///
/// Every variant maps to exactly one HTTP status. Anything that is not a
/// client mistake or a missing row ends up as `Internal`, whose message is
/// logged but never shown to the client.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    InvalidArgument {
        message: String,
        details: Option<Map<String, Value>>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Invalid input without structured details.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            details: None,
        }
    }

    /// Invalid input attributed to a single request field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut details = Map::new();
        details.insert("field".into(), Value::String(field.to_string()));
        Self::InvalidArgument {
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::PayloadTooLarge(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument { .. } => 400,
            Self::NotFound(_) => 404,
            Self::PayloadTooLarge(_) => 413,
            Self::Internal(_) => 500,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.status_code() == 500
    }

    /// Message that is safe to put on the wire.
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => INTERNAL_MESSAGE.to_string(),
            Self::InvalidArgument { message, .. } => message.clone(),
            Self::NotFound(message) | Self::PayloadTooLarge(message) => message.clone(),
        }
    }

    /// Structured details, only ever present on validation failures.
    pub fn client_details(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::InvalidArgument { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::NotFound(_) => "not_found",
            Self::PayloadTooLarge(_) => "payload_too_large",
            Self::Internal(_) => "internal",
        }
    }
}
