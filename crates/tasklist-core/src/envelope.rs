use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::ApiError;

/// Uniform response body: `{success, data, meta?}` or `{success, error}`.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            meta: None,
            error: None,
        }
    }

    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            meta: None,
            error: Some(ErrorBody {
                code,
                message: message.into(),
                details: None,
            }),
        }
    }

    /// Failure envelope for a classified error, with 500 detail stripped.
    pub fn from_error(err: &ApiError) -> Self {
        Self {
            success: false,
            data: None,
            meta: None,
            error: Some(ErrorBody {
                code: err.status_code(),
                message: err.client_message(),
                details: err.client_details().cloned(),
            }),
        }
    }

    /// Status code the envelope must be sent with.
    pub fn status_code(&self, success_status: u16) -> u16 {
        self.error.as_ref().map_or(success_status, |e| e.code)
    }
}
