//! Bridges fallible handler bodies to HTTP responses.
//!
//! Handlers build a [`Reply`] or fail with an [`ApiError`]. [`dispatch`]
//! awaits the body exactly once and turns the outcome into one response;
//! failures always go through [`render_error`], the only place that decides
//! what reaches the client.

use std::any::Any;
use std::future::Future;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error};

use tasklist_core::{ApiError, ApiResult, Envelope};

/// A successful outcome, not yet written.
#[derive(Debug)]
pub struct Reply {
    status: StatusCode,
    location: Option<String>,
    envelope: Option<Envelope>,
}

impl Reply {
    /// 200 with `data`.
    pub fn ok<T: Serialize>(data: &T) -> ApiResult<Self> {
        Self::with_status(StatusCode::OK, data)
    }

    /// 201 with `data` and a `Location` header.
    pub fn created<T: Serialize>(data: &T, location: impl Into<String>) -> ApiResult<Self> {
        let mut reply = Self::with_status(StatusCode::CREATED, data)?;
        reply.location = Some(location.into());
        Ok(reply)
    }

    /// 204 with an empty body.
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            location: None,
            envelope: None,
        }
    }

    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.envelope = self.envelope.map(|e| e.with_meta(meta));
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn with_status<T: Serialize>(status: StatusCode, data: &T) -> ApiResult<Self> {
        let data = serde_json::to_value(data)
            .map_err(|e| ApiError::internal(format!("serialize response: {e}")))?;
        Ok(Self {
            status,
            location: None,
            envelope: Some(Envelope::success(data)),
        })
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let mut response = match self.envelope {
            Some(envelope) => (self.status, Json(envelope)).into_response(),
            None => self.status.into_response(),
        };
        if let Some(location) = self.location {
            match HeaderValue::from_str(&location) {
                Ok(value) => {
                    response.headers_mut().insert(header::LOCATION, value);
                }
                Err(e) => {
                    return render_error(&ApiError::internal(format!(
                        "invalid Location header {location:?}: {e}"
                    )))
                }
            }
        }
        response
    }
}

/// Run a handler body and produce its single response.
///
/// Bodies are fully buffered before anything is handed to the transport, so
/// there is no partially written response a late failure could collide with.
pub async fn dispatch<F>(operation: F) -> Response
where
    F: Future<Output = ApiResult<Reply>>,
{
    match operation.await {
        Ok(reply) => reply.into_response(),
        Err(err) => render_error(&err),
    }
}

/// Terminal error handler: log, then write the failure envelope.
pub fn render_error(err: &ApiError) -> Response {
    if err.is_internal() {
        error!(kind = err.error_kind(), error = %err, "request failed");
    } else {
        debug!(kind = err.error_kind(), status = err.status_code(), error = %err, "request rejected");
    }
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(Envelope::from_error(err))).into_response()
}

/// Response for a handler that panicked. Used with `CatchPanicLayer`.
pub fn render_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    render_error(&ApiError::internal(format!("handler panicked: {detail}")))
}

/// Failure envelope for a status outside the classified set (e.g. 405).
pub fn render_status(status: StatusCode, message: &str) -> Response {
    debug!(status = status.as_u16(), reason = message, "request rejected");
    (status, Json(Envelope::failure(status.as_u16(), message))).into_response()
}
