use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use serde::Serialize;

use thiserror::Error;

use crate::backend::BackendError;

/// Failure of a contact submission, as reported to the caller
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Invalid JSON in request body")]
    MalformedRequest(#[source] serde_json::Error),

    #[error("Request body could not be read: {0}")]
    UnreadableBody(String),

    #[error("Request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Invalid input data")]
    ValidationFailed(FieldErrors),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Machine-readable failure classification included in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    MalformedRequest,
    PayloadTooLarge,
    ValidationFailed,
    BackendUnconfigured,
    BackendUnreachable,
    BackendAuthFailed,
    BackendOperationFailed,
    UnexpectedFailure,
}

impl ContactError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedRequest(_) | Self::UnreadableBody(_) => ErrorKind::MalformedRequest,
            Self::PayloadTooLarge(_) => ErrorKind::PayloadTooLarge,
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Self::Backend(e) => match e {
                BackendError::Unconfigured(_) => ErrorKind::BackendUnconfigured,
                BackendError::Unreachable(_) => ErrorKind::BackendUnreachable,
                BackendError::AuthFailed(_) => ErrorKind::BackendAuthFailed,
                BackendError::OperationFailed(_) => ErrorKind::BackendOperationFailed,
                BackendError::Unexpected(_) => ErrorKind::UnexpectedFailure,
            },
        }
    }

    /// Record the failure in server-side logs, including any underlying cause
    pub fn log(&self) {
        match self {
            Self::MalformedRequest(e) => {
                tracing::warn!(error = %e, "Rejected contact request with malformed body")
            }
            Self::UnreadableBody(e) => {
                tracing::warn!(error = %e, "Failed to read contact request body")
            }
            Self::PayloadTooLarge(limit) => {
                tracing::warn!(limit, "Rejected oversized contact request")
            }
            Self::ValidationFailed(fields) => {
                tracing::warn!(?fields, "Rejected contact request with invalid fields")
            }
            Self::Backend(e) => tracing::error!(
                error.cause_chain = ?e,
                kind = ?self.kind(),
                "Failed to deliver contact submission"
            ),
        }
    }

    /// Public error headline. Never includes backend internals.
    fn headline(&self) -> &'static str {
        match self.kind() {
            ErrorKind::MalformedRequest => "Invalid JSON in request body",
            ErrorKind::PayloadTooLarge => "Request body too large",
            ErrorKind::ValidationFailed => "Invalid input data",
            ErrorKind::BackendUnconfigured => "Contact service is not configured.",
            ErrorKind::BackendUnreachable => "Contact service is unreachable.",
            ErrorKind::BackendAuthFailed => "Contact service authentication failed.",
            ErrorKind::BackendOperationFailed => "Failed to deliver your message.",
            ErrorKind::UnexpectedFailure => {
                "An unexpected internal server error occurred while processing your message."
            }
        }
    }

    fn details(&self) -> serde_json::Value {
        let generic = match self {
            Self::MalformedRequest(e) => return serde_json::Value::String(e.to_string()),
            Self::UnreadableBody(e) => return serde_json::Value::String(e.clone()),
            Self::PayloadTooLarge(limit) => {
                return serde_json::Value::String(format!(
                    "Request body must be at most {} bytes.",
                    limit
                ))
            }
            Self::ValidationFailed(fields) => return serde_json::json!(fields),
            Self::Backend(BackendError::Unconfigured(_)) => {
                "The server is missing configuration required to accept messages. Please try again later."
            }
            Self::Backend(BackendError::Unreachable(_)) => {
                "Could not reach the message delivery service. Please try again later."
            }
            Self::Backend(BackendError::AuthFailed(_)) => {
                "The server could not authenticate with the message delivery service."
            }
            Self::Backend(BackendError::OperationFailed(_)) => {
                "The message delivery service reported an error."
            }
            Self::Backend(BackendError::Unexpected(_)) => "No additional details are available.",
        };
        serde_json::Value::String(generic.into())
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::MalformedRequest | ErrorKind::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::BackendUnconfigured | ErrorKind::BackendUnreachable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ErrorKind::BackendAuthFailed => StatusCode::UNAUTHORIZED,
            ErrorKind::BackendOperationFailed | ErrorKind::UnexpectedFailure => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.headline(),
            kind: self.kind(),
            details: self.details(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    kind: ErrorKind,
    details: serde_json::Value,
}

/// Validation messages, indexed by request field name
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Messages recorded for a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}
