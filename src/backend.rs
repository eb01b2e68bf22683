use std::sync::Arc;

use thiserror::Error;

use uuid::Uuid;

use crate::model::NewSubmission;
use crate::settings::{BackendKind, Settings};

mod database;
mod email_relay;
mod unconfigured;

pub use database::DatabaseBackend;
pub use email_relay::EmailRelayBackend;
pub use unconfigured::UnconfiguredBackend;

/// Delivery target for accepted contact submissions.
///
/// Exactly one implementation is chosen per deployment. Each call to
/// [`ContactBackend::submit`] makes a single delivery attempt and never retries.
#[async_trait::async_trait]
pub trait ContactBackend: Send + Sync {
    async fn submit(&self, submission: &NewSubmission) -> Result<Receipt, BackendError>;
}

/// Acknowledgement of a successful delivery
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Receipt {
    /// Identifier assigned by the backend, if it stores submissions
    pub id: Option<Uuid>,
}

/// Classified delivery failure. The wrapped error is for server-side logs only.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Contact backend is not configured")]
    Unconfigured(#[source] anyhow::Error),

    #[error("Contact backend is unreachable")]
    Unreachable(#[source] anyhow::Error),

    #[error("Contact backend rejected its credentials")]
    AuthFailed(#[source] anyhow::Error),

    #[error("Contact backend operation failed")]
    OperationFailed(#[source] anyhow::Error),

    #[error("Unexpected contact backend failure")]
    Unexpected(#[source] anyhow::Error),
}

impl From<sqlx::Error> for BackendError {
    fn from(e: sqlx::Error) -> Self {
        use sqlx::Error as E;

        let classify: fn(anyhow::Error) -> Self = match &e {
            E::Configuration(_) => Self::Unconfigured,
            E::Io(_) | E::Tls(_) | E::PoolTimedOut | E::PoolClosed => Self::Unreachable,
            // SQLSTATE class 28: invalid authorization specification
            E::Database(db) if db.code().map_or(false, |code| code.starts_with("28")) => {
                Self::AuthFailed
            }
            E::Database(_)
            | E::RowNotFound
            | E::ColumnNotFound(_)
            | E::ColumnIndexOutOfBounds { .. }
            | E::ColumnDecode { .. }
            | E::Decode(_)
            | E::TypeNotFound { .. }
            | E::Protocol(_) => Self::OperationFailed,
            _ => Self::Unexpected,
        };
        classify(e.into())
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        use reqwest::StatusCode;

        if e.is_connect() || e.is_timeout() || e.is_request() {
            return Self::Unreachable(e.into());
        }
        match e.status() {
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => Self::AuthFailed(e.into()),
            Some(_) => Self::OperationFailed(e.into()),
            None if e.is_decode() || e.is_body() || e.is_redirect() => {
                Self::OperationFailed(e.into())
            }
            None => Self::Unexpected(e.into()),
        }
    }
}

/// Build the contact backend selected by `settings.backend.kind`.
///
/// When the selected backend's settings are missing, placeholders, or malformed
/// this fails if `require_configured` is set. Otherwise the problem is logged and
/// an [`UnconfiguredBackend`] is returned so the service can still start.
pub fn build(settings: &Settings) -> anyhow::Result<Arc<dyn ContactBackend>> {
    let kind = settings.backend.kind;

    let backend: anyhow::Result<Arc<dyn ContactBackend>> = match kind {
        BackendKind::Database => DatabaseBackend::from_settings(&settings.database)
            .map(|b| Arc::new(b) as Arc<dyn ContactBackend>),
        BackendKind::Email => EmailRelayBackend::from_settings(&settings.email)
            .map(|b| Arc::new(b) as Arc<dyn ContactBackend>),
    };

    match backend {
        Ok(backend) => {
            tracing::info!(backend = %kind, "Contact backend configured");
            Ok(backend)
        }
        Err(error) if settings.backend.require_configured => {
            Err(error.context(format!("The {} contact backend is not configured", kind)))
        }
        Err(error) => {
            tracing::error!(
                error.cause_chain = ?error,
                backend = %kind,
                "Contact backend is not configured, submissions will be rejected"
            );
            Ok(Arc::new(UnconfiguredBackend::new(error.to_string())))
        }
    }
}
