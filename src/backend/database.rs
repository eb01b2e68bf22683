use anyhow::Context;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::model::NewSubmission;
use crate::repo::{PgSubmissionRepo, SubmissionRepo};
use crate::settings::DatabaseSettings;

use super::{BackendError, ContactBackend, Receipt};

/// Stores each submission as a row in Postgres
#[derive(Debug, Clone)]
pub struct DatabaseBackend {
    pool: PgPool,
}

impl DatabaseBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the backend without connecting.
    /// Connections are opened by the pool on first use.
    pub fn from_settings(settings: &DatabaseSettings) -> anyhow::Result<Self> {
        let options = settings
            .connect_options()
            .context("Invalid database settings")?;

        let pool = PgPoolOptions::new()
            .acquire_timeout(settings.acquire_timeout())
            .connect_lazy_with(options);

        Ok(Self::new(pool))
    }
}

#[async_trait::async_trait]
impl ContactBackend for DatabaseBackend {
    #[tracing::instrument(name = "Persist contact submission", skip_all)]
    async fn submit(&self, submission: &NewSubmission) -> Result<Receipt, BackendError> {
        let stored = PgSubmissionRepo::insert(&self.pool, submission).await?;

        tracing::info!(submission.id = %stored.id, "Contact submission stored");

        Ok(Receipt {
            id: Some(stored.id),
        })
    }
}
