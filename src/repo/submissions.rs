use sqlx::{Executor, PgExecutor};

use crate::model::{ContactSubmission, NewSubmission};

/// Submission repository trait, must be implemented for each database used.
#[async_trait::async_trait]
pub trait SubmissionRepo {
    type DB: sqlx::Database;

    /// Insert a new submission, returning the stored record
    async fn insert<'con>(
        executor: impl Executor<'con, Database = Self::DB>,
        new_submission: &NewSubmission,
    ) -> sqlx::Result<ContactSubmission>;
}

/// Postgres Submission Repository
#[derive(Debug)]
pub struct PgSubmissionRepo;

#[async_trait::async_trait]
impl SubmissionRepo for PgSubmissionRepo {
    type DB = sqlx::Postgres;

    #[tracing::instrument(name = "Insert contact submission", skip(executor, new_submission))]
    async fn insert<'con>(
        executor: impl PgExecutor<'con>,
        new_submission: &NewSubmission,
    ) -> sqlx::Result<ContactSubmission> {
        sqlx::query_as::<_, ContactSubmission>(
            r#"
            insert into contact_submissions(name, email, subject, message, submitted_at, status)
            values ($1, $2, $3, $4, $5, $6)
            returning id, name, email, subject, message, submitted_at, status
            "#,
        )
        .bind(new_submission.name.as_ref())
        .bind(new_submission.email.as_ref())
        .bind(new_submission.subject.as_ref())
        .bind(new_submission.message.as_ref())
        .bind(new_submission.submitted_at)
        .bind(new_submission.status.as_str())
        .fetch_one(executor)
        .await
    }
}
