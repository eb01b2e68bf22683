use std::fmt;

use chrono::{DateTime, Utc};

use uuid::Uuid;

use crate::domain::{ContactName, EmailAddress, MessageBody, MessageSubject};

/// Moderation status of a submission.
/// Submissions are always created `Unread`; nothing in this service moves them on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Unread,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unread => "unread",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated contact message that has been accepted for delivery
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub name: ContactName,
    pub email: EmailAddress,
    pub subject: MessageSubject,
    pub message: MessageBody,
    /// When the request was accepted
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
}

impl NewSubmission {
    /// Accept validated fields, stamping the submission time
    pub fn accept(
        name: ContactName,
        email: EmailAddress,
        subject: MessageSubject,
        message: MessageBody,
    ) -> Self {
        Self {
            name,
            email,
            subject,
            message,
            submitted_at: Utc::now(),
            status: SubmissionStatus::Unread,
        }
    }
}

/// Stored submission record
#[derive(Debug, sqlx::FromRow)]
pub struct ContactSubmission {
    /// Generated at insertion
    pub id: Uuid,
    /// User supplied data
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
    pub status: String,
}
