mod submissions;

pub use submissions::{PgSubmissionRepo, SubmissionRepo};
