mod submission;

pub use submission::{ContactSubmission, NewSubmission, SubmissionStatus};
