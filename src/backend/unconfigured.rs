use crate::model::NewSubmission;

use super::{BackendError, ContactBackend, Receipt};

/// Stand-in used when the deployment's backend settings are unusable.
/// Every submission is rejected without a delivery attempt.
#[derive(Debug, Clone)]
pub struct UnconfiguredBackend {
    reason: String,
}

impl UnconfiguredBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl ContactBackend for UnconfiguredBackend {
    async fn submit(&self, _submission: &NewSubmission) -> Result<Receipt, BackendError> {
        Err(BackendError::Unconfigured(anyhow::anyhow!(self.reason.clone())))
    }
}
