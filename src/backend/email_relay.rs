use anyhow::Context;

use askama::Template;

use crate::client::{Email, EmailClient};
use crate::domain::EmailAddress;
use crate::model::NewSubmission;
use crate::settings::EmailSettings;

use super::{BackendError, ContactBackend, Receipt};

/// Forwards each submission to the site owner through the email API
#[derive(Debug)]
pub struct EmailRelayBackend {
    client: EmailClient,
    recipient: EmailAddress,
}

impl EmailRelayBackend {
    pub fn new(client: EmailClient, recipient: EmailAddress) -> Self {
        Self { client, recipient }
    }

    pub fn from_settings(settings: &EmailSettings) -> anyhow::Result<Self> {
        let client = EmailClient::new(
            settings.sender()?,
            settings.api_timeout(),
            settings.api_base_url()?,
            settings.api_auth_token()?,
        )
        .context("Failed to create email client")?;

        Ok(Self::new(client, settings.recipient()?))
    }
}

#[async_trait::async_trait]
impl ContactBackend for EmailRelayBackend {
    #[tracing::instrument(name = "Relay contact submission by email", skip_all)]
    async fn submit(&self, submission: &NewSubmission) -> Result<Receipt, BackendError> {
        let email =
            build_relay_email(submission, &self.recipient).map_err(BackendError::Unexpected)?;

        self.client.send(&email).await?;

        tracing::info!("Contact submission relayed");

        Ok(Receipt::default())
    }
}

#[derive(askama::Template)]
#[template(path = "contact-relay.html")]
struct RelayHtmlTemplate<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
    submitted_at: String,
}

#[derive(askama::Template)]
#[template(path = "contact-relay.txt")]
struct RelayTextTemplate<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
    submitted_at: String,
}

/// Build the notification email sent to the site owner for a submission
fn build_relay_email(
    submission: &NewSubmission,
    recipient: &EmailAddress,
) -> anyhow::Result<Email> {
    let submitted_at = submission.submitted_at.to_rfc3339();

    let html_body = RelayHtmlTemplate {
        name: submission.name.as_ref(),
        email: submission.email.as_ref(),
        subject: submission.subject.as_ref(),
        message: submission.message.as_ref(),
        submitted_at: submitted_at.clone(),
    }
    .render()
    .context("Failed to render HTML email template")?;

    let text_body = RelayTextTemplate {
        name: submission.name.as_ref(),
        email: submission.email.as_ref(),
        subject: submission.subject.as_ref(),
        message: submission.message.as_ref(),
        submitted_at,
    }
    .render()
    .context("Failed to render plain text email template")?;

    Ok(Email {
        recipient: recipient.clone(),
        reply_to: Some(submission.email.clone()),
        subject: format!("Contact: {}", submission.subject.as_ref()),
        html_body,
        text_body,
    })
}
