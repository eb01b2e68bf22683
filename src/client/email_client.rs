use std::time::Duration;

use anyhow::Context;

use reqwest::Client;

use serde::Serialize;

use secrecy::{ExposeSecret, Secret};

use url::Url;

use crate::domain::EmailAddress;

const SERVER_TOKEN_HEADER: &str = "X-Postmark-Server-Token";

/// Sends notification emails through a Postmark-compatible REST API.
/// Every message goes out from the one configured sender address.
#[derive(Debug)]
pub struct EmailClient {
    http: Client,
    sender: EmailAddress,
    endpoint: Url,
    server_token: Secret<String>,
}

impl EmailClient {
    pub fn new(
        sender: EmailAddress,
        timeout: Duration,
        base_url: Url,
        server_token: Secret<String>,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build email API client")?;

        let endpoint = base_url
            .join("email")
            .context("Failed to build email API endpoint")?;

        Ok(Self {
            http,
            sender,
            endpoint,
            server_token,
        })
    }

    /// Post one email. Fails on transport errors and on any non-2xx answer.
    #[tracing::instrument(
        name = "Post email to API",
        skip(self, email),
        fields(recipient = %email.recipient)
    )]
    pub async fn send(&self, email: &Email) -> reqwest::Result<()> {
        let payload = OutgoingEmail {
            from: self.sender.as_ref(),
            to: email.recipient.as_ref(),
            reply_to: email.reply_to.as_ref().map(AsRef::as_ref),
            subject: &email.subject,
            html_body: &email.html_body,
            text_body: &email.text_body,
        };

        self.http
            .post(self.endpoint.clone())
            .header(SERVER_TOKEN_HEADER, self.server_token.expose_secret())
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct Email {
    pub recipient: EmailAddress,
    /// Address the recipient's replies go to
    pub reply_to: Option<EmailAddress>,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct OutgoingEmail<'a> {
    from: &'a str,
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
}
