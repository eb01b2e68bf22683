use std::str::FromStr;

use actix_web::dev::HttpServiceFactory;
use actix_web::error::PayloadError;
use actix_web::{post, web, HttpResponse};

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::backend::ContactBackend;
use crate::error::{ContactError, FieldErrors};
use crate::model::NewSubmission;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// JSON body of a contact form submission.
/// Fields are optional here so that missing or mistyped fields are reported per field.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    name: Option<FormField>,
    #[serde(default)]
    email: Option<FormField>,
    #[serde(default)]
    subject: Option<FormField>,
    #[serde(default)]
    message: Option<FormField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FormField {
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl ContactForm {
    /// Parse a request body, which must be a JSON object
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        use serde::de::Error;

        match serde_json::from_slice::<serde_json::Value>(body)? {
            value @ serde_json::Value::Object(_) => serde_json::from_value(value),
            _ => Err(serde_json::Error::custom("expected a JSON object")),
        }
    }
}

impl TryFrom<ContactForm> for NewSubmission {
    type Error = FieldErrors;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::default();

        let name = parse_field(&mut errors, "name", "Name", form.name);
        let email = parse_field(&mut errors, "email", "Email", form.email);
        let subject = parse_field(&mut errors, "subject", "Subject", form.subject);
        let message = parse_field(&mut errors, "message", "Message", form.message);

        match (name, email, subject, message) {
            (Some(name), Some(email), Some(subject), Some(message)) => {
                Ok(NewSubmission::accept(name, email, subject, message))
            }
            _ => Err(errors),
        }
    }
}

/// Parse one form field, recording a message against `field` if it is invalid
fn parse_field<T>(
    errors: &mut FieldErrors,
    field: &'static str,
    label: &str,
    value: Option<FormField>,
) -> Option<T>
where
    T: FromStr<Err = String>,
{
    let result = match value {
        Some(FormField::Text(text)) => text.parse(),
        Some(FormField::Other(_)) => Err(format!("{} must be a string.", label)),
        None => Err(format!("{} is required.", label)),
    };

    result.map_err(|message| errors.push(field, message)).ok()
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub data: SubmittedData,
}

/// Echo of the accepted fields
#[derive(Debug, Serialize)]
pub struct SubmittedData {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

/// Validate a raw request body and make a single delivery attempt
pub async fn handle_submission(
    body: &[u8],
    backend: &dyn ContactBackend,
) -> Result<SubmitResponse, ContactError> {
    let form = ContactForm::from_json(body).map_err(ContactError::MalformedRequest)?;
    let submission: NewSubmission = form.try_into().map_err(ContactError::ValidationFailed)?;

    let receipt = backend.submit(&submission).await?;

    let message = if receipt.id.is_some() {
        "Message sent successfully and saved!"
    } else {
        "Message sent successfully!"
    };

    Ok(SubmitResponse {
        message,
        data: SubmittedData {
            name: submission.name.as_ref().into(),
            email: submission.email.as_ref().into(),
            subject: submission.subject.as_ref().into(),
            message: submission.message.as_ref().into(),
            id: receipt.id,
        },
    })
}

/// Classify a failure to read the request body
fn body_error(error: actix_web::Error) -> ContactError {
    match error.as_error::<PayloadError>() {
        Some(PayloadError::Overflow) => ContactError::PayloadTooLarge(MAX_BODY_BYTES),
        _ => ContactError::UnreadableBody(error.to_string()),
    }
}

/// Contact form submission endpoint
#[tracing::instrument(name = "Submit a contact message", skip(body, backend))]
#[post("/contact")]
async fn submit(
    body: Result<web::Bytes, actix_web::Error>,
    backend: web::Data<dyn ContactBackend>,
) -> Result<HttpResponse, ContactError> {
    tracing::info!("Contact submission received");

    let result = match body {
        Ok(body) => handle_submission(&body, backend.get_ref()).await,
        Err(error) => Err(body_error(error)),
    };

    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(error) => {
            error.log();
            Err(error)
        }
    }
}

/// Contact API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/api").service(submit)
}
