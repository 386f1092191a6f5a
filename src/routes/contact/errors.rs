use actix_web::{
    HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode,
};

use crate::{
    domain::{ContactResponse, ContactValidationError},
    mail_transport::MailTransportError,
};

use super::super::helpers::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error(transparent)]
    ValidationError(#[from] ContactValidationError),
    #[error("Failed to send the contact email.")]
    MailTransportError(#[source] MailTransportError),
    #[error(transparent)]
    RequestError(#[from] anyhow::Error),
}

impl ContactError {
    /// The sentence shown to the visitor; internal details never leave the server.
    pub fn public_message(&self) -> String {
        match self {
            ContactError::ValidationError(e) => e.to_string(),
            ContactError::MailTransportError(_) => {
                "Failed to send email. Please try again later.".into()
            }
            ContactError::RequestError(_) => "There was an error processing your request.".into(),
        }
    }
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ContactError::MailTransportError(_) | ContactError::RequestError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(ContactResponse::failed(self.public_message()))
    }
}

/// Turns unreadable contact payloads into the generic processing error.
pub fn contact_payload_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::error!(error.message = %err, "Failed to read the contact payload");
    ContactError::RequestError(anyhow::anyhow!("Invalid contact payload: {err}")).into()
}
