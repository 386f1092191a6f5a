//! Visitor-side state of the contact form.
//!
//! [`ContactForm`] owns the typed-in values and the [`SubmissionStatus`] shown
//! next to the submit button. A submission runs in two halves,
//! [`ContactForm::begin_submission`] and [`ContactForm::finish_submission`], so
//! at most one request is ever in flight per form.

use tracing::Instrument;
use uuid::Uuid;

use crate::{
    contact_client::{ContactClient, ContactReply},
    domain::{ContactFormData, ContactSubmission, ContactValidationError},
};

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const SENDING_MESSAGE: &str = "Sending your message...";
pub const DEFAULT_SUCCESS_MESSAGE: &str =
    "Thank you for your message! I will get back to you soon.";
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
pub const NETWORK_ERROR_MESSAGE: &str = "Failed to send message. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Message,
}

impl TryFrom<&str> for FormField {
    type Error = String;

    fn try_from(id: &str) -> Result<Self, Self::Error> {
        match id {
            "name" => Ok(FormField::Name),
            "email" => Ok(FormField::Email),
            "message" => Ok(FormField::Message),
            other => Err(format!("`{other}` is not a contact form field.")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting(String),
    Success(String),
    Error(String),
}

impl SubmissionStatus {
    pub fn message(&self) -> &str {
        match self {
            SubmissionStatus::Idle => "",
            SubmissionStatus::Submitting(message)
            | SubmissionStatus::Success(message)
            | SubmissionStatus::Error(message) => message,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    data: ContactFormData,
    status: SubmissionStatus,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &ContactFormData {
        &self.data
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn can_submit(&self) -> bool {
        !matches!(self.status, SubmissionStatus::Submitting(_))
    }

    pub fn update(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.data.name = value,
            FormField::Email => self.data.email = value,
            FormField::Message => self.data.message = value,
        }
    }

    /// Validates the form and, if it passes, moves it to `Submitting`.
    ///
    /// Returns the payload to send, or `None` when nothing must be sent: the
    /// form is already submitting or the input was rejected.
    pub fn begin_submission(&mut self) -> Option<ContactFormData> {
        if !self.can_submit() {
            return None;
        }

        if let Err(e) = ContactSubmission::parse(self.data.clone()) {
            let message = match e {
                ContactValidationError::MissingFields => MISSING_FIELDS_MESSAGE,
                ContactValidationError::InvalidEmail => INVALID_EMAIL_MESSAGE,
            };
            self.status = SubmissionStatus::Error(message.into());
            return None;
        }

        self.status = SubmissionStatus::Submitting(SENDING_MESSAGE.into());
        Some(self.data.clone())
    }

    pub fn finish_submission(&mut self, outcome: Result<ContactReply, reqwest::Error>) {
        if self.can_submit() {
            tracing::warn!("Ignoring a contact reply that arrived without a submission in flight");
            return;
        }

        self.status = match outcome {
            Ok(ContactReply { ok: true, body }) => {
                self.data = ContactFormData::default();
                let message = body.message.unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.into());
                SubmissionStatus::Success(message)
            }
            Ok(ContactReply { ok: false, body }) => {
                let error = body.error.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.into());
                SubmissionStatus::Error(error)
            }
            Err(e) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Contact submission error"
                );
                SubmissionStatus::Error(NETWORK_ERROR_MESSAGE.into())
            }
        };
    }

    /// Runs a whole submission against `client` and returns the resulting status.
    pub async fn submit(&mut self, client: &ContactClient) -> &SubmissionStatus {
        let Some(payload) = self.begin_submission() else {
            return &self.status;
        };

        let submission_id = Uuid::new_v4();
        let outcome = client
            .send(&payload)
            .instrument(tracing::info_span!("Contact form submission", %submission_id))
            .await;

        self.finish_submission(outcome);
        &self.status
    }
}
