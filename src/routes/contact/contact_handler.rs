use actix_web::{HttpResponse, web};
use anyhow::Context;

use crate::{
    domain::{ContactFormData, ContactResponse, ContactSubmission, MailComposer},
    mail_transport::MailTransport,
};

use super::errors::ContactError;

pub const CONFIRMATION_MESSAGE: &str = "Thank you for your message! I will get back to you soon.";

#[tracing::instrument(
    name = "Relaying a portfolio contact message",
    skip(form, mailer, composer),
    fields(
        visitor_name = tracing::field::Empty,
        visitor_email = tracing::field::Empty
    )
)]
pub async fn submit_contact(
    form: web::Json<ContactFormData>,
    mailer: web::Data<dyn MailTransport>,
    composer: web::Data<MailComposer>,
) -> Result<HttpResponse, ContactError> {
    let submission = ContactSubmission::try_from(form.into_inner())?;

    let span = tracing::Span::current();
    span.record("visitor_name", tracing::field::display(submission.name()));
    span.record("visitor_email", tracing::field::display(submission.email()));

    let message = composer
        .compose(&submission)
        .context("Failed to render the contact notification.")?;

    mailer.send(&message).await.map_err(|e| {
        tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "Failed to send the contact notification"
        );
        ContactError::MailTransportError(e)
    })?;

    Ok(HttpResponse::Ok().json(ContactResponse::sent(CONFIRMATION_MESSAGE)))
}
