use tera::{Context, Tera};

use super::ContactSubmission;

const NOTIFICATION_TEMPLATE: &str = "contact_notification.html";

/// Where contact notifications come from and go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailRouting {
    pub from_name: String,
    pub from_address: String,
    pub to: String,
    pub cc: Option<String>,
}

/// A fully rendered contact notification, ready for a mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from_name: String,
    pub from_address: String,
    pub to: String,
    pub cc: Option<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Turns validated submissions into notification emails.
///
/// The HTML template is compiled once at construction; `.html` templates are
/// autoescaped, so visitor input cannot inject markup into the notification.
pub struct MailComposer {
    routing: MailRouting,
    templates: Tera,
}

impl MailComposer {
    pub fn new(routing: MailRouting) -> Result<Self, tera::Error> {
        let mut templates = Tera::default();
        templates.add_raw_template(
            NOTIFICATION_TEMPLATE,
            include_str!("../../views/contact_notification.html"),
        )?;

        Ok(Self { routing, templates })
    }

    pub fn compose(&self, submission: &ContactSubmission) -> Result<MailMessage, tera::Error> {
        let mut ctx = Context::new();
        ctx.insert("name", submission.name());
        ctx.insert("email", submission.email());
        ctx.insert("message", submission.message());
        let html_body = self.templates.render(NOTIFICATION_TEMPLATE, &ctx)?;

        Ok(MailMessage {
            from_name: self.routing.from_name.clone(),
            from_address: self.routing.from_address.clone(),
            to: self.routing.to.clone(),
            cc: self.routing.cc.clone(),
            subject: format!("Portfolio Contact from {}", submission.name()),
            text_body: get_text_body(submission),
            html_body,
        })
    }
}

fn get_text_body(submission: &ContactSubmission) -> String {
    format!(
        "Name: {}\nEmail: {}\n\nMessage:\n{}",
        submission.name(),
        submission.email(),
        submission.message()
    )
}
