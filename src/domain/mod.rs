mod contact_response;
mod contact_submission;
mod mail_message;

pub use contact_response::ContactResponse;
pub use contact_submission::{ContactFormData, ContactSubmission, ContactValidationError};
pub use mail_message::{MailComposer, MailMessage, MailRouting};
