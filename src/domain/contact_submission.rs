use serde_aux::field_attributes::deserialize_default_from_null;

/// Raw contact form payload, as typed by the visitor and sent over the wire.
///
/// Missing and `null` fields read as empty strings so they fail validation
/// the same way a blank input does.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormData {
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub message: String,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactValidationError {
    #[error("Name, email and message are required")]
    MissingFields,
    #[error("Please provide a valid email address")]
    InvalidEmail,
}

/// A contact form payload that passed validation.
///
/// Field values are kept exactly as submitted; trimming only decides emptiness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    name: String,
    email: String,
    message: String,
}

impl ContactSubmission {
    pub fn parse(data: ContactFormData) -> Result<Self, ContactValidationError> {
        let ContactFormData {
            name,
            email,
            message,
        } = data;

        if [&name, &email, &message]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(ContactValidationError::MissingFields);
        }

        // Only the presence of `@` is checked, matching what the form has always accepted.
        if !email.contains('@') {
            return Err(ContactValidationError::InvalidEmail);
        }

        Ok(Self {
            name,
            email,
            message,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl TryFrom<ContactFormData> for ContactSubmission {
    type Error = ContactValidationError;

    fn try_from(value: ContactFormData) -> Result<Self, Self::Error> {
        ContactSubmission::parse(value)
    }
}
