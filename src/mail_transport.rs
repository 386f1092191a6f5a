use async_trait::async_trait;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    address::AddressError,
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
};
use secrecy::ExposeSecret;

use crate::{configuration::EmailSettings, domain::MailMessage};

#[derive(thiserror::Error, Debug)]
pub enum MailTransportError {
    #[error("`{address}` is not a valid mailbox.")]
    InvalidMailbox {
        address: String,
        #[source]
        source: AddressError,
    },
    #[error("Failed to assemble the email.")]
    Assembly(#[from] lettre::error::Error),
    #[error("The SMTP relay did not accept the email.")]
    Delivery(#[from] lettre::transport::smtp::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Outbound delivery of contact notifications.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailTransportError>;
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &EmailSettings) -> Result<Self, MailTransportError> {
        let transport = if settings.require_tls {
            let starttls = settings.uses_starttls();
            tracing::info!(
                smtp_host = %settings.smtp_host,
                smtp_port = settings.smtp_port,
                starttls,
                "Using an authenticated TLS connection to the SMTP relay"
            );
            let credentials = Credentials::new(
                settings.username.clone(),
                settings.password.expose_secret().to_owned(),
            );
            let builder = if starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)?
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)?
            };
            builder
                .port(settings.smtp_port)
                .credentials(credentials)
                .timeout(Some(settings.timeout()))
                .build()
        } else {
            tracing::info!(
                smtp_host = %settings.smtp_host,
                smtp_port = settings.smtp_port,
                "Using an unencrypted, unauthenticated SMTP connection"
            );
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.smtp_host)
                .port(settings.smtp_port)
                .timeout(Some(settings.timeout()))
                .build()
        };

        Ok(Self { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    #[tracing::instrument(
        name = "Sending email through SMTP",
        skip(self, message),
        fields(subject = %message.subject)
    )]
    async fn send(&self, message: &MailMessage) -> Result<(), MailTransportError> {
        let email = build_email(message)?;
        let response = self.transport.send(email).await?;

        tracing::info!(code = %response.code(), "Email accepted by the SMTP relay");
        Ok(())
    }
}

fn parse_address(address: &str) -> Result<Address, MailTransportError> {
    address
        .parse()
        .map_err(|source| MailTransportError::InvalidMailbox {
            address: address.to_owned(),
            source,
        })
}

pub fn build_email(message: &MailMessage) -> Result<Message, MailTransportError> {
    let from = Mailbox::new(
        Some(message.from_name.clone()),
        parse_address(&message.from_address)?,
    );
    let to = Mailbox::new(None, parse_address(&message.to)?);

    let mut builder = Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.as_str());

    if let Some(cc) = &message.cc {
        builder = builder.cc(Mailbox::new(None, parse_address(cc)?));
    }

    let email = builder.multipart(MultiPart::alternative_plain_html(
        message.text_body.clone(),
        message.html_body.clone(),
    ))?;

    Ok(email)
}
