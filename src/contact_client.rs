use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Url};

use crate::domain::{ContactFormData, ContactResponse};

/// What the contact endpoint answered: whether the status was 2xx, plus its JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactReply {
    pub ok: bool,
    pub body: ContactResponse,
}

#[derive(Debug, Clone)]
pub struct ContactClient {
    http_client: Client,
    endpoint: Url,
}

impl ContactClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, anyhow::Error> {
        let endpoint = Url::parse(base_url)
            .and_then(|url| url.join("/api/contact"))
            .with_context(|| format!("`{base_url}` is not a valid base url."))?;
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the HTTP client.")?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Posts `form` as JSON. Non-2xx answers are still `Ok`; only transport
    /// failures and unreadable bodies are errors.
    #[tracing::instrument(name = "Posting the contact form", skip(self, form))]
    pub async fn send(&self, form: &ContactFormData) -> Result<ContactReply, reqwest::Error> {
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(form)
            .send()
            .await?;

        let ok = response.status().is_success();
        let body = response.json::<ContactResponse>().await?;

        Ok(ContactReply { ok, body })
    }
}
