use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use folio::{
    configuration::get_configuration,
    contact_client::ContactClient,
    domain::{MailComposer, MailMessage},
    mail_transport::{MailTransport, MailTransportError, SmtpMailer},
    telemetry::{get_subscriber, init_subscriber},
};
use once_cell::sync::Lazy;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

/// Stands in for the SMTP relay: keeps every message it is asked to deliver.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
    attempts: AtomicUsize,
    failing: AtomicBool,
}

impl RecordingMailer {
    pub fn fail_deliveries(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailTransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("Connection reset by the relay").into());
        }

        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub address: String,
    pub mailer: Arc<RecordingMailer>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_contact(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/contact", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_raw_contact(&self, body: &'static str) -> reqwest::Response {
        self.post_contact_as(body, Some("application/json")).await
    }

    pub async fn post_contact_as(
        &self,
        body: &'static str,
        content_type: Option<&str>,
    ) -> reqwest::Response {
        let mut request = self
            .api_client
            .post(format!("{}/api/contact", &self.address))
            .body(body);
        if let Some(content_type) = content_type {
            request = request.header("Content-Type", content_type);
        }

        request.send().await.expect("Failed to execute request.")
    }

    pub fn contact_client(&self) -> ContactClient {
        ContactClient::new(&self.address, Duration::from_secs(5))
            .expect("Failed to build the contact client.")
    }
}

fn spawn_with(mailer: Arc<dyn MailTransport>) -> String {
    let config = get_configuration().expect("Failed to read configuration");
    let composer =
        MailComposer::new(config.email.routing()).expect("Failed to build the mail composer.");

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port.");
    let port = listener.local_addr().unwrap().port();
    let server =
        folio::startup::run(listener, mailer, composer).expect("Failed to bind address.");

    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{port}")
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let mailer = Arc::new(RecordingMailer::default());
    let address = spawn_with(mailer.clone());

    TestApp {
        address,
        mailer,
        api_client: reqwest::Client::new(),
    }
}

/// Spawns the app with the real SMTP mailer aimed at a port nobody listens on.
pub async fn spawn_app_with_unreachable_relay() -> String {
    Lazy::force(&TRACING);

    let mut config = get_configuration().expect("Failed to read configuration");
    let closed = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port.");
    config.email.smtp_host = "127.0.0.1".into();
    config.email.smtp_port = closed.local_addr().unwrap().port();
    config.email.require_tls = false;
    config.email.timeout_ms = 2_000;
    drop(closed);

    let mailer = SmtpMailer::new(&config.email).expect("Failed to build the SMTP mailer.");
    spawn_with(Arc::new(mailer))
}
