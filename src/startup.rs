use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::domain::MailComposer;
use crate::mail_transport::{MailTransport, SmtpMailer};
use crate::routes::{contact_payload_error, health_check, submit_contact};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let mailer = SmtpMailer::new(&config.email).context("Failed to set up the SMTP relay.")?;
        let composer = MailComposer::new(config.email.routing())
            .context("Failed to compile the contact email template.")?;

        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener =
            TcpListener::bind(&address).with_context(|| format!("Failed to bind {address}."))?;
        let port = listener.local_addr()?.port();
        let server = run(listener, Arc::new(mailer), composer)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    mailer: Arc<dyn MailTransport>,
    composer: MailComposer,
) -> Result<Server, std::io::Error> {
    let mailer: web::Data<dyn MailTransport> = web::Data::from(mailer);
    let composer = web::Data::new(composer);
    // The form posts JSON whatever content type the browser attaches.
    let json_config = web::JsonConfig::default()
        .content_type_required(false)
        .content_type(|_| true)
        .error_handler(contact_payload_error);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(json_config.clone())
            .route("/health_check", web::get().to(health_check))
            .route("/api/contact", web::post().to(submit_contact))
            .app_data(mailer.clone())
            .app_data(composer.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
