use std::time::Duration;

use secrecy::SecretString;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::MailRouting;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email: EmailSettings,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

/// SMTP relay credentials and the addresses contact messages are routed through.
///
/// `username` doubles as the sender and the default recipient. With
/// `require_tls`, port 587 negotiates STARTTLS and any other port wraps the
/// connection in TLS from the start.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct EmailSettings {
    pub smtp_host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub smtp_port: u16,
    pub require_tls: bool,
    pub username: String,
    pub password: SecretString,
    pub from_name: String,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub cc: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_ms: u64,
}

impl EmailSettings {
    pub fn routing(&self) -> MailRouting {
        let cc = self
            .cc
            .as_deref()
            .map(str::trim)
            .filter(|cc| !cc.is_empty())
            .map(ToOwned::to_owned);

        MailRouting {
            from_name: self.from_name.clone(),
            from_address: self.username.clone(),
            to: self
                .recipient
                .clone()
                .unwrap_or_else(|| self.username.clone()),
            cc,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn uses_starttls(&self) -> bool {
        self.require_tls && self.smtp_port == SUBMISSION_PORT
    }
}

const SUBMISSION_PORT: u16 = 587;

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "{other} is not supported environment. Try to use `local` or `production`",
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine current directory: {e}"))
    })?;
    let conf_dir = base_path.join("configuration");
    let env: Environment = std::env::var("APP_ENV")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let settings = config::Config::builder()
        .add_source(
            config::File::with_name(&conf_dir.join("base").to_string_lossy()).required(true),
        )
        .add_source(
            config::File::with_name(&conf_dir.join(env.as_str()).to_string_lossy())
                .required(true),
        )
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .prefix_separator("_"),
        )
        // Variables the portfolio deployment has always been configured with.
        .set_override_option("email.username", std::env::var("EMAIL_USER").ok())?
        .set_override_option("email.password", std::env::var("EMAIL_PASS").ok())?
        .set_override_option("email.cc", std::env::var("EMAIL_CC").ok())?
        .build()?;

    settings.try_deserialize::<Settings>()
}
