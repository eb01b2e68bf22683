use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use config::{Config, Environment, File};

use secrecy::{ExposeSecret, Secret};

use serde::Deserialize;
use serde_aux::prelude::*;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

use thiserror::Error;

use url::Url;

use crate::domain::EmailAddress;

/// Values shipped in example configuration that must be replaced before deploying
const PLACEHOLDER_PREFIX: &str = "YOUR_";

/// Runtime environment, either `Dev` for local development, or `Prod` for release
#[derive(Debug)]
pub enum Runtime {
    Dev,
    Prod,
}

impl Runtime {
    pub fn as_str(&self) -> &str {
        match self {
            Runtime::Dev => "dev",
            Runtime::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Runtime {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => anyhow::bail!("{} is not a valid runtime environment", other),
        }
    }
}

/// A required setting that is absent, a placeholder, or unparseable
#[derive(Debug, Error)]
pub enum SettingError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{0} is still set to a placeholder value")]
    Placeholder(&'static str),

    #[error("{0} is malformed: {1}")]
    Malformed(&'static str, String),
}

/// Application settings wrapper
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub backend: BackendSettings,
    pub database: DatabaseSettings,
    pub email: EmailSettings,
}

impl Settings {
    /// Load application settings from the settings directory
    pub fn load() -> anyhow::Result<Self> {
        // Get the path to the settings directory
        let path = env::current_dir()?.join("settings");
        // Get the current environment based on the `APP_ENV` environment variable, default to `Dev`
        let runtime: Runtime = env::var("APP_ENV")
            .unwrap_or_else(|_| "dev".into())
            .try_into()?;

        Self::load_from(runtime, &path)
    }
    /// Load application settings from a specified path and runtime
    pub fn load_from(runtime: Runtime, base_path: &Path) -> anyhow::Result<Self> {
        Config::builder()
            // Include the base settings
            .add_source(File::from(base_path.join("base")).required(true))
            // Include the runtime settings
            .add_source(File::from(base_path.join(runtime.as_str())).required(true))
            // Override/include any settings from environment variables
            // NOTE: Should be used for any prod secrets. Takes the form `APP_<settings category>__<setting name>`.
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .context("Failed to load/deserialize settings")
    }
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,
    /// Default tracing filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

fn default_log_filter() -> String {
    "info".into()
}

impl ApplicationSettings {
    /// The application address to bind to
    pub fn addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}

/// Which delivery backend a deployment uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Store submissions in Postgres
    Database,
    /// Relay submissions to the site owner through the email API
    Email,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => f.write_str("database"),
            Self::Email => f.write_str("email"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BackendSettings {
    pub kind: BackendKind,
    /// Refuse to start when the selected backend is not fully configured
    #[serde(default)]
    pub require_configured: bool,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// `postgres://` connection string, usually supplied via `APP_DATABASE__URL`
    url: Option<Secret<String>>,
    name: Option<String>,
    #[serde(default)]
    require_ssl: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    acquire_timeout_milliseconds: u64,
}

impl DatabaseSettings {
    /// The validated database connection options
    pub fn connect_options(&self) -> Result<PgConnectOptions, SettingError> {
        let raw_url = required_secret(self.url.as_ref(), "database.url")?;
        let name = required(self.name.as_deref(), "database.name")?;

        // Parse errors are reported without echoing the connection string back
        let url = Url::parse(raw_url)
            .map_err(|e| SettingError::Malformed("database.url", e.to_string()))?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(SettingError::Malformed(
                "database.url",
                "scheme must be postgres:// or postgresql://".into(),
            ));
        }
        let options = PgConnectOptions::from_str(raw_url).map_err(|_| {
            SettingError::Malformed("database.url", "not a valid Postgres connection string".into())
        })?;

        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        Ok(options.database(name).ssl_mode(ssl_mode))
    }
    /// How long a request waits for a pooled connection
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_milliseconds)
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailSettings {
    sender: Option<String>,
    recipient: Option<String>,
    api_base_url: Option<String>,
    api_auth_token: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    api_timeout_milliseconds: u64,
}

impl EmailSettings {
    /// The email address to send application emails from
    pub fn sender(&self) -> Result<EmailAddress, SettingError> {
        parse_email(self.sender.as_deref(), "email.sender")
    }
    /// The site owner's address that receives relayed submissions
    pub fn recipient(&self) -> Result<EmailAddress, SettingError> {
        parse_email(self.recipient.as_deref(), "email.recipient")
    }
    /// The email REST API timeout duration
    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_milliseconds)
    }
    /// The base URL for the email REST service
    pub fn api_base_url(&self) -> Result<Url, SettingError> {
        let value = required(self.api_base_url.as_deref(), "email.api_base_url")?;
        Url::parse(value).map_err(|e| SettingError::Malformed("email.api_base_url", e.to_string()))
    }
    /// The authentication token to include when making email requests
    pub fn api_auth_token(&self) -> Result<Secret<String>, SettingError> {
        required_secret(self.api_auth_token.as_ref(), "email.api_auth_token")
            .map(|token| Secret::new(token.to_string()))
    }
}

fn required<'v>(value: Option<&'v str>, key: &'static str) -> Result<&'v str, SettingError> {
    let value = value.map(str::trim).unwrap_or_default();

    if value.is_empty() {
        return Err(SettingError::Missing(key));
    }
    if value.starts_with(PLACEHOLDER_PREFIX) {
        return Err(SettingError::Placeholder(key));
    }
    Ok(value)
}

fn required_secret<'v>(
    value: Option<&'v Secret<String>>,
    key: &'static str,
) -> Result<&'v str, SettingError> {
    required(value.map(|secret| secret.expose_secret().as_str()), key)
}

fn parse_email(value: Option<&str>, key: &'static str) -> Result<EmailAddress, SettingError> {
    required(value, key)?
        .parse()
        .map_err(|e| SettingError::Malformed(key, e))
}
