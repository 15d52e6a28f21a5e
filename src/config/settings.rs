use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::attachment::{AttachmentLimits, DEFAULT_MAX_ATTACHMENT_BYTES};
use crate::provider::AcsClientConfig;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub attachments: AttachmentConfig,
    #[serde(default)]
    pub acs: AcsConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on request bodies; base64 attachments make these large
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailConfig {
    /// Used when a request carries no sender address
    #[serde(default)]
    pub default_sender_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentConfig {
    #[serde(default = "default_attachment_bytes")]
    pub max_attachment_bytes: u64,
    #[serde(default = "default_attachment_bytes")]
    pub max_total_bytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AcsConfig {
    /// e.g. https://my-resource.communication.azure.com
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    64 * 1024 * 1024 // 64 MiB
}

fn default_attachment_bytes() -> u64 {
    DEFAULT_MAX_ATTACHMENT_BYTES
}

fn default_api_version() -> String {
    "2023-03-31".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_poll_attempts() -> u32 {
    30
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("server.max_body_bytes", default_max_body_bytes() as u64)?
            .set_default("attachments.max_attachment_bytes", DEFAULT_MAX_ATTACHMENT_BYTES)?
            .set_default("attachments.max_total_bytes", DEFAULT_MAX_ATTACHMENT_BYTES)?
            .set_default("acs.api_version", default_api_version())?
            .set_default("acs.poll_interval_ms", default_poll_interval_ms())?
            .set_default("acs.max_poll_attempts", default_max_poll_attempts())?
            .set_default("acs.request_timeout_secs", default_request_timeout_secs())?
            .set_default("log.format", "pretty")?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // APP__SERVER__PORT, APP__ACS__ENDPOINT, etc.
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            // Well-known deployment variables win over everything else
            .set_override_option("email.default_sender_address", non_blank_env("DEFAULT_SENDER_ADDRESS"))?
            .set_override_option("acs.endpoint", non_blank_env("ACS_ENDPOINT"))?
            .set_override_option("acs.access_token", non_blank_env("ACS_ACCESS_TOKEN"))?
            .set_override_option("server.port", non_blank_env("FUNCTIONS_CUSTOMHANDLER_PORT"))?;

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn attachment_limits(&self) -> AttachmentLimits {
        AttachmentLimits {
            max_attachment_bytes: self.attachments.max_attachment_bytes,
            max_total_bytes: self.attachments.max_total_bytes,
        }
    }

    pub fn default_sender(&self) -> Option<String> {
        self.email
            .default_sender_address
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// `None` when no endpoint is configured
    pub fn acs_client_config(&self) -> Option<AcsClientConfig> {
        let endpoint = self.acs.endpoint.as_deref().map(str::trim).filter(|e| !e.is_empty())?;

        Some(AcsClientConfig {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token: self.acs.access_token.clone().filter(|t| !t.trim().is_empty()),
            api_version: self.acs.api_version.clone(),
            poll_interval: Duration::from_millis(self.acs.poll_interval_ms),
            max_poll_attempts: self.acs.max_poll_attempts,
            request_timeout: Duration::from_secs(self.acs.request_timeout_secs),
        })
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            max_attachment_bytes: default_attachment_bytes(),
            max_total_bytes: default_attachment_bytes(),
        }
    }
}

impl Default for AcsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            access_token: None,
            api_version: default_api_version(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server_addr(), "0.0.0.0:8080");
        assert_eq!(settings.attachments.max_attachment_bytes, 25 * 1024 * 1024);
        assert_eq!(settings.acs.api_version, "2023-03-31");
        assert_eq!(settings.log.format, LogFormat::Pretty);
    }

    #[test]
    fn test_acs_client_config_requires_endpoint() {
        let mut settings = Settings::default();
        assert!(settings.acs_client_config().is_none());

        settings.acs.endpoint = Some("   ".into());
        assert!(settings.acs_client_config().is_none());

        settings.acs.endpoint = Some("https://contoso.communication.azure.com/".into());
        settings.acs.access_token = Some("token".into());
        let client = settings.acs_client_config().unwrap();
        assert_eq!(client.endpoint, "https://contoso.communication.azure.com");
        assert_eq!(client.access_token.as_deref(), Some("token"));
        assert_eq!(client.poll_interval, Duration::from_secs(1));
        assert_eq!(client.max_poll_attempts, 30);
    }

    #[test]
    fn test_default_sender_ignores_blank() {
        let mut settings = Settings::default();
        settings.email.default_sender_address = Some("  ".into());
        assert!(settings.default_sender().is_none());

        settings.email.default_sender_address = Some(" alerts@contoso.com ".into());
        assert_eq!(settings.default_sender().as_deref(), Some("alerts@contoso.com"));
    }

    #[test]
    fn test_attachment_limits() {
        let mut settings = Settings::default();
        settings.attachments.max_total_bytes = 1024;
        let limits = settings.attachment_limits();
        assert_eq!(limits.max_attachment_bytes, DEFAULT_MAX_ATTACHMENT_BYTES);
        assert_eq!(limits.max_total_bytes, 1024);
    }

    #[test]
    fn test_log_format_deserializes_lowercase() {
        let config: LogConfig = serde_json::from_str(r#"{"format": "json"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
    }
}
