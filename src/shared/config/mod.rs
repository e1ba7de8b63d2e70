//! Reporter configuration module
//!
//! Provides the configuration consumed by the error reporter. It is resolved
//! once at startup (from the environment or a TOML file) and then handed to
//! `ErrorReporter::builder`; nothing on the reporting path reads global
//! configuration at call time.
//!
//! A missing webhook URL is not an error: it disables the remote channel.

use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

/// Display name used by the remote channel for posted incidents
pub const DEFAULT_REPORTER_NAME: &str = "Mc-Auth.org (Error-Reporter)";

/// Avatar shown next to posted incidents
pub const DEFAULT_AVATAR_URL: &str =
    "https://cdn.discordapp.com/attachments/541917740135350272/743868648611119204/Mc-Auth-4096px.png";

pub const DEFAULT_SERVICE_NAME: &str = "MC-Auth.org";
pub const DEFAULT_HOMEPAGE: &str = "https://github.com/Mc-Auth-com/Mc-Auth-Web#readme";

/// Remote submissions allowed per budget window
pub const DEFAULT_SUBMISSION_QUOTA: u32 = 10;

/// Length of a budget window
pub const DEFAULT_REFILL_WINDOW: Duration = Duration::from_secs(60);

/// Error reporter configuration
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Service name placed at the start of the User-Agent
    pub service_name: String,
    /// Service version placed in the User-Agent
    pub app_version: String,
    /// Documentation link appended to the User-Agent
    pub homepage: String,
    /// Webhook endpoint; `None` disables remote reporting
    pub webhook_url: Option<Url>,
    /// Display name of the reporting identity
    pub reporter_name: String,
    /// Avatar of the reporting identity
    pub avatar_url: String,
    /// Remote submissions allowed per window
    pub submission_quota: u32,
    /// How often the budget is refilled; `None` never refills
    pub refill_window: Option<Duration>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            homepage: DEFAULT_HOMEPAGE.to_string(),
            webhook_url: None,
            reporter_name: DEFAULT_REPORTER_NAME.to_string(),
            avatar_url: DEFAULT_AVATAR_URL.to_string(),
            submission_quota: DEFAULT_SUBMISSION_QUOTA,
            refill_window: Some(DEFAULT_REFILL_WINDOW),
        }
    }
}

impl ReporterConfig {
    /// Create a new ReporterConfigBuilder
    pub fn builder() -> ReporterConfigBuilder {
        ReporterConfigBuilder::default()
    }

    /// Whether incidents can be sent to a remote channel at all
    pub fn remote_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Load configuration from environment variables
    ///
    /// | Variable                    | Meaning                               |
    /// |-----------------------------|---------------------------------------|
    /// | `ERROR_WEBHOOK_URL`         | Webhook endpoint (unset = disabled)   |
    /// | `APP_VERSION`               | Version in the User-Agent             |
    /// | `ERROR_WEBHOOK_QUOTA`       | Submissions per window                |
    /// | `ERROR_WEBHOOK_REFILL_SECS` | Window length, `0` disables refilling |
    ///
    /// Empty values are treated as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();

        if let Some(url) = env_var("ERROR_WEBHOOK_URL") {
            builder = builder.webhook_url(&url)?;
        }
        if let Some(version) = env_var("APP_VERSION") {
            builder = builder.app_version(version);
        }
        if let Some(quota) = env_var("ERROR_WEBHOOK_QUOTA") {
            builder = builder.submission_quota(parse_number("ERROR_WEBHOOK_QUOTA", &quota)?);
        }
        if let Some(secs) = env_var("ERROR_WEBHOOK_REFILL_SECS") {
            builder = builder.refill_secs(parse_number("ERROR_WEBHOOK_REFILL_SECS", &secs)?);
        }

        builder.build()
    }

    /// Parse configuration from a TOML document
    ///
    /// ```toml
    /// [reporting]
    /// webhook_url = "https://discord.com/api/webhooks/..."
    /// app_version = "2.1.0"
    /// submission_quota = 10
    /// refill_secs = 60
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(input)?;
        let section = file.reporting;
        let mut builder = Self::builder();

        if let Some(url) = section.webhook_url.filter(|url| !url.is_empty()) {
            builder = builder.webhook_url(&url)?;
        }
        if let Some(version) = section.app_version {
            builder = builder.app_version(version);
        }
        if let Some(name) = section.service_name {
            builder = builder.service_name(name);
        }
        if let Some(homepage) = section.homepage {
            builder = builder.homepage(homepage);
        }
        if let Some(name) = section.reporter_name {
            builder = builder.reporter_name(name);
        }
        if let Some(avatar) = section.avatar_url {
            builder = builder.avatar_url(avatar);
        }
        if let Some(quota) = section.submission_quota {
            builder = builder.submission_quota(quota);
        }
        if let Some(secs) = section.refill_secs {
            builder = builder.refill_secs(secs);
        }

        builder.build()
    }

    /// Read and parse a TOML configuration file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

/// Builder for ReporterConfig
#[derive(Debug, Default)]
pub struct ReporterConfigBuilder {
    service_name: Option<String>,
    app_version: Option<String>,
    homepage: Option<String>,
    webhook_url: Option<Url>,
    reporter_name: Option<String>,
    avatar_url: Option<String>,
    submission_quota: Option<u32>,
    refill_window: Option<Option<Duration>>,
}

impl ReporterConfigBuilder {
    /// Set the webhook URL, validating it
    pub fn webhook_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(url).map_err(|_| ConfigError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }
        self.webhook_url = Some(parsed);
        Ok(self)
    }

    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = Some(version.into());
        self
    }

    pub fn homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = Some(homepage.into());
        self
    }

    pub fn reporter_name(mut self, name: impl Into<String>) -> Self {
        self.reporter_name = Some(name.into());
        self
    }

    pub fn avatar_url(mut self, avatar: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar.into());
        self
    }

    pub fn submission_quota(mut self, quota: u32) -> Self {
        self.submission_quota = Some(quota);
        self
    }

    /// Set the refill window; `None` never refills
    pub fn refill_window(mut self, window: Option<Duration>) -> Self {
        self.refill_window = Some(window);
        self
    }

    /// Set the refill window in seconds, `0` disables refilling
    pub fn refill_secs(self, secs: u64) -> Self {
        let window = (secs > 0).then(|| Duration::from_secs(secs));
        self.refill_window(window)
    }

    /// Build the configuration
    pub fn build(self) -> Result<ReporterConfig, ConfigError> {
        let defaults = ReporterConfig::default();

        let app_version = self.app_version.unwrap_or(defaults.app_version);
        if app_version.trim().is_empty() {
            return Err(ConfigError::MissingValue("app_version"));
        }

        Ok(ReporterConfig {
            service_name: self.service_name.unwrap_or(defaults.service_name),
            app_version,
            homepage: self.homepage.unwrap_or(defaults.homepage),
            webhook_url: self.webhook_url,
            reporter_name: self.reporter_name.unwrap_or(defaults.reporter_name),
            avatar_url: self.avatar_url.unwrap_or(defaults.avatar_url),
            submission_quota: self.submission_quota.unwrap_or(defaults.submission_quota),
            refill_window: self.refill_window.unwrap_or(defaults.refill_window),
        })
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    reporting: ReportingSection,
}

#[derive(Debug, Default, Deserialize)]
struct ReportingSection {
    webhook_url: Option<String>,
    app_version: Option<String>,
    service_name: Option<String>,
    homepage: Option<String>,
    reporter_name: Option<String>,
    avatar_url: Option<String>,
    submission_quota: Option<u32>,
    refill_secs: Option<u64>,
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
