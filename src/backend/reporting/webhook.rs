//! Remote Channel Client
//!
//! This module posts incidents to a Discord-style webhook. Each incident
//! becomes one message with a single embed carrying the HTTP code, the
//! public message and the internal details.
//!
//! The client does not retry and imposes no timeout of its own; reqwest's
//! connection defaults apply. Callers never await it for correctness: the
//! remote worker awaits it and only logs the outcome.

use std::str::FromStr;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, Url};
use serde::Serialize;

use crate::shared::{Details, ReporterConfig, ReportingError};

/// Embed title for every posted incident
pub const INCIDENT_TITLE: &str = "An error occurred";

/// Response header carrying the endpoint's remaining request allowance
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Response header carrying the seconds until the endpoint's limit resets
pub const RATE_LIMIT_RESET_AFTER_HEADER: &str = "x-ratelimit-reset-after";

/// One error occurrence queued for the remote channel
#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    pub http_code: u16,
    pub message: String,
    pub details: Option<Details>,
}

/// Outcome of a completed webhook request
#[derive(Debug, Clone)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
    /// Value of `X-RateLimit-Remaining`, when the endpoint sent one
    pub rate_limit_remaining: Option<u32>,
    /// Value of `X-RateLimit-Reset-After`, when the endpoint sent one
    pub rate_limit_reset_after: Option<Duration>,
}

/// Request body accepted by the webhook endpoint
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub username: String,
    pub avatar_url: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Embed {
    pub title: String,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
}

/// HTTP client for the remote incident channel
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    endpoint: Url,
    user_agent: String,
    username: String,
    avatar_url: String,
}

impl WebhookClient {
    /// Create a client for `endpoint` using the identity from `config`
    pub fn new(endpoint: Url, config: &ReporterConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            user_agent: user_agent(&config.service_name, &config.app_version, &config.homepage),
            username: config.reporter_name.clone(),
            avatar_url: config.avatar_url.clone(),
        }
    }

    /// Create a client from the configured webhook URL, if there is one
    pub fn from_config(config: &ReporterConfig) -> Option<Self> {
        config
            .webhook_url
            .clone()
            .map(|endpoint| Self::new(endpoint, config))
    }

    /// Use a preconfigured reqwest client (proxies, timeouts)
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Build the JSON body for an incident
    pub fn payload(&self, incident: &Incident) -> WebhookPayload {
        WebhookPayload {
            username: self.username.clone(),
            avatar_url: self.avatar_url.clone(),
            embeds: vec![Embed {
                title: INCIDENT_TITLE.to_string(),
                fields: vec![
                    EmbedField {
                        name: "HTTP-Code".to_string(),
                        value: serde_json::Value::from(incident.http_code),
                        inline: Some(true),
                    },
                    EmbedField {
                        name: "Message".to_string(),
                        value: serde_json::Value::from(incident.message.as_str()),
                        inline: Some(true),
                    },
                    EmbedField {
                        name: "Details".to_string(),
                        value: serde_json::Value::from(render_details(incident.details.as_ref())),
                        inline: None,
                    },
                ],
            }],
        }
    }

    /// Post an incident and read back the endpoint's response
    ///
    /// A non-success status is still a completed request and is returned
    /// as `Ok`; only transport failures are errors.
    pub async fn submit(&self, incident: &Incident) -> Result<WebhookResponse, ReportingError> {
        let body = serde_json::to_vec(&self.payload(incident))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("User-Agent", &self.user_agent)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let rate_limit_remaining = header_value::<u32>(response.headers(), RATE_LIMIT_REMAINING_HEADER);
        let rate_limit_reset_after = header_value::<f64>(response.headers(), RATE_LIMIT_RESET_AFTER_HEADER)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok());
        let body = response.text().await?;

        Ok(WebhookResponse {
            status,
            body,
            rate_limit_remaining,
            rate_limit_reset_after,
        })
    }
}

fn header_value<T: FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<T>().ok())
}

/// Render internal details as a fenced JSON block, or `-` when absent
pub fn render_details(details: Option<&Details>) -> String {
    let Some(details) = details else {
        return "-".to_string();
    };

    let pretty = serde_json::to_string_pretty(details)
        .unwrap_or_else(|e| format!("<unserializable details: {}>", e));
    // Escaped newlines inside string values read better as real line breaks.
    let pretty = pretty.replace("\\r\\n", "\n").replace("\\n", "\n");

    format!("```JS\n{}\n```", pretty)
}

/// `<service>/<version> (<os type>; <arch>; <platform>) (+<homepage>)`
pub fn user_agent(service_name: &str, version: &str, homepage: &str) -> String {
    format!(
        "{}/{} ({}; {}; {}) (+{})",
        service_name,
        version,
        os_type(),
        std::env::consts::ARCH,
        std::env::consts::OS,
        homepage
    )
}

fn os_type() -> &'static str {
    match std::env::consts::OS {
        "linux" | "android" => "Linux",
        "macos" | "ios" => "Darwin",
        "windows" => "Windows_NT",
        "freebsd" => "FreeBSD",
        "openbsd" => "OpenBSD",
        "netbsd" => "NetBSD",
        other => other,
    }
}
