// Agencies API HTTP client.
// Holds an explicit client configuration and classifies transport failures.

use std::error::Error as StdError;
use std::io;
use std::str::FromStr;
use std::time::Instant;

use reqwest::{
    Client, Response, Url,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use tracing::info;

use crate::error::{ApiError, KickstartError};

pub const DEFAULT_BASE_URL: &str = "https://api.metro.net/";
const USER_AGENT: &str = concat!("kickstart/", env!("CARGO_PKG_VERSION"));

/// How much of each HTTP exchange is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpLogLevel {
    None,
    /// Method, URL, status and elapsed time.
    Basic,
    /// Basic plus the response body.
    #[default]
    Body,
}

impl FromStr for HttpLogLevel {
    type Err = KickstartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(HttpLogLevel::None),
            "basic" => Ok(HttpLogLevel::Basic),
            "body" => Ok(HttpLogLevel::Body),
            other => Err(KickstartError::Config(format!(
                "unknown HTTP log level '{}' (expected none, basic or body)",
                other
            ))),
        }
    }
}

/// Client settings, built once and handed to [`MetroClient::new`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL; always ends with a slash so endpoints join beneath it.
    pub base_url: Url,
    pub http_log: HttpLogLevel,
}

impl ClientConfig {
    pub fn new(base_url: &str, http_log: HttpLogLevel) -> Result<Self, KickstartError> {
        let mut raw = base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }

        let parsed = Url::parse(&raw).map_err(|e| {
            KickstartError::Config(format!("invalid base URL '{}': {}", base_url, e))
        })?;

        Ok(Self {
            base_url: parsed,
            http_log,
        })
    }
}

/// HTTP client for the LA Metro API.
pub struct MetroClient {
    client: Client,
    config: ClientConfig,
}

impl MetroClient {
    pub fn new(config: ClientConfig) -> Result<Self, KickstartError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self { client, config })
    }

    /// Make a GET request relative to the base URL.
    pub async fn get(&self, endpoint: &str) -> Result<Response, ApiError> {
        let url = self
            .config
            .base_url
            .join(endpoint)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        let started = Instant::now();
        if self.config.http_log != HttpLogLevel::None {
            info!(method = "GET", %url, "--> request");
        }

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify(e, &url))?;

        if self.config.http_log != HttpLogLevel::None {
            info!(
                status = %response.status(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                %url,
                "<-- response"
            );
        }

        check_response(response).await
    }

    /// Log a buffered response body when body logging is on.
    pub(crate) fn log_body(&self, body: &str) {
        if self.config.http_log == HttpLogLevel::Body {
            info!(bytes = body.len(), body, "<-- body");
        }
    }
}

/// Only DNS failures and refused or unroutable connects mean the host is
/// unreachable. A host that answers but fails TLS is a transport error.
fn classify(err: reqwest::Error, url: &Url) -> ApiError {
    if host_unreachable(&err) {
        ApiError::NetworkUnavailable {
            host: url.host_str().unwrap_or_default().to_string(),
            reason: err.to_string(),
        }
    } else {
        ApiError::Transport(err)
    }
}

fn host_unreachable(err: &reqwest::Error) -> bool {
    if !err.is_connect() {
        return false;
    }

    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<io::Error>()
            && matches!(
                io.kind(),
                io::ErrorKind::ConnectionRefused
                    | io::ErrorKind::HostUnreachable
                    | io::ErrorKind::NetworkUnreachable
            )
        {
            return true;
        }

        // hyper-util reports resolver failures as "dns error", the
        // getaddrinfo io::Error underneath carries no specific kind
        let message = cause.to_string();
        if message.contains("dns error") || message.contains("failed to lookup address") {
            return true;
        }
        source = cause.source();
    }
    false
}

/// Check response status and convert errors.
async fn check_response(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(ApiError::Status {
        status,
        body: response.text().await.unwrap_or_default(),
    })
}
