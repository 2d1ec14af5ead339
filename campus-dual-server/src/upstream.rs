//! Client for the Campus Dual timetable endpoint.
//!
//! The portal sits behind Cloudflare, which answers with 52x statuses when
//! the origin is slow or unreachable. Those are retried with a linear
//! backoff; everything else is handed back to the caller as-is.

use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER};
use reqwest::redirect::Policy;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};
use url::Url;

use crate::config::UpstreamSettings;
use crate::window::FetchWindow;

const TIMETABLE_PATH: &str = "/room/json";
const ACCEPT_VALUE: &str = "application/json, text/plain, */*";
const ACCEPT_LANGUAGE_VALUE: &str = "de-DE,de;q=0.9,en;q=0.8";
/// Characters of the body kept in a debug dump
const BODY_PREVIEW_CHARS: usize = 800;

pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    max_attempts: u32,
    retry_statuses: Vec<u16>,
    backoff: Duration,
}

/// A fully read upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Diagnostic JSON returned to the caller in debug mode.
    pub fn dump(&self, url: &Url) -> Value {
        let headers: Map<String, Value> = self
            .headers
            .iter()
            .map(|(name, value)| {
                let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
                (name.to_string(), Value::String(value))
            })
            .collect();

        json!({
            "requested_url": url.as_str(),
            "status": self.status.as_u16(),
            "status_text": self.status.canonical_reason().unwrap_or_default(),
            "headers": headers,
            "body_preview": String::from_utf8_lossy(&self.body)
                .chars()
                .take(BODY_PREVIEW_CHARS)
                .collect::<String>(),
        })
    }
}

impl UpstreamClient {
    pub fn new(settings: &UpstreamSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .http1_only()
            .redirect(Policy::none())
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build upstream HTTP client")?;

        Ok(UpstreamClient {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_attempts: settings.max_attempts.max(1),
            retry_statuses: settings.retry_statuses.clone(),
            backoff: Duration::from_millis(settings.retry_backoff_ms),
        })
    }

    /// Timetable URL for one student and window.
    ///
    /// `cache_buster` goes into the `_` parameter, like the portal's own
    /// frontend does, so intermediaries never serve a stale timetable.
    pub fn feed_url(
        &self,
        user: &str,
        hash: &str,
        window: FetchWindow,
        cache_buster: i64,
    ) -> Result<Url> {
        let start = window.start.to_string();
        let end = window.end.to_string();
        let cache_buster = cache_buster.to_string();

        Url::parse_with_params(
            &format!("{}{}", self.base_url, TIMETABLE_PATH),
            &[
                ("userid", user),
                ("hash", hash),
                ("start", start.as_str()),
                ("end", end.as_str()),
                ("_", cache_buster.as_str()),
            ],
        )
        .with_context(|| format!("Invalid upstream base URL: {}", self.base_url))
    }

    /// GET `url`, retrying transient edge failures.
    ///
    /// Returns the first response that is successful, a redirect or not
    /// retryable. When attempts run out, the last response or error is
    /// returned.
    pub async fn fetch(&self, url: &Url) -> reqwest::Result<UpstreamResponse> {
        let mut attempt = 1;
        loop {
            let result = self.get_once(url).await;

            let retry = match &result {
                Ok(response) => self.is_retryable(response.status),
                Err(err) => {
                    warn!(attempt, error = %err, "Upstream request failed");
                    true
                }
            };

            if !retry || attempt >= self.max_attempts {
                return result;
            }

            if let Ok(response) = &result {
                warn!(attempt, status = response.status.as_u16(), "Retrying upstream request");
            }
            tokio::time::sleep(self.backoff * attempt).await;
            attempt += 1;
        }
    }

    fn is_retryable(&self, status: StatusCode) -> bool {
        !status.is_success()
            && !status.is_redirection()
            && self.retry_statuses.contains(&status.as_u16())
    }

    /// Errors are stripped of the URL, which carries the caller's hash.
    async fn get_once(&self, url: &Url) -> reqwest::Result<UpstreamResponse> {
        debug!(host = url.host_str().unwrap_or_default(), "Requesting timetable");

        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, ACCEPT_VALUE)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE)
            .header(REFERER, format!("{}/", self.base_url))
            .header(ORIGIN, self.base_url.as_str())
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

/// Diagnostic JSON for a request that never produced a response.
pub fn transport_details(err: &reqwest::Error, url: &Url) -> Value {
    let mut causes = Vec::new();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = std::error::Error::source(cause);
    }

    json!({
        "requested_url": url.as_str(),
        "error": err.to_string(),
        "timeout": err.is_timeout(),
        "connect": err.is_connect(),
        "causes": causes,
    })
}
