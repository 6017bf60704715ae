//! HTTP session for the B3 open data endpoints.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{user_agent::get_user_agent, Error};

/// Connection retry and deadline settings for a [`Session`].
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// How many times a failed connection attempt is retried.
    pub connect_retries: u32,
    /// Backoff multiplier in seconds. Retry `n` sleeps `factor * 2^(n-1)`,
    /// except the first retry which goes out immediately.
    pub backoff_factor: f64,
    /// Upper bound for a single backoff sleep.
    pub backoff_max: Duration,
    /// Deadline applied to every request.
    pub timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_retries: 5,
            backoff_factor: 1.0,
            backoff_max: Duration::from_secs(120),
            timeout: Duration::from_secs(30),
        }
    }
}

impl SessionConfig {
    /// Sleep before the given retry (1-based).
    pub fn backoff_for_retry(&self, retry: u32) -> Duration {
        if retry <= 1 || self.backoff_factor <= 0.0 {
            return Duration::ZERO;
        }
        let shift = (retry - 1).min(30) as i32;
        let secs = self.backoff_factor * 2f64.powi(shift);
        Duration::from_secs_f64(secs.min(self.backoff_max.as_secs_f64()))
    }
}

/// One logical HTTP session.
///
/// Holds a single `reqwest::Client` so connections are reused between the
/// requests of one fetch operation. The pool is released when the session is
/// dropped, so a session should be opened per operation and not shared
/// across unrelated fetches.
pub struct Session {
    http: reqwest::Client,
    config: SessionConfig,
}

impl Session {
    /// Opens a new session with the given settings.
    pub fn open(config: SessionConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Client(e)
            })?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Sends a GET request.
    ///
    /// Connection failures are retried up to `connect_retries` times. Any
    /// non-2xx status is returned as [`Error::HttpStatus`] without retrying.
    pub async fn get(&self, url: Url) -> Result<Response, Error> {
        let mut retry = 0u32;
        loop {
            tracing::debug!("Sending GET request to {}", url);
            match self.http.get(url.clone()).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    tracing::debug!("Response status code: {}", status);
                    if !status.is_success() {
                        tracing::error!("Request to {} failed with status {}", url, status);
                        return Err(Error::HttpStatus {
                            url: url.to_string(),
                            status: status.as_u16(),
                            reason: status.canonical_reason().unwrap_or_default().to_string(),
                        });
                    }
                    return Ok(resp);
                }
                Err(e) if e.is_connect() => {
                    retry += 1;
                    if retry > self.config.connect_retries {
                        tracing::error!("Giving up on {} after {} attempts: {}", url, retry, e);
                        return Err(Error::Transport {
                            url: url.to_string(),
                            attempts: retry,
                            source: e,
                        });
                    }
                    let delay = self.config.backoff_for_retry(retry);
                    tracing::warn!(
                        "connection to {} failed (retry {}/{}), retrying in {:.1}s",
                        url,
                        retry,
                        self.config.connect_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!("Failed to get resource {}: {}", url, e);
                    return Err(Error::Request {
                        url: url.to_string(),
                        source: e,
                    });
                }
            }
        }
    }

    /// GETs `url` and decodes the body as JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let resp = self.get(url).await?;
        read_json(resp).await
    }

    /// GETs `url` and returns the body as text.
    pub async fn get_text(&self, url: Url) -> Result<String, Error> {
        let resp = self.get(url).await?;
        read_text(resp).await
    }
}

/// Whether the response declares a JSON content type.
pub fn is_json(resp: &Response) -> bool {
    resp.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("application/json"))
        .unwrap_or(false)
}

/// Reads the whole body of an already received response.
pub async fn read_text(resp: Response) -> Result<String, Error> {
    let url = resp.url().to_string();
    resp.text().await.map_err(|e| {
        tracing::error!("Failed to read response body from {}: {}", url, e);
        Error::Request { url, source: e }
    })
}

/// Reads and decodes the JSON body of an already received response.
pub async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, Error> {
    let url = resp.url().to_string();
    let body = read_text(resp).await?;
    serde_json::from_str::<T>(&body).map_err(|e| {
        tracing::error!(
            "Failed to parse resource: {} | body: {}",
            e,
            truncate_body(&body)
        );
        Error::Decode { url, source: e }
    })
}

/// Parses a URL, mapping failures onto [`Error::InvalidUrl`].
pub fn parse_url(raw: &str) -> Result<Url, Error> {
    Url::parse(raw).map_err(|e| {
        tracing::error!("Invalid URL constructed: {}", e);
        Error::InvalidUrl {
            url: raw.to_string(),
            source: e,
        }
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 100;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_retry_has_no_backoff() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.backoff_for_retry(1), Duration::ZERO);
    }

    #[test]
    fn backoff_doubles_per_retry() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.backoff_for_retry(2), Duration::from_secs(2));
        assert_eq!(cfg.backoff_for_retry(3), Duration::from_secs(4));
        assert_eq!(cfg.backoff_for_retry(4), Duration::from_secs(8));
    }

    #[test]
    fn backoff_is_capped() {
        let cfg = SessionConfig {
            backoff_max: Duration::from_secs(5),
            ..SessionConfig::default()
        };
        assert_eq!(cfg.backoff_for_retry(10), Duration::from_secs(5));
    }

    #[test]
    fn zero_factor_disables_backoff() {
        let cfg = SessionConfig {
            backoff_factor: 0.0,
            ..SessionConfig::default()
        };
        assert_eq!(cfg.backoff_for_retry(4), Duration::ZERO);
    }

    #[test]
    fn parse_url_rejects_garbage() {
        let err = parse_url("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("short"), "short");
        let long = "x".repeat(150);
        assert_eq!(truncate_body(&long).len(), 103);
    }
}
