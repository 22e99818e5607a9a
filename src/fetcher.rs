use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Anything that can turn a URL into the raw body of a page.
pub trait FetchClient {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher with a bounded request time.
pub struct HttpFetcher {
    client: Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.fetch_timeout)
            .build()?;

        Ok(Self {
            client,
            timeout_secs: config.fetch_timeout.as_secs(),
        })
    }
}

impl FetchClient for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = parse_url(url)?;
        info!("Fetching {}", parsed);

        let response = self.client.get(parsed.clone()).send().map_err(|source| {
            if source.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    secs: self.timeout_secs,
                }
            } else {
                FetchError::Transport {
                    url: url.to_string(),
                    source,
                }
            }
        })?;

        let status = response.status();
        debug!("{} answered with {}", parsed, status);
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

/// Accepts only absolute http(s) URLs.
pub fn parse_url(url: &str) -> Result<Url, FetchError> {
    let trimmed = url.trim();
    let parsed = Url::parse(trimmed).map_err(|e| FetchError::InvalidUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
