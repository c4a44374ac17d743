//! HTTP client for the Meraki Dashboard API

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, LINK, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use smsoft_core::{Device, DeviceSoftwareSource};

use crate::error::{ClientError, Result};
use crate::models::{ErrorBody, SmDevice, SmSoftware};

/// Dashboard API v1 base URL
pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1/";

/// Largest page size the devices endpoint accepts
const DEVICES_PER_PAGE: u32 = 1000;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Upper bound on pages followed for one listing
const MAX_PAGES: u32 = 1000;

/// Dashboard API client authenticated with an API key
#[derive(Clone)]
pub struct MerakiClient {
    client: Client,
    base_url: Url,
    api_key: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl std::fmt::Debug for MerakiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerakiClient")
            .field("base_url", &self.base_url.as_str())
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl MerakiClient {
    /// Create a client for the public Dashboard API
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    ///
    /// # Example
    /// ```no_run
    /// use smsoft_client::MerakiClient;
    ///
    /// let client = MerakiClient::with_base_url("my-api-key", "http://localhost:8080/api/v1/")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("smsoft/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// Set how many times a rate-limited request is retried, and the wait
    /// used when the Dashboard sends no `Retry-After`
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Build a full URL from path segments; each segment is percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Perform a GET request, retrying while rate limited
    ///
    /// Returns the decoded body and the next page URL, if any.
    async fn get_page<T: DeserializeOwned>(&self, url: Url) -> Result<(T, Option<Url>)> {
        let mut attempt = 0;
        loop {
            let response = self
                .client
                .get(url.clone())
                .bearer_auth(&self.api_key)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS && attempt < self.max_retries {
                attempt += 1;
                let delay = self.rate_limit_delay(response.headers());
                warn!(attempt, ?delay, "rate limited by dashboard, retrying");
                tokio::time::sleep(delay).await;
                continue;
            }

            if !status.is_success() {
                let status = status.as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(ClientError::Api {
                    status,
                    message: error_message(&body),
                });
            }

            let next = next_link(response.headers());
            let body = response.bytes().await?;
            return Ok((serde_json::from_slice(&body)?, next));
        }
    }

    /// Wait before retrying a rate-limited request, never longer than
    /// `MAX_RETRY_DELAY`
    fn rate_limit_delay(&self, headers: &HeaderMap) -> Duration {
        retry_after(headers)
            .unwrap_or(self.retry_delay)
            .min(MAX_RETRY_DELAY)
    }

    /// Check a `rel=next` target before the API key is sent to it
    fn check_next(&self, next: &Url, seen: &HashSet<Url>) -> Result<()> {
        if next.origin() != self.base_url.origin() {
            return Err(ClientError::InvalidResponse(format!(
                "next page {next} is outside {}",
                self.base_url.origin().ascii_serialization()
            )));
        }
        if seen.contains(next) {
            return Err(ClientError::InvalidResponse(format!(
                "next page {next} was already fetched"
            )));
        }
        Ok(())
    }

    /// Perform a GET request and follow `Link: rel=next` until the last page
    ///
    /// Next pages must stay on the base URL's origin, may not repeat, and
    /// are capped at `MAX_PAGES`.
    async fn get_all<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(url);
        let mut pages = 0u32;

        while let Some(url) = next {
            if pages == MAX_PAGES {
                return Err(ClientError::InvalidResponse(format!(
                    "more than {MAX_PAGES} pages"
                )));
            }
            seen.insert(url.clone());

            let (page, following): (Vec<T>, Option<Url>) = self.get_page(url).await?;
            pages += 1;
            debug!(page = pages, items = page.len(), "fetched page");
            items.extend(page);

            if let Some(following) = &following {
                self.check_next(following, &seen)?;
            }
            next = following;
        }

        Ok(items)
    }

    /// List the Systems Manager devices of a network
    ///
    /// # Errors
    /// Returns an error if a request fails or the Dashboard returns an error.
    #[instrument(skip(self))]
    pub async fn sm_devices(&self, network_id: &str) -> Result<Vec<SmDevice>> {
        let mut url = self.url(&["networks", network_id, "sm", "devices"])?;
        url.query_pairs_mut()
            .append_pair("perPage", &DEVICES_PER_PAGE.to_string());
        self.get_all(url).await
    }

    /// List the software installed on one Systems Manager device
    ///
    /// # Errors
    /// Returns an error if the request fails or the Dashboard returns an error.
    #[instrument(skip(self))]
    pub async fn sm_device_softwares(
        &self,
        network_id: &str,
        device_id: &str,
    ) -> Result<Vec<SmSoftware>> {
        let url = self.url(&[
            "networks",
            network_id,
            "sm",
            "devices",
            device_id,
            "softwares",
        ])?;
        self.get_all(url).await
    }
}

#[async_trait]
impl DeviceSoftwareSource for MerakiClient {
    type Error = ClientError;

    async fn list_devices(&self, network_id: &str) -> Result<Vec<Device>> {
        let devices = self.sm_devices(network_id).await?;
        Ok(devices.into_iter().map(Device::from).collect())
    }

    async fn list_software(&self, network_id: &str, device_id: &str) -> Result<Vec<String>> {
        let software = self.sm_device_softwares(network_id, device_id).await?;
        Ok(software.into_iter().filter_map(|s| s.name).collect())
    }
}

/// Extract the `rel=next` target from a `Link` header
fn next_link(headers: &HeaderMap) -> Option<Url> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .find_map(|link| {
            let (target, params) = link.split_once(';')?;
            let is_next = params
                .split(';')
                .map(str::trim)
                .any(|p| p == "rel=next" || p == "rel=\"next\"");
            if !is_next {
                return None;
            }
            let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
            Url::parse(target).ok()
        })
}

/// Parse a `Retry-After` header given in seconds
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Join the `errors` array of a Dashboard error body, or fall back to the raw text
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed.errors.join("; "),
        _ => body.trim().to_string(),
    }
}
