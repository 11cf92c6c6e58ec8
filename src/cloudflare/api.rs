use std::time::Duration;

use reqwest::{
    Client, RequestBuilder,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Envelope, Record, RecordType, Zone, models::RecordUpdate};
use crate::{Error, Result, USER_AGENT};

/// Where API v4 lives
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

const JSON_MIME: &str = "application/json";

/// A Cloudflare API v4 client authenticated with an API token
#[derive(Debug, Clone)]
pub struct Api {
    token: String,
    base_url: String,
    client: Client,
}

impl Api {
    /// A client for the public API.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client can't be built.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// A client for an API served from `base_url`, e.g. a local mock.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client can't be built.
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME));
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(3))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Looks up the active zone named `domain`.
    ///
    /// # Errors
    ///
    /// [`Error::ZoneNotFound`] if there's no such zone, or whatever went
    /// wrong talking to the API.
    pub async fn zone(&self, domain: &str) -> Result<Zone> {
        let request = self
            .client
            .get(format!("{}/zones", self.base_url))
            .query(&[("name", domain), ("status", "active")]);
        let zones: Vec<Zone> = self.send(request).await?;
        zones
            .into_iter()
            .next()
            .ok_or_else(|| Error::ZoneNotFound(domain.to_string()))
    }

    /// Looks up the `kind` record called `name` in the zone `zone_id`.
    ///
    /// # Errors
    ///
    /// [`Error::RecordNotFound`] if there's no such record, or whatever went
    /// wrong talking to the API.
    pub async fn record(&self, zone_id: &str, name: &str, kind: RecordType) -> Result<Record> {
        let request = self
            .client
            .get(format!("{}/zones/{zone_id}/dns_records", self.base_url))
            .query(&[("name", name), ("type", kind.as_str())]);
        let records: Vec<Record> = self.send(request).await?;
        records
            .into_iter()
            .next()
            .ok_or_else(|| Error::RecordNotFound(name.to_string()))
    }

    /// Overwrites `record`, stored in the zone `zone_id`, with its current
    /// fields and returns the stored version.
    ///
    /// The zone is passed explicitly since record bodies don't always carry
    /// `zone_id`.
    ///
    /// # Errors
    ///
    /// Whatever went wrong talking to the API.
    pub async fn update_record(&self, zone_id: &str, record: &Record) -> Result<Record> {
        let request = self
            .client
            .put(format!(
                "{}/zones/{zone_id}/dns_records/{}",
                self.base_url, record.id
            ))
            .json(&RecordUpdate::from(record));
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.bearer_auth(&self.token).send().await?;
        debug!(url = %response.url(), status = %response.status(), "cloudflare api response");
        let envelope: Envelope<T> = response.json().await?;
        envelope.into_result()
    }
}
