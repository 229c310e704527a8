// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare API v4 client used by the updater.
//
// An update is three sequential calls, all resolved fresh every time:
//
// 1. Zone lookup:   GET `/zones?name=...`
// 2. Record lookup: GET `/zones/:zone_id/dns_records?type=A&name=...`
// 3. Update:        PUT `/zones/:zone_id/dns_records/:record_id`
//
// Step 3 is skipped when the record's content already equals the new IP.
// When a lookup matches several entries, the first one wins.
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/

use async_trait::async_trait;
use cfddns_core::config::DEFAULT_HTTP_TIMEOUT;
use cfddns_core::traits::{DnsProvider, RecordMetadata, UpdateResult};
use cfddns_core::{Error, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// TTL written with every update (seconds)
pub const RECORD_TTL: u32 = 120;

const PROVIDER_NAME: &str = "cloudflare";

/// Cloudflare's response envelope for list endpoints
#[derive(Debug, Deserialize)]
struct CloudflareResponse {
    success: bool,
    #[serde(default)]
    errors: Option<Vec<CloudflareMessage>>,
    #[serde(default)]
    result: Option<Vec<CloudflareEntry>>,
}

#[derive(Debug, Deserialize)]
struct CloudflareMessage {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// A zone or DNS record as listed by Cloudflare
#[derive(Debug, Deserialize)]
struct CloudflareEntry {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    content: Option<String>,
}

/// Body of the record update call
#[derive(Debug, Serialize)]
struct RecordUpdate<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
    content: String,
    ttl: u32,
    proxied: bool,
}

/// Cloudflare DNS provider
///
/// Stateless: nothing is cached between calls.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a provider with its own HTTP client (10 second timeout)
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Self::with_client(api_token, client)
    }

    /// Create a provider sharing an existing HTTP client
    ///
    /// # Security
    ///
    /// The API token will NEVER be logged or displayed in error messages.
    pub fn with_client(api_token: impl Into<String>, client: reqwest::Client) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        Ok(Self {
            api_token,
            base_url: CLOUDFLARE_API_BASE.to_string(),
            client,
        })
    }

    /// Point the provider at a different API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the zone ID for a zone name
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones?name=example.com
    /// Authorization: Bearer <token>
    /// ```
    pub async fn zone_id(&self, zone_name: &str) -> Result<String> {
        tracing::debug!("Looking up zone ID for {}", zone_name);

        let url = format!("{}/zones", self.base_url);
        let request = self.client.get(&url).query(&[("name", zone_name)]);

        let zone = self
            .first_entry(request, "Zone lookup")
            .await?
            .ok_or_else(|| Error::not_found(format!("Zone {} not found", zone_name)))?;

        tracing::debug!("Found zone ID: {}", zone.id);
        Ok(zone.id)
    }

    /// Get the A record `record_name` in zone `zone_id`
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?type=A&name=home.example.com
    /// Authorization: Bearer <token>
    /// ```
    pub async fn find_record(&self, zone_id: &str, record_name: &str) -> Result<RecordMetadata> {
        tracing::debug!("Looking up A record {}", record_name);

        let url = format!("{}/zones/{}/dns_records", self.base_url, zone_id);
        let request = self
            .client
            .get(&url)
            .query(&[("type", "A"), ("name", record_name)]);

        let record = self
            .first_entry(request, "DNS record lookup")
            .await?
            .ok_or_else(|| Error::not_found(format!("DNS record {} not found", record_name)))?;

        let content = record.content.ok_or_else(|| {
            Error::dns_provider(format!("DNS record {} has no content", record_name))
        })?;

        tracing::debug!("Found record ID: {} (content: {})", record.id, content);
        Ok(RecordMetadata {
            id: record.id,
            name: record.name,
            content,
        })
    }

    /// Overwrite the record's content with `new_ip`
    ///
    /// Succeeds only on HTTP 200.
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// Content-Type: application/json
    ///
    /// {"type": "A", "name": "...", "content": "1.2.3.4", "ttl": 120, "proxied": false}
    /// ```
    pub async fn put_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record_name: &str,
        new_ip: Ipv4Addr,
    ) -> Result<()> {
        let url = format!("{}/zones/{}/dns_records/{}", self.base_url, zone_id, record_id);
        let body = RecordUpdate {
            kind: "A",
            name: record_name,
            content: new_ip.to_string(),
            ttl: RECORD_TTL,
            proxied: false,
        };

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("Update request failed: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(status_error(status, "Update", &error_text));
        }

        Ok(())
    }

    /// Send a list request and return the first entry of a successful envelope
    async fn first_entry(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<Option<CloudflareEntry>> {
        let response = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("{} request failed: {}", context, e)))?;

        let status = response.status();
        let envelope: CloudflareResponse = match response.json().await {
            Ok(envelope) => envelope,
            Err(e) if !status.is_success() => {
                return Err(status_error(status, context, &e.to_string()));
            }
            Err(e) => {
                return Err(Error::provider(
                    PROVIDER_NAME,
                    format!("{} failed: undecodable response (HTTP {}): {}", context, status, e),
                ));
            }
        };

        if !status.is_success() || !envelope.success {
            let messages = envelope
                .errors
                .unwrap_or_default()
                .iter()
                .map(|m| format!("{} ({})", m.message, m.code))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(status_error(status, context, &messages));
        }

        Ok(envelope.result.unwrap_or_default().into_iter().next())
    }
}

/// Map an unsuccessful response to an error
fn status_error(status: StatusCode, context: &str, detail: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "{} rejected: invalid API token or insufficient permissions. Status: {}",
            context, status
        )),
        429 => Error::rate_limited(format!(
            "{} rate limited. Please retry later. Status: {}",
            context, status
        )),
        _ => Error::provider(
            PROVIDER_NAME,
            format!("{} failed: {} - {}", context, status, detail),
        ),
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn update_record(
        &self,
        zone_name: &str,
        record_name: &str,
        new_ip: Ipv4Addr,
    ) -> Result<UpdateResult> {
        let zone_id = self.zone_id(zone_name).await?;
        let record = self.find_record(&zone_id, record_name).await?;

        if record.content == new_ip.to_string() {
            tracing::info!("DNS record already has correct IP: {} -> {}", record_name, new_ip);
            return Ok(UpdateResult::Unchanged);
        }

        tracing::info!(
            "Updating DNS record: {} ({}) -> {} (was: {})",
            record.name,
            record.id,
            new_ip,
            record.content
        );

        self.put_record(&zone_id, &record.id, record_name, new_ip)
            .await?;

        Ok(UpdateResult::Updated {
            previous_content: record.content,
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
