// # HTTP IP Source
//
// This crate provides the public IP lookup for the updater, backed by
// ipify's JSON endpoint:
//
// ```http
// GET https://api.ipify.org?format=json
//
// {"ip": "203.0.113.7"}
// ```
//
// One call is one GET. Failures are returned to the engine, which logs them
// and skips the cycle; there is no retry and no caching here.

use cfddns_core::config::DEFAULT_HTTP_TIMEOUT;
use cfddns_core::traits::IpSource;
use cfddns_core::{Error, Result};
use serde::Deserialize;
use std::net::Ipv4Addr;

/// Default IP-echo endpoint
pub const IPIFY_URL: &str = "https://api.ipify.org?format=json";

/// Response body of the ipify JSON endpoint
#[derive(Debug, Deserialize)]
struct IpifyResponse {
    ip: String,
}

/// Public IP source backed by ipify
#[derive(Debug, Clone)]
pub struct IpifySource {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl IpifySource {
    /// Create a source for the default ipify endpoint with its own client
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client))
    }

    /// Create a source for the default endpoint sharing an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            url: IPIFY_URL.to_string(),
            client,
        }
    }

    /// Point the source at a different endpoint
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Fetch and decode the current IP
    async fn fetch_ip(&self) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::http(format!("IP check request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http(format!("IP check returned HTTP {}", status)));
        }

        let body: IpifyResponse = response
            .json()
            .await
            .map_err(|e| Error::ip_source(format!("Failed to parse IP check response: {}", e)))?;

        body.ip
            .parse()
            .map_err(|_| Error::ip_source(format!("Not an IPv4 address: {:?}", body.ip)))
    }
}

#[async_trait::async_trait]
impl IpSource for IpifySource {
    async fn current(&self) -> Result<Ipv4Addr> {
        let ip = self.fetch_ip().await?;
        tracing::debug!("Public IP is {}", ip);
        Ok(ip)
    }

    fn source_name(&self) -> &'static str {
        "ipify"
    }
}
