// # DNS Provider Trait
//
// Defines the interface for pointing an A record at a new address.
//
// ## Implementations
//
// - Cloudflare: `cfddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use cfddns_core::DnsProvider;
//
// let provider = /* DnsProvider implementation */;
// provider.update_record("example.com", "home.example.com", "1.2.3.4".parse()?).await?;
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Result of a DNS update operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateResult {
    /// The record was rewritten
    Updated {
        /// Content the record held before the write
        previous_content: String,
    },
    /// The record already held the new address; no write was issued
    Unchanged,
}

/// A DNS record as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMetadata {
    /// Provider-internal record ID
    pub id: String,
    /// Record name
    pub name: String,
    /// Current record content (the address for A records)
    pub content: String,
}

/// Trait for DNS provider implementations
///
/// Providers make API calls and report what happened. They never retry,
/// never cache zone or record IDs across calls, and never touch the state
/// store; the engine owns all of that.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Point the A record `record_name` in `zone_name` at `new_ip`
    ///
    /// Implementations resolve the zone and record on every call, and must
    /// skip the write when the record already holds `new_ip`.
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateResult::Updated { .. })`: The record was rewritten
    /// - `Ok(UpdateResult::Unchanged)`: The record already held `new_ip`
    /// - `Err(Error)`: Any lookup or the write failed
    async fn update_record(
        &self,
        zone_name: &str,
        record_name: &str,
        new_ip: Ipv4Addr,
    ) -> Result<UpdateResult, crate::Error>;

    /// Get the provider name (for logging)
    fn provider_name(&self) -> &'static str;
}
