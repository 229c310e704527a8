// # IP Source Trait
//
// Defines the interface for discovering the host's public IPv4 address.
//
// ## Implementations
//
// - ipify JSON endpoint: `cfddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use cfddns_core::IpSource;
//
// let source = /* IpSource implementation */;
// match source.current().await {
//     Ok(ip) => println!("public IP: {}", ip),
//     Err(e) => eprintln!("skipping cycle: {}", e),
// }
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for public IP lookups
///
/// One call performs one lookup. Implementations must not retry or cache:
/// the engine's poll interval is the only retry mechanism.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Look up the current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: The address reported by the service
    /// - `Err(Error)`: Transport failure, bad status or malformed response
    async fn current(&self) -> Result<Ipv4Addr, crate::Error>;

    /// Short name used in log lines
    fn source_name(&self) -> &'static str;
}
