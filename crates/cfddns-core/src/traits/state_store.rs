// # State Store Trait
//
// Remembers the last IP that was successfully pushed to the provider, so
// that unchanged cycles make no provider calls at all.
//
// ## Implementations
//
// - File-based: a single plain-text file (`FileStateStore`)
// - In-memory: tests and embedding (`MemoryStateStore`)

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for last-known-IP storage
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Get the last IP that was pushed to the provider
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ip))`: The last known IP
    /// - `Ok(None)`: Nothing recorded yet
    /// - `Err(Error)`: Storage error
    async fn last_ip(&self) -> Result<Option<Ipv4Addr>, crate::Error>;

    /// Record `ip` as the last IP pushed to the provider
    ///
    /// Overwrites any previous value.
    async fn set_last_ip(&self, ip: Ipv4Addr) -> Result<(), crate::Error>;
}
