//! Core traits for the updater
//!
//! These are the seams the engine is built on; tests swap in doubles.
//!
//! - [`IpSource`]: Discover the current public IPv4 address
//! - [`DnsProvider`]: Push an address to the provider's A record
//! - [`StateStore`]: Remember the last address that was pushed

pub mod ip_source;
pub mod dns_provider;
pub mod state_store;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, UpdateResult, RecordMetadata};
pub use state_store::StateStore;
