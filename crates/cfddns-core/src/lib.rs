// # cfddns-core
//
// Core library for the Cloudflare dynamic DNS updater.
//
// ## Architecture Overview
//
// - **IpSource**: Trait for looking up the current public IPv4 address
// - **DnsProvider**: Trait for pointing an A record at a new address
// - **StateStore**: Trait for remembering the last address pushed
// - **DdnsEngine**: Poll loop tying the three together
// - **DdnsConfig**: The JSON configuration file
//
// Implementations of IpSource and DnsProvider live in their own crates
// (`cfddns-ip-http`, `cfddns-provider-cloudflare`); the daemon wires them up.

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod state;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider, StateStore};
pub use engine::{CycleOutcome, DdnsEngine};
pub use config::DdnsConfig;
pub use error::{Error, Result};
pub use state::{MemoryStateStore, FileStateStore};
