//! Core DDNS engine
//!
//! The DdnsEngine is responsible for:
//! - Looking up the public IP via IpSource
//! - Checking the StateStore so unchanged cycles make no provider calls
//! - Updating the A record via DnsProvider
//! - Persisting the IP after a successful update
//!
//! ## Poll Cycle
//!
//! ```text
//! ┌─────────────┐    ┌──────────────┐    ┌─────────────┐    ┌──────────────┐
//! │  IpSource   │───▶│ StateStore   │───▶│ DnsProvider │───▶│ StateStore   │
//! │  (lookup)   │    │ (compare)    │    │ (update)    │    │ (persist)    │
//! └─────────────┘    └──────────────┘    └─────────────┘    └──────────────┘
//!        │ error            │ equal             │ error
//!        ▼                  ▼                   ▼
//!                     sleep, next cycle
//! ```
//!
//! Every failure is logged and the loop goes on; the poll interval is the
//! only retry mechanism.

use crate::config::{DdnsConfig, DEFAULT_POLL_INTERVAL};
use crate::traits::{DnsProvider, IpSource, StateStore, UpdateResult};
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What a single poll cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The public IP could not be determined; nothing else was attempted
    IpUnavailable {
        reason: String,
    },

    /// The public IP matches the last known IP; no provider calls were made
    Unchanged {
        ip: Ipv4Addr,
    },

    /// The provider now holds the new IP and it was persisted
    Updated {
        ip: Ipv4Addr,
        result: UpdateResult,
    },

    /// The provider update failed; the state store was left alone
    UpdateFailed {
        ip: Ipv4Addr,
        reason: String,
    },
}

/// Core DDNS engine
///
/// Holds the configuration, the three components and the poll interval.
/// All work happens sequentially on the caller's task.
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Start with [`DdnsEngine::run()`], which never returns
///
/// Tests drive single cycles with [`DdnsEngine::poll_once()`].
pub struct DdnsEngine {
    /// Record and zone to manage
    config: DdnsConfig,

    /// Public IP lookup
    ip_source: Box<dyn IpSource>,

    /// DNS provider for updating the record
    provider: Box<dyn DnsProvider>,

    /// Last-known-IP storage
    state_store: Box<dyn StateStore>,

    /// Sleep between cycles
    poll_interval: Duration,
}

impl DdnsEngine {
    /// Create a new engine with the default 10 minute poll interval
    ///
    /// Fails if `config` doesn't validate.
    pub fn new(
        config: DdnsConfig,
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        state_store: Box<dyn StateStore>,
    ) -> crate::Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            ip_source,
            provider,
            state_store,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Override the poll interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// The configured poll interval
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Run the poll loop forever
    ///
    /// Errors never end the loop. The process is stopped from outside.
    pub async fn run(&self) {
        info!(
            "Watching {} in zone {} via {} / {} (every {:?})",
            self.config.record_name,
            self.config.zone_name,
            self.ip_source.source_name(),
            self.provider.provider_name(),
            self.poll_interval
        );

        loop {
            let outcome = self.poll_once().await;
            debug!("Poll cycle finished: {:?}", outcome);
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Run a single poll cycle
    pub async fn poll_once(&self) -> CycleOutcome {
        let current_ip = match self.ip_source.current().await {
            Ok(ip) => ip,
            Err(e) => {
                warn!("Public IP lookup via {} failed: {}", self.ip_source.source_name(), e);
                return CycleOutcome::IpUnavailable {
                    reason: e.to_string(),
                };
            }
        };

        let last_ip = match self.state_store.last_ip().await {
            Ok(ip) => ip,
            Err(e) => {
                debug!("Could not read last known IP, treating it as unknown: {}", e);
                None
            }
        };

        if last_ip == Some(current_ip) {
            return CycleOutcome::Unchanged { ip: current_ip };
        }

        debug!(
            "IP change detected: {} -> {}",
            last_ip.map(|ip| ip.to_string()).unwrap_or("None".to_string()),
            current_ip
        );

        self.update(current_ip).await
    }

    /// Push `new_ip` to the provider and persist it on success
    async fn update(&self, new_ip: Ipv4Addr) -> CycleOutcome {
        let result = match self
            .provider
            .update_record(&self.config.zone_name, &self.config.record_name, new_ip)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                error!(
                    "Failed to update {} via {}: {}",
                    self.config.record_name,
                    self.provider.provider_name(),
                    e
                );
                return CycleOutcome::UpdateFailed {
                    ip: new_ip,
                    reason: e.to_string(),
                };
            }
        };

        if let Err(e) = self.state_store.set_last_ip(new_ip).await {
            warn!("Failed to persist last known IP {}: {}", new_ip, e);
        }

        info!("Successfully updated {} to {}", self.config.record_name, new_ip);

        CycleOutcome::Updated { ip: new_ip, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStateStore;
    use async_trait::async_trait;

    struct FixedIpSource(Ipv4Addr);

    #[async_trait]
    impl IpSource for FixedIpSource {
        async fn current(&self) -> crate::Result<Ipv4Addr> {
            Ok(self.0)
        }

        fn source_name(&self) -> &'static str {
            "fixed"
        }
    }

    struct NoopProvider;

    #[async_trait]
    impl DnsProvider for NoopProvider {
        async fn update_record(&self, _: &str, _: &str, _: Ipv4Addr) -> crate::Result<UpdateResult> {
            Ok(UpdateResult::Unchanged)
        }

        fn provider_name(&self) -> &'static str {
            "noop"
        }
    }

    fn engine(config: DdnsConfig) -> crate::Result<DdnsEngine> {
        DdnsEngine::new(
            config,
            Box::new(FixedIpSource(Ipv4Addr::new(1, 2, 3, 4))),
            Box::new(NoopProvider),
            Box::new(MemoryStateStore::new()),
        )
    }

    #[test]
    fn test_default_poll_interval_is_ten_minutes() {
        let engine = engine(DdnsConfig::new("t", "example.com", "home.example.com")).unwrap();
        assert_eq!(engine.poll_interval(), Duration::from_secs(600));

        let engine = engine.with_poll_interval(Duration::from_millis(5));
        assert_eq!(engine.poll_interval(), Duration::from_millis(5));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(engine(DdnsConfig::new("t", "", "home.example.com")).is_err());
    }

    #[tokio::test]
    async fn test_provider_short_circuit_still_persists() {
        let store = MemoryStateStore::new();
        let engine = DdnsEngine::new(
            DdnsConfig::new("t", "example.com", "home.example.com"),
            Box::new(FixedIpSource(Ipv4Addr::new(1, 2, 3, 4))),
            Box::new(NoopProvider),
            Box::new(store.clone()),
        )
        .unwrap();

        let outcome = engine.poll_once().await;
        assert_eq!(
            outcome,
            CycleOutcome::Updated {
                ip: Ipv4Addr::new(1, 2, 3, 4),
                result: UpdateResult::Unchanged,
            }
        );
        assert_eq!(store.last_ip().await.unwrap(), Some(Ipv4Addr::new(1, 2, 3, 4)));
    }
}
