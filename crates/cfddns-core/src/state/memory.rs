// # Memory State Store
//
// In-memory implementation of StateStore.
//
// Nothing survives a restart, so the first cycle after start-up always
// attempts an update. Useful for tests and for embedding the engine where
// the provider-side content check is enough.

use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::state_store::StateStore;

/// In-memory last-known-IP store
///
/// Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<RwLock<Option<Ipv4Addr>>>,
}

impl MemoryStateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `ip`
    pub fn with_ip(ip: Ipv4Addr) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(ip))),
        }
    }

    /// Forget the stored value
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn last_ip(&self) -> Result<Option<Ipv4Addr>, Error> {
        Ok(*self.inner.read().await)
    }

    async fn set_last_ip(&self, ip: Ipv4Addr) -> Result<(), Error> {
        *self.inner.write().await = Some(ip);
        Ok(())
    }
}
