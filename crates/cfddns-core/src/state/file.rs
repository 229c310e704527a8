// # File State Store
//
// Plain-text implementation of StateStore.
//
// ## File Format
//
// The file holds exactly the textual form of the last IP pushed to the
// provider, with no trailing newline:
//
// ```text
// 203.0.113.7
// ```
//
// A missing or empty file, or one that doesn't hold an IPv4 address, reads
// as "no prior IP". The next cycle then attempts an update and the provider's
// own content check avoids a redundant write.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::Error;
use crate::config::DEFAULT_STATE_PATH;
use crate::traits::state_store::StateStore;

/// File-based last-known-IP store
///
/// # Example
///
/// ```rust,no_run
/// use cfddns_core::state::FileStateStore;
/// use cfddns_core::traits::StateStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileStateStore::new("/var/lib/cloudflare-ddns/current_ip");
///
///     store.set_last_ip("1.2.3.4".parse()?).await?;
///     assert_eq!(store.last_ip().await?, Some("1.2.3.4".parse()?));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Create a store backed by `path`
    ///
    /// Nothing is touched on disk until the first write.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to create state directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

impl Default for FileStateStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_PATH)
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn last_ip(&self) -> Result<Option<Ipv4Addr>, Error> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("State file does not exist: {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        match content.parse() {
            Ok(ip) => Ok(Some(ip)),
            Err(_) => {
                tracing::debug!(
                    "State file {} does not hold an IPv4 address, ignoring it",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    async fn set_last_ip(&self, ip: Ipv4Addr) -> Result<(), Error> {
        self.ensure_parent_dir().await?;

        fs::write(&self.path, ip.to_string()).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to write state file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("State written to file: {}", self.path.display());
        Ok(())
    }
}
