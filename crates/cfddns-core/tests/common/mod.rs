//! Test doubles and common utilities for engine contract tests
//!
//! The doubles count their calls so tests can assert which components a
//! poll cycle touched.

#![allow(dead_code)]

use cfddns_core::error::{Error, Result};
use cfddns_core::traits::{DnsProvider, IpSource, StateStore, UpdateResult};
use cfddns_core::{DdnsConfig, DdnsEngine};
use std::io;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;

/// An IpSource whose answer the test controls
#[derive(Clone)]
pub struct ControlledIpSource {
    /// `None` makes current() fail
    ip: Arc<Mutex<Option<Ipv4Addr>>>,
    /// Call counter for current()
    call_count: Arc<AtomicUsize>,
}

impl ControlledIpSource {
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            ip: Arc::new(Mutex::new(Some(ip))),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source whose lookups always fail
    pub fn failing() -> Self {
        let source = Self::new(Ipv4Addr::UNSPECIFIED);
        source.set(None);
        source
    }

    /// Change the answer for subsequent lookups
    pub fn set(&self, ip: Option<Ipv4Addr>) {
        *self.ip.lock().unwrap() = ip;
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for ControlledIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.ip
            .lock()
            .unwrap()
            .ok_or_else(|| Error::ip_source("lookup service unreachable"))
    }

    fn source_name(&self) -> &'static str {
        "controlled"
    }
}

/// How the mock provider answers update_record()
#[derive(Debug, Clone)]
pub enum ProviderBehavior {
    /// Report a rewrite from this previous content
    Update(String),
    /// Report that the record already held the IP
    AlreadyCurrent,
    /// Fail with a provider error
    Fail,
}

/// A mock DnsProvider that records every call
#[derive(Clone)]
pub struct MockDnsProvider {
    behavior: Arc<Mutex<ProviderBehavior>>,
    calls: Arc<Mutex<Vec<(String, String, Ipv4Addr)>>>,
}

impl MockDnsProvider {
    pub fn new(behavior: ProviderBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_behavior(&self, behavior: ProviderBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn update_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// (zone, record, ip) of every update_record() call
    pub fn calls(&self) -> Vec<(String, String, Ipv4Addr)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn update_record(
        &self,
        zone_name: &str,
        record_name: &str,
        new_ip: Ipv4Addr,
    ) -> Result<UpdateResult> {
        self.calls
            .lock()
            .unwrap()
            .push((zone_name.to_string(), record_name.to_string(), new_ip));

        match self.behavior.lock().unwrap().clone() {
            ProviderBehavior::Update(previous_content) => {
                Ok(UpdateResult::Updated { previous_content })
            }
            ProviderBehavior::AlreadyCurrent => Ok(UpdateResult::Unchanged),
            ProviderBehavior::Fail => Err(Error::provider("mock", "HTTP 500")),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A StateStore that counts calls and can be made to fail writes
#[derive(Clone, Default)]
pub struct MockStateStore {
    value: Arc<Mutex<Option<Ipv4Addr>>>,
    get_call_count: Arc<AtomicUsize>,
    set_call_count: Arc<AtomicUsize>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MockStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ip(ip: Ipv4Addr) -> Self {
        let store = Self::new();
        *store.value.lock().unwrap() = Some(ip);
        store
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    pub fn value(&self) -> Option<Ipv4Addr> {
        *self.value.lock().unwrap()
    }

    pub fn get_call_count(&self) -> usize {
        self.get_call_count.load(Ordering::SeqCst)
    }

    pub fn set_call_count(&self) -> usize {
        self.set_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl StateStore for MockStateStore {
    async fn last_ip(&self) -> Result<Option<Ipv4Addr>> {
        self.get_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.value())
    }

    async fn set_last_ip(&self, ip: Ipv4Addr) -> Result<()> {
        self.set_call_count.fetch_add(1, Ordering::SeqCst);
        if *self.fail_writes.lock().unwrap() {
            return Err(Error::state_store("disk full"));
        }
        *self.value.lock().unwrap() = Some(ip);
        Ok(())
    }
}

/// Configuration used by every contract test
pub fn test_config() -> DdnsConfig {
    DdnsConfig::new("test-token", "example.com", "home.example.com")
}

/// Build an engine from shared handles to the doubles
pub fn engine(
    ip_source: &ControlledIpSource,
    provider: &MockDnsProvider,
    store: &MockStateStore,
) -> DdnsEngine {
    DdnsEngine::new(
        test_config(),
        Box::new(ip_source.clone()),
        Box::new(provider.clone()),
        Box::new(store.clone()),
    )
    .expect("engine construction succeeds")
}

/// Log output captured at INFO and above
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Install a capturing fmt subscriber for the current thread
    ///
    /// Capture stops when the returned guard is dropped.
    pub fn install() -> (Self, DefaultGuard) {
        let logs = Self::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();

        (logs, tracing::subscriber::set_default(subscriber))
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
