// # cfddnsd - Cloudflare DDNS Daemon
//
// Thin integration layer: all update logic lives in cfddns-core.
//
// The daemon is responsible for:
// 1. Installing the log subscriber
// 2. Loading the configuration file
// 3. Building the runtime and the shared HTTP client
// 4. Wiring the ipify source, Cloudflare provider and file state store
// 5. Running the engine until the process is killed
//
// ## Configuration
//
// `/etc/cloudflare-ddns.conf`, a JSON object:
//
// ```json
// {
//   "api_token": "your_token",
//   "zone_name": "example.com",
//   "record_name": "home.example.com"
// }
// ```
//
// The last IP pushed is kept in `/var/lib/cloudflare-ddns/current_ip`.
// There are no command-line flags and no environment variables.

use anyhow::{Context, Result};
use cfddns_core::config::{DEFAULT_CONFIG_PATH, DEFAULT_HTTP_TIMEOUT};
use cfddns_core::{DdnsConfig, DdnsEngine, FileStateStore};
use cfddns_ip_http::IpifySource;
use cfddns_provider_cloudflare::CloudflareProvider;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// The engine loop never returns, so every exit is a failure:
/// - 1: Configuration error
/// - 2: Runtime start-up error
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Configuration file missing, unreadable or invalid
    ConfigError = 1,
    /// Runtime or component construction failed
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::RuntimeError.into();
    }

    let config = match DdnsConfig::load_default() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config from {}: {}", DEFAULT_CONFIG_PATH, e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    info!("Starting cfddnsd for {}", config.record_name);

    // One sequential loop; a single thread is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {:#}", e);
        }
    });

    DdnsExitCode::RuntimeError.into()
}

/// Build the components and run the engine
///
/// Only returns on a start-up failure.
async fn run_daemon(config: DdnsConfig) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(DEFAULT_HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let ip_source = IpifySource::with_client(client.clone());
    let provider = CloudflareProvider::with_client(config.api_token.clone(), client)
        .context("Failed to create Cloudflare provider")?;
    let state_store = FileStateStore::default();

    let engine = DdnsEngine::new(
        config,
        Box::new(ip_source),
        Box::new(provider),
        Box::new(state_store),
    )
    .context("Failed to create DDNS engine")?;

    engine.run().await;

    Ok(())
}
