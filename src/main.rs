use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use skiff_collector::{CollectorConfig, HttpCollector, NoopCollector};
use skiff_core::collector::Collector;
use skiff_core::consent::{ConsentResolver, SettingsStore, CONSENT_KEY};
use skiff_core::events::ExtraContext;
use skiff_core::mode::BuildMode;
use skiff_core::values;
use skiff_logger::{Logger, LoggerConfig};
use skiff_store::{Database, MemoryStore, SettingsRepo};
use skiff_telemetry::{init_telemetry, TelemetryConfig, TracingConsole};

/// Diagnostics probe: routes one log and one synthetic error through the
/// facade so consent gating and collector plumbing can be verified end to
/// end.
#[derive(Parser, Debug)]
#[command(name = "skiff", about = "Skiff diagnostics probe")]
struct Args {
    /// Build mode to probe under.
    #[arg(long, default_value = "production")]
    mode: BuildMode,

    /// Ingest endpoint; when omitted, envelopes are discarded.
    #[arg(long)]
    endpoint: Option<String>,

    /// Bearer token for the ingest endpoint.
    #[arg(long)]
    token: Option<String>,

    /// Use an in-memory settings store instead of the on-disk database.
    #[arg(long)]
    ephemeral: bool,

    /// Seed the consent flag before probing (e.g. "agreed").
    #[arg(long)]
    consent: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("probe delivery check failed")]
struct ProbeError {
    #[source]
    source: std::io::Error,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_telemetry(TelemetryConfig::for_mode(args.mode));

    let store: Arc<dyn SettingsStore> = if args.ephemeral {
        let store = MemoryStore::new();
        if let Some(value) = &args.consent {
            store.set(CONSENT_KEY, value);
        }
        Arc::new(store)
    } else {
        let db_path = skiff_home().join("database").join("settings.db");
        let repo = SettingsRepo::new(Database::open(&db_path)?);
        if let Some(value) = &args.consent {
            repo.set(CONSENT_KEY, value)?;
        }
        Arc::new(repo)
    };

    let resolver = ConsentResolver::new(store.clone(), CONSENT_KEY);
    let consent = resolver.resolve().await;
    tracing::info!(mode = %args.mode, consent = %consent, "probe starting");

    let http = match &args.endpoint {
        Some(endpoint) => {
            let mut config = CollectorConfig::new(endpoint.clone());
            if let Some(token) = &args.token {
                config = config.with_auth_token(token.clone());
            }
            Some(Arc::new(HttpCollector::start(config)?))
        }
        None => None,
    };
    let collector: Arc<dyn Collector> = match &http {
        Some(http) => http.clone(),
        None => Arc::new(NoopCollector),
    };

    let logger = Logger::new(
        LoggerConfig::for_mode(args.mode),
        store,
        collector,
        Arc::new(TracingConsole),
    );

    logger
        .log(values!["probe event", {"source": "skiff-probe"}])
        .await;

    let probe_error = ProbeError {
        source: std::io::Error::new(std::io::ErrorKind::Other, "synthetic failure"),
    };
    logger
        .error(&probe_error, Some(ExtraContext::from("probe context")))
        .await;

    if let Some(http) = http {
        http.close().await;
    }

    tracing::info!("probe finished");
    Ok(())
}

fn skiff_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
        .join(".skiff")
}
