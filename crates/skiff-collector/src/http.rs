use std::time::Duration;

use parking_lot::Mutex;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use skiff_core::collector::{Collector, ExtraFields, Scope};
use skiff_core::events::ErrorReport;

use crate::envelope::Envelope;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("invalid ingest endpoint: {0}")]
    Endpoint(String),
}

/// Configuration for the HTTP collector transport.
pub struct CollectorConfig {
    pub endpoint: String,
    pub auth_token: Option<SecretString>,
    pub queue_capacity: usize,
}

impl CollectorConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth_token: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(SecretString::from(token.into()));
        self
    }
}

/// Collector that POSTs envelopes to an ingest endpoint.
///
/// Submissions enqueue onto a bounded channel and return immediately; a
/// background worker delivers one envelope per request. Delivery is
/// best-effort: failures are logged and never retried, and a full queue
/// drops the newest envelope.
pub struct HttpCollector {
    tx: Mutex<Option<mpsc::Sender<Envelope>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl HttpCollector {
    /// Validate the endpoint and spawn the delivery worker.
    pub fn start(config: CollectorConfig) -> Result<Self, CollectorError> {
        reqwest::Url::parse(&config.endpoint)
            .map_err(|e| CollectorError::Endpoint(format!("{}: {e}", config.endpoint)))?;

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| CollectorError::Client(e.to_string()))?;

        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let worker = tokio::spawn(deliver_loop(client, config, rx));

        Ok(Self {
            tx: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Drain queued envelopes and stop the delivery worker.
    pub async fn close(&self) {
        drop(self.tx.lock().take());

        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "delivery worker did not shut down cleanly");
            }
        }
    }

    fn enqueue(&self, envelope: Envelope) {
        let guard = self.tx.lock();
        match guard.as_ref() {
            Some(tx) => {
                if let Err(e) = tx.try_send(envelope) {
                    warn!(error = %e, "dropping diagnostics envelope");
                }
            }
            None => warn!("collector closed; dropping diagnostics envelope"),
        }
    }
}

impl Collector for HttpCollector {
    fn record_breadcrumb(&self, message: String) {
        self.enqueue(Envelope::breadcrumb(message));
    }

    fn capture_error(&self, report: &ErrorReport) {
        self.enqueue(Envelope::report(report.clone(), None));
    }

    fn scope(&self) -> Box<dyn Scope + '_> {
        Box::new(HttpScope {
            collector: self,
            extras: None,
        })
    }
}

/// Scope state lives on the guard itself, so detachment on drop is
/// structural. Extras are consumed by the first capture.
struct HttpScope<'a> {
    collector: &'a HttpCollector,
    extras: Option<ExtraFields>,
}

impl Scope for HttpScope<'_> {
    fn set_extras(&mut self, extras: ExtraFields) {
        self.extras = Some(extras);
    }

    fn capture_error(&mut self, report: &ErrorReport) {
        self.collector
            .enqueue(Envelope::report(report.clone(), self.extras.take()));
    }
}

async fn deliver_loop(client: Client, config: CollectorConfig, mut rx: mpsc::Receiver<Envelope>) {
    while let Some(envelope) = rx.recv().await {
        deliver(&client, &config, &envelope).await;
    }
}

async fn deliver(client: &Client, config: &CollectorConfig, envelope: &Envelope) {
    let mut req = client.post(&config.endpoint);

    if let Some(token) = &config.auth_token {
        req = req.header("authorization", format!("Bearer {}", token.expose_secret()));
    }
    req = req.header("content-type", "application/json");

    match req.json(envelope).send().await {
        Ok(response) if response.status().is_success() => {
            debug!(kind = envelope.kind(), "envelope delivered");
        }
        Ok(response) => {
            warn!(status = %response.status(), kind = envelope.kind(), "collector rejected envelope");
        }
        Err(e) => {
            warn!(error = %e, kind = envelope.kind(), "envelope delivery failed");
        }
    }
}
