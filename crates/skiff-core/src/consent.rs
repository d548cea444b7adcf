use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Stored value that grants telemetry consent. Any other stored string is a
/// denial.
pub const CONSENT_GRANTED_VALUE: &str = "agreed";

/// Settings key the consent flag is persisted under.
pub const CONSENT_KEY: &str = "skiff:metricsOptIn";

/// User telemetry consent as recorded in the settings store.
///
/// `Unknown` means the user was never asked (or the store could not be
/// read). Routing treats `Unknown` and `Denied` identically; the distinction
/// is kept so callers can still tell "never asked" from "said no".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentState {
    Unknown,
    Granted,
    Denied,
}

impl ConsentState {
    /// Classify a raw stored value. `None` means the key was never written.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            Some(CONSENT_GRANTED_VALUE) => Self::Granted,
            Some(_) => Self::Denied,
            None => Self::Unknown,
        }
    }

    /// Whether diagnostics may leave the device.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl std::fmt::Display for ConsentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// Error surfaced by a settings store read.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("settings storage unavailable: {0}")]
    Unavailable(String),

    #[error("settings read failed: {0}")]
    Read(String),
}

/// Read side of the persisted settings store.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the raw string stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;
}

/// Resolves the current consent state from the settings store.
///
/// Reads fresh on every call and never fails: a read error collapses to
/// `Unknown`, which withholds consent.
pub struct ConsentResolver {
    store: Arc<dyn SettingsStore>,
    key: String,
}

impl ConsentResolver {
    pub fn new(store: Arc<dyn SettingsStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub async fn resolve(&self) -> ConsentState {
        match self.store.get(&self.key).await {
            Ok(raw) => ConsentState::from_stored(raw.as_deref()),
            Err(err) => {
                tracing::debug!(error = %err, key = %self.key, "consent read failed");
                ConsentState::Unknown
            }
        }
    }
}
