use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use skiff_core::collector::Collector;
use skiff_core::consent::{ConsentResolver, ConsentState, SettingsStore};
use skiff_core::console::ConsoleSink;
use skiff_core::events::{ErrorReport, ExtraContext};
use skiff_core::mode::BuildMode;

use crate::config::LoggerConfig;

/// Tag prepended to every development console line.
pub const DEBUG_TAG: &str = "[Skiff DEBUG]:";

/// Consent-gated diagnostics facade.
///
/// Every call resolves consent fresh from the settings store, then performs
/// exactly one observable action: a console emission, one collector
/// submission, or nothing. Neither method returns an error or panics; a
/// diagnostics problem must never surface in the calling feature.
pub struct Logger {
    mode: BuildMode,
    consent: ConsentResolver,
    collector: Arc<dyn Collector>,
    console: Arc<dyn ConsoleSink>,
}

enum Route {
    Console,
    Forward,
    Drop,
}

/// Development builds always print; production forwards only with consent.
fn route(mode: BuildMode, consent: ConsentState) -> Route {
    if mode.is_development() {
        Route::Console
    } else if consent.is_granted() {
        Route::Forward
    } else {
        Route::Drop
    }
}

impl Logger {
    pub fn new(
        config: LoggerConfig,
        store: Arc<dyn SettingsStore>,
        collector: Arc<dyn Collector>,
        console: Arc<dyn ConsoleSink>,
    ) -> Self {
        Self {
            mode: config.mode,
            consent: ConsentResolver::new(store, config.consent_key),
            collector,
            console,
        }
    }

    /// Log informational values.
    ///
    /// Development: prints the tagged sequence to the console, whatever the
    /// consent state. Production: submits the sequence as one JSON
    /// breadcrumb when consent is granted, otherwise drops it silently.
    pub async fn log(&self, values: Vec<Value>) {
        let consent = self.consent.resolve().await;

        match route(self.mode, consent) {
            Route::Console => {
                let mut line = Vec::with_capacity(values.len() + 1);
                line.push(Value::String(DEBUG_TAG.to_string()));
                line.extend(values);
                self.console.log(&line);
            }
            Route::Forward => match serde_json::to_string(&values) {
                Ok(message) => self.collector.record_breadcrumb(message),
                Err(e) => warn!(error = %e, "breadcrumb serialization failed; event dropped"),
            },
            Route::Drop => {}
        }
    }

    /// Log an error, optionally with extra context.
    ///
    /// Development: prints the tagged report on the warning channel.
    /// Production with consent: captures the report, inside a fresh scope
    /// carrying the normalized extras when any were given. The scope guard
    /// drops before this method returns, so no extras leak into later
    /// captures.
    pub async fn error<E>(&self, error: &E, extra: Option<ExtraContext>)
    where
        E: std::error::Error + ?Sized,
    {
        let consent = self.consent.resolve().await;

        match route(self.mode, consent) {
            Route::Console => {
                let report = ErrorReport::from_error(error);
                self.console
                    .warn(&[Value::String(DEBUG_TAG.to_string()), report_value(&report)]);
            }
            Route::Forward => {
                let report = ErrorReport::from_error(error);
                match extra {
                    Some(extra) => {
                        let mut scope = self.collector.scope();
                        scope.set_extras(extra.into_fields());
                        scope.capture_error(&report);
                    }
                    None => self.collector.capture_error(&report),
                }
            }
            Route::Drop => {}
        }
    }
}

fn report_value(report: &ErrorReport) -> Value {
    serde_json::to_value(report).unwrap_or_else(|_| Value::String(report.message.clone()))
}
