mod console;

pub use console::{render_values, CaptureConsole, TracingConsole};

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use skiff_core::mode::BuildMode;

/// Configuration for the telemetry subsystem.
#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    pub mode: BuildMode,
    /// Default log level. Overridden by RUST_LOG env var.
    pub log_level: Level,
    /// Per-module level overrides (e.g. "skiff_collector" => DEBUG).
    pub module_levels: Vec<(String, Level)>,
}

impl TelemetryConfig {
    pub fn for_mode(mode: BuildMode) -> Self {
        let log_level = if mode.is_development() {
            Level::DEBUG
        } else {
            Level::INFO
        };
        Self {
            mode,
            log_level,
            module_levels: Vec::new(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::for_mode(BuildMode::Production)
    }
}

/// Initialize the telemetry subsystem. Call once at startup.
///
/// Development builds log human-readable lines; production builds log JSON.
pub fn init_telemetry(config: TelemetryConfig) {
    // Build the env filter from config
    let mut filter_str = config.log_level.to_string().to_lowercase();
    for (module, level) in &config.module_levels {
        filter_str.push_str(&format!(",{}={}", module, level.to_string().to_lowercase()));
    }
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.mode {
        BuildMode::Development => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(env_filter);
            tracing_subscriber::registry().with(fmt_layer).init();
        }
        BuildMode::Production => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_span_list(true)
                .with_filter(env_filter);
            tracing_subscriber::registry().with(fmt_layer).init();
        }
    }
}
