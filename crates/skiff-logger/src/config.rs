use skiff_core::consent::CONSENT_KEY;
use skiff_core::mode::BuildMode;

/// Configuration for the diagnostics facade.
#[derive(Clone, Debug)]
pub struct LoggerConfig {
    pub mode: BuildMode,
    /// Settings key holding the consent flag.
    pub consent_key: String,
}

impl LoggerConfig {
    pub fn for_mode(mode: BuildMode) -> Self {
        Self {
            mode,
            consent_key: CONSENT_KEY.to_string(),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::for_mode(BuildMode::Production)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_production() {
        let config = LoggerConfig::default();
        assert_eq!(config.mode, BuildMode::Production);
        assert_eq!(config.consent_key, "skiff:metricsOptIn");
    }
}
