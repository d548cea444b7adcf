use serde_json::Value;

/// Local console channels used by development builds.
///
/// Implementations decide how values are rendered; callers pass the full
/// value sequence including any tag already prepended.
pub trait ConsoleSink: Send + Sync {
    /// Emit values on the standard channel.
    fn log(&self, values: &[Value]);

    /// Emit values on the warning channel.
    fn warn(&self, values: &[Value]);
}
