use parking_lot::Mutex;
use serde_json::Value;

use skiff_core::console::ConsoleSink;

/// Render a value sequence the way a console would: bare strings unquoted,
/// everything else as JSON.
pub fn render_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Console sink that emits through the tracing subscriber.
pub struct TracingConsole;

impl ConsoleSink for TracingConsole {
    fn log(&self, values: &[Value]) {
        tracing::info!(target: "console", "{}", render_values(values));
    }

    fn warn(&self, values: &[Value]) {
        tracing::warn!(target: "console", "{}", render_values(values));
    }
}

/// Console sink that buffers output for assertions.
#[derive(Default)]
pub struct CaptureConsole {
    log_lines: Mutex<Vec<Vec<Value>>>,
    warn_lines: Mutex<Vec<Vec<Value>>>,
}

impl CaptureConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged(&self) -> Vec<Vec<Value>> {
        self.log_lines.lock().clone()
    }

    pub fn warned(&self) -> Vec<Vec<Value>> {
        self.warn_lines.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.log_lines.lock().is_empty() && self.warn_lines.lock().is_empty()
    }
}

impl ConsoleSink for CaptureConsole {
    fn log(&self, values: &[Value]) {
        self.log_lines.lock().push(values.to_vec());
    }

    fn warn(&self, values: &[Value]) {
        self.warn_lines.lock().push(values.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_render_unquoted() {
        let rendered = render_values(&[json!("sync finished"), json!("ok")]);
        assert_eq!(rendered, "sync finished ok");
    }

    #[test]
    fn structured_values_render_as_json() {
        let rendered = render_values(&[json!("state:"), json!({"count": 2}), json!(7)]);
        assert_eq!(rendered, "state: {\"count\":2} 7");
    }

    #[test]
    fn empty_sequence_renders_empty() {
        assert_eq!(render_values(&[]), "");
    }

    #[test]
    fn capture_records_both_channels() {
        let console = CaptureConsole::new();
        console.log(&[json!("a")]);
        console.warn(&[json!("b")]);

        assert_eq!(console.logged(), vec![vec![json!("a")]]);
        assert_eq!(console.warned(), vec![vec![json!("b")]]);
        assert!(!console.is_empty());
    }

    #[test]
    fn fresh_capture_is_empty() {
        assert!(CaptureConsole::new().is_empty());
    }
}
