use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::collector::ExtraFields;

/// Build a loggable value sequence with `json!` literal syntax per element.
#[macro_export]
macro_rules! values {
    ($($tokens:tt)*) => {
        $crate::events::__into_values($crate::json!([$($tokens)*]))
    };
}

#[doc(hidden)]
pub fn __into_values(value: Value) -> Vec<Value> {
    match value {
        Value::Array(values) => values,
        other => vec![other],
    }
}

/// Extra context accompanying an error event.
///
/// A bare message is normalized into a `{"message": ...}` mapping before it
/// reaches the collector; a mapping passes through untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum ExtraContext {
    Message(String),
    Fields(ExtraFields),
}

impl ExtraContext {
    /// Normalize into the fields attached to a capture scope.
    pub fn into_fields(self) -> ExtraFields {
        match self {
            Self::Message(message) => {
                let mut fields = Map::new();
                fields.insert("message".to_string(), Value::String(message));
                fields
            }
            Self::Fields(fields) => fields,
        }
    }
}

impl From<&str> for ExtraContext {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for ExtraContext {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<ExtraFields> for ExtraContext {
    fn from(fields: ExtraFields) -> Self {
        Self::Fields(fields)
    }
}

impl From<Value> for ExtraContext {
    /// Strings and objects take their natural arm; any other JSON shape is
    /// coerced to its string rendering.
    fn from(value: Value) -> Self {
        match value {
            Value::String(message) => Self::Message(message),
            Value::Object(fields) => Self::Fields(fields),
            other => Self::Message(other.to_string()),
        }
    }
}

/// Snapshot of an error and its source chain, shaped for forwarding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Rust type name of the error value.
    pub kind: String,
    /// Top-level Display message.
    pub message: String,
    /// Display messages of the `source()` chain, outermost first.
    pub chain: Vec<String>,
}

impl ErrorReport {
    /// Snapshot `error` and everything `source()` reaches.
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        Self {
            kind: std::any::type_name::<E>().to_string(),
            message: error.to_string(),
            chain,
        }
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, thiserror::Error)]
    #[error("config malformed")]
    struct ConfigError {
        #[source]
        source: std::io::Error,
    }

    #[test]
    fn message_normalizes_to_mapping() {
        let fields = ExtraContext::from("foo").into_fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["message"], json!("foo"));
    }

    #[test]
    fn fields_pass_through_untouched() {
        let mut fields = ExtraFields::new();
        fields.insert("attempt".to_string(), json!(3));
        fields.insert("stage".to_string(), json!("sync"));

        let normalized = ExtraContext::from(fields.clone()).into_fields();
        assert_eq!(normalized, fields);
    }

    #[test]
    fn json_string_becomes_message() {
        let extra = ExtraContext::from(json!("plain"));
        assert_eq!(extra, ExtraContext::Message("plain".to_string()));
    }

    #[test]
    fn json_object_becomes_fields() {
        let extra = ExtraContext::from(json!({"k": 1}));
        match extra {
            ExtraContext::Fields(fields) => assert_eq!(fields["k"], json!(1)),
            other => panic!("expected fields, got {other:?}"),
        }
    }

    #[test]
    fn other_json_shapes_coerce_to_message() {
        assert_eq!(
            ExtraContext::from(json!(42)),
            ExtraContext::Message("42".to_string())
        );
        assert_eq!(
            ExtraContext::from(json!([1, 2])),
            ExtraContext::Message("[1,2]".to_string())
        );
        assert_eq!(
            ExtraContext::from(json!(null)),
            ExtraContext::Message("null".to_string())
        );
    }

    #[test]
    fn report_captures_source_chain() {
        let error = ConfigError {
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "settings.toml missing"),
        };

        let report = ErrorReport::from_error(&error);
        assert!(report.kind.ends_with("ConfigError"));
        assert_eq!(report.message, "config malformed");
        assert_eq!(report.chain, vec!["settings.toml missing".to_string()]);
    }

    #[test]
    fn report_without_source_has_empty_chain() {
        let error = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let report = ErrorReport::from_error(&error);
        assert_eq!(report.message, "boom");
        assert!(report.chain.is_empty());
    }

    #[test]
    fn report_serializes_flat() {
        let report = ErrorReport {
            kind: "io::Error".to_string(),
            message: "boom".to_string(),
            chain: vec!["inner".to_string()],
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({"kind": "io::Error", "message": "boom", "chain": ["inner"]})
        );
    }

    #[test]
    fn values_macro_builds_sequences() {
        let seq = values!["sync finished", 3, {"stage": "upload"}];
        assert_eq!(seq, vec![json!("sync finished"), json!(3), json!({"stage": "upload"})]);

        let empty = values![];
        assert!(empty.is_empty());
    }
}
