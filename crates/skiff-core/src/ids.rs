use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned to one forwarded error report.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(String);

impl ReportId {
    pub fn new() -> Self {
        Self(format!("rep_{}", Uuid::now_v7()))
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_prefix() {
        let id = ReportId::new();
        assert!(id.as_str().starts_with("rep_"));
    }

    #[test]
    fn ids_are_unique() {
        let a = ReportId::new();
        let b = ReportId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ReportId::from_raw("rep_fixed");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"rep_fixed\"");
    }
}
