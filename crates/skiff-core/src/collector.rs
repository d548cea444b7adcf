use serde_json::{Map, Value};

use crate::events::ErrorReport;

/// Extra key/value context attached to a scoped capture.
pub type ExtraFields = Map<String, Value>;

/// Remote diagnostics collector.
///
/// All methods are fire-and-forget enqueue operations: implementations must
/// not block the caller and must swallow their own delivery failures.
pub trait Collector: Send + Sync {
    /// Submit one breadcrumb message.
    fn record_breadcrumb(&self, message: String);

    /// Capture an error report with no additional context.
    fn capture_error(&self, report: &ErrorReport);

    /// Open a fresh capture scope. The scope is detached when the returned
    /// guard drops, even on unwind; extras set on it never outlive it.
    fn scope(&self) -> Box<dyn Scope + '_>;
}

/// Contextual envelope for a single scoped capture.
///
/// One scope serves one capture; callers create a new scope per call rather
/// than reusing instances.
pub trait Scope {
    /// Attach extra fields to captures made within this scope.
    fn set_extras(&mut self, extras: ExtraFields);

    /// Capture an error report within this scope.
    fn capture_error(&mut self, report: &ErrorReport);
}
