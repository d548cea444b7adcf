use parking_lot::Mutex;

use skiff_core::collector::{Collector, ExtraFields, Scope};
use skiff_core::events::ErrorReport;

/// Recording collector for tests.
///
/// Unlike the HTTP transport it keeps the active scope in shared state, the
/// way a hub-style SDK does, so a leaked or reused scope shows up in later
/// captures.
#[derive(Default)]
pub struct RecordingCollector {
    state: Mutex<RecorderState>,
}

#[derive(Default)]
struct RecorderState {
    breadcrumbs: Vec<String>,
    captures: Vec<CapturedReport>,
    active_extras: Option<ExtraFields>,
    scopes_opened: usize,
    scopes_closed: usize,
}

/// One captured report plus the extras active at capture time.
#[derive(Clone, Debug, PartialEq)]
pub struct CapturedReport {
    pub report: ErrorReport,
    pub extras: Option<ExtraFields>,
}

impl RecordingCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn breadcrumbs(&self) -> Vec<String> {
        self.state.lock().breadcrumbs.clone()
    }

    pub fn captures(&self) -> Vec<CapturedReport> {
        self.state.lock().captures.clone()
    }

    pub fn scopes_opened(&self) -> usize {
        self.state.lock().scopes_opened
    }

    pub fn scopes_closed(&self) -> usize {
        self.state.lock().scopes_closed
    }

    /// Total submissions of any kind.
    pub fn call_count(&self) -> usize {
        let state = self.state.lock();
        state.breadcrumbs.len() + state.captures.len()
    }
}

impl Collector for RecordingCollector {
    fn record_breadcrumb(&self, message: String) {
        self.state.lock().breadcrumbs.push(message);
    }

    fn capture_error(&self, report: &ErrorReport) {
        let mut state = self.state.lock();
        let extras = state.active_extras.clone();
        state.captures.push(CapturedReport {
            report: report.clone(),
            extras,
        });
    }

    fn scope(&self) -> Box<dyn Scope + '_> {
        {
            let mut state = self.state.lock();
            state.scopes_opened += 1;
            state.active_extras = Some(ExtraFields::new());
        }
        Box::new(RecordingScope { collector: self })
    }
}

struct RecordingScope<'a> {
    collector: &'a RecordingCollector,
}

impl Scope for RecordingScope<'_> {
    fn set_extras(&mut self, extras: ExtraFields) {
        self.collector.state.lock().active_extras = Some(extras);
    }

    fn capture_error(&mut self, report: &ErrorReport) {
        Collector::capture_error(self.collector, report);
    }
}

impl Drop for RecordingScope<'_> {
    fn drop(&mut self) {
        let mut state = self.collector.state.lock();
        state.active_extras = None;
        state.scopes_closed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_report() -> ErrorReport {
        ErrorReport {
            kind: "io::Error".to_string(),
            message: "boom".to_string(),
            chain: vec![],
        }
    }

    #[test]
    fn records_breadcrumbs_in_order() {
        let collector = RecordingCollector::new();
        collector.record_breadcrumb("first".to_string());
        collector.record_breadcrumb("second".to_string());

        assert_eq!(collector.breadcrumbs(), vec!["first", "second"]);
        assert_eq!(collector.call_count(), 2);
    }

    #[test]
    fn direct_capture_has_no_extras() {
        let collector = RecordingCollector::new();
        collector.capture_error(&sample_report());

        let captures = collector.captures();
        assert_eq!(captures.len(), 1);
        assert!(captures[0].extras.is_none());
        assert_eq!(collector.scopes_opened(), 0);
    }

    #[test]
    fn scope_extras_visible_only_inside_scope() {
        let collector = RecordingCollector::new();
        {
            let mut scope = collector.scope();
            let mut extras = ExtraFields::new();
            extras.insert("message".to_string(), json!("ctx"));
            scope.set_extras(extras);
            scope.capture_error(&sample_report());
        }
        collector.capture_error(&sample_report());

        let captures = collector.captures();
        assert_eq!(captures.len(), 2);
        assert_eq!(
            captures[0].extras.as_ref().unwrap()["message"],
            json!("ctx")
        );
        assert!(captures[1].extras.is_none());
        assert_eq!(collector.scopes_opened(), 1);
        assert_eq!(collector.scopes_closed(), 1);
    }

    #[test]
    fn scope_closes_on_unwind() {
        let collector = RecordingCollector::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = collector.scope();
            panic!("capture blew up");
        }));
        assert!(result.is_err());
        assert_eq!(collector.scopes_closed(), 1);

        collector.capture_error(&sample_report());
        assert!(collector.captures()[0].extras.is_none());
    }
}
