pub mod envelope;
pub mod http;
pub mod mock;

use skiff_core::collector::{Collector, ExtraFields, Scope};
use skiff_core::events::ErrorReport;

pub use envelope::Envelope;
pub use http::{CollectorConfig, CollectorError, HttpCollector};
pub use mock::RecordingCollector;

/// Collector that discards everything. Used when no ingest endpoint is
/// configured.
pub struct NoopCollector;

impl Collector for NoopCollector {
    fn record_breadcrumb(&self, _message: String) {}

    fn capture_error(&self, _report: &ErrorReport) {}

    fn scope(&self) -> Box<dyn Scope + '_> {
        Box::new(NoopScope)
    }
}

struct NoopScope;

impl Scope for NoopScope {
    fn set_extras(&mut self, _extras: ExtraFields) {}

    fn capture_error(&mut self, _report: &ErrorReport) {}
}
