pub mod collector;
pub mod consent;
pub mod console;
pub mod events;
pub mod ids;
pub mod mode;

pub use collector::{Collector, ExtraFields, Scope};
pub use consent::{ConsentResolver, ConsentState, SettingsError, SettingsStore};
pub use console::ConsoleSink;
pub use events::{ErrorReport, ExtraContext};
pub use ids::ReportId;
pub use mode::BuildMode;

// Re-exported for `values!` macro expansions.
#[doc(hidden)]
pub use serde_json::json;
