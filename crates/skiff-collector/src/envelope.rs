use chrono::Utc;
use serde::{Deserialize, Serialize};

use skiff_core::collector::ExtraFields;
use skiff_core::events::ErrorReport;
use skiff_core::ids::ReportId;

/// One wire record sent to the ingest endpoint, one POST per envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    Breadcrumb {
        message: String,
        timestamp: String,
    },
    Report {
        report_id: ReportId,
        timestamp: String,
        report: ErrorReport,
        #[serde(skip_serializing_if = "Option::is_none")]
        extra: Option<ExtraFields>,
    },
}

impl Envelope {
    pub fn breadcrumb(message: String) -> Self {
        Self::Breadcrumb {
            message,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn report(report: ErrorReport, extra: Option<ExtraFields>) -> Self {
        Self::Report {
            report_id: ReportId::new(),
            timestamp: Utc::now().to_rfc3339(),
            report,
            extra,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Breadcrumb { .. } => "breadcrumb",
            Self::Report { .. } => "report",
        }
    }
}
