//! Project view rows and the aggregate shapes read back for analytics.

use chrono::NaiveDate;
use folio_core::device::DeviceType;
use folio_core::export::ViewCsvRow;
use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `project_views` table. Never updated once written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectView {
    pub id: DbId,
    pub project_id: DbId,
    pub path: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub visitor_id: Option<String>,
    #[sqlx(try_from = "String")]
    pub device_type: DeviceType,
    pub created_at: Timestamp,
}

/// DTO for recording a view.
#[derive(Debug, Clone)]
pub struct CreateProjectView {
    pub project_id: DbId,
    pub path: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub visitor_id: Option<String>,
    pub device_type: DeviceType,
}

/// A view joined with its project, for the "recent views" listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecentView {
    pub id: DbId,
    pub project_slug: String,
    pub project_title: String,
    pub path: String,
    pub referrer: Option<String>,
    pub device_type: String,
    pub created_at: Timestamp,
}

/// A view as written to the CSV export.
#[derive(Debug, Clone, FromRow)]
pub struct ViewExportRow {
    pub created_at: Timestamp,
    pub project_slug: String,
    pub path: String,
    pub referrer: Option<String>,
    pub device_type: String,
}

impl ViewExportRow {
    pub fn as_csv_row(&self) -> ViewCsvRow<'_> {
        ViewCsvRow {
            created_at: self.created_at,
            project_slug: &self.project_slug,
            path: Some(&self.path),
            referrer: self.referrer.as_deref(),
            device_type: Some(&self.device_type),
        }
    }
}

/// Number of views on one calendar day (UTC).
#[derive(Debug, Clone, FromRow)]
pub struct DayCount {
    pub day: NaiveDate,
    pub count: i64,
}

/// Number of views sharing a grouping value (device type, raw referrer).
#[derive(Debug, Clone, FromRow)]
pub struct LabelCount {
    pub label: Option<String>,
    pub count: i64,
}
