//! Admin analytics report and CSV export.
//!
//! Every request recomputes from the raw rows; the date window is bounded
//! so range queries stay small.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use folio_core::analytics::{
    fill_day_buckets, reaction_tallies, referrer_breakdown, top_breakdown, Breakdown, DateWindow,
    DayBucket, ReactionTally, DEFAULT_TOP_N, RECENT_VIEWS_LIMIT,
};
use folio_core::export::views_csv;
use folio_core::types::DbId;
use folio_db::models::contact_click::HrefCount;
use folio_db::models::project_view::RecentView;
use folio_db::repositories::{ContactClickRepo, ProjectRepo, ProjectViewRepo, ReactionRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::admin::AdminSession;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl RangeParams {
    fn window(&self, state: &AppState) -> DateWindow {
        let limits = state.config.analytics;
        DateWindow::from_params(
            self.start.as_deref(),
            self.end.as_deref(),
            chrono::Utc::now().date_naive(),
            limits.default_range_days,
            limits.max_range_days,
        )
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsReport {
    /// The window actually used, after defaults and clamping.
    pub range: DateWindow,
    pub total_views: i64,
    pub unique_visitors: i64,
    pub recent_views: Vec<RecentView>,
    pub daily: Vec<DayBucket>,
    pub devices: Breakdown,
    pub referrers: Breakdown,
    pub reactions: BTreeMap<DbId, ReactionTally>,
    pub contact_clicks: Vec<HrefCount>,
}

/// GET /api/admin/analytics?start=&end=
///
/// Totals, the recent-views list, reactions and clicks are all-time; the
/// daily series and the device/referrer breakdowns cover the window only.
pub async fn analytics_report(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> AppResult<impl IntoResponse> {
    let window = params.window(&state);
    let (from, until) = (window.starts_at(), window.ends_before());
    let pool = &state.pool;

    let (
        total_views,
        unique_visitors,
        recent_views,
        day_counts,
        device_counts,
        referrer_counts,
        project_ids,
        reaction_counts,
        contact_clicks,
    ) = tokio::try_join!(
        ProjectViewRepo::count_all(pool),
        ProjectViewRepo::count_unique_visitors(pool),
        ProjectViewRepo::recent(pool, RECENT_VIEWS_LIMIT),
        ProjectViewRepo::daily_counts(pool, from, until),
        ProjectViewRepo::device_counts(pool, from, until),
        ProjectViewRepo::referrer_counts(pool, from, until),
        ProjectRepo::list_ids(pool),
        ReactionRepo::counts_all(pool),
        ContactClickRepo::counts_by_href(pool),
    )?;

    let day_counts: Vec<_> = day_counts.into_iter().map(|d| (d.day, d.count)).collect();
    let reaction_counts: Vec<_> = reaction_counts
        .into_iter()
        .map(|r| (r.project_id, r.kind, r.count))
        .collect();

    let report = AnalyticsReport {
        range: window,
        total_views,
        unique_visitors,
        recent_views,
        daily: fill_day_buckets(&window, &day_counts),
        devices: top_breakdown(
            device_counts
                .into_iter()
                .map(|row| (row.label.unwrap_or_default(), row.count)),
            DEFAULT_TOP_N,
        ),
        referrers: referrer_breakdown(
            referrer_counts.into_iter().map(|row| (row.label, row.count)),
            DEFAULT_TOP_N,
        ),
        reactions: reaction_tallies(&project_ids, &reaction_counts),
        contact_clicks,
    };

    tracing::debug!(
        start = %window.start,
        end = %window.end,
        total_views,
        "Analytics report built",
    );

    Ok(Json(DataResponse { data: report }))
}

/// GET /api/admin/analytics/export?start=&end=
///
/// Every view in the window as CSV, newest first.
pub async fn export_views_csv(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> AppResult<impl IntoResponse> {
    let window = params.window(&state);
    let rows =
        ProjectViewRepo::export_range(&state.pool, window.starts_at(), window.ends_before())
            .await?;

    let csv = views_csv(rows.iter().map(|row| row.as_csv_row()));
    tracing::info!(rows = rows.len(), start = %window.start, end = %window.end, "Analytics export");

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=analytics.csv"),
        ],
        csv,
    ))
}
