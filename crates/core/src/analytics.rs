//! Bucketing and ranking for the admin analytics report.
//!
//! The database does the grouping; this module turns grouped rows into the
//! shapes the dashboard draws: a zero-filled daily series, top-N breakdowns
//! with a scale maximum, and per-project reaction tallies.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::content::ReactionKind;
use crate::types::{DbId, Timestamp};
use crate::validation::clamp_date_range;

/// Label used for views that arrived without a referrer.
pub const DIRECT_REFERRER: &str = "direct";

/// Default number of rows kept in a breakdown.
pub const DEFAULT_TOP_N: usize = 10;

/// Number of rows in the "recent views" listing.
pub const RECENT_VIEWS_LIMIT: i64 = 20;

static URL_HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://(?:[^@/?#]*@)?(\[[^\]]+\]|[^:/?#\s]+)")
        .expect("valid regex")
});

// ---------------------------------------------------------------------------
// Date window
// ---------------------------------------------------------------------------

/// An end-inclusive window of calendar days (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Build a window from raw query parameters.
    ///
    /// Each bound accepts `YYYY-MM-DD` or an RFC 3339 timestamp. A missing or
    /// unparseable `end` means `today`; a missing or unparseable `start`
    /// means `default_days` before the end, or the earliest representable
    /// day when that would underflow. The result is ordered and its span
    /// bounded by `max_days` with [`clamp_date_range`].
    pub fn from_params(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
        default_days: i64,
        max_days: i64,
    ) -> Self {
        let end = end.and_then(parse_day).unwrap_or(today);
        let start = start.and_then(parse_day).unwrap_or_else(|| {
            end.checked_sub_signed(Duration::days(default_days))
                .unwrap_or(NaiveDate::MIN)
        });
        let (start, end) = clamp_date_range(start, end, max_days);
        Self { start, end }
    }

    /// Inclusive lower bound as a timestamp (midnight UTC of `start`).
    pub fn starts_at(&self) -> Timestamp {
        midnight(self.start)
    }

    /// Exclusive upper bound as a timestamp (midnight UTC after `end`).
    ///
    /// Saturates at the last representable instant when `end` is the last
    /// representable day.
    pub fn ends_before(&self) -> Timestamp {
        match self.end.succ_opt() {
            Some(next) => midnight(next),
            None => DateTime::from_naive_utc_and_offset(NaiveDateTime::MAX, Utc),
        }
    }

    /// Every calendar day in the window, oldest first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |day| *day <= self.end)
    }
}

fn midnight(day: NaiveDate) -> Timestamp {
    DateTime::from_naive_utc_and_offset(day.and_time(NaiveTime::MIN), Utc)
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&Utc).date_naive())
    })
}

// ---------------------------------------------------------------------------
// Daily histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub count: i64,
}

/// One bucket per day of `window`, zero-filled, chronological.
///
/// Counts for days outside the window are ignored.
pub fn fill_day_buckets(window: &DateWindow, counts: &[(NaiveDate, i64)]) -> Vec<DayBucket> {
    let mut by_day: HashMap<NaiveDate, i64> = HashMap::with_capacity(counts.len());
    for (day, count) in counts {
        *by_day.entry(*day).or_default() += count;
    }

    window
        .days()
        .map(|day| DayBucket {
            date: day.format("%Y-%m-%d").to_string(),
            count: by_day.get(&day).copied().unwrap_or(0),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Breakdowns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: i64,
}

/// Ranked buckets plus the largest count, which the dashboard uses to
/// scale its bars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub buckets: Vec<Bucket>,
    pub max: i64,
}

/// Merge counts by label, rank by count (ties by label) and keep `limit`.
pub fn top_breakdown<I>(counts: I, limit: usize) -> Breakdown
where
    I: IntoIterator<Item = (String, i64)>,
{
    let mut merged: HashMap<String, i64> = HashMap::new();
    for (label, count) in counts {
        *merged.entry(label).or_default() += count;
    }

    let mut buckets: Vec<Bucket> = merged
        .into_iter()
        .map(|(label, count)| Bucket { label, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    buckets.truncate(limit);

    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0);
    Breakdown { buckets, max }
}

/// Reduce a referrer URL to its hostname.
///
/// Absent or blank referrers become [`DIRECT_REFERRER`]; values that do not
/// look like an absolute URL are returned trimmed but otherwise untouched.
pub fn referrer_host(referrer: Option<&str>) -> String {
    let Some(raw) = referrer.map(str::trim).filter(|r| !r.is_empty()) else {
        return DIRECT_REFERRER.to_string();
    };

    match URL_HOST_RE.captures(raw).and_then(|caps| caps.get(1)) {
        Some(host) => host.as_str().to_ascii_lowercase(),
        None => raw.to_string(),
    }
}

/// Breakdown of raw referrer counts by hostname.
pub fn referrer_breakdown<I>(rows: I, limit: usize) -> Breakdown
where
    I: IntoIterator<Item = (Option<String>, i64)>,
{
    top_breakdown(
        rows.into_iter()
            .map(|(referrer, count)| (referrer_host(referrer.as_deref()), count)),
        limit,
    )
}

// ---------------------------------------------------------------------------
// Reactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReactionTally {
    pub likes: i64,
    pub dislikes: i64,
}

impl ReactionTally {
    pub fn add(&mut self, kind: ReactionKind, count: i64) {
        match kind {
            ReactionKind::Like => self.likes += count,
            ReactionKind::Dislike => self.dislikes += count,
        }
    }
}

/// Tally reactions per project; every id in `project_ids` gets an entry,
/// `(0, 0)` when it has no reactions.
pub fn reaction_tallies(
    project_ids: &[DbId],
    counts: &[(DbId, ReactionKind, i64)],
) -> BTreeMap<DbId, ReactionTally> {
    let mut tallies: BTreeMap<DbId, ReactionTally> = project_ids
        .iter()
        .map(|id| (*id, ReactionTally::default()))
        .collect();

    for (project_id, kind, count) in counts {
        tallies.entry(*project_id).or_default().add(*kind, *count);
    }
    tallies
}
