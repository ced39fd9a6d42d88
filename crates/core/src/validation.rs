//! Input sanitization helpers shared by the admin forms, the public
//! endpoints and the analytics range parser.
//!
//! All functions are total: they never fail, they fall back.

use std::ops::Sub;
use std::sync::LazyLock;

use chrono::Duration;
use regex::Regex;
use validator::ValidateEmail;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));

/// Turn arbitrary text into slug form.
///
/// Lowercases, trims, collapses every run of characters outside `[a-z0-9]`
/// into one hyphen and strips hyphens from both ends. The result may be
/// empty when the input has no ASCII alphanumerics.
///
/// ```
/// use folio_core::validation::normalize_slug;
///
/// assert_eq!(normalize_slug(" Hello World "), "hello-world");
/// assert_eq!(normalize_slug("ML & Data"), "ml-data");
/// ```
pub fn normalize_slug(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// `true` iff `text` is lowercase alphanumeric segments joined by single
/// hyphens.
pub fn is_valid_slug(text: &str) -> bool {
    SLUG_RE.is_match(text)
}

/// Parse the leading base-10 integer of `text`, returning `fallback` when
/// there is none.
///
/// Leading whitespace and one `+`/`-` sign are accepted, then the longest
/// run of ASCII digits is read and anything after it is ignored, so
/// `"12abc"` is 12 and `"3.7"` is 3. Input with no leading digits, or whose
/// digits overflow `i64`, yields `fallback`.
///
/// ```
/// use folio_core::validation::parse_int_or;
///
/// assert_eq!(parse_int_or(Some("12abc"), 0), 12);
/// assert_eq!(parse_int_or(Some("abc"), 5), 5);
/// ```
pub fn parse_int_or(text: Option<&str>, fallback: i64) -> i64 {
    text.and_then(leading_int).unwrap_or(fallback)
}

fn leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let magnitude = &rest[..digits];
    if negative {
        format!("-{magnitude}").parse().ok()
    } else {
        magnitude.parse().ok()
    }
}

/// Split a comma-separated list, trimming pieces and dropping empty ones.
pub fn split_csv(text: Option<&str>) -> Vec<String> {
    text.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Order a date range and bound its span to `max_days`.
///
/// A reversed pair is swapped first. If the span is still longer than
/// `max_days`, `start` moves forward so the span is exactly `max_days`;
/// `end` never moves.
///
/// Works for anything chrono can subtract, e.g. `NaiveDate` and
/// `DateTime<Utc>`.
pub fn clamp_date_range<T>(start: T, end: T, max_days: i64) -> (T, T)
where
    T: Copy + PartialOrd + Sub<T, Output = Duration> + Sub<Duration, Output = T>,
{
    let (start, end) = if start > end { (end, start) } else { (start, end) };
    let max_span = Duration::days(max_days);

    if end - start > max_span {
        (end - max_span, end)
    } else {
        (start, end)
    }
}

/// Loose email check used by the newsletter form: RFC-ish local part and a
/// domain that contains at least one dot.
pub fn is_valid_email(email: &str) -> bool {
    let has_dotted_domain = email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.') && !domain.ends_with('.'));
    has_dotted_domain && email.to_string().validate_email()
}
