use std::sync::LazyLock;

use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;

static JUST_NOW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^just now\b").unwrap());
static AGO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago\b").unwrap());

/// Resolve a phrase like "3 hours ago" against `now`.
///
/// Only "just now" and `<n> minute|hour|day|week(s) ago` are understood, matched
/// at the start of the trimmed, lower-cased text. Trailing text is ignored
/// only after a word boundary: "2 days ago, edited" resolves, "2 days agone"
/// does not. Everything else (months, absolute dates, localized strings,
/// overflowing counts) is `None`, which callers must read as "recency unknown".
pub fn resolve(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let text = text.trim().to_lowercase();

    if JUST_NOW_RE.is_match(&text) {
        return Some(now);
    }

    let caps = AGO_RE.captures(&text)?;
    let n: i64 = caps[1].parse().ok()?;
    let delta = match &caps[2] {
        "minute" => TimeDelta::try_minutes(n),
        "hour" => TimeDelta::try_hours(n),
        "day" => TimeDelta::try_days(n),
        "week" => TimeDelta::try_weeks(n),
        _ => None,
    }?;
    now.checked_sub_signed(delta)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn each_unit_subtracts_exactly() {
        assert_eq!(resolve("3 hours ago", now()), Some(now() - TimeDelta::hours(3)));
        assert_eq!(resolve("45 minutes ago", now()), Some(now() - TimeDelta::minutes(45)));
        assert_eq!(resolve("2 days ago", now()), Some(now() - TimeDelta::days(2)));
        assert_eq!(resolve("1 week ago", now()), Some(now() - TimeDelta::weeks(1)));
    }

    #[test]
    fn just_now_is_now() {
        assert_eq!(resolve("just now", now()), Some(now()));
        assert_eq!(resolve("  Just Now ", now()), Some(now()));
    }

    #[test]
    fn case_and_whitespace_insensitive() {
        assert_eq!(resolve("  1 HOUR AGO", now()), Some(now() - TimeDelta::hours(1)));
        assert_eq!(resolve("5  days   ago", now()), Some(now() - TimeDelta::days(5)));
    }

    #[test]
    fn trailing_text_ignored() {
        assert_eq!(
            resolve("2 days ago • Edited", now()),
            Some(now() - TimeDelta::days(2))
        );
    }

    #[test]
    fn unsupported_forms_unresolved() {
        assert_eq!(resolve("last month", now()), None);
        assert_eq!(resolve("2 months ago", now()), None);
        assert_eq!(resolve("Oct 12, 2026", now()), None);
        assert_eq!(resolve("3h", now()), None);
        assert_eq!(resolve("hace 3 horas", now()), None);
        assert_eq!(resolve("", now()), None);
    }

    #[test]
    fn trailing_text_needs_word_boundary() {
        assert_eq!(resolve("just nowhere", now()), None);
        assert_eq!(resolve("2 days agone", now()), None);
        assert_eq!(resolve("just now, via mobile", now()), Some(now()));
    }

    #[test]
    fn match_is_anchored_at_start() {
        assert_eq!(resolve("edited 3 hours ago", now()), None);
    }

    #[test]
    fn overflow_is_unresolved() {
        assert_eq!(resolve("99999999999999999999 days ago", now()), None);
        assert_eq!(resolve("9223372036854775807 weeks ago", now()), None);
    }
}
