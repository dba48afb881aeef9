//! Display helpers shared by every view.

use chrono::{DateTime, Utc};

/// Formats `count` with `noun`, appending `s` unless the count is one.
///
/// ```
/// use rhole_domain::format::pluralize;
///
/// assert_eq!(pluralize(1, "Request"), "1 Request");
/// assert_eq!(pluralize(0, "Request"), "0 Requests");
/// ```
#[must_use]
pub fn pluralize(count: usize, noun: &str) -> String {
    pluralize_with(count, noun, "s")
}

/// Like [`pluralize`] with a custom suffix (`"S"` for upper-case headings).
#[must_use]
pub fn pluralize_with(count: usize, noun: &str, suffix: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}{suffix}")
    }
}

#[derive(Clone, Copy)]
enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    const fn name(self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

const DIVISIONS: [(f64, Unit); 7] = [
    (60.0, Unit::Second),
    (60.0, Unit::Minute),
    (24.0, Unit::Hour),
    (7.0, Unit::Day),
    (4.345_24, Unit::Week),
    (12.0, Unit::Month),
    (f64::INFINITY, Unit::Year),
];

/// Formats `then` relative to `now`, e.g. "3 minutes ago", "yesterday", "now".
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let mut duration = (then - now).num_milliseconds() as f64 / 1000.0;

    for (amount, unit) in DIVISIONS {
        if duration.abs() < amount {
            // Round half up, as browsers do.
            let value = (duration + 0.5).floor() as i64;
            return relative(value, unit);
        }
        duration /= amount;
    }

    // The last division is unbounded.
    String::from("now")
}

#[allow(clippy::cast_possible_truncation)]
fn relative(value: i64, unit: Unit) -> String {
    let name = unit.name();
    match (value, unit) {
        (0, Unit::Second) => "now".to_string(),
        (0, Unit::Day) => "today".to_string(),
        (0, _) => format!("this {name}"),
        (-1, Unit::Day) => "yesterday".to_string(),
        (1, Unit::Day) => "tomorrow".to_string(),
        (-1, Unit::Week | Unit::Month | Unit::Year) => format!("last {name}"),
        (1, Unit::Week | Unit::Month | Unit::Year) => format!("next {name}"),
        (v, _) if v < 0 => format!("{} ago", pluralize(v.unsigned_abs() as usize, name)),
        (v, _) => format!("in {}", pluralize(v.unsigned_abs() as usize, name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(2, "Request"), "2 Requests");
        assert_eq!(pluralize_with(1, "HEADER", "S"), "1 HEADER");
        assert_eq!(pluralize_with(3, "QUERY PARAM", "S"), "3 QUERY PARAMS");
    }

    #[test]
    fn test_time_ago() {
        let now = Utc::now();
        assert_eq!(format_time_ago(now, now), "now");
        assert_eq!(format_time_ago(now - Duration::seconds(5), now), "5 seconds ago");
        assert_eq!(format_time_ago(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_time_ago(now - Duration::minutes(42), now), "42 minutes ago");
        assert_eq!(format_time_ago(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(format_time_ago(now - Duration::days(1), now), "yesterday");
        assert_eq!(format_time_ago(now - Duration::days(14), now), "2 weeks ago");
        assert_eq!(format_time_ago(now - Duration::days(800), now), "2 years ago");
        assert_eq!(format_time_ago(now + Duration::minutes(2), now), "in 2 minutes");
    }
}
