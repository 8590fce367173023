//! Time field resolution.
//!
//! Result tables carry a personal (chip) time and an official result time.
//! Either may hold a placeholder instead of a value. This module picks the
//! authoritative text and parses it into a [`Duration`].

use chrono::Duration;

/// Raw values that mean "no time recorded".
const NULL_TIME_SENTINELS: [&str; 5] = ["00:00:00", "0", "", "NaT", "None"];

/// The elapsed time of a result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElapsedTime {
    /// A parsed duration.
    Recorded(Duration),
    /// Neither time field held a value.
    Missing,
    /// A value was present but is not a duration.
    Unparseable,
}

impl ElapsedTime {
    /// Returns the duration if one was recorded.
    pub const fn duration(&self) -> Option<Duration> {
        match self {
            Self::Recorded(d) => Some(*d),
            Self::Missing | Self::Unparseable => None,
        }
    }
}

/// Returns `true` if `value` is absent or a null-time sentinel.
fn is_null_time(value: Option<&str>) -> bool {
    value.is_none_or(|v| NULL_TIME_SENTINELS.contains(&v.trim()))
}

/// Picks the authoritative time text: personal time first, then result time.
///
/// Returns an empty string when both are missing or sentinels.
pub fn choose_time_text(personal: Option<&str>, result: Option<&str>) -> String {
    [personal, result]
        .into_iter()
        .find(|v| !is_null_time(*v))
        .flatten()
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Parses `H:MM:SS`, `HH:MM:SS(.fff)` or `M:SS` into a duration.
///
/// Resolution is milliseconds; extra fractional digits are truncated.
pub fn parse_duration(text: &str) -> Option<Duration> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => {
            let minutes = parse_digits(m)?;
            if minutes >= 60 {
                return None;
            }
            (parse_digits(h)?, minutes, *s)
        }
        [m, s] => (0, parse_digits(m)?, *s),
        _ => return None,
    };

    let (whole, fraction) = seconds.split_once('.').unwrap_or((seconds, ""));
    let whole = parse_digits(whole)?;
    if whole >= 60 {
        return None;
    }
    let millis = parse_fraction_millis(fraction)?;

    let total_ms = hours
        .checked_mul(60)?
        .checked_add(minutes)?
        .checked_mul(60)?
        .checked_add(whole)?
        .checked_mul(1000)?
        .checked_add(millis)?;
    Duration::try_milliseconds(i64::try_from(total_ms).ok()?)
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_fraction_millis(fraction: &str) -> Option<u64> {
    if fraction.is_empty() {
        return Some(0);
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded: String = fraction.chars().chain("000".chars()).take(3).collect();
    padded.parse().ok()
}

/// Resolves both time fields into the authoritative text and its elapsed time.
pub fn resolve(personal: Option<&str>, result: Option<&str>) -> (String, ElapsedTime) {
    let text = choose_time_text(personal, result);
    let elapsed = if text.is_empty() {
        ElapsedTime::Missing
    } else {
        parse_duration(&text).map_or(ElapsedTime::Unparseable, ElapsedTime::Recorded)
    };
    (text, elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(h: i64, m: i64, s: i64) -> Duration {
        Duration::seconds(h * 3600 + m * 60 + s)
    }

    #[test]
    fn prefers_personal_time_over_result() {
        assert_eq!(choose_time_text(Some("00:40:00"), Some("00:41:00")), "00:40:00");
    }

    #[test]
    fn falls_back_to_result_if_personal_is_zero() {
        assert_eq!(choose_time_text(Some("00:00:00"), Some("00:41:00")), "00:41:00");
        assert_eq!(choose_time_text(Some("0"), Some("00:41:00")), "00:41:00");
        assert_eq!(choose_time_text(Some("  "), Some("00:41:00")), "00:41:00");
    }

    #[test]
    fn uses_result_when_personal_missing() {
        assert_eq!(choose_time_text(None, Some("00:42:00")), "00:42:00");
    }

    #[test]
    fn empty_when_both_invalid() {
        assert_eq!(choose_time_text(Some("00:00:00"), Some("00:00:00")), "");
        assert_eq!(choose_time_text(None, None), "");
    }

    #[test]
    fn nat_and_none_text_are_invalid() {
        assert_eq!(choose_time_text(Some("NaT"), Some("None")), "");
        assert_eq!(choose_time_text(Some("None"), Some("01:02:03")), "01:02:03");
    }

    #[test]
    fn parses_clock_formats() {
        assert_eq!(parse_duration("01:45:00"), Some(hms(1, 45, 0)));
        assert_eq!(parse_duration("1:40:07"), Some(hms(1, 40, 7)));
        assert_eq!(parse_duration("25:13"), Some(hms(0, 25, 13)));
        assert_eq!(
            parse_duration("00:40:00.25"),
            Some(hms(0, 40, 0) + Duration::milliseconds(250))
        );
        assert_eq!(
            parse_duration("00:40:00.123456"),
            Some(hms(0, 40, 0) + Duration::milliseconds(123))
        );
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["", "abc", "1:2:3:4", "00:75:00", "00:10:61", "-1:00:00", "1::00", "DNF"] {
            assert_eq!(parse_duration(text), None, "{text}");
        }
    }

    #[test]
    fn oversized_hours_are_unparseable() {
        for text in ["99999999999999999:00:00", "2562047788015216:00:00"] {
            assert_eq!(parse_duration(text), None, "{text}");
            assert_eq!(resolve(Some(text), None).1, ElapsedTime::Unparseable);
        }
    }

    #[test]
    fn resolve_distinguishes_missing_from_unparseable() {
        assert_eq!(resolve(Some("00:00:00"), None), (String::new(), ElapsedTime::Missing));
        assert_eq!(
            resolve(Some("DNF"), Some("00:41:00")),
            ("DNF".to_string(), ElapsedTime::Unparseable)
        );
        assert_eq!(
            resolve(None, Some("00:41:00")),
            ("00:41:00".to_string(), ElapsedTime::Recorded(hms(0, 41, 0)))
        );
    }

    #[test]
    fn recorded_durations_compare_by_total_time() {
        let a = parse_duration("1:05:00").unwrap();
        let b = parse_duration("59:59").unwrap();
        assert!(b < a);
    }
}
