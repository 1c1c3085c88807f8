//! Free-text call lengths as typed into the manual interaction form.

const MINUTE_SUFFIXES: [&str; 5] = ["minutes", "minute", "mins", "min", "m"];
const SECOND_SUFFIXES: [&str; 5] = ["seconds", "second", "secs", "sec", "s"];

/// Converts a call length such as `5 min`, `5m`, `5:30`, `120s` or `7` into
/// minutes. Formats are tried in that order, case-insensitively. Empty or
/// unrecognised text is `0.0`.
pub fn parse_duration(text: &str) -> f64 {
    let normalized = text.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return 0.0;
    }

    if let Some(minutes) = with_suffix(&normalized, &MINUTE_SUFFIXES) {
        return minutes;
    }

    if let Some((mins, secs)) = normalized.split_once(':') {
        if let (Some(mins), Some(secs)) = (parse_count(mins), parse_count(secs)) {
            return mins + secs / 60.0;
        }
    }

    if let Some(seconds) = with_suffix(&normalized, &SECOND_SUFFIXES) {
        return seconds / 60.0;
    }

    parse_count(&normalized).unwrap_or(0.0)
}

fn with_suffix(text: &str, suffixes: &[&str]) -> Option<f64> {
    suffixes
        .iter()
        .find_map(|suffix| text.strip_suffix(suffix))
        .and_then(|number| parse_count(number.trim_end()))
}

/// Unsigned decimal digits only; signs, fractions and separators are rejected.
fn parse_count(text: &str) -> Option<f64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u64>().ok().map(|n| n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognised_formats() {
        assert_eq!(parse_duration("5m"), 5.0);
        assert_eq!(parse_duration("5 min"), 5.0);
        assert_eq!(parse_duration("5:30"), 5.5);
        assert_eq!(parse_duration("120s"), 2.0);
        assert_eq!(parse_duration("7"), 7.0);
    }

    #[test]
    fn unparseable_input_is_zero() {
        assert_eq!(parse_duration(""), 0.0);
        assert_eq!(parse_duration("   "), 0.0);
        assert_eq!(parse_duration("garbage"), 0.0);
        assert_eq!(parse_duration("m"), 0.0);
        assert_eq!(parse_duration("-3"), 0.0);
        assert_eq!(parse_duration("1:02:03"), 0.0);
    }

    #[test]
    fn case_and_whitespace_are_ignored() {
        assert_eq!(parse_duration("  3 MIN "), 3.0);
        assert_eq!(parse_duration("4 Minutes"), 4.0);
        assert_eq!(parse_duration("90 Sec"), 1.5);
        assert_eq!(parse_duration(" 2:15 "), 2.25);
    }

    #[test]
    fn minute_format_wins_over_bare_number() {
        // "10m" must not be read as ten seconds or rejected as non-numeric.
        assert_eq!(parse_duration("10m"), 10.0);
        assert_eq!(parse_duration("10s"), 10.0 / 60.0);
    }
}
