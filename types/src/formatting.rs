//! Centralized display formatting for recap rows.
//!
//! Every amount, relative timestamp and "time ago" title shown to the user
//! goes through this module so the presentation layer and the replay tool
//! agree, including European-style number formatting (swapping `.` and `,`).

/// Swap `.` and `,` in a formatted number.
fn europeanize(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '.' => ',',
            ',' => '.',
            _ => c,
        })
        .collect()
}

#[inline]
fn maybe_eu(s: String, european: bool) -> String {
    if european { europeanize(&s) } else { s }
}

/// Format an amount with thousands separators.
///
/// Unlike raw combat log output, zero renders as `"0"` since a recap row
/// always shows its amount.
///
/// # Examples
/// ```
/// use deathrecap_types::formatting::format_amount;
/// assert_eq!(format_amount(0, false), "0");
/// assert_eq!(format_amount(950, false), "950");
/// assert_eq!(format_amount(12_345, false), "12,345");
/// assert_eq!(format_amount(1_500_000, true), "1.500.000");
/// ```
pub fn format_amount(n: u64, european: bool) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    maybe_eu(out, european)
}

/// Format a signed offset in seconds with one decimal place and an `s` suffix.
///
/// Negative values are before the reference point (time of death).
///
/// # Examples
/// ```
/// use deathrecap_types::formatting::format_relative_secs;
/// assert_eq!(format_relative_secs(-3.04, false), "-3.0s");
/// assert_eq!(format_relative_secs(-12.56, true), "-12,6s");
/// assert_eq!(format_relative_secs(0.0, false), "0.0s");
/// ```
pub fn format_relative_secs(secs: f64, european: bool) -> String {
    maybe_eu(format!("{:.1}s", secs), european)
}

/// Format a status duration as whole seconds.
///
/// # Examples
/// ```
/// use deathrecap_types::formatting::format_duration_secs;
/// assert_eq!(format_duration_secs(15.0), "15s");
/// assert_eq!(format_duration_secs(29.6), "30s");
/// ```
pub fn format_duration_secs(secs: f32) -> String {
    format!("{:.0}s", secs)
}

/// Format an elapsed span as a coarse "time ago" label.
///
/// - Under a minute: `"N seconds ago"`
/// - Under an hour: `"about a minute ago"` / `"about N minutes ago"`
/// - Otherwise: `"about an hour ago"` / `"about N hours ago"`
///
/// Negative spans (clock skew) are treated as zero.
///
/// # Examples
/// ```
/// use deathrecap_types::formatting::format_time_ago;
/// assert_eq!(format_time_ago(45), "45 seconds ago");
/// assert_eq!(format_time_ago(90), "about a minute ago");
/// assert_eq!(format_time_ago(125 * 60), "about 2 hours ago");
/// ```
pub fn format_time_ago(elapsed_secs: i64) -> String {
    let secs = elapsed_secs.max(0);
    if secs < 60 {
        return format!("{} seconds ago", secs);
    }

    let minutes = secs / 60;
    if minutes < 60 {
        return if minutes > 1 {
            format!("about {} minutes ago", minutes)
        } else {
            "about a minute ago".to_string()
        };
    }

    let hours = minutes / 60;
    if hours > 1 {
        format!("about {} hours ago", hours)
    } else {
        "about an hour ago".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0, false), "0");
        assert_eq!(format_amount(7, false), "7");
        assert_eq!(format_amount(999, false), "999");
        assert_eq!(format_amount(1_000, false), "1,000");
        assert_eq!(format_amount(2_000, false), "2,000");
        assert_eq!(format_amount(123_456, false), "123,456");
        assert_eq!(format_amount(1_234_567, false), "1,234,567");
    }

    #[test]
    fn test_format_amount_european() {
        assert_eq!(format_amount(500, true), "500");
        assert_eq!(format_amount(1_500, true), "1.500");
        assert_eq!(format_amount(1_234_567, true), "1.234.567");
    }

    #[test]
    fn test_format_relative_secs() {
        assert_eq!(format_relative_secs(-1.0, false), "-1.0s");
        assert_eq!(format_relative_secs(-0.24, false), "-0.2s");
        assert_eq!(format_relative_secs(-4.96, false), "-5.0s");
        assert_eq!(format_relative_secs(-4.96, true), "-5,0s");
        assert_eq!(format_relative_secs(0.5, false), "0.5s");
    }

    #[test]
    fn test_format_duration_secs() {
        assert_eq!(format_duration_secs(0.0), "0s");
        assert_eq!(format_duration_secs(10.2), "10s");
        assert_eq!(format_duration_secs(60.0), "60s");
    }

    #[test]
    fn test_format_time_ago_seconds() {
        assert_eq!(format_time_ago(0), "0 seconds ago");
        assert_eq!(format_time_ago(45), "45 seconds ago");
        assert_eq!(format_time_ago(59), "59 seconds ago");
        assert_eq!(format_time_ago(-5), "0 seconds ago");
    }

    #[test]
    fn test_format_time_ago_minutes() {
        assert_eq!(format_time_ago(60), "about a minute ago");
        assert_eq!(format_time_ago(90), "about a minute ago");
        assert_eq!(format_time_ago(120), "about 2 minutes ago");
        assert_eq!(format_time_ago(59 * 60 + 59), "about 59 minutes ago");
    }

    #[test]
    fn test_format_time_ago_hours() {
        assert_eq!(format_time_ago(60 * 60), "about an hour ago");
        assert_eq!(format_time_ago(119 * 60), "about an hour ago");
        assert_eq!(format_time_ago(125 * 60), "about 2 hours ago");
        assert_eq!(format_time_ago(30 * 60 * 60), "about 30 hours ago");
    }

    #[test]
    fn test_europeanize() {
        assert_eq!(europeanize("1,500"), "1.500");
        assert_eq!(europeanize("-3.5s"), "-3,5s");
        assert_eq!(europeanize("500"), "500");
    }
}
