use crate::common::utils::str::pluralize;

/// Formats a duration as `H:MM:SS`, prefixed by the number of days for
/// durations longer than a day (e.g. `1 day, 22:21:47`).
/// Sub-second precision is truncated.
pub fn format_duration_hms(duration: chrono::Duration) -> String {
    let mut seconds = duration.num_seconds().max(0);
    let days = seconds / 86400;
    seconds %= 86400;
    let hours = seconds / 3600;
    seconds %= 3600;
    let minutes = seconds / 60;
    seconds %= 60;

    let hms = format!("{hours}:{minutes:02}:{seconds:02}");
    if days > 0 {
        format!("{days} {}, {hms}", pluralize("day", days as usize))
    } else {
        hms
    }
}

/// Formats a fraction in `[0, 1]` as a whole percentage, e.g. `0.976` => `98%`.
pub fn format_percentage(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use crate::common::format::{format_duration_hms, format_percentage};
    use chrono::Duration;

    #[test]
    fn test_format_duration_hms() {
        assert_eq!(format_duration_hms(Duration::seconds(0)), "0:00:00");
        assert_eq!(format_duration_hms(Duration::seconds(61)), "0:01:01");
        assert_eq!(
            format_duration_hms(Duration::hours(10) + Duration::minutes(5)),
            "10:05:00"
        );
        assert_eq!(
            format_duration_hms(Duration::milliseconds(3_661_999)),
            "1:01:01"
        );
    }

    #[test]
    fn test_format_duration_days() {
        assert_eq!(
            format_duration_hms(Duration::days(1) + Duration::seconds(80507)),
            "1 day, 22:21:47"
        );
        assert_eq!(format_duration_hms(Duration::days(2)), "2 days, 0:00:00");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.0), "0%");
        assert_eq!(format_percentage(0.976), "98%");
        assert_eq!(format_percentage(1.0), "100%");
    }
}
