use chrono::{NaiveDateTime, Timelike};

pub fn one_hour() -> chrono::Duration {
    chrono::Duration::hours(1)
}

/// Drops the minutes, seconds and sub-second part of `time`.
pub fn truncate_to_hour(time: NaiveDateTime) -> NaiveDateTime {
    time.date()
        .and_hms_opt(time.hour(), 0, 0)
        .unwrap_or(time)
}

/// Current local wall-clock time with second resolution, the same resolution
/// that Slurm uses for its timestamps.
pub fn now_local() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
