use chrono::NaiveDateTime;
use serde::Serialize;

use crate::common::utils::time::{one_hour, truncate_to_hour};

/// The lookback period `[start, start + hours]` covered by a usage report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageWindow {
    pub start: NaiveDateTime,
    pub hours: u32,
}

impl UsageWindow {
    pub fn new(start: NaiveDateTime, hours: u32) -> Self {
        Self { start, hours }
    }

    /// Window of `hours` hours that ends at `now`.
    pub fn ending_at(now: NaiveDateTime, hours: u32) -> Self {
        Self::new(now - chrono::Duration::hours(hours as i64), hours)
    }

    pub fn end(&self) -> NaiveDateTime {
        self.start + self.duration()
    }

    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::hours(self.hours as i64)
    }

    /// Number of hourly accumulation slots, including the leading spillover slot.
    pub fn slot_count(&self) -> usize {
        self.hours as usize + 1
    }

    /// Index of the hourly slot that contains `time`.
    /// Everything before the window start belongs to the spillover slot 0,
    /// as does the remainder of the hour in which the window starts.
    pub fn slot_index(&self, time: NaiveDateTime) -> usize {
        if time < self.start {
            return 0;
        }
        let offset = truncate_to_hour(time) - truncate_to_hour(self.start);
        (offset.num_seconds() / one_hour().num_seconds()) as usize
    }
}
