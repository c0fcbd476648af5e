use chrono::Duration;

use crate::common::utils::time::{one_hour, truncate_to_hour};
use crate::usage::interval::Interval;
use crate::usage::window::UsageWindow;

/// Occupied time of a single resource per hour-aligned slot of a [`UsageWindow`].
///
/// Slot 0 is a spillover slot: it collects everything that happened before
/// the window start and in the (partial) hour in which the window starts.
/// Slot `i > 0` covers the `i`-th full hour after the start hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyOccupancy {
    // Invariant: there is always at least the spillover slot
    slots: Vec<Duration>,
}

impl HourlyOccupancy {
    pub fn slots(&self) -> &[Duration] {
        &self.slots
    }

    /// Hourly slots without the spillover slot.
    pub fn window_slots(&self) -> &[Duration] {
        &self.slots[1..]
    }

    pub fn total(&self) -> Duration {
        self.slots.iter().fold(Duration::zero(), |acc, d| acc + *d)
    }
}

/// Splits `intervals` along hour boundaries and sums up the occupied time of each hour.
///
/// Interval ends are clipped to the end of the window.
pub fn accumulate(intervals: &[Interval], window: &UsageWindow) -> HourlyOccupancy {
    let mut slots = vec![Duration::zero(); window.slot_count()];
    let last_slot = slots.len() - 1;
    let window_end = window.end();

    for interval in intervals {
        let mut start = interval.start;
        let stop = interval.end.min(window_end);
        if stop < start {
            continue;
        }

        loop {
            let slot = &mut slots[window.slot_index(start).min(last_slot)];
            if truncate_to_hour(start) == truncate_to_hour(stop) {
                *slot += stop - start;
                break;
            }
            let next_hour = truncate_to_hour(start) + one_hour();
            *slot += next_hour - start;
            start = next_hour;
        }
    }

    HourlyOccupancy { slots }
}
