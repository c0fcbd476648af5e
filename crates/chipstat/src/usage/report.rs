//! Composes the per-resource usage table.
use std::collections::BTreeMap;
use std::num::NonZeroU32;

use chrono::Duration;
use serde::Serialize;

use crate::common::format::{format_duration_hms, format_percentage};
use crate::usage::bars;
use crate::usage::interval::{Interval, ResourceGroups};
use crate::usage::license::numeric_key;
use crate::usage::occupancy::accumulate;
use crate::usage::record::{DiscardReason, ParsedRecords};
use crate::usage::window::UsageWindow;

/// Shown instead of the mean duration of resources without jobs.
pub const NO_JOBS_SENTINEL: &str = "-";

/// Number of bins that fit below the header timestamps without extra padding.
const HEADER_BIN_SLACK: i64 = 12;

const HEADER_TIME_FORMAT: &str = "%d. %Hh";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub resource_id: String,
    pub job_count: usize,
    /// Mean job duration in whole seconds, `None` if there were no jobs.
    pub mean_duration_secs: Option<i64>,
    /// Fraction of the window during which the resource was allocated, capped at one.
    pub usage: f64,
    pub bar: String,
}

impl ReportRow {
    pub fn format_mean_duration(&self) -> String {
        match self.mean_duration_secs {
            Some(secs) => format_duration_hms(Duration::seconds(secs)),
            None => NO_JOBS_SENTINEL.to_string(),
        }
    }

    pub fn format_line(&self) -> String {
        format!(
            "{:>7}  {:4} {:>16}   {:>4}  {}",
            self.resource_id,
            self.job_count,
            self.format_mean_duration(),
            format_percentage(self.usage),
            self.bar
        )
    }
}

fn total_duration(intervals: &[Interval]) -> Duration {
    intervals
        .iter()
        .fold(Duration::zero(), |acc, interval| acc + interval.duration())
}

/// Computes the report row of a single resource.
///
/// Usage and mean duration are computed from the full job durations,
/// while the bar only shows the time spent inside the window.
pub fn compose_row(
    resource_id: &str,
    intervals: &[Interval],
    window: &UsageWindow,
    binwidth: NonZeroU32,
) -> ReportRow {
    let total = total_duration(intervals);
    let mean_duration_secs = match intervals.len() {
        0 => None,
        count => Some(total.num_seconds() / count as i64),
    };
    let usage = (total.num_seconds() as f64 / window.duration().num_seconds() as f64).min(1.0);
    let occupancy = accumulate(intervals, window);

    ReportRow {
        resource_id: resource_id.to_string(),
        job_count: intervals.len(),
        mean_duration_secs,
        usage,
        bar: bars::render(occupancy.window_slots(), binwidth),
    }
}

/// Computes one row per resource, ordered by the numeric key of the resource id
/// (highest first). Resources with equal keys keep their lexical order.
pub fn compose(
    groups: &ResourceGroups,
    window: &UsageWindow,
    binwidth: NonZeroU32,
) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = groups
        .iter()
        .map(|(resource_id, intervals)| compose_row(resource_id, intervals, window, binwidth))
        .collect();
    rows.sort_by_key(|row| std::cmp::Reverse(numeric_key(&row.resource_id)));
    rows
}

pub fn format_title(window: &UsageWindow) -> String {
    format!("Overview for last {} hours", window.hours)
}

/// Column header, followed by the window start and end above the bars.
pub fn format_header(window: &UsageWindow, binwidth: NonZeroU32) -> String {
    let bins = (window.hours / binwidth.get()) as i64;
    let gap = (bins - HEADER_BIN_SLACK).unsigned_abs() as usize;
    format!(
        "  SETUP  JOBS    MEAN DURATION  USAGE  {}{}{}",
        window.start.format(HEADER_TIME_FORMAT),
        " ".repeat(gap),
        window.end().format(HEADER_TIME_FORMAT)
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub window: UsageWindow,
    pub binwidth: u32,
    pub rows: Vec<ReportRow>,
    /// Number of accounting records left out of the report, per reason.
    pub discarded: BTreeMap<DiscardReason, usize>,
}

impl UsageReport {
    pub fn build(records: &ParsedRecords, window: UsageWindow, binwidth: NonZeroU32) -> Self {
        Self {
            rows: compose(&records.groups, &window, binwidth),
            window,
            binwidth: binwidth.get(),
            discarded: records.discard_counts(),
        }
    }

    pub fn title(&self) -> String {
        format_title(&self.window)
    }

    pub fn header(&self) -> String {
        format_header(&self.window, self.binwidth())
    }

    pub fn binwidth(&self) -> NonZeroU32 {
        NonZeroU32::new(self.binwidth).unwrap_or(NonZeroU32::MIN)
    }

    /// Header and all rows, as printed to the terminal below the title.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.header());
        lines.extend(self.rows.iter().map(ReportRow::format_line));
        lines
    }
}
