//! Timeline chart data consumed by an external plotting tool.
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::common::utils::fs::write_file;
use crate::usage::interval::ResourceGroups;
use crate::usage::license::numeric_key;
use crate::usage::window::UsageWindow;

pub const DEFAULT_CHART_FILE: &str = "chip_usage.json";

/// Jobs of this user are drawn muted (e.g. automated test jobs).
pub const DEFAULT_MUTED_USER: &str = "vis_jenkins";

const MUTED_COLOR: &str = "#aaaaaa";
const DEFAULT_COLOR: &str = "black";

/// One horizontal line of the chart, i.e. one job on one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSegment {
    /// Index into [`ChartData::rows`].
    pub row: usize,
    pub license: String,
    pub user: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub begin: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Resources ordered by their numeric key, lowest first.
    pub rows: Vec<String>,
    pub segments: Vec<ChartSegment>,
}

impl ChartData {
    pub fn build(groups: &ResourceGroups, window: &UsageWindow, muted_user: &str) -> Self {
        let mut rows: Vec<&String> = groups.keys().collect();
        rows.sort_by_key(|resource_id| numeric_key(resource_id));

        let segments = rows
            .iter()
            .enumerate()
            .flat_map(|(row, resource_id)| {
                groups[*resource_id].iter().map(move |interval| ChartSegment {
                    row,
                    license: interval.resource_id.clone(),
                    user: interval.user.clone(),
                    start: interval.start,
                    end: interval.end,
                    color: if interval.user == muted_user {
                        MUTED_COLOR
                    } else {
                        DEFAULT_COLOR
                    },
                })
            })
            .collect();

        Self {
            begin: window.start,
            end: window.end(),
            rows: rows.into_iter().cloned().collect(),
            segments,
        }
    }

    pub fn write(&self, path: &Path) -> crate::Result<()> {
        let data = serde_json::to_vec_pretty(self)?;
        write_file(path, &data)?;
        log::debug!(
            "Chart data with {} segments written to {}",
            self.segments.len(),
            path.display()
        );
        Ok(())
    }
}
