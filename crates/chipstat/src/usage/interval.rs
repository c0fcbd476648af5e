use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

/// One allocation of a resource by a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub resource_id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub user: String,
}

impl Interval {
    pub fn new(
        resource_id: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
        user: String,
    ) -> Self {
        debug_assert!(start <= end);
        Self {
            resource_id,
            start,
            end,
            user,
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

/// Intervals grouped by their resource id.
/// Iteration order is the lexical order of the ids.
pub type ResourceGroups = BTreeMap<String, Vec<Interval>>;

pub fn group_by_resource<I: IntoIterator<Item = Interval>>(intervals: I) -> ResourceGroups {
    let mut groups = ResourceGroups::new();
    for interval in intervals {
        groups
            .entry(interval.resource_id.clone())
            .or_default()
            .push(interval);
    }
    groups
}
