//! Turns raw `sacct` rows into [`Interval`]s.
//!
//! Every row that does not produce an interval is kept as a [`DiscardedRecord`],
//! so callers can tell what was left out of a report and why.
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::Set;
use crate::common::manager::slurm::parse_slurm_datetime;
use crate::usage::interval::{Interval, ResourceGroups, group_by_resource};
use crate::usage::license::parse_allocated_licenses;

const FIELD_SEPARATOR: char = '|';
const FIELD_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscardReason {
    /// The row does not have all the requested columns.
    MalformedRow,
    /// The job has not started yet.
    Pending,
    /// The job did not allocate any chip.
    NoLicense,
    /// The start time cannot be parsed.
    InvalidStart,
    /// The end time cannot be parsed and the job is not running anymore
    /// (e.g. a runaway job left in the accounting database).
    Stale,
    /// The job ended before it started.
    InvertedInterval,
}

impl Display for DiscardReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            DiscardReason::MalformedRow => "malformed row",
            DiscardReason::Pending => "pending",
            DiscardReason::NoLicense => "no chip license",
            DiscardReason::InvalidStart => "invalid start time",
            DiscardReason::Stale => "stale",
            DiscardReason::InvertedInterval => "end before start",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscardedRecord {
    pub job_id: Option<String>,
    pub reason: DiscardReason,
}

#[derive(Debug, Default)]
pub struct ParsedRecords {
    pub groups: ResourceGroups,
    pub discarded: Vec<DiscardedRecord>,
}

impl ParsedRecords {
    pub fn discard_counts(&self) -> BTreeMap<DiscardReason, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.discarded {
            *counts.entry(record.reason).or_insert(0) += 1;
        }
        counts
    }

    /// Makes sure that each of `resource_ids` is present in the groups,
    /// so that resources without any job show up in the report.
    pub fn seed_resources<I: IntoIterator<Item = String>>(&mut self, resource_ids: I) {
        for resource_id in resource_ids {
            self.groups.entry(resource_id).or_default();
        }
    }
}

struct AccountingRow<'a> {
    start: &'a str,
    end: &'a str,
    state: &'a str,
    alloc_tres: &'a str,
    user: &'a str,
    job_id: &'a str,
}

impl<'a> AccountingRow<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() < FIELD_COUNT {
            return None;
        }
        Some(Self {
            start: fields[0].trim(),
            end: fields[1].trim(),
            state: fields[2].trim(),
            alloc_tres: fields[3].trim(),
            user: fields[4].trim(),
            job_id: fields[5].trim(),
        })
    }
}

/// Parses `sacct --parsable2` output with the columns of
/// [`SACCT_FORMAT`](crate::common::manager::slurm::SACCT_FORMAT).
///
/// Jobs without a valid end time are treated as still running (ending at `now`)
/// only if their id is contained in `active_jobs`.
pub fn parse_accounting_records(
    output: &str,
    active_jobs: &Set<String>,
    now: NaiveDateTime,
) -> ParsedRecords {
    let mut intervals = Vec::new();
    let mut discarded = Vec::new();

    for line in output.lines().filter(|line| !line.trim().is_empty()) {
        match parse_row(line, active_jobs, now) {
            Ok(mut row_intervals) => intervals.append(&mut row_intervals),
            Err(record) => {
                log::trace!("Discarding accounting row `{line}`: {}", record.reason);
                discarded.push(record);
            }
        }
    }

    ParsedRecords {
        groups: group_by_resource(intervals),
        discarded,
    }
}

fn parse_row(
    line: &str,
    active_jobs: &Set<String>,
    now: NaiveDateTime,
) -> Result<Vec<Interval>, DiscardedRecord> {
    let Some(row) = AccountingRow::parse(line) else {
        return Err(DiscardedRecord {
            job_id: None,
            reason: DiscardReason::MalformedRow,
        });
    };
    let discard = |reason| DiscardedRecord {
        job_id: Some(row.job_id.to_string()),
        reason,
    };

    if row.state == "PENDING" {
        return Err(discard(DiscardReason::Pending));
    }
    let licenses = parse_allocated_licenses(row.alloc_tres);
    if licenses.is_empty() {
        return Err(discard(DiscardReason::NoLicense));
    }
    let start =
        parse_slurm_datetime(row.start).map_err(|_| discard(DiscardReason::InvalidStart))?;
    let end = match parse_slurm_datetime(row.end) {
        Ok(end) => end,
        Err(_) if active_jobs.contains(row.job_id) => now,
        Err(_) => return Err(discard(DiscardReason::Stale)),
    };
    if end < start {
        return Err(discard(DiscardReason::InvertedInterval));
    }

    Ok(licenses
        .into_iter()
        .map(|license| Interval::new(license.to_string(), start, end, row.user.to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{DiscardReason, parse_accounting_records};
    use crate::Set;
    use crate::tests::utils::datetime;

    const NOW: &str = "2021-01-21T12:00:00";

    fn active(ids: &[&str]) -> Set<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_finished_job() {
        let records = parse_accounting_records(
            "2021-01-21T08:00:00|2021-01-21T09:30:00|COMPLETED|billing=1,cpu=2,license/w62f3=1,node=1|alice|100\n",
            &active(&[]),
            datetime(NOW),
        );
        assert!(records.discarded.is_empty());
        let intervals = &records.groups["W62F3"];
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start, datetime("2021-01-21T08:00:00"));
        assert_eq!(intervals[0].end, datetime("2021-01-21T09:30:00"));
        assert_eq!(intervals[0].user, "alice");
    }

    #[test]
    fn test_job_with_multiple_chips() {
        let records = parse_accounting_records(
            "2021-01-21T08:00:00|2021-01-21T09:30:00|COMPLETED|cpu=2,license/w62f3=1,license/w70f0=1|alice|100\n",
            &active(&[]),
            datetime(NOW),
        );
        assert_eq!(records.groups.len(), 2);
        assert!(records.groups.contains_key("W62F3"));
        assert!(records.groups.contains_key("W70F0"));
    }

    #[test]
    fn test_running_job_ends_now() {
        let records = parse_accounting_records(
            "2021-01-21T08:00:00|Unknown|RUNNING|license/w62f3=1|alice|100\n",
            &active(&["100"]),
            datetime(NOW),
        );
        assert_eq!(records.groups["W62F3"][0].end, datetime(NOW));
    }

    #[test]
    fn test_stale_job_is_discarded() {
        let records = parse_accounting_records(
            "2021-01-21T08:00:00|Unknown|RUNNING|license/w62f3=1|alice|100\n",
            &active(&["101"]),
            datetime(NOW),
        );
        assert!(records.groups.is_empty());
        assert_eq!(records.discarded.len(), 1);
        assert_eq!(records.discarded[0].job_id.as_deref(), Some("100"));
        assert_eq!(records.discarded[0].reason, DiscardReason::Stale);
    }

    #[test]
    fn test_discard_reasons() {
        let output = "\
2021-01-21T08:00:00|2021-01-21T09:00:00|COMPLETED|license/w62f3=1|alice
Unknown|Unknown|PENDING|license/w62f3=1|alice|101
2021-01-21T08:00:00|2021-01-21T09:00:00|COMPLETED|cpu=2,node=1|alice|102
Unknown|2021-01-21T09:00:00|CANCELLED by 0|license/w62f3=1|alice|103
2021-01-21T09:00:00|2021-01-21T08:00:00|COMPLETED|license/w62f3=1|alice|104

2021-01-21T08:00:00|2021-01-21T09:00:00|COMPLETED|license/w62f3=1|alice|105
";
        let records = parse_accounting_records(output, &active(&[]), datetime(NOW));
        let reasons: Vec<_> = records.discarded.iter().map(|r| r.reason).collect();
        assert_eq!(
            reasons,
            vec![
                DiscardReason::MalformedRow,
                DiscardReason::Pending,
                DiscardReason::NoLicense,
                DiscardReason::InvalidStart,
                DiscardReason::InvertedInterval,
            ]
        );
        assert_eq!(records.groups["W62F3"].len(), 1);

        let counts = records.discard_counts();
        assert_eq!(counts[&DiscardReason::Pending], 1);
        assert!(!counts.contains_key(&DiscardReason::Stale));
    }

    #[test]
    fn test_seed_resources() {
        let mut records = parse_accounting_records(
            "2021-01-21T08:00:00|2021-01-21T09:30:00|COMPLETED|license/w62f3=1|alice|100\n",
            &active(&[]),
            datetime(NOW),
        );
        records.seed_resources(vec!["W62F3".to_string(), "W63F0".to_string()]);
        assert_eq!(records.groups["W62F3"].len(), 1);
        assert!(records.groups["W63F0"].is_empty());
    }
}
