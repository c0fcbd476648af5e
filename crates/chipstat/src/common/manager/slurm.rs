use chrono::NaiveDateTime;
use serde::Serialize;

use crate::common::manager::common::{check_tool_available, run_command};
use crate::{Map, Set};

pub const SLURM_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Columns requested from `sacct`, in the order expected by the record parser.
pub const SACCT_FORMAT: &str = "start,end,state,alloctres%100,user,jobid";

/// Value that Slurm prints for unset fields.
const SLURM_NULL: &str = "(null)";

pub type SlurmEntity = Map<String, String>;

pub fn parse_slurm_datetime(datetime: &str) -> anyhow::Result<NaiveDateTime> {
    Ok(NaiveDateTime::parse_from_str(
        datetime,
        SLURM_DATETIME_FORMAT,
    )?)
}

pub fn format_slurm_datetime(datetime: &NaiveDateTime) -> String {
    datetime.format(SLURM_DATETIME_FORMAT).to_string()
}

/// Parse <key>=<value> pairs from a single line of `scontrol show -o <entity>`.
/// Values can contain `=` themselves (e.g. `TRES=cpu=4,mem=7600M`).
pub fn get_scontrol_items(line: &str) -> Map<&str, &str> {
    let mut map = Map::new();
    for item in line.split_whitespace() {
        if let Some((key, value)) = item.split_once('=') {
            map.insert(key, value);
        }
    }
    map
}

/// Parses the output of `scontrol show -oa <entity>`, one entity per line.
/// Only lines containing all `conditions` as substrings are returned,
/// e.g. `["Licenses=W62F3", "JobState=RUNNING"]` selects running jobs on `W62F3`.
pub fn parse_scontrol_entities(output: &str, conditions: &[&str]) -> Vec<SlurmEntity> {
    output
        .lines()
        .filter(|line| conditions.iter().all(|c| line.contains(c)))
        .map(|line| {
            get_scontrol_items(line)
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect()
        })
        .collect()
}

/// Returns the licenses mentioned by the given entities.
/// The `:<count>` suffix of each license is removed.
pub fn get_licenses(entities: &[SlurmEntity]) -> Vec<String> {
    entities
        .iter()
        .filter_map(|entity| entity.get("Licenses"))
        .flat_map(|licenses| split_list(licenses))
        .map(|license| {
            license
                .split_once(':')
                .map(|(name, _)| name)
                .unwrap_or(license)
                .to_string()
        })
        .collect()
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty() && *item != SLURM_NULL)
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SlurmReservation {
    pub name: String,
    pub users: Vec<String>,
    pub licenses: Vec<String>,
}

impl SlurmReservation {
    pub fn from_entity(entity: &SlurmEntity) -> Self {
        Self {
            name: entity
                .get("ReservationName")
                .cloned()
                .unwrap_or_default(),
            users: entity
                .get("Users")
                .map(|users| split_list(users).map(|u| u.to_string()).collect())
                .unwrap_or_default(),
            licenses: get_licenses(std::slice::from_ref(entity)),
        }
    }

    pub fn has_user(&self, user: &str) -> bool {
        self.users.iter().any(|u| u == user)
    }

    pub fn has_license(&self, license: &str) -> bool {
        self.licenses.iter().any(|l| l == license)
    }
}

/// Parses the output of `squeue --format=%A -h` into a set of job ids.
pub fn parse_squeue_job_ids(output: &str) -> Set<String> {
    output
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

/// Returns entities of the given type using `scontrol`.
/// This function is blocking
pub fn query_entities(entity: &str, conditions: &[&str]) -> anyhow::Result<Vec<SlurmEntity>> {
    check_tool_available("scontrol")?;
    let output = run_command(&["scontrol", "show", "-oa", entity])?;
    Ok(parse_scontrol_entities(&output, conditions))
}

pub fn query_active_reservations() -> anyhow::Result<Vec<SlurmReservation>> {
    Ok(query_entities("reservations", &["State=ACTIVE"])?
        .iter()
        .map(SlurmReservation::from_entity)
        .collect())
}

/// Returns ids of all jobs currently known to the Slurm controller
/// (queued or running).
/// This function is blocking
pub fn query_active_job_ids() -> anyhow::Result<Set<String>> {
    check_tool_available("squeue")?;
    let output = run_command(&["squeue", "--format=%A", "-h"])?;
    Ok(parse_squeue_job_ids(&output))
}

/// Returns the accounting records of all users since `start`, one record per line.
/// This function is blocking
pub fn query_accounting(start: &NaiveDateTime) -> anyhow::Result<String> {
    check_tool_available("sacct")?;
    let start = format_slurm_datetime(start);
    let format = format!("--format={SACCT_FORMAT}");
    let output = run_command(&[
        "sacct",
        "-a",
        "--start",
        &start,
        &format,
        "--parsable2",
        "--noheader",
    ])?;
    log::debug!("sacct returned {} lines", output.lines().count());
    Ok(output)
}
