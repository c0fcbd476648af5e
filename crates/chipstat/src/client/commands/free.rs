use anyhow::Context;
use clap::Parser;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::Set;
use crate::client::globalsettings::GlobalSettings;
use crate::client::output::outputs::ChipFormat;
use crate::common::error::ChipstatError;
use crate::common::inventory::DEFAULT_CHIP_REVISION;
use crate::common::manager::slurm::{
    SlurmReservation, get_licenses, query_active_reservations, query_entities,
};
use crate::usage::license::ChipLicense;

/// Chips of setups used by automated tests. They can be in an undefined state,
/// but they are not put into a reservation so that they can be debugged quickly.
pub const DEFAULT_BLOCKED_CHIPS: &str = "W62F0,W62F3";

#[derive(Parser)]
pub struct FreeOpts {
    /// Chip revision of the listed chips
    #[arg(long, default_value_t = DEFAULT_CHIP_REVISION)]
    pub chip_revision: u32,

    /// Print a single randomly selected chip
    #[arg(long)]
    pub random: bool,

    /// Print `srun` arguments instead of licenses
    #[arg(long)]
    pub srun_args: bool,

    /// Also include chips of reservations that contain the given user
    #[arg(long)]
    pub user: Option<String>,

    /// Chips that are never listed as free
    #[arg(long, value_delimiter = ',', default_value = DEFAULT_BLOCKED_CHIPS)]
    pub blocked: Vec<ChipLicense>,
}

/// Everything that prevents a chip from being free.
#[derive(Debug, Default)]
pub struct ChipAllocations {
    /// Licenses used by running jobs.
    pub running: Vec<String>,
    pub reservations: Vec<SlurmReservation>,
    pub blocked: Vec<ChipLicense>,
}

impl ChipAllocations {
    /// Licenses that cannot be used by `user`.
    /// Reservations that include `user` do not block their chips.
    pub fn unavailable_licenses(&self, user: Option<&str>) -> Set<String> {
        let reserved = self
            .reservations
            .iter()
            .filter(|reservation| user.is_none_or(|user| !reservation.has_user(user)))
            .flat_map(|reservation| reservation.licenses.iter().cloned());
        self.running
            .iter()
            .cloned()
            .chain(reserved)
            .map(|license| license.to_ascii_uppercase())
            .chain(self.blocked.iter().map(|chip| chip.to_string()))
            .collect()
    }
}

/// Returns `candidates` that are not allocated in any way, in their original order.
pub fn select_free_chips(
    candidates: &[ChipLicense],
    allocations: &ChipAllocations,
    user: Option<&str>,
) -> Vec<ChipLicense> {
    let unavailable = allocations.unavailable_licenses(user);
    candidates
        .iter()
        .filter(|chip| !unavailable.contains(&chip.to_string()))
        .copied()
        .collect()
}

pub fn choose_random<R: Rng + ?Sized>(chips: &[ChipLicense], rng: &mut R) -> Vec<ChipLicense> {
    chips.choose(rng).copied().into_iter().collect()
}

fn query_running_licenses() -> anyhow::Result<Vec<String>> {
    let jobs = query_entities("jobs", &["Licenses=W", "JobState=RUNNING"])?;
    Ok(get_licenses(&jobs))
}

pub fn command_free(gsettings: &GlobalSettings, opts: FreeOpts) -> anyhow::Result<()> {
    let inventory = gsettings.require_inventory()?;
    let candidates = inventory.chips(opts.chip_revision);
    log::debug!(
        "Inventory contains {} chip(s) of revision {}",
        candidates.len(),
        opts.chip_revision
    );

    let allocations = ChipAllocations {
        running: query_running_licenses().context("Cannot query running jobs")?,
        reservations: query_active_reservations().context("Cannot query reservations")?,
        blocked: opts.blocked,
    };
    let mut chips = select_free_chips(&candidates, &allocations, opts.user.as_deref());
    if chips.is_empty() {
        return Err(ChipstatError::NoFreeChip.into());
    }
    if opts.random {
        chips = choose_random(&chips, &mut rand::rng());
    }

    gsettings
        .printer()
        .print_free_chips(&chips, ChipFormat::from_srun_args_flag(opts.srun_args));
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{ChipAllocations, FreeOpts, choose_random, select_free_chips};
    use crate::common::manager::slurm::SlurmReservation;
    use crate::usage::license::ChipLicense;

    fn chips(licenses: &[&str]) -> Vec<ChipLicense> {
        licenses.iter().map(|l| l.parse().unwrap()).collect()
    }

    fn reservation(name: &str, users: &[&str], licenses: &[&str]) -> SlurmReservation {
        SlurmReservation {
            name: name.to_string(),
            users: users.iter().map(|u| u.to_string()).collect(),
            licenses: licenses.iter().map(|l| l.to_string()).collect(),
        }
    }

    fn allocations() -> ChipAllocations {
        ChipAllocations {
            running: vec!["W63F0".to_string()],
            reservations: vec![reservation("maintenance", &["alice"], &["W64F1"])],
            blocked: chips(&["W62F0", "W62F3"]),
        }
    }

    #[test]
    fn test_select_free_chips() {
        let candidates = chips(&["W62F0", "W62F3", "W63F0", "W63F1", "W64F1", "W70F2"]);
        let free = select_free_chips(&candidates, &allocations(), None);
        assert_eq!(free, chips(&["W63F1", "W70F2"]));
    }

    #[test]
    fn test_reservation_user_can_use_reserved_chips() {
        let candidates = chips(&["W63F1", "W64F1"]);
        assert_eq!(
            select_free_chips(&candidates, &allocations(), Some("alice")),
            chips(&["W63F1", "W64F1"])
        );
        assert_eq!(
            select_free_chips(&candidates, &allocations(), Some("bob")),
            chips(&["W63F1"])
        );
    }

    #[test]
    fn test_running_licenses_are_case_insensitive() {
        let allocations = ChipAllocations {
            running: vec!["w63f1".to_string()],
            ..Default::default()
        };
        assert!(select_free_chips(&chips(&["W63F1"]), &allocations, None).is_empty());
    }

    #[test]
    fn test_no_free_chip() {
        let candidates = chips(&["W62F0", "W63F0"]);
        assert!(select_free_chips(&candidates, &allocations(), None).is_empty());
    }

    #[test]
    fn test_choose_random() {
        let candidates = chips(&["W63F1", "W64F1", "W70F2"]);
        let chosen = choose_random(&candidates, &mut rand::rng());
        assert_eq!(chosen.len(), 1);
        assert!(candidates.contains(&chosen[0]));
        assert!(choose_random(&[], &mut rand::rng()).is_empty());
    }

    #[derive(Parser)]
    struct Wrapper {
        #[clap(flatten)]
        opts: FreeOpts,
    }

    #[test]
    fn test_free_opts() {
        let opts = Wrapper::try_parse_from(["free"]).unwrap().opts;
        assert_eq!(opts.chip_revision, 3);
        assert_eq!(opts.blocked, chips(&["W62F0", "W62F3"]));

        let opts = Wrapper::try_parse_from(["free", "--blocked", "W70F1", "--srun-args"])
            .unwrap()
            .opts;
        assert_eq!(opts.blocked, chips(&["W70F1"]));
        assert!(opts.srun_args);
    }
}
