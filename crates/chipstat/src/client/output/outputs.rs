use crate::common::manager::slurm::SlurmReservation;
use crate::usage::license::ChipLicense;
use crate::usage::report::UsageReport;

#[allow(clippy::upper_case_acronyms)]
#[derive(clap::ValueEnum, Clone)]
pub enum Outputs {
    CLI,
    JSON,
    Quiet,
}

/// How a chip or a reservation is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipFormat {
    /// License name, e.g. `W62F3`
    License,
    /// Arguments for `srun`, e.g. `--wafer=62 --fpga-without-aout=3`
    SrunArgs,
}

impl ChipFormat {
    pub fn from_srun_args_flag(srun_args: bool) -> Self {
        if srun_args {
            ChipFormat::SrunArgs
        } else {
            ChipFormat::License
        }
    }

    pub fn format_chip(&self, chip: &ChipLicense) -> String {
        match self {
            ChipFormat::License => chip.to_string(),
            ChipFormat::SrunArgs => chip.srun_args(),
        }
    }

    pub fn format_reservation(&self, reservation: &SlurmReservation) -> String {
        match self {
            ChipFormat::License => reservation.name.clone(),
            ChipFormat::SrunArgs => format!("--reservation {}", reservation.name),
        }
    }
}

pub trait Output {
    // Usage
    fn print_usage_report(&self, report: &UsageReport);

    // Chips
    fn print_free_chips(&self, chips: &[ChipLicense], format: ChipFormat);

    // Reservations
    fn print_reservation(&self, reservation: &SlurmReservation, format: ChipFormat);
    fn print_reservation_list(&self, reservations: &[SlurmReservation]);

    // Errors
    fn print_error(&self, error: anyhow::Error);
}
