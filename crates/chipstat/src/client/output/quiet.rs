use crate::client::output::outputs::{ChipFormat, Output};
use crate::common::manager::slurm::SlurmReservation;
use crate::usage::license::ChipLicense;
use crate::usage::report::UsageReport;

/// Prints only the bare results, one per line, without any decoration.
#[derive(Default)]
pub struct Quiet;

impl Output for Quiet {
    fn print_usage_report(&self, report: &UsageReport) {
        for row in &report.rows {
            println!("{}", row.format_line());
        }
    }

    fn print_free_chips(&self, chips: &[ChipLicense], format: ChipFormat) {
        for chip in chips {
            println!("{}", format.format_chip(chip));
        }
    }

    fn print_reservation(&self, reservation: &SlurmReservation, format: ChipFormat) {
        println!("{}", format.format_reservation(reservation));
    }

    fn print_reservation_list(&self, reservations: &[SlurmReservation]) {
        for reservation in reservations {
            println!("{}", reservation.name);
        }
    }

    fn print_error(&self, error: anyhow::Error) {
        eprintln!("{error:?}");
    }
}
