use serde::Serialize;
use serde_json::json;

use crate::client::output::outputs::{ChipFormat, Output};
use crate::common::manager::slurm::SlurmReservation;
use crate::usage::license::ChipLicense;
use crate::usage::report::UsageReport;

#[derive(Default)]
pub struct JsonOutput;

impl JsonOutput {
    fn print(&self, data: impl Serialize) {
        match serde_json::to_string_pretty(&data) {
            Ok(value) => println!("{value}"),
            Err(error) => log::error!("Cannot serialize output: {error:?}"),
        }
    }
}

impl Output for JsonOutput {
    fn print_usage_report(&self, report: &UsageReport) {
        self.print(report);
    }

    fn print_free_chips(&self, chips: &[ChipLicense], _format: ChipFormat) {
        let chips: Vec<_> = chips
            .iter()
            .map(|chip| {
                json!({
                    "license": chip,
                    "wafer": chip.wafer(),
                    "fpga": chip.fpga(),
                    "srun_args": chip.srun_args(),
                })
            })
            .collect();
        self.print(chips);
    }

    fn print_reservation(&self, reservation: &SlurmReservation, _format: ChipFormat) {
        self.print(reservation);
    }

    fn print_reservation_list(&self, reservations: &[SlurmReservation]) {
        self.print(reservations);
    }

    fn print_error(&self, error: anyhow::Error) {
        let error = format!("{error:?}");
        self.print(json!({ "error": error }));
    }
}
