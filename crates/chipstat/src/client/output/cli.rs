use cli_table::format::{Justify, Separator};
use cli_table::{Cell, CellStruct, ColorChoice, Style, Table, TableStruct, print_stdout};
use colored::Colorize;

use crate::client::output::outputs::{ChipFormat, Output};
use crate::common::manager::slurm::SlurmReservation;
use crate::usage::license::ChipLicense;
use crate::usage::report::UsageReport;

pub struct CliOutput {
    color_policy: ColorChoice,
}

impl CliOutput {
    pub fn new(color_policy: ColorChoice) -> CliOutput {
        CliOutput { color_policy }
    }

    fn print_horizontal_table(&self, rows: Vec<Vec<CellStruct>>, header: Vec<CellStruct>) {
        let table = rows
            .table()
            .separator(
                Separator::builder()
                    .title(Some(Default::default()))
                    .column(Some(Default::default()))
                    .build(),
            )
            .title(header);
        self.print_table(table);
    }

    fn print_table(&self, table: TableStruct) {
        let table = table.color_choice(self.color_policy);
        if let Err(e) = print_stdout(table) {
            log::error!("Cannot print table to stdout: {e:?}");
        }
    }
}

impl Output for CliOutput {
    fn print_usage_report(&self, report: &UsageReport) {
        println!("{}", report.title().bold());
        for line in report.lines() {
            println!("{line}");
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
        let rows: Vec<_> = reservations
            .iter()
            .map(|reservation| {
                vec![
                    reservation.name.as_str().cell(),
                    reservation.users.join(",").cell(),
                    reservation.licenses.join(",").cell(),
                    reservation.licenses.len().cell().justify(Justify::Right),
                ]
            })
            .collect();
        let header = vec![
            "Name".cell().bold(true),
            "Users".cell().bold(true),
            "Licenses".cell().bold(true),
            "Chips".cell().bold(true),
        ];
        self.print_horizontal_table(rows, header);
    }

    fn print_error(&self, error: anyhow::Error) {
        eprintln!("{error:?}");
    }
}
