use anyhow::Context;
use clap::Parser;

use crate::client::globalsettings::GlobalSettings;
use crate::client::output::outputs::ChipFormat;
use crate::common::error::ChipstatError;
use crate::common::manager::slurm::{SlurmReservation, query_active_reservations};
use crate::usage::license::ChipLicense;

#[derive(Parser)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct ReservationOpts {
    #[clap(subcommand)]
    pub subcmd: Option<ReservationCommand>,

    #[clap(flatten)]
    pub find: FindReservationOpts,
}

#[derive(Parser)]
pub enum ReservationCommand {
    /// Display all active reservations
    List,
}

#[derive(Parser)]
pub struct FindReservationOpts {
    /// Chip license, e.g. W60F0
    #[arg(long, required = true)]
    pub license: Option<ChipLicense>,

    /// Fail if the given user is not included in the reservation
    #[arg(long)]
    pub user: Option<String>,

    /// Prefix the reservation with `--reservation `
    #[arg(long)]
    pub srun_args: bool,
}

/// Returns the first reservation that covers `license`.
pub fn find_reservation<'a>(
    reservations: &'a [SlurmReservation],
    license: &ChipLicense,
) -> Option<&'a SlurmReservation> {
    let license = license.to_string();
    reservations
        .iter()
        .find(|reservation| reservation.has_license(&license))
}

/// Checks that `user` (if any) may use `reservation`.
pub fn check_reservation_user(
    reservation: &SlurmReservation,
    user: Option<&str>,
) -> crate::Result<()> {
    match user {
        Some(user) if !reservation.has_user(user) => Err(ChipstatError::UserNotInReservation {
            user: user.to_string(),
            reservation: reservation.name.clone(),
        }),
        _ => Ok(()),
    }
}

pub fn command_reservation(
    gsettings: &GlobalSettings,
    opts: ReservationOpts,
) -> anyhow::Result<()> {
    let reservations = query_active_reservations().context("Cannot query reservations")?;
    match opts.subcmd {
        Some(ReservationCommand::List) => {
            gsettings.printer().print_reservation_list(&reservations);
            Ok(())
        }
        None => find_and_print(gsettings, &reservations, opts.find),
    }
}

fn find_and_print(
    gsettings: &GlobalSettings,
    reservations: &[SlurmReservation],
    opts: FindReservationOpts,
) -> anyhow::Result<()> {
    let Some(license) = opts.license else {
        return Err(ChipstatError::ConfigError("missing --license".to_string()).into());
    };
    let Some(reservation) = find_reservation(reservations, &license) else {
        log::debug!("No active reservation covers {license}");
        return Ok(());
    };

    gsettings
        .printer()
        .print_reservation(reservation, ChipFormat::from_srun_args_flag(opts.srun_args));
    check_reservation_user(reservation, opts.user.as_deref())?;
    Ok(())
}
