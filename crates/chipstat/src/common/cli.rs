use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::client::commands::free::FreeOpts;
use crate::client::commands::reservation::ReservationOpts;
use crate::client::commands::usage::UsageOpts;
use crate::client::output::outputs::Outputs;

#[derive(clap::ValueEnum, Clone)]
pub enum ColorPolicy {
    /// Use colors if the stdout is detected to be a terminal.
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

// Common CLI options
#[derive(Parser)]
pub struct CommonOpts {
    /// Path to the hardware database listing the installed chips
    /// [default: /wang/data/bss-hwdb/db.yaml]
    #[arg(
        long,
        value_hint = clap::ValueHint::FilePath,
        global = true,
        env = "CHIPSTAT_INVENTORY",
        help_heading("GLOBAL OPTIONS"),
        hide_short_help(true)
    )]
    pub inventory: Option<PathBuf>,

    /// Sets console color policy
    #[arg(
        long,
        default_value_t = ColorPolicy::Auto,
        value_enum,
        global = true,
        help_heading("GLOBAL OPTIONS"),
        hide_short_help(true)
    )]
    pub colors: ColorPolicy,

    /// Sets output formatting
    #[arg(
        long,
        env = "CHIPSTAT_OUTPUT_MODE",
        default_value_t = Outputs::CLI,
        value_enum,
        global = true,
        help_heading("GLOBAL OPTIONS"),
        hide_short_help(true)
    )]
    pub output_mode: Outputs,

    /// Enables more detailed log output
    #[arg(
        long,
        env = "CHIPSTAT_DEBUG",
        global = true,
        help_heading("GLOBAL OPTIONS"),
        hide_short_help(true)
    )]
    pub debug: bool,
}

// Root CLI options
#[derive(Parser)]
#[command(
    author,
    about,
    version(crate::CHIPSTAT_VERSION),
    disable_help_subcommand(true),
    help_expected(true)
)]
pub struct RootOptions {
    #[clap(flatten)]
    pub common: CommonOpts,

    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Parser)]
pub enum SubCommand {
    /// Show how much each chip was used recently
    Usage(UsageOpts),
    /// List chips that are not allocated, reserved or blocked
    ///
    /// Exits with code 2 if there is no free chip.
    Free(FreeOpts),
    /// Show the active reservation that covers a chip
    Reservation(ReservationOpts),
    /// Generate shell completion script
    GenerateCompletion(GenerateCompletionOpts),
}

#[derive(Parser)]
pub struct GenerateCompletionOpts {
    /// Shell flavour for which the completion script should be generated
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::client::output::outputs::Outputs;
    use crate::common::cli::{RootOptions, SubCommand};

    #[test]
    fn verify_root_cli() {
        use clap::CommandFactory;
        RootOptions::command().debug_assert()
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let opts = RootOptions::try_parse_from([
            "chipstat",
            "usage",
            "--output-mode",
            "json",
            "--inventory",
            "/tmp/db.yaml",
        ])
        .unwrap();
        assert!(matches!(opts.common.output_mode, Outputs::JSON));
        assert_eq!(
            opts.common.inventory.as_deref(),
            Some(std::path::Path::new("/tmp/db.yaml"))
        );
        assert!(matches!(opts.subcmd, SubCommand::Usage(_)));
    }
}
