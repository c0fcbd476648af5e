use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::client::globalsettings::GlobalSettings;
use crate::common::manager::common::check_tool_available;
use crate::common::manager::slurm::{query_accounting, query_active_job_ids};
use crate::common::utils::fs::absolute_path;
use crate::common::utils::time::now_local;
use crate::usage::chart::{ChartData, DEFAULT_CHART_FILE, DEFAULT_MUTED_USER};
use crate::usage::config::{DEFAULT_BINWIDTH_HOURS, DEFAULT_LOOKBACK_HOURS, UsageConfig};
use crate::usage::record::{ParsedRecords, parse_accounting_records};
use crate::usage::report::UsageReport;
use crate::usage::window::UsageWindow;

#[derive(Parser)]
pub struct UsageOpts {
    /// Number of hours to look back
    #[arg(short = 'n', long, default_value_t = DEFAULT_LOOKBACK_HOURS)]
    pub hours: u32,

    /// Width of a single bar glyph in hours
    #[arg(short, long, default_value_t = DEFAULT_BINWIDTH_HOURS)]
    pub binwidth: u32,

    /// Write chart data (JSON) for an external plotting tool
    ///
    /// Relative paths are resolved against the current directory.
    #[arg(
        short,
        long,
        num_args = 0..=1,
        default_missing_value = DEFAULT_CHART_FILE,
        value_hint = clap::ValueHint::FilePath
    )]
    pub figure: Option<PathBuf>,

    /// Jobs of this user are muted in the chart data
    #[arg(long, default_value = DEFAULT_MUTED_USER)]
    pub muted_user: String,
}

pub fn command_usage(gsettings: &GlobalSettings, opts: UsageOpts) -> anyhow::Result<()> {
    let config = UsageConfig::new(opts.hours, opts.binwidth)?;
    check_tool_available("sacct")?;
    check_tool_available("squeue")?;

    let now = now_local();
    let window = UsageWindow::ending_at(now, config.hours());

    let active_jobs = query_active_job_ids().context("Cannot query active jobs")?;
    let accounting = query_accounting(&window.start).context("Cannot query job accounting")?;
    let mut records = parse_accounting_records(&accounting, &active_jobs, now);
    if let Some(inventory) = gsettings.load_inventory()? {
        records.seed_resources(inventory.all_chips().iter().map(|chip| chip.to_string()));
    }
    log_discarded(&records);

    let report = UsageReport::build(&records, window, config.binwidth());
    gsettings.printer().print_usage_report(&report);

    if let Some(path) = opts.figure {
        let path = absolute_path(path)?;
        ChartData::build(&records.groups, &window, &opts.muted_user)
            .write(&path)
            .with_context(|| format!("Cannot write chart data to {}", path.display()))?;
        log::info!("Chart data written to {}", path.display());
    }
    Ok(())
}

fn log_discarded(records: &ParsedRecords) {
    for (reason, count) in records.discard_counts() {
        log::debug!("Discarded {count} accounting record(s): {reason}");
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::UsageOpts;

    #[derive(Parser)]
    struct Wrapper {
        #[clap(flatten)]
        opts: UsageOpts,
    }

    fn parse(args: &[&str]) -> UsageOpts {
        let mut argv = vec!["usage"];
        argv.extend_from_slice(args);
        Wrapper::try_parse_from(argv).unwrap().opts
    }

    #[test]
    fn test_defaults() {
        let opts = parse(&[]);
        assert_eq!(opts.hours, 24);
        assert_eq!(opts.binwidth, 1);
        assert!(opts.figure.is_none());
        assert_eq!(opts.muted_user, "vis_jenkins");
    }

    #[test]
    fn test_figure_default_file() {
        let opts = parse(&["-n", "48", "-b", "2", "--figure"]);
        assert_eq!(opts.hours, 48);
        assert_eq!(opts.binwidth, 2);
        assert_eq!(opts.figure, Some(PathBuf::from("chip_usage.json")));
    }

    #[test]
    fn test_figure_path() {
        let opts = parse(&["-f", "out/usage.json"]);
        assert_eq!(opts.figure, Some(PathBuf::from("out/usage.json")));
    }
}
