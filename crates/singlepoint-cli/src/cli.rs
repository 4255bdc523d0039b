use clap::{Args, Parser, Subcommand, ValueEnum};
use singlepoint::engine::config::NeighborStrategy;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "singlepoint - evaluate the potential energy and forces of one molecular \
             configuration in a periodic box.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate energy and forces for a data file and a force-field settings file.
    Run(RunArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned two-column table.
    #[default]
    Table,
    /// One header row and one value row.
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NeighborArg {
    CellList,
    AllPairs,
}

impl From<NeighborArg> for NeighborStrategy {
    fn from(arg: NeighborArg) -> Self {
        match arg {
            NeighborArg::CellList => NeighborStrategy::CellList,
            NeighborArg::AllPairs => NeighborStrategy::AllPairs,
        }
    }
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    // --- Inputs ---
    /// Path to the data file with box, atoms and bonds.
    #[arg(short, long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Path to the force-field settings file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub forcefield: Option<PathBuf>,

    /// Path to a run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Evaluation Overrides ---
    /// Override the neighbor search strategy.
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub neighbor: Option<NeighborArg>,

    /// Skip the force computation; only energies are reported.
    #[arg(long)]
    pub no_forces: bool,

    // --- Output ---
    /// Format of the energy report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Append grouped totals (dispersive, electrostatic, non-bonded, all dihedrals).
    #[arg(long)]
    pub groups: bool,

    /// Write the energy report to a file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write per-atom forces as CSV to the given file.
    #[arg(long, value_name = "PATH", conflicts_with = "no_forces")]
    pub forces_output: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S evaluation.neighbor-strategy=all-pairs
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
