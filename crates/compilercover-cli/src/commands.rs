//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use compilercover::CoverMode;
use std::path::PathBuf;

/// compilercover: add statement coverage to the Go compiler source tree
#[derive(Parser, Debug)]
#[command(name = "compilercover")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Instrument every eligible file in place and generate the coverage driver
    ///
    /// Run once, from a clean checkout. Rewritten files are not restored;
    /// use version control to undo.
    Instrument(InstrumentArgs),

    /// List the files an instrument run would rewrite, without touching them
    Plan(PlanArgs),
}

/// Tree location and configuration file, shared by all subcommands
#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    /// Root of the source tree (the directory containing `cmd/`)
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// YAML configuration file
    #[arg(short, long, env = "COMPILERCOVER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Arguments for the instrument command
#[derive(Args, Debug)]
pub struct InstrumentArgs {
    /// Tree options
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Counter mode
    #[arg(long)]
    pub mode: Option<ModeArg>,

    /// Report file the driver appends to at exit
    #[arg(short, long)]
    pub output: Option<String>,

    /// Driver path, relative to the root
    #[arg(long)]
    pub driver: Option<String>,

    /// Instrumentor command, split on whitespace (default: "go tool cover")
    #[arg(long)]
    pub tool: Option<String>,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Tree options
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Also list rejected files with the reason
    #[arg(long)]
    pub rejected: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: PlanFormat,
}

/// Counter mode argument
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    /// Record whether each statement ran
    Set,
    /// Count executions
    Count,
    /// Count executions atomically
    Atomic,
}

impl From<ModeArg> for CoverMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Set => Self::Set,
            ModeArg::Count => Self::Count,
            ModeArg::Atomic => Self::Atomic,
        }
    }
}

/// Plan output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlanFormat {
    /// One line per file
    #[default]
    Text,
    /// JSON document
    Json,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
