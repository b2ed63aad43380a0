//! compilercover: statement coverage for the Go compiler
//!
//! ## Usage
//!
//! ```bash
//! compilercover plan --root $GOROOT/src             # List files to instrument
//! compilercover plan --rejected -f json             # Include skipped files
//! compilercover instrument --root $GOROOT/src       # Rewrite files, write cover.go
//! compilercover instrument --mode count -o c.out    # Counting mode, custom report
//! ```

use clap::Parser;
use compilercover_cli::{
    handlers::{execute_instrument, execute_plan},
    logging, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    logging::init(&config);

    match cli.command {
        Commands::Instrument(args) => execute_instrument(&config, &args),
        Commands::Plan(args) => execute_plan(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_quiet_wins() {
        let cli = Cli::parse_from(["compilercover", "-q", "-vv", "plan"]);
        assert_eq!(build_config(&cli).verbosity, Verbosity::Quiet);
    }

    #[test]
    fn test_build_config_verbosity_levels() {
        let cli = Cli::parse_from(["compilercover", "plan"]);
        assert_eq!(build_config(&cli).verbosity, Verbosity::Normal);
        let cli = Cli::parse_from(["compilercover", "-v", "plan"]);
        assert_eq!(build_config(&cli).verbosity, Verbosity::Verbose);
        let cli = Cli::parse_from(["compilercover", "-vvv", "plan"]);
        assert_eq!(build_config(&cli).verbosity, Verbosity::Debug);
    }

    #[test]
    fn test_build_config_color() {
        let cli = Cli::parse_from(["compilercover", "--color", "never", "plan"]);
        assert_eq!(build_config(&cli).color, ColorChoice::Never);
    }
}
