//! Instrument command handler

use super::load_config;
use crate::commands::InstrumentArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use compilercover::{instrument_tree, CoverConfig, RunSummary};
use console::style;
use tracing::debug;

/// Execute the instrument command
pub fn execute_instrument(config: &CliConfig, args: &InstrumentArgs) -> CliResult<()> {
    let cover = apply_overrides(load_config(&args.tree)?, args)?;
    cover.validate()?;
    debug!(root = %args.tree.root.display(), config = ?cover, "effective configuration");

    let summary = instrument_tree(&args.tree.root, &cover)?;

    if !config.verbosity.is_quiet() {
        print_summary(config, &cover, &summary);
    }
    Ok(())
}

/// Apply command-line flags on top of the file configuration
pub fn apply_overrides(mut cover: CoverConfig, args: &InstrumentArgs) -> CliResult<CoverConfig> {
    if let Some(mode) = args.mode {
        cover = cover.with_mode(mode.into());
    }
    if let Some(ref output) = args.output {
        cover = cover.with_output_path(output.clone());
    }
    if let Some(ref driver) = args.driver {
        cover = cover.with_driver_path(driver.clone());
    }
    if let Some(ref tool) = args.tool {
        cover = cover.with_tool(parse_tool(tool)?);
    }
    Ok(cover)
}

/// Split a `--tool` value into program and arguments
pub fn parse_tool(tool: &str) -> CliResult<Vec<String>> {
    let parts: Vec<String> = tool.split_whitespace().map(ToString::to_string).collect();
    if parts.is_empty() {
        return Err(CliError::invalid_argument("--tool must name a program"));
    }
    Ok(parts)
}

fn print_summary(config: &CliConfig, cover: &CoverConfig, summary: &RunSummary) {
    let colored = config.color.should_color();
    let check = if colored {
        style("✓").green().to_string()
    } else {
        "✓".to_string()
    };
    println!(
        "{check} Instrumented {} file(s) in {} package(s)",
        summary.files(),
        summary.packages()
    );
    println!("  Driver: {}", summary.driver_path.display());
    println!("  Report: {} (mode: {})", cover.output_path, cover.mode);
}
