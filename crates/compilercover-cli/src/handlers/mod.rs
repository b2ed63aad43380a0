//! Command handlers - kept out of main.rs for testability

pub mod instrument;
pub mod plan;

pub use instrument::{apply_overrides, execute_instrument, parse_tool};
pub use plan::{execute_plan, plan_entries, render_plan_json, render_plan_text, PlanEntry};

use crate::commands::TreeArgs;
use crate::error::CliResult;
use compilercover::CoverConfig;

/// Load the configuration file named in `tree`, or the defaults
pub fn load_config(tree: &TreeArgs) -> CliResult<CoverConfig> {
    let config = match tree.config {
        Some(ref path) => CoverConfig::from_yaml_file(path)?,
        None => CoverConfig::default(),
    };
    Ok(config)
}
