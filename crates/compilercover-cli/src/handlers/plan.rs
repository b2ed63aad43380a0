//! Plan command handler

use super::load_config;
use crate::commands::{PlanArgs, PlanFormat};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use compilercover::{CoverageVariableId, SurveyEntry, Verdict, Walker};
use console::style;
use serde::Serialize;
use std::fmt::Write as _;

/// One row of the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    /// Path relative to the tree root
    pub path: String,
    /// Coverage variable the file would receive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub var: Option<String>,
    /// Reason the file would be skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
}

/// Execute the plan command
pub fn execute_plan(config: &CliConfig, args: &PlanArgs) -> CliResult<()> {
    let cover = load_config(&args.tree)?;
    cover.validate()?;

    let survey = Walker::new(&args.tree.root, &cover).survey()?;
    let entries = plan_entries(&survey, &cover.var_prefix);

    let output = match args.format {
        PlanFormat::Text => {
            render_plan_text(&entries, args.rejected, config.color.should_color())
        }
        PlanFormat::Json => render_plan_json(&entries, args.rejected)?,
    };
    print!("{output}");
    Ok(())
}

/// Assign variable names to accepted files in walk order
#[must_use]
pub fn plan_entries(survey: &[SurveyEntry], var_prefix: &str) -> Vec<PlanEntry> {
    let mut id = CoverageVariableId::default();
    survey
        .iter()
        .map(|entry| match entry.verdict {
            Verdict::Accept(ref unit) => {
                let var = id.var_name(var_prefix);
                id = id.next();
                PlanEntry {
                    path: unit.path().to_string(),
                    var: Some(var),
                    rejected: None,
                }
            }
            Verdict::Reject(ref reason) => PlanEntry {
                path: entry.path.to_string_lossy().into_owned(),
                var: None,
                rejected: Some(reason.to_string()),
            },
        })
        .collect()
}

/// Render the plan as aligned text
#[must_use]
pub fn render_plan_text(entries: &[PlanEntry], show_rejected: bool, colored: bool) -> String {
    let mut out = String::new();
    let mut accepted = 0usize;
    for entry in entries {
        match (&entry.var, &entry.rejected) {
            (Some(var), _) => {
                accepted += 1;
                let _ = writeln!(out, "{var:<14} {}", entry.path);
            }
            (None, Some(reason)) if show_rejected => {
                let tag = if colored {
                    style("skip").dim().to_string()
                } else {
                    "skip".to_string()
                };
                let _ = writeln!(out, "{tag:<14} {} ({reason})", entry.path);
            }
            _ => {}
        }
    }
    let _ = writeln!(out, "{accepted} file(s) would be instrumented");
    out
}

/// Render the plan as a JSON array
pub fn render_plan_json(entries: &[PlanEntry], show_rejected: bool) -> CliResult<String> {
    let shown: Vec<&PlanEntry> = entries
        .iter()
        .filter(|entry| show_rejected || entry.var.is_some())
        .collect();
    let mut json =
        serde_json::to_string_pretty(&shown).map_err(|e| CliError::output(e.to_string()))?;
    json.push('\n');
    Ok(json)
}
