//! External Instrumentor
//!
//! The statement rewriter is an external tool. It is invoked as
//! `<tool...> -mode=<mode> -var <name> <path>` from the tree root, prints the
//! rewritten source on stdout, and the result replaces the file in place.
//! Once compiled, the rewritten file exposes `<name>.Count`, `<name>.Pos` and
//! `<name>.NumStmt`.

use crate::config::{CoverConfig, CoverMode};
use crate::result::{CoverError, CoverResult};
use crate::unit::SourceUnit;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Rewrites one source file so it counts statement executions
pub trait Instrumentor {
    /// Instrument `unit` in place, naming its counter variable `var_name`
    fn instrument(&mut self, unit: &SourceUnit, var_name: &str) -> CoverResult<()>;
}

/// Runs `go tool cover` (or a configured replacement) on each file
#[derive(Debug, Clone)]
pub struct CoverTool {
    root: PathBuf,
    program: String,
    args: Vec<String>,
    mode: CoverMode,
}

impl CoverTool {
    /// Tool rooted at `root`, built from the configured command and mode
    pub fn new(root: &Path, config: &CoverConfig) -> CoverResult<Self> {
        let (program, args) = config
            .tool
            .split_first()
            .ok_or_else(|| CoverError::config("tool command is empty"))?;
        Ok(Self {
            root: root.to_path_buf(),
            program: program.clone(),
            args: args.to_vec(),
            mode: config.mode,
        })
    }

    /// Full argument list for one invocation
    #[must_use]
    pub fn command_args(&self, unit: &SourceUnit, var_name: &str) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(format!("-mode={}", self.mode));
        args.push("-var".to_string());
        args.push(var_name.to_string());
        args.push(unit.path().to_string());
        args
    }

    fn destination(&self, unit: &SourceUnit) -> PathBuf {
        unit.path()
            .split('/')
            .fold(self.root.clone(), |acc, seg| acc.join(seg))
    }
}

impl Instrumentor for CoverTool {
    fn instrument(&mut self, unit: &SourceUnit, var_name: &str) -> CoverResult<()> {
        let args = self.command_args(unit, var_name);
        debug!(program = %self.program, ?args, "running instrumentor");
        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(&self.root)
            .output()
            .map_err(|source| CoverError::ToolLaunch {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() && !output.stderr.is_empty() {
            warn!(path = unit.path(), "instrumentor exited cleanly but wrote to stderr");
        }
        if !output.status.success() || !output.stderr.is_empty() {
            return Err(CoverError::Instrumentation {
                path: unit.path().to_string(),
                status: output.status,
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        std::fs::write(self.destination(unit), &output.stdout)?;
        Ok(())
    }
}

/// Instrumentor that leaves every file untouched, for planning runs
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRun;

impl Instrumentor for DryRun {
    fn instrument(&mut self, _unit: &SourceUnit, _var_name: &str) -> CoverResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn unit() -> SourceUnit {
        SourceUnit::from_segments(&["cmd", "compile", "internal", "gc", "a.go"]).unwrap()
    }

    fn tree_with_file(contents: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("cmd/compile/internal/gc");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("a.go"), contents).unwrap();
        dir
    }

    fn sh_tool(script: &str) -> Vec<String> {
        vec![
            "sh".to_string(),
            "-c".to_string(),
            script.to_string(),
            "cover".to_string(),
        ]
    }

    #[test]
    fn test_command_args_layout() {
        let config = CoverConfig::default().with_mode(CoverMode::Atomic);
        let tool = CoverTool::new(Path::new("/go/src"), &config).unwrap();
        assert_eq!(
            tool.command_args(&unit(), "GoCover_4"),
            vec![
                "tool",
                "cover",
                "-mode=atomic",
                "-var",
                "GoCover_4",
                "cmd/compile/internal/gc/a.go"
            ]
        );
    }

    #[test]
    fn test_empty_tool_rejected() {
        let config = CoverConfig::default().with_tool(Vec::new());
        assert!(CoverTool::new(Path::new("."), &config).is_err());
    }

    #[test]
    fn test_stdout_replaces_file() {
        let dir = tree_with_file("package gc\n");
        // $1=-mode=set $2=-var $3=name $4=path
        let config = CoverConfig::default()
            .with_tool(sh_tool("printf '// %s %s\\n' \"$1\" \"$3\"; cat \"$4\""));
        let mut tool = CoverTool::new(dir.path(), &config).unwrap();
        tool.instrument(&unit(), "GoCover_0").unwrap();

        let rewritten =
            fs::read_to_string(dir.path().join("cmd/compile/internal/gc/a.go")).unwrap();
        assert_eq!(rewritten, "// -mode=set GoCover_0\npackage gc\n");
    }

    #[test]
    fn test_nonzero_exit_is_fatal_and_file_kept() {
        let dir = tree_with_file("package gc\n");
        let config = CoverConfig::default().with_tool(sh_tool("echo partial; exit 3"));
        let mut tool = CoverTool::new(dir.path(), &config).unwrap();
        let err = tool.instrument(&unit(), "GoCover_0").unwrap_err();
        match err {
            CoverError::Instrumentation { path, stdout, .. } => {
                assert_eq!(path, "cmd/compile/internal/gc/a.go");
                assert_eq!(stdout, "partial\n");
            }
            other => panic!("unexpected error: {other}"),
        }
        let kept = fs::read_to_string(dir.path().join("cmd/compile/internal/gc/a.go")).unwrap();
        assert_eq!(kept, "package gc\n");
    }

    #[test]
    fn test_diagnostic_output_is_fatal() {
        let dir = tree_with_file("package gc\n");
        let config = CoverConfig::default().with_tool(sh_tool("cat \"$4\"; echo warning >&2"));
        let mut tool = CoverTool::new(dir.path(), &config).unwrap();
        let err = tool.instrument(&unit(), "GoCover_0").unwrap_err();
        assert!(err.to_string().contains("warning"));
    }

    #[test]
    fn test_missing_program_reports_launch_failure() {
        let dir = tree_with_file("package gc\n");
        let config =
            CoverConfig::default().with_tool(vec!["definitely-not-a-cover-tool-xyz".into()]);
        let mut tool = CoverTool::new(dir.path(), &config).unwrap();
        let err = tool.instrument(&unit(), "GoCover_0").unwrap_err();
        assert!(matches!(err, CoverError::ToolLaunch { .. }));
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = tree_with_file("package gc\n");
        DryRun.instrument(&unit(), "GoCover_0").unwrap();
        let kept = fs::read_to_string(dir.path().join("cmd/compile/internal/gc/a.go")).unwrap();
        assert_eq!(kept, "package gc\n");
    }
}
