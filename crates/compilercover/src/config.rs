//! Instrumentation configuration
//!
//! Defaults describe the Go compiler tree: files under `cmd/compile`,
//! rewritten by `go tool cover`, aggregated by `cmd/compile/cover.go` into
//! `/tmp/cover.out`. Every field can be overridden from a YAML file.

use crate::result::{CoverError, CoverResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Counter mode passed to the instrumentor and recorded in the report header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverMode {
    /// Counter is set to 1 when the statement runs
    #[default]
    Set,
    /// Counter counts executions
    Count,
    /// Like `Count`, with atomic increments
    Atomic,
}

impl CoverMode {
    /// Name used on the tool command line and in the report header
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Count => "count",
            Self::Atomic => "atomic",
        }
    }
}

impl fmt::Display for CoverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete configuration for one instrumentation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Path segments locating the subtree, e.g. `cmd/compile`
    pub anchor: String,
    /// Source file extension, including the dot
    pub extension: String,
    /// File name suffix marking test files
    pub test_suffix: String,
    /// Generator source and its generated output, always excluded as a pair
    pub generator_files: Vec<String>,
    /// Package names never instrumented
    pub excluded_packages: Vec<String>,
    /// Prefix of the generated counter variable names
    pub var_prefix: String,
    /// Counter mode
    pub mode: CoverMode,
    /// Instrumentor program followed by its leading arguments
    pub tool: Vec<String>,
    /// Driver destination, relative to the tree root
    pub driver_path: String,
    /// Report written by the driver at process exit
    pub output_path: String,
    /// Function the driver hands its report writer to
    pub exit_hook: String,
    /// Package clause of the driver
    pub package_clause: String,
    /// Label stored in the driver's `testing.Cover` value
    pub covered_packages: String,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            anchor: "cmd/compile".to_string(),
            extension: ".go".to_string(),
            test_suffix: "_test.go".to_string(),
            generator_files: vec!["mkbuiltin.go".to_string(), "builtin.go".to_string()],
            excluded_packages: ["gen", "testdata", "builtin", "test"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            var_prefix: "GoCover_".to_string(),
            mode: CoverMode::Set,
            tool: vec!["go".to_string(), "tool".to_string(), "cover".to_string()],
            driver_path: "cmd/compile/cover.go".to_string(),
            output_path: "/tmp/cover.out".to_string(),
            exit_hook: "gc.AtExit".to_string(),
            package_clause: "main".to_string(),
            covered_packages: " in ./...".to_string(),
        }
    }
}

impl CoverConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document; absent keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> CoverResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| CoverError::config(format!("invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> CoverResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            CoverError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Reject configurations that cannot drive a run
    pub fn validate(&self) -> CoverResult<()> {
        if self.anchor_segments().is_empty() {
            return Err(CoverError::config("anchor must name at least one segment"));
        }
        if self.tool.is_empty() || self.tool[0].is_empty() {
            return Err(CoverError::config("tool command is empty"));
        }
        if self.extension.is_empty() {
            return Err(CoverError::config("extension is empty"));
        }
        if self.var_prefix.is_empty() {
            return Err(CoverError::config("var_prefix is empty"));
        }
        Ok(())
    }

    /// Anchor split into its path segments
    #[must_use]
    pub fn anchor_segments(&self) -> Vec<&str> {
        self.anchor
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".")
            .collect()
    }

    /// Package name of the anchor directory itself
    ///
    /// The driver is compiled into this package, so it can never be
    /// instrumented without the driver importing itself.
    #[must_use]
    pub fn anchor_package(&self) -> &str {
        self.anchor_segments().last().copied().unwrap_or_default()
    }

    /// Directory walked for candidate files
    #[must_use]
    pub fn subtree(&self, root: &Path) -> PathBuf {
        self.anchor_segments()
            .iter()
            .fold(root.to_path_buf(), |acc, seg| acc.join(seg))
    }

    /// Absolute destination of the generated driver
    #[must_use]
    pub fn driver_destination(&self, root: &Path) -> PathBuf {
        self.driver_path
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(root.to_path_buf(), |acc, seg| acc.join(seg))
    }

    /// Set the counter mode
    #[must_use]
    pub const fn with_mode(mut self, mode: CoverMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the instrumentor command
    #[must_use]
    pub fn with_tool(mut self, tool: Vec<String>) -> Self {
        self.tool = tool;
        self
    }

    /// Set the report output path
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<String>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set the driver path
    #[must_use]
    pub fn with_driver_path(mut self, path: impl Into<String>) -> Self {
        self.driver_path = path.into();
        self
    }

    /// Set the anchor
    #[must_use]
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = anchor.into();
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_compiler_tree() {
        let config = CoverConfig::default();
        assert_eq!(config.anchor_segments(), vec!["cmd", "compile"]);
        assert_eq!(config.anchor_package(), "compile");
        assert_eq!(config.mode, CoverMode::Set);
        assert_eq!(config.var_prefix, "GoCover_");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(CoverMode::Set.to_string(), "set");
        assert_eq!(CoverMode::Count.to_string(), "count");
        assert_eq!(CoverMode::Atomic.to_string(), "atomic");
    }

    #[test]
    fn test_yaml_partial_override() {
        let config = CoverConfig::from_yaml_str(
            "mode: atomic\noutput_path: /var/tmp/c.out\ntool: [\"cover\"]\n",
        )
        .unwrap();
        assert_eq!(config.mode, CoverMode::Atomic);
        assert_eq!(config.output_path, "/var/tmp/c.out");
        assert_eq!(config.tool, vec!["cover".to_string()]);
        assert_eq!(config.anchor, "cmd/compile");
    }

    #[test]
    fn test_yaml_rejects_empty_tool() {
        let err = CoverConfig::from_yaml_str("tool: []\n").unwrap_err();
        assert!(err.to_string().contains("tool command is empty"));
    }

    #[test]
    fn test_yaml_rejects_garbage() {
        assert!(CoverConfig::from_yaml_str("mode: [").is_err());
        assert!(CoverConfig::from_yaml_str("mode: sometimes\n").is_err());
    }

    #[test]
    fn test_from_missing_file() {
        let err = CoverConfig::from_yaml_file(Path::new("/nonexistent/cover.yaml")).unwrap_err();
        assert!(matches!(err, CoverError::Config { .. }));
    }

    #[test]
    fn test_subtree_and_driver_paths() {
        let config = CoverConfig::default();
        let root = Path::new("/go/src");
        assert_eq!(config.subtree(root), PathBuf::from("/go/src/cmd/compile"));
        assert_eq!(
            config.driver_destination(root),
            PathBuf::from("/go/src/cmd/compile/cover.go")
        );
    }

    #[test]
    fn test_builder_methods() {
        let config = CoverConfig::new()
            .with_mode(CoverMode::Count)
            .with_tool(vec!["sh".into()])
            .with_output_path("out.txt")
            .with_driver_path("x/driver.go")
            .with_anchor("src/x");
        assert_eq!(config.mode, CoverMode::Count);
        assert_eq!(config.output_path, "out.txt");
        assert_eq!(config.driver_path, "x/driver.go");
        assert_eq!(config.anchor_package(), "x");
    }

    #[test]
    fn test_empty_anchor_invalid() {
        let config = CoverConfig::new().with_anchor("/");
        assert!(config.validate().is_err());
    }
}
