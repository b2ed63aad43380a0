//! Eligibility Filter
//!
//! Decides, from a path alone, whether a file gets instrumented. The rules
//! are applied in order and the first match wins:
//!
//! 1. the path must lie under the anchor subtree
//! 2. the file must carry the source extension
//! 3. test files are skipped
//! 4. the generator source and its generated output are skipped together,
//!    because a toolchain test compares their timestamps
//! 5. excluded packages are skipped, including the anchor package itself,
//!    which hosts the driver and would otherwise import itself

use crate::config::CoverConfig;
use crate::unit::SourceUnit;
use std::fmt;
use std::path::{Component, Path};

/// Why a path was not instrumented
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Path does not lie under the anchor subtree
    OutsideSubtree,
    /// Not a source file
    WrongExtension,
    /// Test file
    TestFile,
    /// Generator source or generated output
    GeneratorPair,
    /// Containing package is excluded
    ExcludedPackage(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutsideSubtree => f.write_str("outside subtree"),
            Self::WrongExtension => f.write_str("not a source file"),
            Self::TestFile => f.write_str("test file"),
            Self::GeneratorPair => f.write_str("generator pair"),
            Self::ExcludedPackage(pkg) => write!(f, "excluded package '{pkg}'"),
        }
    }
}

/// Outcome of classifying one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Instrument this unit
    Accept(SourceUnit),
    /// Skip it, for the given reason
    Reject(Rejection),
}

impl Verdict {
    /// Check if accepted
    #[must_use]
    pub const fn is_accept(&self) -> bool {
        matches!(self, Self::Accept(_))
    }
}

/// Path predicate built from a [`CoverConfig`]
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    anchor: Vec<String>,
    extension: String,
    test_suffix: String,
    generator_files: Vec<String>,
    excluded_packages: Vec<String>,
}

impl EligibilityFilter {
    /// Create a filter from configuration
    #[must_use]
    pub fn new(config: &CoverConfig) -> Self {
        let anchor: Vec<String> = config
            .anchor_segments()
            .iter()
            .map(ToString::to_string)
            .collect();
        let mut excluded_packages = config.excluded_packages.clone();
        excluded_packages.push(config.anchor_package().to_string());
        Self {
            anchor,
            extension: config.extension.clone(),
            test_suffix: config.test_suffix.clone(),
            generator_files: config.generator_files.clone(),
            excluded_packages,
        }
    }

    /// Should this path be instrumented?
    #[must_use]
    pub fn accept(&self, path: &Path) -> bool {
        self.classify(path).is_accept()
    }

    /// Classify a path, returning the unit or the reason it was rejected
    #[must_use]
    pub fn classify(&self, path: &Path) -> Verdict {
        let Some(unit) = self.canonical_unit(path) else {
            return Verdict::Reject(Rejection::OutsideSubtree);
        };

        let name = unit.file_name();
        if !name.ends_with(&self.extension) {
            return Verdict::Reject(Rejection::WrongExtension);
        }
        if name.ends_with(&self.test_suffix) {
            return Verdict::Reject(Rejection::TestFile);
        }
        if self.generator_files.iter().any(|g| g == name) {
            return Verdict::Reject(Rejection::GeneratorPair);
        }
        let pkg = unit.package();
        if self.excluded_packages.iter().any(|p| p == pkg) {
            return Verdict::Reject(Rejection::ExcludedPackage(pkg.to_string()));
        }

        Verdict::Accept(unit)
    }

    /// Canonical anchor-relative form of `path`, if it lies under the anchor
    ///
    /// `.` components are dropped and `..` pops the preceding segment before
    /// the anchor is searched for. The first occurrence of the anchor wins.
    #[must_use]
    pub fn canonical_unit(&self, path: &Path) -> Option<SourceUnit> {
        let segments = normalize(path);
        let width = self.anchor.len();
        let start = segments
            .windows(width)
            .position(|w| w.iter().zip(&self.anchor).all(|(a, b)| a == b))?;
        let relative: Vec<&str> = segments[start..].iter().map(String::as_str).collect();
        if relative.len() <= width {
            return None;
        }
        SourceUnit::from_segments(&relative)
    }
}

fn normalize(path: &Path) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(seg) => {
                // Accept `/` inside a component on platforms where it is not
                // the separator.
                for part in seg.to_string_lossy().split(['/', '\\']) {
                    match part {
                        "" | "." => {}
                        ".." => {
                            segments.pop();
                        }
                        other => segments.push(other.to_string()),
                    }
                }
            }
            Component::ParentDir => {
                segments.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    segments
}
