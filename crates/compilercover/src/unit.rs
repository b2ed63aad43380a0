//! Source units and their counter variable identifiers

use std::fmt;

/// A discovered source file, identified by its anchor-relative path
///
/// Paths always use `/` separators, since they end up as Go import paths
/// and string literals in the driver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceUnit {
    path: String,
    dir_len: usize,
}

impl SourceUnit {
    /// Build a unit from canonical segments; the last segment is the file name
    ///
    /// Returns `None` for a bare file name with no containing directory.
    #[must_use]
    pub fn from_segments(segments: &[&str]) -> Option<Self> {
        if segments.len() < 2 {
            return None;
        }
        let path = segments.join("/");
        let dir_len = path.len() - segments[segments.len() - 1].len() - 1;
        Some(Self { path, dir_len })
    }

    /// Anchor-relative path, e.g. `cmd/compile/internal/gc/main.go`
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Containing directory, e.g. `cmd/compile/internal/gc`
    #[must_use]
    pub fn dir(&self) -> &str {
        &self.path[..self.dir_len]
    }

    /// File name, e.g. `main.go`
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.path[self.dir_len + 1..]
    }

    /// Package name: the last segment of the containing directory
    #[must_use]
    pub fn package(&self) -> &str {
        let dir = self.dir();
        dir.rsplit('/').next().unwrap_or(dir)
    }
}

impl fmt::Display for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Per-file identifier naming one counter/position/statement-count triple
///
/// Assigned in traversal order from 0. Only unique within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CoverageVariableId(u32);

impl CoverageVariableId {
    /// Create a new variable ID
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the inner value
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// The identifier following this one
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Generated variable name: prefix followed by the decimal id
    #[must_use]
    pub fn var_name(self, prefix: &str) -> String {
        format!("{prefix}{}", self.0)
    }
}
