//! Import set and registration statements accumulated by the walker

use crate::unit::{CoverageVariableId, SourceUnit};
use std::collections::HashSet;
use std::fmt;

/// Insertion-ordered set of package directories the driver must import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl ImportSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory; returns `false` if it was already present
    pub fn insert(&mut self, dir: &str) -> bool {
        if self.seen.contains(dir) {
            return false;
        }
        let _ = self.seen.insert(dir.to_string());
        self.order.push(dir.to_string());
        true
    }

    /// Check membership
    #[must_use]
    pub fn contains(&self, dir: &str) -> bool {
        self.seen.contains(dir)
    }

    /// Directories in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of directories
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Import block entries, one quoted path per line
    #[must_use]
    pub fn render(&self) -> String {
        self.iter().map(|dir| format!("\t\"{dir}\"\n")).collect()
    }
}

/// Binds one instrumented file to its package-qualified counter triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationStatement {
    /// File name recorded in the report
    pub path: String,
    /// Package qualifier of the counter variable
    pub package: String,
    /// Generated variable name
    pub var_name: String,
    /// Identifier the name was built from
    pub id: CoverageVariableId,
}

impl RegistrationStatement {
    /// Statement for `unit` using counter variable `id`
    #[must_use]
    pub fn new(unit: &SourceUnit, id: CoverageVariableId, var_prefix: &str) -> Self {
        Self {
            path: unit.path().to_string(),
            package: unit.package().to_string(),
            var_name: id.var_name(var_prefix),
            id,
        }
    }
}

impl fmt::Display for RegistrationStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qualified = format!("{}.{}", self.package, self.var_name);
        write!(
            f,
            "\tcoverRegisterFile(\"{}\", {q}.Count[:], {q}.Pos[:], {q}.NumStmt[:])",
            self.path,
            q = qualified
        )
    }
}
