//! Tree Walker
//!
//! Walks the anchor subtree once, depth-first in lexical order, and
//! instruments every accepted file. Cross-file state lives in an explicit
//! [`TraversalContext`] instead of process-wide globals.
//!
//! The walk is fatal on first error. Running it twice over the same tree is
//! not supported: the second run would instrument already-rewritten files.

use crate::config::CoverConfig;
use crate::filter::{EligibilityFilter, Verdict};
use crate::instrumentor::Instrumentor;
use crate::registration::{ImportSet, RegistrationStatement};
use crate::result::{CoverError, CoverResult};
use crate::unit::{CoverageVariableId, SourceUnit};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// State accumulated across one walk
#[derive(Debug, Clone, Default)]
pub struct TraversalContext {
    next_id: CoverageVariableId,
    imports: ImportSet,
    registrations: Vec<RegistrationStatement>,
}

impl TraversalContext {
    /// Create an empty context; the first file gets id 0
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instrument one accepted unit and record it
    ///
    /// The id is only consumed once the instrumentor succeeds.
    pub fn record<I: Instrumentor + ?Sized>(
        &mut self,
        unit: &SourceUnit,
        instrumentor: &mut I,
        var_prefix: &str,
    ) -> CoverResult<()> {
        if self.imports.insert(unit.dir()) {
            debug!(dir = unit.dir(), "new import");
        }

        let id = self.next_id;
        let var_name = id.var_name(var_prefix);
        info!("processing {}", unit.path());
        instrumentor.instrument(unit, &var_name)?;

        self.registrations
            .push(RegistrationStatement::new(unit, id, var_prefix));
        self.next_id = id.next();
        Ok(())
    }

    /// Identifier the next instrumented file will receive
    #[must_use]
    pub const fn next_id(&self) -> CoverageVariableId {
        self.next_id
    }

    /// Packages the driver must import
    #[must_use]
    pub const fn imports(&self) -> &ImportSet {
        &self.imports
    }

    /// Registration statements in traversal order
    #[must_use]
    pub fn registrations(&self) -> &[RegistrationStatement] {
        &self.registrations
    }

    /// Number of instrumented files
    #[must_use]
    pub fn instrumented_count(&self) -> usize {
        self.registrations.len()
    }
}

/// One file seen during a survey
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyEntry {
    /// Path relative to the tree root
    pub path: PathBuf,
    /// Filter outcome
    pub verdict: Verdict,
}

/// Walks the anchor subtree of a tree root
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
    subtree: PathBuf,
    var_prefix: String,
    filter: EligibilityFilter,
}

impl Walker {
    /// Walker over `root` using `config`
    #[must_use]
    pub fn new(root: &Path, config: &CoverConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            subtree: config.subtree(root),
            var_prefix: config.var_prefix.clone(),
            filter: EligibilityFilter::new(config),
        }
    }

    /// The filter applied to each file
    #[must_use]
    pub const fn filter(&self) -> &EligibilityFilter {
        &self.filter
    }

    /// Instrument every accepted file, stopping at the first failure
    pub fn walk<I: Instrumentor + ?Sized>(
        &self,
        instrumentor: &mut I,
    ) -> CoverResult<TraversalContext> {
        let mut ctx = TraversalContext::new();
        self.for_each_file(|relative| {
            match self.filter.classify(relative) {
                Verdict::Accept(unit) => ctx.record(&unit, &mut *instrumentor, &self.var_prefix)?,
                Verdict::Reject(reason) => {
                    debug!(path = %relative.display(), %reason, "skipped");
                }
            }
            Ok(())
        })?;
        info!(
            files = ctx.instrumented_count(),
            packages = ctx.imports().len(),
            "walk complete"
        );
        Ok(ctx)
    }

    /// Classify every file without instrumenting anything
    pub fn survey(&self) -> CoverResult<Vec<SurveyEntry>> {
        let mut entries = Vec::new();
        self.for_each_file(|relative| {
            entries.push(SurveyEntry {
                path: relative.to_path_buf(),
                verdict: self.filter.classify(relative),
            });
            Ok(())
        })?;
        Ok(entries)
    }

    fn for_each_file<F>(&self, mut visit: F) -> CoverResult<()>
    where
        F: FnMut(&Path) -> CoverResult<()>,
    {
        for entry in WalkDir::new(&self.subtree).sort_by_file_name() {
            let entry = entry.map_err(|source| CoverError::Traversal {
                path: source
                    .path()
                    .map_or_else(|| self.subtree.clone(), Path::to_path_buf),
                source,
            })?;
            if entry.file_type().is_dir() {
                continue;
            }
            let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            visit(relative)?;
        }
        Ok(())
    }
}
