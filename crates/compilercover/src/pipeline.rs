//! One complete run: walk, instrument, generate the driver

use crate::config::CoverConfig;
use crate::driver::{render, write_driver, DriverSettings};
use crate::instrumentor::{CoverTool, Instrumentor};
use crate::result::CoverResult;
use crate::walker::{TraversalContext, Walker};
use std::path::{Path, PathBuf};

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Accumulated walk state
    pub context: TraversalContext,
    /// Where the driver was written
    pub driver_path: PathBuf,
}

impl RunSummary {
    /// Number of instrumented files
    #[must_use]
    pub fn files(&self) -> usize {
        self.context.instrumented_count()
    }

    /// Number of imported packages
    #[must_use]
    pub fn packages(&self) -> usize {
        self.context.imports().len()
    }
}

/// Instrument the tree at `root` with `instrumentor` and write the driver
///
/// Any failure aborts the run. Files rewritten before the failure stay
/// rewritten; the tree must then be restored from version control.
pub fn instrument_tree_with<I: Instrumentor + ?Sized>(
    root: &Path,
    config: &CoverConfig,
    instrumentor: &mut I,
) -> CoverResult<RunSummary> {
    config.validate()?;
    let context = Walker::new(root, config).walk(instrumentor)?;
    let document = render(
        context.imports(),
        context.registrations(),
        &DriverSettings::from(config),
    );
    let driver_path = write_driver(root, config, &document)?;
    Ok(RunSummary {
        context,
        driver_path,
    })
}

/// Instrument the tree at `root` with the configured external tool
pub fn instrument_tree(root: &Path, config: &CoverConfig) -> CoverResult<RunSummary> {
    let mut tool = CoverTool::new(root, config)?;
    instrument_tree_with(root, config, &mut tool)
}
