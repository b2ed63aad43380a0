//! Coverage Registry
//!
//! Runtime side of the generated driver: instrumented files register their
//! counter, position and statement tables once at startup, and the registry
//! appends one report line per block to a shared output file at shutdown.
//! The Go driver emitted by [`crate::driver`] embeds the same logic; this type
//! serves Rust hosts and pins the behavior down in tests.
//!
//! Registration happens during single-threaded initialization and takes
//! `&mut self`. Counters are shared with the instrumented code, which may
//! still be incrementing them from other threads at flush time, so every read
//! is an acquire load.

use crate::block::CoverageBlock;
use crate::config::CoverMode;
use crate::result::{CoverError, CoverResult};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Counter array shared between instrumented code and the registry
pub type Counters = Arc<[AtomicU32]>;

/// Exit status used when the report cannot be written
pub const REPORT_FAILURE_STATUS: i32 = 2;

/// Allocate `len` zeroed counters
#[must_use]
pub fn new_counters(len: usize) -> Counters {
    (0..len).map(|_| AtomicU32::new(0)).collect()
}

/// Check the table layout agreed with the instrumentor
///
/// `positions` holds three words per counter and `num_stmts` one entry per
/// counter.
pub fn check_layout(counters: usize, positions: usize, num_stmts: usize) -> CoverResult<()> {
    if counters.checked_mul(3) != Some(positions) || counters != num_stmts {
        return Err(CoverError::SizeMismatch {
            counters,
            positions,
            num_stmts,
        });
    }
    Ok(())
}

#[derive(Debug)]
struct FileCoverage {
    name: String,
    counters: Counters,
    blocks: Vec<CoverageBlock>,
}

/// Process-wide map from file name to counters and decoded blocks
#[derive(Debug)]
pub struct CoverageRegistry {
    mode: CoverMode,
    files: Vec<FileCoverage>,
    index: HashMap<String, usize>,
}

impl CoverageRegistry {
    /// Empty registry reporting under `mode`
    #[must_use]
    pub fn new(mode: CoverMode) -> Self {
        Self {
            mode,
            files: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Counter mode written in the report header
    #[must_use]
    pub const fn mode(&self) -> CoverMode {
        self.mode
    }

    /// Register one file's tables
    ///
    /// A second registration under the same name is ignored.
    ///
    /// # Panics
    ///
    /// Panics if the table lengths disagree. That means the driver and the
    /// instrumentor were built against different layouts, and no report
    /// produced from them could be trusted.
    pub fn register(
        &mut self,
        file_name: &str,
        counters: Counters,
        positions: &[u32],
        num_stmts: &[u16],
    ) {
        if let Err(err) = self.try_register(file_name, counters, positions, num_stmts) {
            panic!("{err}");
        }
    }

    /// Like [`register`](Self::register), returning the layout error instead
    /// of panicking; `Ok(false)` means the name was already registered
    pub fn try_register(
        &mut self,
        file_name: &str,
        counters: Counters,
        positions: &[u32],
        num_stmts: &[u16],
    ) -> CoverResult<bool> {
        check_layout(counters.len(), positions.len(), num_stmts.len())?;
        if self.index.contains_key(file_name) {
            return Ok(false);
        }
        let blocks = CoverageBlock::decode_all(positions, num_stmts);
        let _ = self.index.insert(file_name.to_string(), self.files.len());
        self.files.push(FileCoverage {
            name: file_name.to_string(),
            counters,
            blocks,
        });
        Ok(true)
    }

    /// Number of registered files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if `file_name` is registered
    #[must_use]
    pub fn contains(&self, file_name: &str) -> bool {
        self.index.contains_key(file_name)
    }

    /// Counters registered for `file_name`
    #[must_use]
    pub fn counters(&self, file_name: &str) -> Option<&Counters> {
        self.index.get(file_name).map(|&i| &self.files[i].counters)
    }

    /// Decoded blocks registered for `file_name`
    #[must_use]
    pub fn blocks(&self, file_name: &str) -> Option<&[CoverageBlock]> {
        self.index
            .get(file_name)
            .map(|&i| self.files[i].blocks.as_slice())
    }

    /// Total number of report lines one flush writes
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.files.iter().map(|f| f.blocks.len()).sum()
    }

    /// Write the report body, preceded by the header if `header` is set
    pub fn write_report<W: Write>(&self, out: &mut W, header: bool) -> std::io::Result<()> {
        if header {
            writeln!(out, "mode: {}", self.mode)?;
        }
        for file in &self.files {
            for (block, counter) in file.blocks.iter().zip(file.counters.iter()) {
                let count = counter.load(Ordering::Acquire);
                writeln!(out, "{}", block.line(&file.name, count))?;
            }
        }
        Ok(())
    }

    /// Append a snapshot of every counter to `path`
    ///
    /// The file is created if missing and gets a header only when empty, so
    /// separate processes can share one report. Calling this twice appends a
    /// second cumulative snapshot.
    pub fn flush(&self, path: &Path) -> CoverResult<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let header = file.metadata()?.len() == 0;
        let mut out = BufWriter::new(file);
        self.write_report(&mut out, header)?;
        out.flush()?;
        Ok(())
    }

    /// [`flush`](Self::flush), terminating the process on failure
    ///
    /// Prints `cover: <error>` to stderr and exits with
    /// [`REPORT_FAILURE_STATUS`].
    pub fn flush_or_exit(&self, path: &Path) {
        if let Err(err) = self.flush(path) {
            eprintln!("cover: {err}");
            std::process::exit(REPORT_FAILURE_STATUS);
        }
    }
}

/// Owns a registry and flushes it exactly once when dropped
///
/// Rust has no exit hook, so a host keeps the guard alive for the whole
/// program, typically as a binding in `main`. If the guard is leaked or the
/// process exits without unwinding, nothing is written.
#[derive(Debug)]
pub struct FlushGuard {
    registry: CoverageRegistry,
    path: PathBuf,
    flushed: bool,
}

impl FlushGuard {
    /// Guard writing `registry` to `path`
    #[must_use]
    pub fn new(registry: CoverageRegistry, path: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            path: path.into(),
            flushed: false,
        }
    }

    /// The guarded registry
    #[must_use]
    pub const fn registry(&self) -> &CoverageRegistry {
        &self.registry
    }

    /// Mutable access, for registration during startup
    pub fn registry_mut(&mut self) -> &mut CoverageRegistry {
        &mut self.registry
    }

    /// Flush now and disarm the guard, returning any error
    pub fn finish(mut self) -> CoverResult<()> {
        self.flushed = true;
        self.registry.flush(&self.path)
    }
}

impl Drop for FlushGuard {
    fn drop(&mut self) {
        if !self.flushed {
            self.flushed = true;
            self.registry.flush_or_exit(&self.path);
        }
    }
}
