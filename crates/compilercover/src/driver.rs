//! Driver Generator
//!
//! Renders the Go driver that imports every instrumented package, registers
//! each file's counters at init time and appends the merged report at exit.
//! [`render`] is pure; [`write_driver`] does the I/O.

use crate::config::{CoverConfig, CoverMode};
use crate::registration::{ImportSet, RegistrationStatement};
use crate::result::{CoverError, CoverResult};
use std::path::{Path, PathBuf};
use tracing::info;

const TEMPLATE: &str = r#"// Code generated by compilercover. DO NOT EDIT.

package @PACKAGE@

import (
	"fmt"
	"os"
	"sync/atomic"
	"testing"
@IMPORTS@)

func init() {
@REGISTRATIONS@
	cover = testing.Cover{
		Mode:            "@MODE@",
		Counters:        coverCounters,
		Blocks:          coverBlocks,
		CoveredPackages: @COVERED@,
	}
	@EXIT_HOOK@(coverageReport)
}

var (
	cover         testing.Cover
	coverCounters = make(map[string][]uint32)
	coverBlocks   = make(map[string][]testing.CoverBlock)
)

func coverRegisterFile(fileName string, counter []uint32, pos []uint32, numStmts []uint16) {
	if 3*len(counter) != len(pos) || len(counter) != len(numStmts) {
		panic("coverage: mismatched sizes")
	}
	if coverCounters[fileName] != nil {
		// Already registered.
		return
	}
	coverCounters[fileName] = counter
	block := make([]testing.CoverBlock, len(counter))
	for i := range counter {
		block[i] = testing.CoverBlock{
			Line0: pos[3*i+0],
			Col0:  uint16(pos[3*i+2]),
			Line1: pos[3*i+1],
			Col1:  uint16(pos[3*i+2] >> 16),
			Stmts: numStmts[i],
		}
	}
	coverBlocks[fileName] = block
}

func coverageReport() {
	f, err := os.OpenFile(@OUTPUT@, os.O_WRONLY|os.O_APPEND|os.O_CREATE, 0666)
	mustBeNil(err)
	s, err := f.Stat()
	mustBeNil(err)
	if s.Size() == 0 {
		_, err = fmt.Fprintf(f, "mode: %s\n", cover.Mode)
		mustBeNil(err)
	}
	defer func() { mustBeNil(f.Close()) }()

	for name, counts := range cover.Counters {
		blocks := cover.Blocks[name]
		for i := range counts {
			stmts := int64(blocks[i].Stmts)
			count := atomic.LoadUint32(&counts[i])
			_, err := fmt.Fprintf(f, "%s:%d.%d,%d.%d %d %d\n", name,
				blocks[i].Line0, blocks[i].Col0,
				blocks[i].Line1, blocks[i].Col1,
				stmts,
				count)
			mustBeNil(err)
		}
	}
}

func mustBeNil(err error) {
	if err != nil {
		fmt.Fprintf(os.Stderr, "cover: %s\n", err)
		os.Exit(2)
	}
}
"#;

/// Fixed parameters of the driver text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverSettings {
    /// Package clause
    pub package_clause: String,
    /// Counter mode recorded in the report header
    pub mode: CoverMode,
    /// Report path the driver appends to
    pub output_path: String,
    /// Function receiving the report writer
    pub exit_hook: String,
    /// `testing.Cover.CoveredPackages` label
    pub covered_packages: String,
}

impl From<&CoverConfig> for DriverSettings {
    fn from(config: &CoverConfig) -> Self {
        Self {
            package_clause: config.package_clause.clone(),
            mode: config.mode,
            output_path: config.output_path.clone(),
            exit_hook: config.exit_hook.clone(),
            covered_packages: config.covered_packages.clone(),
        }
    }
}

/// Rendered driver source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverDocument {
    text: String,
    imports: usize,
    registrations: usize,
}

impl DriverDocument {
    /// Source text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of imported packages
    #[must_use]
    pub const fn import_count(&self) -> usize {
        self.imports
    }

    /// Number of registered files
    #[must_use]
    pub const fn registration_count(&self) -> usize {
        self.registrations
    }
}

/// Render the driver for the given imports and registrations
#[must_use]
pub fn render(
    imports: &ImportSet,
    registrations: &[RegistrationStatement],
    settings: &DriverSettings,
) -> DriverDocument {
    let registration_text: String = registrations.iter().map(|r| format!("{r}\n")).collect();
    let text = TEMPLATE
        .replace("@PACKAGE@", &settings.package_clause)
        .replace("@IMPORTS@", &imports.render())
        .replace("@REGISTRATIONS@", &registration_text)
        .replace("@MODE@", settings.mode.as_str())
        .replace("@COVERED@", &go_quote(&settings.covered_packages))
        .replace("@EXIT_HOOK@", &settings.exit_hook)
        .replace("@OUTPUT@", &go_quote(&settings.output_path));

    DriverDocument {
        text,
        imports: imports.len(),
        registrations: registrations.len(),
    }
}

/// Write `document` to the configured driver path under `root`, replacing it
pub fn write_driver(
    root: &Path,
    config: &CoverConfig,
    document: &DriverDocument,
) -> CoverResult<PathBuf> {
    let path = config.driver_destination(root);
    info!("generating {}", config.driver_path);
    std::fs::write(&path, document.text()).map_err(|source| CoverError::DriverWrite {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Interpreted Go string literal for `s`
fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
