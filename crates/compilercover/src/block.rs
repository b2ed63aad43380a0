//! Coverage blocks decoded from the instrumentor's position table
//!
//! Each statement block occupies three `u32` words in the position table:
//! start line, end line, and the two columns packed as
//! `start_col | end_col << 16`.

use std::fmt;

/// Source span and statement count of one instrumented block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoverageBlock {
    /// Start line
    pub line0: u32,
    /// Start column
    pub col0: u16,
    /// End line
    pub line1: u32,
    /// End column
    pub col1: u16,
    /// Number of statements in the block
    pub stmts: u16,
}

impl CoverageBlock {
    /// Decode one `(line0, line1, packed_cols)` triple
    #[inline]
    #[must_use]
    pub const fn decode(line0: u32, line1: u32, packed_cols: u32, stmts: u16) -> Self {
        Self {
            line0,
            col0: (packed_cols & 0xFFFF) as u16,
            line1,
            col1: (packed_cols >> 16) as u16,
            stmts,
        }
    }

    /// Decode a whole table; `positions` must hold three words per entry of `num_stmts`
    #[must_use]
    pub fn decode_all(positions: &[u32], num_stmts: &[u16]) -> Vec<Self> {
        positions
            .chunks_exact(3)
            .zip(num_stmts)
            .map(|(pos, &stmts)| Self::decode(pos[0], pos[1], pos[2], stmts))
            .collect()
    }

    /// Report line for this block in `file_name` with execution `count`
    #[must_use]
    pub const fn line<'a>(&'a self, file_name: &'a str, count: u32) -> ProfileLine<'a> {
        ProfileLine {
            file_name,
            block: self,
            count,
        }
    }
}

/// `<file>:<l0>.<c0>,<l1>.<c1> <stmts> <count>`
#[derive(Debug, Clone, Copy)]
pub struct ProfileLine<'a> {
    file_name: &'a str,
    block: &'a CoverageBlock,
    count: u32,
}

impl fmt::Display for ProfileLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.block;
        write!(
            f,
            "{}:{}.{},{}.{} {} {}",
            self.file_name, b.line0, b.col0, b.line1, b.col1, b.stmts, self.count
        )
    }
}
