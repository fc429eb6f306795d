//! # Sleigh Makefile
//!
//! Variable model for the Makefile subset used by Ghidra's decompiler build:
//! `KEY = value` assignments, backslash continuations, `#` comments and
//! `$(NAME)` references. Everything else is ignored.
//!
//! ```
//! use sleigh_makefile::VariableTable;
//!
//! let table = VariableTable::parse("LIBSLA_NAMES = foo bar\nEXTRA = $(LIBSLA_NAMES) baz\n");
//! assert_eq!(table.expand("EXTRA").unwrap(), "foo bar baz");
//! ```

use std::ops::Range;

pub mod line;
pub mod expand;
pub mod table;
mod error;

pub use error::{ExpandError, ExpandResult};
pub use expand::{is_balanced, tokenize};
pub use line::{LineReader, LogicalLine};
pub use table::{Definition, VariableTable};

/// Byte range of a logical line in the Makefile source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}
