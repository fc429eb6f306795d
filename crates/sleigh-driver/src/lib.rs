//! Sleigh Extract Driver Library
//!
//! Pulls a self-contained copy of the SLEIGH library out of a Ghidra
//! checkout. The Makefile decides which translation units belong to the
//! library, the header closure decides which headers they need, and the
//! rest of this crate lays the result out next to zlib, the example and
//! compiler tools, and optionally the processor specs.

pub mod cmake;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod fsutil;
pub mod layout;
pub mod library;

pub use error::{ExtractError, FetchError};
pub use extract::{ExtractConfig, ExtractReport, Extractor};
pub use fsutil::CopyReport;
pub use layout::GhidraLayout;
pub use library::{collect_library, LibraryFiles};
