//! Which files make up the SLEIGH library

use std::collections::BTreeSet;
use std::path::Path;

use sleigh_includes::HeaderResolver;
use sleigh_makefile::{ExpandResult, VariableTable};

/// Variable listing the library's translation-unit stems
pub const DEFAULT_LIBRARY_VAR: &str = "LIBSLA_NAMES";

/// Files to extract for a library
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryFiles {
    /// `<stem>.cc` for every stem, in Makefile order
    pub sources: Vec<String>,
    /// Closed set of local headers needed by the sources
    pub headers: BTreeSet<String>,
}

/// Append `.ext` to every stem
pub fn with_extension(stems: &[String], ext: &str) -> Vec<String> {
    stems.iter().map(|stem| format!("{}.{}", stem, ext)).collect()
}

/// Work out the library file set from the Makefile variable `var`.
///
/// The header closure is seeded with the headers the sources include plus
/// `<stem>.hh` for every stem, whether or not it exists.
pub fn collect_library(
    src_dir: &Path,
    table: &VariableTable,
    var: &str,
) -> ExpandResult<LibraryFiles> {
    let stems = table.expand_tokens(var)?;
    if stems.is_empty() {
        log::warn!("variable {} is empty or undefined", var);
    }

    let sources = with_extension(&stems, "cc");
    let resolver = HeaderResolver::new(src_dir);

    let mut seed = resolver.scan_all(&sources);
    seed.extend(with_extension(&stems, "hh"));
    let headers = resolver.closure(seed);

    log::debug!(
        "{}: {} sources, {} headers",
        var,
        sources.len(),
        headers.len()
    );

    Ok(LibraryFiles { sources, headers })
}
