//! `#include "name.hh"` recognition

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

fn include_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^\s*#\s*include\s*"(\w+\.hh?)"\s*$"#).expect("include pattern is valid")
    })
}

/// Header named by a local include directive, if `line` is one.
///
/// The whole line must be the directive; angle-bracket includes, trailing
/// comments and paths with directories are not recognized.
pub fn parse_include(line: &str) -> Option<&str> {
    include_pattern()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Collect the local headers included by source text
pub fn scan_source(source: &str) -> BTreeSet<String> {
    source
        .lines()
        .filter_map(parse_include)
        .map(str::to_string)
        .collect()
}

/// Like [`scan_includes`] but reports a file that can't be read.
pub fn try_scan_includes(path: &Path) -> io::Result<BTreeSet<String>> {
    let bytes = fs::read(path)?;
    Ok(scan_source(&String::from_utf8_lossy(&bytes)))
}

/// Collect the local headers included by a file.
///
/// A missing or unreadable file has no includes; the failure is logged.
pub fn scan_includes(path: &Path) -> BTreeSet<String> {
    match try_scan_includes(path) {
        Ok(headers) => headers,
        Err(e) => {
            log::warn!("failed to open file {}: {}", path.display(), e);
            BTreeSet::new()
        }
    }
}
