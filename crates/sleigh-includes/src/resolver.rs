//! Header closure over a single source directory

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use crate::directive::{scan_includes, try_scan_includes};

/// Resolves file names against a source directory and grows header sets
/// until they are closed under local includes.
pub struct HeaderResolver {
    /// Directory every file name is resolved against
    source_dir: PathBuf,
}

impl HeaderResolver {
    /// Create a new resolver for a source directory
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Path of a file name inside the source directory
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.source_dir.join(name)
    }

    /// Headers included by a single file; empty if it can't be read
    pub fn scan(&self, name: &str) -> BTreeSet<String> {
        scan_includes(&self.resolve(name))
    }

    /// Union of the headers included by each of `names`
    pub fn scan_all<I, S>(&self, names: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut headers = BTreeSet::new();
        for name in names {
            headers.extend(self.scan(name.as_ref()));
        }
        headers
    }

    /// Grow `initial` until every local header included by a member is
    /// itself a member.
    ///
    /// Each pass re-scans the whole set; the set only grows and the loop
    /// stops on the first pass that adds nothing. Names that don't exist in
    /// the source directory stay in the set but contribute no includes.
    pub fn closure<I, S>(&self, initial: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut files: BTreeSet<String> = initial.into_iter().map(Into::into).collect();
        let mut unreadable: HashSet<String> = HashSet::new();
        let mut pass = 0;

        loop {
            pass += 1;
            let mut discovered = BTreeSet::new();

            for name in &files {
                match try_scan_includes(&self.resolve(name)) {
                    Ok(headers) => discovered.extend(headers),
                    Err(e) => {
                        if unreadable.insert(name.clone()) {
                            log::warn!(
                                "failed to open file {}: {}",
                                self.resolve(name).display(),
                                e
                            );
                        }
                    }
                }
            }

            let before = files.len();
            files.extend(discovered);
            log::debug!("closure pass {}: {} -> {} files", pass, before, files.len());

            if files.len() == before {
                break;
            }
        }

        files
    }
}
