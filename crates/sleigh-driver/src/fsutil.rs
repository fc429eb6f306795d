//! File copying helpers

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Outcome of copying a list of named files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Destination paths that were written
    pub copied: Vec<PathBuf>,
    /// Source paths that didn't exist
    pub missing: Vec<PathBuf>,
}

impl CopyReport {
    pub fn merge(&mut self, other: CopyReport) {
        self.copied.extend(other.copied);
        self.missing.extend(other.missing);
    }
}

/// Delete whatever is at `dir`, then create it as an empty directory
pub fn reset_dir(dir: &Path) -> io::Result<()> {
    match fs::symlink_metadata(dir) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(dir)?,
        Ok(_) => {
            log::debug!("replace file {} with a directory", dir.display());
            fs::remove_file(dir)?
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::create_dir_all(dir)
}

/// Copy `src_dir/<name>` to `dest_dir/<name>` for every name.
///
/// Names that don't exist in `src_dir` are logged and recorded in the
/// report; any other I/O failure aborts the copy.
pub fn copy_files<I, S>(dest_dir: &Path, src_dir: &Path, names: I) -> io::Result<CopyReport>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = CopyReport::default();

    for name in names {
        let name = name.as_ref();
        let src = src_dir.join(name);
        if src.is_file() {
            let dst = dest_dir.join(name);
            log::info!("copy file {}", dst.display());
            fs::copy(&src, &dst)?;
            report.copied.push(dst);
        } else {
            log::warn!("skip non-exist file: {}", name);
            report.missing.push(src);
        }
    }

    Ok(report)
}

/// Recursively copy the directory `src` to `dest`. Returns the number of
/// files copied.
///
/// Symlinks are followed: a linked directory is copied as a directory.
pub fn copy_tree(src: &Path, dest: &Path) -> io::Result<usize> {
    let mut count = 0;

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            count += 1;
        }
    }

    Ok(count)
}
