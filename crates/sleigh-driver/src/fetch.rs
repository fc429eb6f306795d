//! Fetching a Ghidra checkout at its latest release tag

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::FetchError;
use crate::fsutil::reset_dir;

pub const GHIDRA_GIT_URL: &str = "https://github.com/NationalSecurityAgency/ghidra.git";

/// Result of a successful fetch
#[derive(Debug, Clone)]
pub struct Checkout {
    /// Root of the working copy
    pub path: PathBuf,
    /// Tag that was checked out
    pub tag: String,
}

/// Clone `repo_url` into `<out_dir>/ghidra` and check out its most recent tag.
///
/// `out_dir` is deleted and recreated first.
pub fn fetch_ghidra(out_dir: &Path, repo_url: &str) -> Result<Checkout, FetchError> {
    reset_dir(out_dir)?;

    log::info!("fetching ghidra source code from {}, please wait ...", repo_url);
    git(out_dir, &["clone", repo_url, "ghidra"])?;

    let path = out_dir.join("ghidra");
    let tag = git(&path, &["describe", "--abbrev=0", "--tags"])?;
    log::info!("latest stable release tag: {}", tag);

    git(&path, &["checkout", &tag])?;
    log::info!("switched to {}", tag);

    Ok(Checkout { path, tag })
}

/// Run git in `dir` and return its trimmed stdout
fn git(dir: &Path, args: &[&str]) -> Result<String, FetchError> {
    log::debug!("git {} (in {})", args.join(" "), dir.display());

    let output = Command::new("git").args(args).current_dir(dir).output()?;
    if !output.status.success() {
        return Err(FetchError::Git {
            args: args.join(" "),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
