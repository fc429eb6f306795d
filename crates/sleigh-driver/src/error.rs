//! Driver error types

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use sleigh_makefile::ExpandError;
use thiserror::Error;

/// Fatal extraction errors. Missing source files are not errors; they end up
/// in the [`CopyReport`](crate::CopyReport) instead.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("invalid ghidra folder: {}", .0.display())]
    InvalidGhidraDir(PathBuf),

    #[error("cannot find processors directory: {}", .0.display())]
    MissingProcessors(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    ReadMakefile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", .makefile.display())]
    Expand {
        makefile: PathBuf,
        #[source]
        source: ExpandError,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("`git {args}` failed ({status}): {stderr}")]
    Git {
        args: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
