//! Where things live inside a Ghidra checkout

use std::path::{Path, PathBuf};

use crate::error::ExtractError;

/// Paths into a Ghidra source checkout
#[derive(Debug, Clone)]
pub struct GhidraLayout {
    root: PathBuf,
}

impl GhidraLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Like [`GhidraLayout::new`] but requires `root` to be a directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ExtractError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ExtractError::InvalidGhidraDir(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `Ghidra/Features/Decompiler/src/decompile`
    pub fn decompile_dir(&self) -> PathBuf {
        self.root
            .join("Ghidra")
            .join("Features")
            .join("Decompiler")
            .join("src")
            .join("decompile")
    }

    /// Decompiler C++ sources, including the SLEIGH library
    pub fn cpp_dir(&self) -> PathBuf {
        self.decompile_dir().join("cpp")
    }

    pub fn makefile(&self) -> PathBuf {
        self.cpp_dir().join("Makefile")
    }

    pub fn zlib_dir(&self) -> PathBuf {
        self.decompile_dir().join("zlib")
    }

    /// `Ghidra/Processors`, one directory per architecture
    pub fn processors_dir(&self) -> PathBuf {
        self.root.join("Ghidra").join("Processors")
    }
}
