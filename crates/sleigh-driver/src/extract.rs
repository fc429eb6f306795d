//! The extraction pipeline
//!
//! Output layout under the configured directory:
//!
//! ```text
//! sleigh/      library sources and their header closure
//! zlib/        bundled zlib, when the checkout has one
//! example/     sleighexample.cc
//! compiler/    SLEIGH compiler sources
//! Processors/  <arch>/data for every processor (optional)
//! CMakeLists.txt (optional)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use sleigh_makefile::VariableTable;

use crate::cmake::write_cmake_lists;
use crate::error::ExtractError;
use crate::fsutil::{copy_files, copy_tree, reset_dir, CopyReport};
use crate::layout::GhidraLayout;
use crate::library::{collect_library, DEFAULT_LIBRARY_VAR};

/// Sources of the `example` tool
pub const EXAMPLE_FILES: &[&str] = &["sleighexample.cc"];

/// Sources of the SLEIGH `compiler` tool
pub const COMPILER_FILES: &[&str] = &[
    "slgh_compile.hh",
    "slgh_compile.cc",
    "slghparse.hh",
    "slghparse.cc",
    "slghscan.cc",
];

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Root of the Ghidra checkout
    pub ghidra_dir: PathBuf,
    /// Output directory; wiped at the start of every run
    pub out_dir: PathBuf,
    /// Copy `Processors/<arch>/data` as well
    pub processors: bool,
    /// Write a CMakeLists.txt
    pub build_file: bool,
    /// Makefile variable listing the library stems
    pub library_var: String,
}

impl ExtractConfig {
    pub fn new(ghidra_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            ghidra_dir: ghidra_dir.into(),
            out_dir: out_dir.into(),
            processors: false,
            build_file: false,
            library_var: DEFAULT_LIBRARY_VAR.to_string(),
        }
    }
}

/// What a run produced
#[derive(Debug, Clone, Default)]
pub struct ExtractReport {
    pub library: CopyReport,
    pub example: CopyReport,
    pub compiler: CopyReport,
    /// Number of zlib files copied, if the checkout has zlib
    pub zlib_files: Option<usize>,
    /// Architectures whose processor data was copied
    pub processors: Vec<String>,
    pub cmake_lists: Option<PathBuf>,
}

impl ExtractReport {
    /// Every source path that was asked for but didn't exist
    pub fn missing(&self) -> Vec<&Path> {
        [&self.library, &self.example, &self.compiler]
            .into_iter()
            .flat_map(|r| r.missing.iter().map(PathBuf::as_path))
            .collect()
    }
}

pub struct Extractor {
    config: ExtractConfig,
    layout: GhidraLayout,
}

impl Extractor {
    /// Fails when the Ghidra folder is not a directory. Nothing is written
    /// until [`Extractor::run`].
    pub fn new(config: ExtractConfig) -> Result<Self, ExtractError> {
        let layout = GhidraLayout::open(&config.ghidra_dir)?;
        Ok(Self { config, layout })
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    pub fn layout(&self) -> &GhidraLayout {
        &self.layout
    }

    pub fn run(&self) -> Result<ExtractReport, ExtractError> {
        let out = &self.config.out_dir;
        reset_dir(out)?;

        let mut report = ExtractReport {
            library: self.copy_library()?,
            zlib_files: self.copy_zlib()?,
            ..Default::default()
        };

        report.example = self.setup_tool("example", EXAMPLE_FILES)?;
        report.compiler = self.setup_tool("compiler", COMPILER_FILES)?;

        if self.config.processors {
            report.processors = self.copy_processors()?;
        }

        if self.config.build_file {
            log::info!("generate build file");
            report.cmake_lists = Some(write_cmake_lists(out)?);
        }

        Ok(report)
    }

    /// Library sources plus their header closure into `sleigh/`
    fn copy_library(&self) -> Result<CopyReport, ExtractError> {
        let src_dir = self.layout.cpp_dir();
        let makefile = self.layout.makefile();

        let table = VariableTable::from_file(&makefile).map_err(|source| {
            ExtractError::ReadMakefile {
                path: makefile.clone(),
                source,
            }
        })?;
        log::debug!("{}: {} variables", makefile.display(), table.len());

        let files = collect_library(&src_dir, &table, &self.config.library_var)
            .map_err(|source| ExtractError::Expand { makefile, source })?;

        let dest = self.config.out_dir.join("sleigh");
        fs::create_dir_all(&dest)?;

        let mut report = copy_files(&dest, &src_dir, &files.sources)?;
        report.merge(copy_files(&dest, &src_dir, &files.headers)?);
        Ok(report)
    }

    fn copy_zlib(&self) -> Result<Option<usize>, ExtractError> {
        let src = self.layout.zlib_dir();
        if !src.is_dir() {
            log::debug!("no zlib directory at {}", src.display());
            return Ok(None);
        }

        log::info!("copy zlib");
        let count = copy_tree(&src, &self.config.out_dir.join("zlib"))?;
        Ok(Some(count))
    }

    fn setup_tool(&self, target: &str, names: &[&str]) -> Result<CopyReport, ExtractError> {
        log::info!("setup binary {}", target);

        let dest = self.config.out_dir.join(target);
        fs::create_dir_all(&dest)?;
        Ok(copy_files(&dest, &self.layout.cpp_dir(), names)?)
    }

    /// `Processors/<arch>/data` for every architecture, sorted by name
    fn copy_processors(&self) -> Result<Vec<String>, ExtractError> {
        let processors = self.layout.processors_dir();
        if !processors.is_dir() {
            return Err(ExtractError::MissingProcessors(processors));
        }

        let mut arches: Vec<(String, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&processors)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                arches.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
            }
        }
        arches.sort();

        let dest_dir = self.config.out_dir.join("Processors");
        let mut copied = Vec::new();
        for (arch, arch_dir) in arches {
            let data = arch_dir.join("data");
            if !data.is_dir() {
                log::warn!("skip processor without data directory: {}", arch);
                continue;
            }

            log::info!("copy processor data for {}", arch);
            copy_tree(&data, &dest_dir.join(&arch).join("data"))?;
            copied.push(arch);
        }

        Ok(copied)
    }
}
