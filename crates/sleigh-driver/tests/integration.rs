//! Integration tests for the extraction pipeline.
//!
//! Each test builds a miniature Ghidra checkout in a temp directory and
//! extracts from it, either through the library or through the binary.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use sleigh_driver::{ExtractConfig, ExtractError, Extractor, GhidraLayout};
use tempfile::TempDir;

const MAKEFILE: &str = "\
# Decompiler build, trimmed down
CORE=space address
SLEIGH=sleigh \\
\tsleighbase
# the library itself
LIBSLA_NAMES=$(CORE) $(SLEIGH) loadimage
LIBSLA_SOURCE=$(LIBSLA_NAMES:%=%.cc)

ifeq ($(OS),Darwin)
OSDIR=osx
endif

libsla.a: $(LIBSLA_SOURCE)
\t$(AR) rcs $@ $^
";

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Build a fake Ghidra checkout. `loadimage.hh` and `slghscan.cc` are
/// deliberately absent.
fn ghidra_tree() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    let layout = GhidraLayout::new(root.path());
    let cpp = layout.cpp_dir();

    let files = [
        ("Makefile", MAKEFILE),
        ("space.cc", "#include \"space.hh\"\n"),
        ("space.hh", "#include \"error.hh\"\n"),
        ("address.cc", "#include \"address.hh\"\n#include <vector>\n"),
        ("address.hh", "#include \"space.hh\"\n"),
        ("sleigh.cc", "#include \"sleigh.hh\"\n"),
        ("sleigh.hh", "#include \"sleighbase.hh\"\n"),
        ("sleighbase.cc", "#include \"sleighbase.hh\"\n"),
        ("sleighbase.hh", "#include \"translate.hh\"\n"),
        ("translate.hh", "  # include \"types.h\"\n"),
        ("types.h", "#include <stdint.h>\n"),
        ("error.hh", "#include \"types.h\"\n"),
        ("loadimage.cc", "#include \"loadimage.hh\"\n"),
        ("ifacedecomp.cc", "#include \"ifacedecomp.hh\"\n"),
        ("ifacedecomp.hh", "#include \"sleigh.hh\"\n"),
        ("sleighexample.cc", "#include \"sleigh.hh\"\nint main() {}\n"),
        ("slgh_compile.hh", "#include \"sleighbase.hh\"\n"),
        ("slgh_compile.cc", "#include \"slgh_compile.hh\"\n"),
        ("slghparse.hh", ""),
        ("slghparse.cc", "#include \"slghparse.hh\"\n"),
    ];
    for (name, content) in files {
        write(&cpp.join(name), content);
    }

    write(&layout.zlib_dir().join("adler32.c"), "/* adler */\n");
    write(&layout.zlib_dir().join("zlib.h"), "/* zlib */\n");

    let processors = layout.processors_dir();
    write(&processors.join("x86/data/languages/x86.slaspec"), "# x86\n");
    write(&processors.join("x86/data/languages/ia.sinc"), "# ia\n");
    write(&processors.join("Toy/data/languages/toy.slaspec"), "# toy\n");
    fs::create_dir_all(processors.join("NoData/src")).unwrap();

    root
}

fn file_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[allow(deprecated)]
fn sleigh_extract() -> Command {
    Command::cargo_bin("sleigh-extract").expect("binary")
}

// ============================================================================
// Library
// ============================================================================

#[test]
fn test_extract_library_layout() {
    let ghidra = ghidra_tree();
    let work = tempfile::tempdir().unwrap();
    let out = work.path().join("out");

    let report = Extractor::new(ExtractConfig::new(ghidra.path(), &out))
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(
        file_names(&out.join("sleigh")),
        set(&[
            "address.cc",
            "address.hh",
            "error.hh",
            "sleigh.cc",
            "sleigh.hh",
            "sleighbase.cc",
            "sleighbase.hh",
            "loadimage.cc",
            "space.cc",
            "space.hh",
            "translate.hh",
            "types.h",
        ])
    );
    assert_eq!(file_names(&out.join("example")), set(&["sleighexample.cc"]));
    assert_eq!(
        file_names(&out.join("compiler")),
        set(&["slgh_compile.cc", "slgh_compile.hh", "slghparse.cc", "slghparse.hh"])
    );
    assert_eq!(file_names(&out.join("zlib")), set(&["adler32.c", "zlib.h"]));
    assert!(!out.join("Processors").exists());
    assert!(!out.join("CMakeLists.txt").exists());

    let cpp = GhidraLayout::new(ghidra.path()).cpp_dir();
    let missing: Vec<PathBuf> = report.missing().into_iter().map(Path::to_path_buf).collect();
    assert_eq!(missing, vec![cpp.join("loadimage.hh"), cpp.join("slghscan.cc")]);
    assert_eq!(report.zlib_files, Some(2));
}

#[test]
fn test_extract_processors_and_build_file() {
    let ghidra = ghidra_tree();
    let work = tempfile::tempdir().unwrap();
    let out = work.path().join("out");

    let config = ExtractConfig {
        processors: true,
        build_file: true,
        ..ExtractConfig::new(ghidra.path(), &out)
    };
    let report = Extractor::new(config).unwrap().run().unwrap();

    assert_eq!(report.processors, vec!["Toy", "x86"]);
    assert_eq!(file_names(&out.join("Processors")), set(&["Toy", "x86"]));
    assert_eq!(
        fs::read_to_string(out.join("Processors/x86/data/languages/ia.sinc")).unwrap(),
        "# ia\n"
    );

    let cmake = fs::read_to_string(out.join("CMakeLists.txt")).unwrap();
    assert!(cmake.contains("add_library(sleigh STATIC ${SLEIGH_SRC})"));
    assert_eq!(report.cmake_lists, Some(out.join("CMakeLists.txt")));
}

#[test]
fn test_extract_resets_output() {
    let ghidra = ghidra_tree();
    let work = tempfile::tempdir().unwrap();
    let out = work.path().join("out");
    write(&out.join("stale/leftover.cc"), "");

    Extractor::new(ExtractConfig::new(ghidra.path(), &out))
        .unwrap()
        .run()
        .unwrap();

    assert!(!out.join("stale").exists());
}

#[test]
fn test_missing_processors_is_fatal() {
    let ghidra = ghidra_tree();
    fs::remove_dir_all(GhidraLayout::new(ghidra.path()).processors_dir()).unwrap();
    let work = tempfile::tempdir().unwrap();

    let config = ExtractConfig {
        processors: true,
        ..ExtractConfig::new(ghidra.path(), work.path().join("out"))
    };
    match Extractor::new(config).unwrap().run() {
        Err(ExtractError::MissingProcessors(_)) => {}
        other => panic!("Expected MissingProcessors, got {:?}", other),
    }
}

#[test]
fn test_cyclic_library_variable_is_fatal() {
    let ghidra = ghidra_tree();
    let makefile = GhidraLayout::new(ghidra.path()).makefile();
    fs::write(&makefile, "CORE = $(LIBSLA_NAMES)\nLIBSLA_NAMES = $(CORE) x\n").unwrap();
    let work = tempfile::tempdir().unwrap();

    match Extractor::new(ExtractConfig::new(ghidra.path(), work.path().join("out")))
        .unwrap()
        .run()
    {
        Err(ExtractError::Expand { makefile: path, .. }) => assert_eq!(path, makefile),
        other => panic!("Expected Expand error, got {:?}", other),
    }
}

// ============================================================================
// Binary
// ============================================================================

#[test]
fn test_cli_extract() {
    let ghidra = ghidra_tree();
    let work = tempfile::tempdir().unwrap();
    let out = work.path().join("out");

    sleigh_extract()
        .arg("extract")
        .arg("--ghidra")
        .arg(ghidra.path())
        .arg("-o")
        .arg(&out)
        .arg("-p")
        .arg("-b")
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("skip non-exist file: loadimage.hh"));

    assert!(out.join("sleigh/translate.hh").is_file());
    assert!(out.join("Processors/Toy/data/languages/toy.slaspec").is_file());
    assert!(out.join("CMakeLists.txt").is_file());
}

#[test]
fn test_cli_extract_from_env() {
    let ghidra = ghidra_tree();
    let work = tempfile::tempdir().unwrap();

    sleigh_extract()
        .current_dir(work.path())
        .arg("extract")
        .env("GHIDRA_SRC", ghidra.path())
        .assert()
        .success();

    assert!(work.path().join("out/sleigh/sleigh.cc").is_file());
}

#[test]
fn test_cli_invalid_ghidra_dir_leaves_output_alone() {
    let work = tempfile::tempdir().unwrap();
    let out = work.path().join("out");
    write(&out.join("keep.txt"), "keep");

    sleigh_extract()
        .arg("extract")
        .arg("-g")
        .arg(work.path().join("no-such-ghidra"))
        .arg("-o")
        .arg(&out)
        .env_remove("RUST_LOG")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid ghidra folder"));

    assert!(out.join("keep.txt").is_file());
}

#[test]
fn test_cli_vars() {
    let work = tempfile::tempdir().unwrap();
    let makefile = work.path().join("Makefile");
    fs::write(
        &makefile,
        "LIBSLA_NAMES = foo bar\nEXTRA = $(LIBSLA_NAMES) baz\n",
    )
    .unwrap();

    sleigh_extract()
        .arg("vars")
        .arg(&makefile)
        .arg("EXTRA")
        .assert()
        .success()
        .stdout("EXTRA = foo bar baz\n");

    sleigh_extract()
        .arg("vars")
        .arg(&makefile)
        .arg("--raw")
        .assert()
        .success()
        .stdout("LIBSLA_NAMES = foo bar\nEXTRA = $(LIBSLA_NAMES) baz\n");
}

#[test]
fn test_cli_vars_expands_every_variable() {
    let work = tempfile::tempdir().unwrap();
    let makefile = work.path().join("Makefile");
    fs::write(&makefile, "B = $(A) $(NOPE) b\nA = a\n").unwrap();

    sleigh_extract()
        .arg("vars")
        .arg(&makefile)
        .assert()
        .success()
        .stdout("B = a  b\nA = a\n");
}

#[test]
fn test_cli_vars_cycle_reports_definition() {
    let work = tempfile::tempdir().unwrap();
    let makefile = work.path().join("Makefile");
    fs::write(&makefile, "A = $(B)\nB = $(A)\n").unwrap();

    sleigh_extract()
        .arg("vars")
        .arg(&makefile)
        .arg("A")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Recursive variable definition"));
}

#[test]
fn test_cli_includes() {
    let ghidra = ghidra_tree();
    let cpp = GhidraLayout::new(ghidra.path()).cpp_dir();

    sleigh_extract()
        .arg("includes")
        .arg(&cpp)
        .arg("address.hh")
        .arg("gone.hh")
        .assert()
        .success()
        .stdout(
            "address.hh\n    -> space.hh\n\
             error.hh\n    -> types.h\n\
             gone.hh (missing)\n\
             space.hh\n    -> error.hh\n\
             types.h\n",
        );
}
