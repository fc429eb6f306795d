use anyhow::{bail, Context, Result};
use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use sleigh_driver::fetch::{fetch_ghidra, GHIDRA_GIT_URL};
use sleigh_driver::library::DEFAULT_LIBRARY_VAR;
use sleigh_driver::{ExtractConfig, ExtractError, Extractor};
use sleigh_includes::{HeaderResolver, IncludeGraph};
use sleigh_makefile::{ExpandError, VariableTable};

#[derive(Parser)]
#[command(
    name = "sleigh-extract",
    version,
    about = "Extract the SLEIGH library sources from a Ghidra checkout",
    long_about = "Extract the SLEIGH library sources from a Ghidra checkout.\n\
                  The file list comes from the decompiler Makefile; headers are\n\
                  followed through local #include directives."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the library, tools and (optionally) processor data
    Extract {
        /// Ghidra source code folder (defaults to $GHIDRA_SRC)
        #[arg(short, long)]
        ghidra: Option<PathBuf>,

        /// Output folder, recreated on every run
        #[arg(short, long, default_value = "out")]
        outdir: PathBuf,

        /// Copy processors data for compilation
        #[arg(short, long)]
        processors: bool,

        /// Generate CMakeLists.txt for build
        #[arg(short, long)]
        build: bool,

        /// Makefile variable listing the library sources
        #[arg(long = "var", default_value = DEFAULT_LIBRARY_VAR)]
        library_var: String,
    },

    /// Clone Ghidra and check out its latest release tag
    Fetch {
        /// Output folder, recreated on every run
        #[arg(short, long, default_value = "out")]
        out: PathBuf,

        /// Repository to clone
        #[arg(long, default_value = GHIDRA_GIT_URL)]
        repo: String,
    },

    /// Show Makefile variables (debug)
    Vars {
        /// Makefile to read
        makefile: PathBuf,

        /// Variables to show; all of them if omitted
        names: Vec<String>,

        /// Show raw values instead of expanding them
        #[arg(long)]
        raw: bool,
    },

    /// Show the header closure of some files (debug)
    Includes {
        /// Source directory
        dir: PathBuf,

        /// Files to start from
        #[arg(required = true)]
        files: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Extract {
            ghidra,
            outdir,
            processors,
            build,
            library_var,
        } => extract_command(ghidra, outdir, processors, build, library_var),
        Commands::Fetch { out, repo } => fetch_command(&out, &repo),
        Commands::Vars {
            makefile,
            names,
            raw,
        } => vars_command(&makefile, &names, raw),
        Commands::Includes { dir, files } => includes_command(&dir, &files),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn extract_command(
    ghidra: Option<PathBuf>,
    outdir: PathBuf,
    processors: bool,
    build: bool,
    library_var: String,
) -> Result<()> {
    let ghidra = match ghidra.or_else(|| std::env::var_os("GHIDRA_SRC").map(PathBuf::from)) {
        Some(dir) => dir,
        None => bail!("no Ghidra folder given (use --ghidra or set GHIDRA_SRC)"),
    };

    let config = ExtractConfig {
        processors,
        build_file: build,
        library_var,
        ..ExtractConfig::new(ghidra, outdir)
    };

    let extractor = Extractor::new(config)?;
    let report = extractor.run()?;

    let missing = report.missing();
    log::info!(
        "extracted {} library files into {} ({} missing)",
        report.library.copied.len(),
        extractor.config().out_dir.display(),
        missing.len()
    );
    for path in missing {
        log::debug!("missing: {}", path.display());
    }

    Ok(())
}

fn fetch_command(out: &Path, repo: &str) -> Result<()> {
    let checkout = fetch_ghidra(out, repo).context("failed to fetch ghidra")?;
    println!("{} ({})", checkout.path.display(), checkout.tag);
    Ok(())
}

fn vars_command(makefile: &Path, names: &[String], raw: bool) -> Result<()> {
    let table = VariableTable::from_file(makefile)
        .with_context(|| format!("failed to read {}", makefile.display()))?;
    let expand_error = |source| ExtractError::Expand {
        makefile: makefile.to_path_buf(),
        source,
    };

    let values: Vec<(String, String)> = match (names.is_empty(), raw) {
        (true, false) => table.expand_all().map_err(expand_error)?,
        (true, true) => table
            .names()
            .map(|name| (name.to_string(), table.raw(name).unwrap_or_default().to_string()))
            .collect(),
        (false, _) => {
            let mut values = Vec::with_capacity(names.len());
            for name in names {
                let value = if raw {
                    table.raw(name).unwrap_or_default().to_string()
                } else {
                    table.expand(name).map_err(expand_error)?
                };
                values.push((name.clone(), value));
            }
            values
        }
    };

    for (name, value) in values {
        println!("{} = {}", name, value);
    }

    Ok(())
}

fn includes_command(dir: &Path, files: &[String]) -> Result<()> {
    if !dir.is_dir() {
        bail!("invalid source folder: {}", dir.display());
    }

    let resolver = HeaderResolver::new(dir);
    let closure = resolver.closure(files.iter().cloned());
    let graph = IncludeGraph::build(&resolver, closure.iter().cloned());

    for (name, node) in graph.files() {
        if !node.present {
            println!("{} (missing)", name);
            continue;
        }
        println!("{}", name);
        for header in &node.includes {
            println!("    -> {}", header);
        }
    }

    if let Some(cycle) = graph.detect_cycle() {
        log::info!("include cycle: {}", cycle.join(" -> "));
    }

    Ok(())
}

// Helper functions

fn report_failure(err: &anyhow::Error) {
    if let Some(ExtractError::Expand { makefile, source }) = err.downcast_ref::<ExtractError>() {
        if let Ok(text) = fs::read_to_string(makefile) {
            report_expand_error(source, &makefile.to_string_lossy(), &text);
            return;
        }
    }
    log::error!("{:#}", err);
}

fn report_expand_error(err: &ExpandError, filename: &str, source: &str) {
    let span = err.span();
    let message = match err {
        ExpandError::Cycle { chain, .. } => format!("expands through {}", chain.join(" -> ")),
    };
    report_error(
        "E0001",
        "Recursive variable definition",
        &message,
        span.start,
        span.end,
        filename,
        source,
    );
}

fn report_error(code: &str, title: &str, message: &str, start: usize, end: usize, filename: &str, source: &str) {
    let span = (filename, start..end);
    let printed = Report::build(ReportKind::Error, span.clone())
        .with_code(code)
        .with_message(title)
        .with_label(
            Label::new(span)
                .with_message(message)
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename, Source::from(source)));
    if let Err(e) = printed {
        log::error!("{}: {}", title, message);
        log::debug!("failed to render diagnostic: {}", e);
    }
}
