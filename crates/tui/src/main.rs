mod app;
mod dump;
mod renderer;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use pprof_tree_core::extract::profile_kind;
use pprof_tree_core::model::{Granularity, MeasurementMode};
use pprof_tree_core::parsers::parse_auto;
use pprof_tree_core::symbols::SymbolTable;
use pprof_tree_core::{TreeOptions, build_call_tree};

/// Browse a CPU or heap pprof profile as an aggregated call tree.
#[derive(Debug, Parser)]
#[command(name = "pprof-tree", version)]
struct Args {
    /// Profile to open: protobuf (optionally gzipped) or pprof JSON.
    file: PathBuf,

    /// Value to measure: default, cpu, heap-alloc or heap-inuse. Defaults to
    /// cpu for CPU profiles and heap-alloc for heap profiles.
    #[arg(long)]
    mode: Option<MeasurementMode>,

    /// Keep call sites on different lines of a function apart.
    #[arg(long)]
    by_line: bool,

    /// Only show paths to functions whose name or file contains this text.
    #[arg(long, default_value = "")]
    filter: String,

    /// Print the tree to stdout instead of opening the browser.
    #[arg(long)]
    dump: bool,

    /// Write log records to this file (level from RUST_LOG).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    // Records on stderr would tear through the alternate screen.
    let default_level = if interactive && log_file.is_none() {
        "off"
    } else {
        "warn"
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init().context("initializing logger")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref(), !args.dump)?;

    let data = std::fs::read(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let profile =
        parse_auto(&data).with_context(|| format!("decoding {}", args.file.display()))?;

    let mode = match args.mode {
        Some(mode) => mode,
        None => profile_kind(&profile, &SymbolTable::resolve(&profile))?.default_mode(),
    };
    let options = TreeOptions {
        name: args.file.display().to_string(),
        mode,
        granularity: if args.by_line {
            Granularity::Line
        } else {
            Granularity::Function
        },
        filter: args.filter,
    };
    log::info!("opening {} with {options:?}", args.file.display());

    if args.dump {
        let view = build_call_tree(&profile, &options)?;
        let mut out = std::io::stdout().lock();
        dump::write_tree(&mut out, &view)?;
        return Ok(());
    }

    let mut app = app::App::new(profile, options)?;
    renderer::run_tui(&mut app)
}
