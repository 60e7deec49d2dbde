//! `typeshift` - converts Closure-annotated JavaScript to TypeScript.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use rustc_hash::FxHashSet;
use tracing_subscriber::EnvFilter;

use typeshift_cli::args::CliArgs;
use typeshift_cli::driver::Transpiler;
use typeshift_passes::{TranspileOptions, load_externs_map};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.debug);

    if args.files.is_empty() {
        bail!("no input files");
    }

    let externs_map = load_externs_map(args.externs_map.as_deref())?;

    let root = args.root.as_deref();
    let sources = read_inputs(&args.files, root)?;
    let externs = read_inputs(&args.externs, root)?;

    let files_to_emit: FxHashSet<String> = if args.convert.is_empty() {
        sources.iter().map(|(name, _)| name.clone()).collect()
    } else {
        args.convert
            .iter()
            .map(|path| module_name(path, root))
            .collect()
    };

    let transpiler = Transpiler::new(TranspileOptions::default(), externs_map);
    let outputs = transpiler.transpile(&files_to_emit, &sources, &externs);

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    for (basename, text) in &outputs {
        let path = args.output.join(format!("{basename}.ts"));
        std::fs::write(&path, text)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(file = %path.display(), "wrote output");
    }

    Ok(())
}

fn read_inputs(paths: &[PathBuf], root: Option<&Path>) -> Result<Vec<(String, String)>> {
    let mut inputs = Vec::new();
    for path in paths {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        inputs.push((module_name(path, root), text));
    }
    Ok(inputs)
}

/// A file's module name: its path relative to `--root`, slash-separated.
fn module_name(path: &Path, root: Option<&Path>) -> String {
    let path = root
        .and_then(|r| path.strip_prefix(r).ok())
        .unwrap_or(path);
    path.to_string_lossy().replace('\\', "/")
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
