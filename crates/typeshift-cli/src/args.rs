use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the typeshift binary.
#[derive(Parser, Debug)]
#[command(
    name = "typeshift",
    version,
    about = "Converts Closure-annotated JavaScript to TypeScript"
)]
pub struct CliArgs {
    /// Directory where .ts outputs are written.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "OUTPUT_DIR",
        default_value = "."
    )]
    pub output: PathBuf,

    /// Root directory against which module paths are computed.
    #[arg(long, value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,

    /// Only convert these files (defaults to every source file).
    #[arg(long = "convert", value_name = "FILE")]
    pub convert: Vec<PathBuf>,

    /// Extern definition files: parsed and indexed, never emitted.
    #[arg(long = "externs", value_name = "FILE")]
    pub externs: Vec<PathBuf>,

    /// JSON map from extern type names to their TypeScript equivalents.
    #[arg(long = "externsMap", alias = "externs-map", value_name = "PATH")]
    pub externs_map: Option<PathBuf>,

    /// Source files to transpile.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}
