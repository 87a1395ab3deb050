use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "idxmeta",
    about = "Inspect, validate and convert index metadata files.",
    version
)]
pub struct Cli {
    /// Default settings merged under every index read (a flat JSON object)
    #[arg(long, global = true, value_name = "FILE")]
    pub defaults: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(visible_alias = "i", about = "Show an index's shard layout, settings and mappings")]
    Info(InfoArgs),

    #[command(visible_alias = "c", about = "Convert between the JSON and binary encodings")]
    Convert(ConvertArgs),

    #[command(visible_aliases = ["t", "test"], about = "Check that files decode into valid indices")]
    Validate(ValidateArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Binary,
}

#[derive(Debug, clap::Args)]
pub struct InfoArgs {
    /// Metadata file (JSON or binary)
    pub file: PathBuf,

    /// Print the mapping sources as well as their types
    #[arg(short, long)]
    pub sources: bool,
}

#[derive(Debug, clap::Args)]
pub struct ConvertArgs {
    /// Metadata file to read (JSON or binary)
    pub input: PathBuf,

    /// File to write
    pub output: PathBuf,

    /// Output encoding [default: json for *.json outputs, binary otherwise]
    #[arg(long, value_enum)]
    pub to: Option<Format>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

#[derive(Debug, clap::Args)]
pub struct ValidateArgs {
    /// Metadata files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Only report failures
    #[arg(short, long)]
    pub quiet: bool,
}
