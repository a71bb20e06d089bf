//! CLI argument parsing for the schema documentation workflow.
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "schemadoc.yaml";

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "schemadoc",
    version,
    about = "Generate LaTeX table docs and GraphViz diagrams from a YAML schema",
    after_help = "Commands:\n  init --config <path>              Write a config stub\n  validate --config <path>          Load and check the schema and dimensions\n  generate --config <path>          Regenerate every artifact\n  graph --config <path>             Print one relationship graph\n  columns --config <path> --table T Print one column table\n\nExamples:\n  schemadoc init --config docs/schemadoc.yaml\n  schemadoc generate --config docs/schemadoc.yaml --json\n  schemadoc graph --config docs/schemadoc.yaml --variant dimensions-only | dot -Tpdf",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Emit debug logs on stderr, overriding RUST_LOG
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Init(InitArgs),
    Validate(ValidateArgs),
    Generate(GenerateArgs),
    Graph(GraphArgs),
    Columns(ColumnsArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Write a config stub")]
pub struct InitArgs {
    /// Config file to create
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Load the schema and dimensions and report what they contain")]
pub struct ValidateArgs {
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
#[command(about = "Regenerate LaTeX and DOT artifacts")]
pub struct GenerateArgs {
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Output directory (overrides output_dir from the config)
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Emit a machine-readable JSON report
    #[arg(long)]
    pub json: bool,
}

/// Schema variant a graph is drawn from.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphVariant {
    Full,
    Materialized,
    Limited,
    DimensionsOnly,
}

#[derive(Parser, Debug)]
#[command(about = "Print a relationship graph in DOT format")]
pub struct GraphArgs {
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    #[arg(long, value_enum, default_value_t = GraphVariant::Limited)]
    pub variant: GraphVariant,
}

#[derive(Parser, Debug)]
#[command(about = "Print the LaTeX column table for one table")]
pub struct ColumnsArgs {
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Table to describe
    #[arg(long, value_name = "NAME")]
    pub table: String,
}
