//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Pathway network builder.
///
/// Turns a chronological service-use table into the node, edge, and
/// transition-matrix files a network visualization tool consumes.
#[derive(Debug, Parser)]
#[command(name = "pw", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build one network from the input table.
    Build(BuildArgs),

    /// Build one network per distinct value of a group column.
    Batch(BatchArgs),
}

/// Arguments for `pw build`.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Input table (CSV with a header row).
    #[arg(long)]
    pub input: PathBuf,

    /// Directory for the output tables (defaults to the configured one).
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Extra tag inserted into the output filenames.
    #[arg(long)]
    pub tag: Option<String>,

    /// Keep only these entity ids (repeatable).
    #[arg(long = "entity")]
    pub entities: Vec<String>,

    /// Merge every category of this setting into a single node.
    #[arg(long, requires = "merged_label")]
    pub merge_setting: Option<String>,

    /// Label of the merged node.
    #[arg(long, requires = "merge_setting")]
    pub merged_label: Option<String>,

    /// Group column selecting the subgroup of focus.
    #[arg(long, requires = "focus")]
    pub group_column: Option<String>,

    /// Subgroup value in focus.
    #[arg(long, requires = "group_column")]
    pub focus: Option<String>,

    /// Represent excluded subgroup values as collapsed placeholder nodes
    /// instead of dropping their events.
    #[arg(long, requires = "group_column")]
    pub collapse_excluded: bool,

    /// Label prefix for collapsed placeholder nodes.
    #[arg(long)]
    pub collapse_prefix: Option<String>,

    /// Emit the tables as JSON to stdout instead of writing CSV files.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `pw batch`.
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Input table (CSV with a header row).
    #[arg(long)]
    pub input: PathBuf,

    /// Group column to split the data by; one network per distinct value.
    #[arg(long)]
    pub group_column: String,

    /// Represent excluded subgroup values as collapsed placeholder nodes
    /// instead of dropping their events.
    #[arg(long)]
    pub collapse_excluded: bool,

    /// Label prefix for collapsed placeholder nodes.
    #[arg(long)]
    pub collapse_prefix: Option<String>,

    /// Merge every category of this setting into a single node.
    #[arg(long, requires = "merged_label")]
    pub merge_setting: Option<String>,

    /// Label of the merged node.
    #[arg(long, requires = "merge_setting")]
    pub merged_label: Option<String>,

    /// Directory for the output tables (defaults to the configured one).
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}
