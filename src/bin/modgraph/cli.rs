//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// modgraph - module dependency manifests and build-graph resolution
#[derive(Parser)]
#[command(name = "modgraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Source root to scan for Module.toml files (defaults to current directory)
    #[arg(long, global = true, env = "MODGRAPH_ROOT")]
    pub root: Option<PathBuf>,

    /// Descriptor overlay to apply (e.g. Win64)
    #[arg(long, global = true)]
    pub configuration: Option<String>,

    /// Feature flags enabling conditional dependencies (comma separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Whether stderr gets colored output; set after parsing
    #[arg(skip)]
    pub color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and validate every module descriptor
    Check(CheckArgs),

    /// Show the modules a root module needs and how they are reached
    Resolve(ResolveArgs),

    /// Show include search paths for a root module's closure
    Includes(IncludesArgs),

    /// Show the precompiled header mode for each module in a closure
    Pch(PchArgs),

    /// Emit build plans as JSON
    Plan(PlanArgs),

    /// Display the dependency tree of a module
    Tree(TreeArgs),

    /// Explain why a module is part of a root module's closure
    Explain(ExplainArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct CheckArgs {}

#[derive(Args)]
pub struct ResolveArgs {
    /// Root module
    pub module: String,
}

#[derive(Args)]
pub struct IncludesArgs {
    /// Root module
    pub module: String,

    /// Only show one member of the closure
    #[arg(long = "module", value_name = "ID")]
    pub only: Option<String>,

    /// Show the dirs used to compile each module instead of the dirs it exposes
    #[arg(long)]
    pub compile: bool,
}

#[derive(Args)]
pub struct PchArgs {
    /// Root module
    pub module: String,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Root module for an ad-hoc target
    pub module: Option<String>,

    /// Configured build targets to plan
    #[arg(long)]
    pub target: Vec<String>,

    /// Plan every configured build target
    #[arg(long, conflicts_with = "target")]
    pub all_targets: bool,

    /// Write the plan to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Root module
    pub module: String,

    /// Maximum depth to display
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Only follow public edges
    #[arg(long)]
    pub public_only: bool,
}

#[derive(Args)]
pub struct ExplainArgs {
    /// Root module
    #[arg(value_name = "ROOT")]
    pub root_module: String,

    /// Module to explain
    pub module: String,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
