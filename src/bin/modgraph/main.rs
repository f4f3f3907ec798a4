//! modgraph CLI - resolve module dependency graphs for native builds

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use modgraph::util::diagnostic::{self, Diagnostic};
use modgraph::GraphError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let mut cli = Cli::parse();
    cli.global.color = !cli.global.no_color && std::io::stderr().is_terminal();
    let color = cli.global.color;

    if let Err(e) = run(cli) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let filter = if cli.global.verbose {
        EnvFilter::new("modgraph=debug")
    } else {
        EnvFilter::new("modgraph=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(cli.global.color)
        .with_writer(std::io::stderr)
        .init();

    let global = cli.global;
    match cli.command {
        Commands::Check(args) => commands::check::execute(&global, args),
        Commands::Resolve(args) => commands::resolve::execute(&global, args),
        Commands::Includes(args) => commands::includes::execute(&global, args),
        Commands::Pch(args) => commands::pch::execute(&global, args),
        Commands::Plan(args) => commands::plan::execute(&global, args),
        Commands::Tree(args) => commands::tree::execute(&global, args),
        Commands::Explain(args) => commands::explain::execute(&global, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print an error. Graph errors get a full diagnostic; any context added
/// on the way up becomes a context line.
fn report(err: &anyhow::Error, color: bool) {
    let graph = err.chain().find_map(|e| e.downcast_ref::<GraphError>());

    match graph {
        Some(graph) => {
            let mut diag: Diagnostic = graph.to_diagnostic();
            for outer in err
                .chain()
                .take_while(|e| e.downcast_ref::<GraphError>().is_none())
            {
                diag = diag.with_context(outer.to_string());
            }
            diagnostic::emit(&diag, color);
        }
        None => eprintln!("error: {:#}", err),
    }
}
