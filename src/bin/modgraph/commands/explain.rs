//! `modgraph explain` command

use anyhow::{anyhow, Result};

use super::Session;
use crate::cli::{ExplainArgs, GlobalArgs};
use modgraph::core::ModuleId;
use modgraph::resolver::DependencyKind;

pub fn execute(global: &GlobalArgs, args: ExplainArgs) -> Result<()> {
    let session = Session::open(global)?;
    let closure = session.resolve(&args.root_module)?;
    let target = ModuleId::parse(&args.module)?;

    let path = closure.path_to(target).ok_or_else(|| {
        anyhow!(
            "module `{}` is not required by `{}`\n\
             help: Run `modgraph tree {}` to see its dependencies",
            args.module,
            args.root_module,
            args.root_module
        )
    })?;

    if let Some(visibility) = closure.visibility(target) {
        println!("{} is {} in the closure of {}", target, visibility, closure.root());
    }

    println!("{} (root)", path[0]);
    for (depth, pair) in path.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        let kind = closure
            .module(from)
            .and_then(|m| m.edge_to(to))
            .unwrap_or(DependencyKind::Private);
        println!("{}└─ {} ({})", "   ".repeat(depth), to, kind);
    }

    // Who else pulls it in directly
    let dependents: Vec<_> = closure
        .modules()
        .filter_map(|m| m.edge_to(target).map(|kind| (m.id, kind)))
        .collect();
    if !dependents.is_empty() {
        println!();
        println!("Required directly by:");
        for (id, kind) in dependents {
            println!("  → {} ({})", id, kind);
        }
    }

    Ok(())
}
