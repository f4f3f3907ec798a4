//! `modgraph tree` command

use std::collections::HashSet;

use anyhow::Result;

use super::Session;
use crate::cli::{GlobalArgs, TreeArgs};
use modgraph::core::ModuleId;
use modgraph::resolver::{DependencyKind, ResolvedClosure};

pub fn execute(global: &GlobalArgs, args: TreeArgs) -> Result<()> {
    let session = Session::open(global)?;
    let closure = session.resolve(&args.module)?;

    let mut seen = HashSet::new();
    print_tree(
        &closure,
        closure.root(),
        None,
        0,
        args.depth.unwrap_or(usize::MAX),
        args.public_only,
        &mut seen,
    );

    Ok(())
}

fn print_tree(
    closure: &ResolvedClosure,
    id: ModuleId,
    kind: Option<DependencyKind>,
    depth: usize,
    max_depth: usize,
    public_only: bool,
    seen: &mut HashSet<ModuleId>,
) {
    if depth > max_depth {
        return;
    }

    let is_duplicate = !seen.insert(id);

    let prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}├── ", "│   ".repeat(depth - 1))
    };
    let edge = match kind {
        Some(DependencyKind::Private) => " [private]",
        _ => "",
    };
    let dup_marker = if is_duplicate { " (*)" } else { "" };

    println!("{}{}{}{}", prefix, id, edge, dup_marker);

    // Don't recurse into modules already printed
    if is_duplicate {
        return;
    }

    let Some(module) = closure.module(id) else {
        return;
    };
    for (dep, dep_kind) in module.edges() {
        if public_only && dep_kind == DependencyKind::Private {
            continue;
        }
        print_tree(closure, dep, Some(dep_kind), depth + 1, max_depth, public_only, seen);
    }
}
