//! `modgraph resolve` command

use anyhow::Result;

use super::Session;
use crate::cli::{GlobalArgs, ResolveArgs};

pub fn execute(global: &GlobalArgs, args: ResolveArgs) -> Result<()> {
    let session = Session::open(global)?;
    let closure = session.resolve(&args.module)?;

    let width = closure.modules().map(|m| m.id.len()).max().unwrap_or(0);

    println!("{} ({} modules)", closure.root(), closure.len());
    for module in closure.modules() {
        let marker = if module.id == closure.root() { " (root)" } else { "" };
        println!(
            "  {:<width$}  {}{}",
            module.id.as_str(),
            module.visibility,
            marker,
            width = width
        );
    }

    Ok(())
}
