//! `modgraph check` command

use anyhow::Result;

use super::Session;
use crate::cli::{CheckArgs, GlobalArgs};

pub fn execute(global: &GlobalArgs, _args: CheckArgs) -> Result<()> {
    let session = Session::open(global)?;

    let overlays: usize = session.registry.iter().map(|d| d.overlays().len()).sum();
    let conditional: usize = session
        .registry
        .iter()
        .map(|d| d.conditional_dependencies().len())
        .sum();

    println!(
        "Checked {} modules in {} ({} overlays, {} conditional dependencies)",
        session.registry.len(),
        session.root().display(),
        overlays,
        conditional
    );

    Ok(())
}
