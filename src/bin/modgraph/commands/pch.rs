//! `modgraph pch` command

use anyhow::Result;

use super::Session;
use crate::cli::{GlobalArgs, PchArgs};
use modgraph::builder::PchPlanner;

pub fn execute(global: &GlobalArgs, args: PchArgs) -> Result<()> {
    let session = Session::open(global)?;
    let closure = session.resolve(&args.module)?;
    let plan = PchPlanner::new(session.config.pch_policy()).plan(&closure)?;

    let width = plan.keys().map(|id| id.len()).max().unwrap_or(0);
    for (id, mode) in &plan {
        println!("{:<width$}  {}", id.as_str(), mode, width = width);
    }

    Ok(())
}
