//! `modgraph includes` command

use anyhow::{bail, Result};

use super::Session;
use crate::cli::{GlobalArgs, IncludesArgs};
use modgraph::builder::IncludePathAggregator;
use modgraph::core::ModuleId;

pub fn execute(global: &GlobalArgs, args: IncludesArgs) -> Result<()> {
    let session = Session::open(global)?;
    let closure = session.resolve(&args.module)?;
    let aggregator = IncludePathAggregator::new(&closure);

    let map = if args.compile {
        aggregator.aggregate_compile()
    } else {
        aggregator.aggregate()
    };

    if let Some(only) = &args.only {
        let id = ModuleId::parse(only)?;
        let Some(dirs) = map.get(&id) else {
            bail!(
                "module `{}` is not part of the closure of `{}`\n\
                 help: Run `modgraph resolve {}` to list its members",
                only,
                args.module,
                args.module
            );
        };
        for dir in dirs {
            println!("{}", dir.display());
        }
        return Ok(());
    }

    for (id, dirs) in &map {
        println!("{}:", id);
        for dir in dirs {
            println!("  -I{}", dir.display());
        }
    }

    Ok(())
}
