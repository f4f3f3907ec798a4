//! `modgraph plan` command

use anyhow::{bail, Context, Result};

use super::{apply_overrides, Session};
use crate::cli::{GlobalArgs, PlanArgs};
use modgraph::core::ModuleId;
use modgraph::ops::{plan_targets, TargetSpec};
use modgraph::util::diagnostic;

pub fn execute(global: &GlobalArgs, args: PlanArgs) -> Result<()> {
    let session = Session::open(global)?;

    let mut specs = Vec::new();
    if let Some(module) = &args.module {
        specs.push(TargetSpec::for_module(
            ModuleId::parse(module)?,
            session.options.clone(),
        ));
    }
    if args.all_targets {
        specs.extend(TargetSpec::all_from_config(&session.config)?);
    } else {
        for name in &args.target {
            specs.push(TargetSpec::from_config(&session.config, name)?);
        }
    }
    if specs.is_empty() {
        bail!(
            "nothing to plan\n\
             help: Pass a root module, `--target <name>` or `--all-targets`"
        );
    }

    // Command-line overrides apply to configured targets too.
    for spec in specs.iter_mut() {
        apply_overrides(&mut spec.options, global);
    }

    tracing::info!("Planning {} target(s)", specs.len());
    let results = plan_targets(&session.registry, &specs, session.config.pch_policy());

    let mut plans = Vec::with_capacity(results.len());
    let mut failed = Vec::new();
    for (name, result) in results {
        match result {
            Ok(plan) => plans.push(plan),
            Err(err) => {
                diagnostic::emit(
                    &err.to_diagnostic().with_context(format!("while planning `{}`", name)),
                    global.color,
                );
                failed.push(name);
            }
        }
    }
    if !failed.is_empty() {
        bail!("failed to plan {}", failed.join(", "));
    }

    let json = if plans.len() == 1 {
        plans[0].to_json()?
    } else {
        serde_json::to_string_pretty(&plans)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("failed to write plan: {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
