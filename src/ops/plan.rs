//! Planning build targets.
//!
//! Each target is resolve -> aggregate -> plan, aborting at the first error.
//! Many targets can be planned at once: the frozen registry is shared
//! read-only and every target gets its own closure.

use std::collections::BTreeSet;

use anyhow::{anyhow, Result};
use rayon::prelude::*;

use crate::builder::{BuildPlan, PchPlanner, PchPolicy};
use crate::core::{ModuleId, ModuleRegistry};
use crate::resolver::{DependencyResolver, GraphError, ResolveOptions, ResolvedClosure};
use crate::util::config::Config;
use crate::util::diagnostic::suggestions;

/// A build target: a root module and the options it is resolved with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    pub name: String,
    pub root: ModuleId,
    pub options: ResolveOptions,
}

impl TargetSpec {
    /// An ad-hoc target named after its root module.
    pub fn for_module(root: ModuleId, options: ResolveOptions) -> Self {
        TargetSpec {
            name: root.to_string(),
            root,
            options,
        }
    }

    /// A target declared under `[targets.<name>]`.
    pub fn from_config(config: &Config, name: &str) -> Result<Self> {
        let target = config.targets.get(name).ok_or_else(|| {
            anyhow!(
                "build target `{}` is not configured\n{}",
                name,
                suggestions::TARGET_NOT_FOUND
            )
        })?;
        let root = ModuleId::parse(&target.root)?;

        Ok(TargetSpec {
            name: name.to_string(),
            root,
            options: config.target_options(target),
        })
    }

    /// Every target declared in the config, sorted by name.
    pub fn all_from_config(config: &Config) -> Result<Vec<Self>> {
        config
            .targets
            .keys()
            .map(|name| Self::from_config(config, name))
            .collect()
    }
}

/// Resolve a target's closure.
pub fn resolve_target(
    registry: &ModuleRegistry,
    spec: &TargetSpec,
) -> Result<ResolvedClosure, GraphError> {
    DependencyResolver::new(registry).resolve_with(spec.root, &spec.options)
}

/// Resolve and plan one target.
pub fn plan_target(
    registry: &ModuleRegistry,
    spec: &TargetSpec,
    policy: PchPolicy,
) -> Result<BuildPlan, GraphError> {
    let closure = resolve_target(registry, spec)?;
    let pch = PchPlanner::new(policy).plan(&closure)?;
    let plan = BuildPlan::new(spec.name.clone(), &closure, &pch);

    tracing::debug!("planned {} ({} modules)", spec.name, plan.modules.len());
    Ok(plan)
}

/// Plan several targets in parallel.
///
/// Results are returned in the order of `specs`; one target failing does
/// not affect the others.
pub fn plan_targets(
    registry: &ModuleRegistry,
    specs: &[TargetSpec],
    policy: PchPolicy,
) -> Vec<(String, Result<BuildPlan, GraphError>)> {
    specs
        .par_iter()
        .map(|spec| (spec.name.clone(), plan_target(registry, spec, policy)))
        .collect()
}

/// Enabled flags that no descriptor declares.
///
/// Unknown flags are ignored during activation; this only feeds a warning.
pub fn unused_features(registry: &ModuleRegistry, options: &ResolveOptions) -> Vec<String> {
    let declared: BTreeSet<&str> = registry
        .iter()
        .flat_map(|d| d.conditional_dependencies().keys())
        .map(String::as_str)
        .collect();

    options
        .features
        .iter()
        .filter(|flag| !declared.contains(flag.as_str()))
        .cloned()
        .collect()
}
