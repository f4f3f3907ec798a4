//! Build plan generation.
//!
//! A BuildPlan is everything an external build executor needs for one
//! target: which modules to compile, in what order, with which include
//! search paths and PCH mode. It is plain data and serializes to JSON.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::Serialize;

use crate::builder::include_paths::IncludePathAggregator;
use crate::builder::pch::PchMap;
use crate::core::{ModuleId, PchMode};
use crate::resolver::{ResolvedClosure, Visibility};
use crate::util::hash::Fingerprint;

/// A complete plan for one build target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    /// Target name (the root module's name for ad-hoc plans)
    pub target: String,

    /// Root module of the closure
    pub root: ModuleId,

    /// Descriptor overlay in effect
    pub configuration: Option<String>,

    /// Enabled feature flags
    pub features: BTreeSet<String>,

    /// Modules in dependency-first order
    pub build_order: Vec<ModuleId>,

    /// Per-module settings, sorted by id
    pub modules: BTreeMap<ModuleId, PlannedModule>,

    /// SHA-256 over the plan's content
    pub fingerprint: String,
}

/// Build settings for one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedModule {
    pub visibility: Visibility,

    /// Dirs the module exposes to its dependents
    pub include_dirs: Vec<PathBuf>,

    /// Dirs used when compiling the module itself
    pub compile_include_dirs: Vec<PathBuf>,

    pub pch: PchMode,
}

impl BuildPlan {
    /// Assemble a plan from a closure and its PCH mapping.
    ///
    /// Modules missing from `pch` fall back to their declared mode.
    pub fn new(target: impl Into<String>, closure: &ResolvedClosure, pch: &PchMap) -> Self {
        let includes = IncludePathAggregator::new(closure);

        let modules: BTreeMap<ModuleId, PlannedModule> = closure
            .modules()
            .map(|m| {
                let planned = PlannedModule {
                    visibility: m.visibility,
                    include_dirs: includes.visible_dirs(m.id),
                    compile_include_dirs: includes.compile_dirs(m.id),
                    pch: pch.get(&m.id).copied().unwrap_or(m.pch_mode),
                };
                (m.id, planned)
            })
            .collect();

        let mut plan = BuildPlan {
            target: target.into(),
            root: closure.root(),
            configuration: closure.options().configuration.clone(),
            features: closure.options().features.clone(),
            build_order: closure.build_order(),
            modules,
            fingerprint: String::new(),
        };
        plan.fingerprint = plan.compute_fingerprint();
        plan
    }

    fn compute_fingerprint(&self) -> String {
        let mut fp = Fingerprint::new();
        fp.update_str(&self.target)
            .update_str(self.root.as_str())
            .update_opt(self.configuration.as_deref())
            .section("features")
            .update_strs(self.features.iter().map(String::as_str))
            .section("order")
            .update_strs(self.build_order.iter().map(|id| id.as_str()));

        for (id, module) in &self.modules {
            fp.section(id.as_str())
                .update_str(&module.visibility.to_string())
                .update_str(&module.pch.to_string());
            fp.section("include");
            for dir in &module.include_dirs {
                fp.update_str(&dir.to_string_lossy());
            }
            fp.section("compile");
            for dir in &module.compile_include_dirs {
                fp.update_str(&dir.to_string_lossy());
            }
        }

        fp.finish()
    }

    /// Pretty-printed JSON for the build executor.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
