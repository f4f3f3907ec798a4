//! Effective dependencies for one resolution pass.
//!
//! Stored descriptors are never mutated. A pass computes, per module, the
//! dependencies that apply under the selected build configuration
//! (overlays) and the enabled feature flags (conditional dependencies).

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use serde::Serialize;

use crate::core::descriptor::dedup_in_order;
use crate::core::{ModuleDescriptor, ModuleId, PchMode};

/// Inputs that select which parts of each descriptor are active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolveOptions {
    /// Overlay name to apply (e.g. a platform), if any
    pub configuration: Option<String>,
    /// Enabled feature flags
    pub features: BTreeSet<String>,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configuration(mut self, configuration: impl Into<String>) -> Self {
        self.configuration = Some(configuration.into());
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.insert(feature.into());
        self
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features.extend(features.into_iter().map(Into::into));
        self
    }
}

/// Dependency lists in effect for a module during one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EffectiveDependencies {
    pub public: Vec<ModuleId>,
    pub private: Vec<ModuleId>,
}

impl EffectiveDependencies {
    /// All effective edges, public first.
    pub fn iter(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.public.iter().chain(&self.private).copied()
    }

    fn add_private(&mut self, id: ModuleId) {
        // A dependency keeps exactly one tier; public wins.
        if !self.public.contains(&id) && !self.private.contains(&id) {
            self.private.push(id);
        }
    }
}

/// Everything a pass needs to know about one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveModule {
    pub id: ModuleId,
    pub dependencies: EffectiveDependencies,
    pub public_include_dirs: Vec<PathBuf>,
    pub pch_mode: PchMode,
}

/// Add the conditional dependencies whose flag is enabled to the module's
/// private dependencies.
///
/// Flags the descriptor does not know are ignored.
pub fn activate<I, S>(descriptor: &ModuleDescriptor, enabled_flags: I) -> EffectiveDependencies
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut deps = EffectiveDependencies {
        public: descriptor.public_dependencies().to_vec(),
        private: descriptor.private_dependencies().to_vec(),
    };
    apply_flags(descriptor, enabled_flags, &mut deps);
    deps
}

/// Effective view of a descriptor: base, then the configuration overlay,
/// then enabled conditional dependencies.
pub fn effective_module(descriptor: &ModuleDescriptor, options: &ResolveOptions) -> EffectiveModule {
    let mut deps = EffectiveDependencies {
        public: descriptor.public_dependencies().to_vec(),
        private: descriptor.private_dependencies().to_vec(),
    };
    let mut include_dirs = descriptor.public_include_dirs().to_vec();
    let mut pch_mode = descriptor.pch_mode();

    if let Some(overlay) = options
        .configuration
        .as_deref()
        .and_then(|name| descriptor.overlay(name))
    {
        deps.public.extend(&overlay.public_dependencies);
        deps.private.extend(&overlay.private_dependencies);
        include_dirs.extend(overlay.public_include_dirs.iter().cloned());
        if let Some(mode) = overlay.pch_mode {
            pch_mode = mode;
        }
        dedup_in_order(&mut deps.public);
        dedup_in_order(&mut deps.private);
        dedup_in_order(&mut include_dirs);
    }

    apply_flags(descriptor, &options.features, &mut deps);

    EffectiveModule {
        id: descriptor.id(),
        dependencies: deps,
        public_include_dirs: include_dirs,
        pch_mode,
    }
}

fn apply_flags<I, S>(descriptor: &ModuleDescriptor, enabled_flags: I, deps: &mut EffectiveDependencies)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let enabled: HashSet<String> = enabled_flags
        .into_iter()
        .map(|flag| flag.as_ref().to_string())
        .collect();

    for (flag, &id) in descriptor.conditional_dependencies() {
        if enabled.contains(flag) {
            tracing::debug!("{}: flag `{}` activates {}", descriptor.id(), flag, id);
            deps.add_private(id);
        }
    }
}
