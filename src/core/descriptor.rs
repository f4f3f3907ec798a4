//! Module descriptors - what a module declares about itself.
//!
//! A descriptor is built once at configuration-load time and never mutated
//! afterwards. Dependencies come in two tiers: public dependencies are
//! re-exposed to anything depending on this module, private ones are not.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::ModuleId;
use crate::resolver::errors::GraphError;

/// Precompiled header strategy for a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PchMode {
    /// No precompiled header is generated or consumed.
    #[serde(alias = "NoPCHs", alias = "no-pchs")]
    None,

    /// Consume a shared PCH, or the module's own explicit one if declared.
    #[serde(alias = "UseExplicitOrSharedPCHs", alias = "use-explicit-or-shared")]
    UseSharedOrExplicit,

    /// Force-include the module's PCH header into every translation unit.
    #[serde(alias = "ForceInclude")]
    ForceInclude,
}

impl Default for PchMode {
    fn default() -> Self {
        PchMode::UseSharedOrExplicit
    }
}

impl PchMode {
    /// Whether a module in this mode consumes a precompiled header at all.
    pub fn is_consumer(&self) -> bool {
        !matches!(self, PchMode::None)
    }
}

impl fmt::Display for PchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PchMode::None => write!(f, "none"),
            PchMode::UseSharedOrExplicit => write!(f, "use-shared-or-explicit"),
            PchMode::ForceInclude => write!(f, "force-include"),
        }
    }
}

/// Configuration-specific additions to a descriptor (e.g. per platform).
///
/// Overlays only add: they never remove a base dependency or include dir.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DescriptorOverlay {
    pub public_dependencies: Vec<ModuleId>,
    pub private_dependencies: Vec<ModuleId>,
    pub public_include_dirs: Vec<PathBuf>,
    /// Replaces the base PCH mode when set
    pub pch_mode: Option<PchMode>,
}

impl DescriptorOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public_dependency(mut self, id: impl Into<ModuleId>) -> Self {
        self.public_dependencies.push(id.into());
        self
    }

    pub fn private_dependency(mut self, id: impl Into<ModuleId>) -> Self {
        self.private_dependencies.push(id.into());
        self
    }

    pub fn public_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.public_include_dirs.push(dir.into());
        self
    }

    pub fn pch_mode(mut self, mode: PchMode) -> Self {
        self.pch_mode = Some(mode);
        self
    }

    fn normalize(&mut self) {
        dedup_in_order(&mut self.public_dependencies);
        dedup_in_order(&mut self.private_dependencies);
        dedup_in_order(&mut self.public_include_dirs);
    }
}

/// The declaration of one module: identity, dependency tiers, exported
/// include directories, PCH mode and optional feature-gated dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    id: ModuleId,
    public_dependencies: Vec<ModuleId>,
    private_dependencies: Vec<ModuleId>,
    public_include_dirs: Vec<PathBuf>,
    pch_mode: PchMode,
    conditional_dependencies: BTreeMap<String, ModuleId>,
    overlays: BTreeMap<String, DescriptorOverlay>,
}

impl ModuleDescriptor {
    /// Start building a descriptor for `id`.
    pub fn builder(id: impl Into<ModuleId>) -> ModuleDescriptorBuilder {
        ModuleDescriptorBuilder::new(id.into())
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn public_dependencies(&self) -> &[ModuleId] {
        &self.public_dependencies
    }

    pub fn private_dependencies(&self) -> &[ModuleId] {
        &self.private_dependencies
    }

    pub fn public_include_dirs(&self) -> &[PathBuf] {
        &self.public_include_dirs
    }

    pub fn pch_mode(&self) -> PchMode {
        self.pch_mode
    }

    /// Feature flag -> module activated by that flag.
    pub fn conditional_dependencies(&self) -> &BTreeMap<String, ModuleId> {
        &self.conditional_dependencies
    }

    pub fn overlays(&self) -> &BTreeMap<String, DescriptorOverlay> {
        &self.overlays
    }

    pub fn overlay(&self, configuration: &str) -> Option<&DescriptorOverlay> {
        self.overlays.get(configuration)
    }

    /// Public then private dependencies, as declared.
    pub fn dependencies(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.public_dependencies
            .iter()
            .chain(&self.private_dependencies)
            .copied()
    }
}

/// Builder for [`ModuleDescriptor`].
///
/// Lists keep their first-occurrence order; repeated entries are dropped.
#[derive(Debug, Clone)]
pub struct ModuleDescriptorBuilder {
    id: ModuleId,
    public_dependencies: Vec<ModuleId>,
    private_dependencies: Vec<ModuleId>,
    public_include_dirs: Vec<PathBuf>,
    pch_mode: PchMode,
    conditional_dependencies: BTreeMap<String, ModuleId>,
    overlays: BTreeMap<String, DescriptorOverlay>,
}

impl ModuleDescriptorBuilder {
    fn new(id: ModuleId) -> Self {
        ModuleDescriptorBuilder {
            id,
            public_dependencies: Vec::new(),
            private_dependencies: Vec::new(),
            public_include_dirs: Vec::new(),
            pch_mode: PchMode::default(),
            conditional_dependencies: BTreeMap::new(),
            overlays: BTreeMap::new(),
        }
    }

    pub fn public_dependency(mut self, id: impl Into<ModuleId>) -> Self {
        self.public_dependencies.push(id.into());
        self
    }

    pub fn public_dependencies<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ModuleId>,
    {
        self.public_dependencies.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn private_dependency(mut self, id: impl Into<ModuleId>) -> Self {
        self.private_dependencies.push(id.into());
        self
    }

    pub fn private_dependencies<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ModuleId>,
    {
        self.private_dependencies.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn public_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.public_include_dirs.push(dir.into());
        self
    }

    pub fn public_include_dirs<I>(mut self, dirs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PathBuf>,
    {
        self.public_include_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    pub fn pch_mode(mut self, mode: PchMode) -> Self {
        self.pch_mode = mode;
        self
    }

    /// Activate `id` as a private dependency when `flag` is enabled.
    pub fn conditional_dependency(mut self, flag: impl Into<String>, id: impl Into<ModuleId>) -> Self {
        self.conditional_dependencies.insert(flag.into(), id.into());
        self
    }

    pub fn overlay(mut self, configuration: impl Into<String>, overlay: DescriptorOverlay) -> Self {
        self.overlays.insert(configuration.into(), overlay);
        self
    }

    /// Validate and freeze the descriptor.
    ///
    /// Fails with [`GraphError::ConflictingVisibility`] if any dependency is
    /// both public and private, either in the base lists or once an overlay
    /// is applied on top of them.
    pub fn build(mut self) -> Result<ModuleDescriptor, GraphError> {
        dedup_in_order(&mut self.public_dependencies);
        dedup_in_order(&mut self.private_dependencies);
        dedup_in_order(&mut self.public_include_dirs);

        check_disjoint(
            self.id,
            &self.public_dependencies,
            &self.private_dependencies,
        )?;

        for overlay in self.overlays.values_mut() {
            overlay.normalize();

            let public: Vec<ModuleId> = self
                .public_dependencies
                .iter()
                .chain(&overlay.public_dependencies)
                .copied()
                .collect();
            let private: Vec<ModuleId> = self
                .private_dependencies
                .iter()
                .chain(&overlay.private_dependencies)
                .copied()
                .collect();
            check_disjoint(self.id, &public, &private)?;
        }

        Ok(ModuleDescriptor {
            id: self.id,
            public_dependencies: self.public_dependencies,
            private_dependencies: self.private_dependencies,
            public_include_dirs: self.public_include_dirs,
            pch_mode: self.pch_mode,
            conditional_dependencies: self.conditional_dependencies,
            overlays: self.overlays,
        })
    }
}

fn check_disjoint(
    module: ModuleId,
    public: &[ModuleId],
    private: &[ModuleId],
) -> Result<(), GraphError> {
    let public: HashSet<ModuleId> = public.iter().copied().collect();
    match private.iter().find(|id| public.contains(*id)) {
        Some(&dependency) => Err(GraphError::ConflictingVisibility { module, dependency }),
        None => Ok(()),
    }
}

/// Remove repeated entries, keeping the first occurrence of each.
pub(crate) fn dedup_in_order<T: Clone + Eq + std::hash::Hash>(items: &mut Vec<T>) {
    let mut seen = HashSet::with_capacity(items.len());
    items.retain(|item| seen.insert(item.clone()));
}
