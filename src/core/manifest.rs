//! `Module.toml` descriptor files.
//!
//! One file per module, next to the module's sources:
//!
//! ```toml
//! [module]
//! name = "RealityDistortion"
//! pch = "use-shared-or-explicit"
//!
//! [dependencies]
//! public = ["Core", "Engine"]
//! private = []
//!
//! [include]
//! public = ["RealityDistortion"]
//!
//! [conditional]
//! OnlineSubsystem = "OnlineSubsystem"
//!
//! [overlay.Win64]
//! public-dependencies = ["RHI"]
//! public-include-dirs = ["RealityDistortion/Rendering"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::descriptor::{DescriptorOverlay, ModuleDescriptor};
use crate::core::{ModuleId, PchMode};
use crate::resolver::errors::GraphError;

/// File name of a module descriptor.
pub const MANIFEST_NAME: &str = "Module.toml";

/// Parsed `Module.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub module: ModuleSection,

    #[serde(default)]
    pub dependencies: DependencySection,

    #[serde(default)]
    pub include: IncludeSection,

    /// Feature flag -> module
    #[serde(default)]
    pub conditional: BTreeMap<String, ModuleId>,

    /// Configuration name -> additions
    #[serde(default)]
    pub overlay: BTreeMap<String, OverlaySection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleSection {
    pub name: ModuleId,

    #[serde(default)]
    pub pch: PchMode,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencySection {
    #[serde(default)]
    pub public: Vec<ModuleId>,

    #[serde(default)]
    pub private: Vec<ModuleId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncludeSection {
    #[serde(default)]
    pub public: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct OverlaySection {
    pub public_dependencies: Vec<ModuleId>,
    pub private_dependencies: Vec<ModuleId>,
    pub public_include_dirs: Vec<PathBuf>,
    pub pch: Option<PchMode>,
}

impl Manifest {
    /// Load and parse a descriptor file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read descriptor: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse descriptor: {}", path.display()))
    }

    /// Parse descriptor contents.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validate into an immutable descriptor.
    pub fn into_descriptor(self) -> Result<ModuleDescriptor, GraphError> {
        let mut builder = ModuleDescriptor::builder(self.module.name)
            .pch_mode(self.module.pch)
            .public_dependencies(self.dependencies.public)
            .private_dependencies(self.dependencies.private)
            .public_include_dirs(self.include.public);

        for (flag, id) in self.conditional {
            builder = builder.conditional_dependency(flag, id);
        }

        for (name, section) in self.overlay {
            let overlay = DescriptorOverlay {
                public_dependencies: section.public_dependencies,
                private_dependencies: section.private_dependencies,
                public_include_dirs: section.public_include_dirs,
                pch_mode: section.pch,
            };
            builder = builder.overlay(name, overlay);
        }

        builder.build()
    }
}
