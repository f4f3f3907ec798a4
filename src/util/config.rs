//! Configuration file support.
//!
//! Two locations are read:
//! - Global: `~/.modgraph/config.toml` - user-wide defaults
//! - Project: `<root>/.modgraph/config.toml` - project-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! take precedence over both.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::PchPolicy;
use crate::core::PchMode;
use crate::resolver::ResolveOptions;

/// modgraph configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings shared by every resolution
    pub build: BuildConfig,

    /// Named build targets
    pub targets: BTreeMap<String, TargetConfig>,
}

/// Build-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Descriptor overlay to apply (e.g. "Win64")
    pub configuration: Option<String>,

    /// Feature flags enabling conditional dependencies
    pub features: Vec<String>,

    pub pch_policy: Option<PchPolicyKind>,

    /// Mode forced on PCH consumers under the shared policy
    pub shared_pch_mode: Option<PchMode>,
}

/// Project-level PCH policy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PchPolicyKind {
    PerModule,
    Shared,
}

/// A named build target: a root module plus per-target settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetConfig {
    pub root: String,

    /// Overrides `[build].configuration`
    #[serde(default)]
    pub configuration: Option<String>,

    /// Added to `[build].features`
    #[serde(default)]
    pub features: Vec<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't
    /// exist or can't be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.configuration.is_some() {
            self.build.configuration = other.build.configuration;
        }
        if !other.build.features.is_empty() {
            self.build.features = other.build.features;
        }
        if other.build.pch_policy.is_some() {
            self.build.pch_policy = other.build.pch_policy;
        }
        if other.build.shared_pch_mode.is_some() {
            self.build.shared_pch_mode = other.build.shared_pch_mode;
        }

        self.targets.extend(other.targets);
    }

    /// The PCH policy this configuration selects.
    pub fn pch_policy(&self) -> PchPolicy {
        match self.build.pch_policy {
            Some(PchPolicyKind::Shared) => {
                PchPolicy::Shared(self.build.shared_pch_mode.unwrap_or_default())
            }
            Some(PchPolicyKind::PerModule) | None => PchPolicy::PerModule,
        }
    }

    /// Resolution options from `[build]` alone.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            configuration: self.build.configuration.clone(),
            features: self.build.features.iter().cloned().collect(),
        }
    }

    /// Resolution options for a named target: `[build]` settings with the
    /// target's own settings layered on top.
    pub fn target_options(&self, target: &TargetConfig) -> ResolveOptions {
        let mut features: BTreeSet<String> = self.build.features.iter().cloned().collect();
        features.extend(target.features.iter().cloned());

        ResolveOptions {
            configuration: target
                .configuration
                .clone()
                .or_else(|| self.build.configuration.clone()),
            features,
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.modgraph/config.toml)
/// 2. Global config (~/.modgraph/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global) = global_path {
        config.merge(Config::load_or_default(global));
    }
    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config directory (~/.modgraph).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".modgraph"))
}

/// Get the global config path (~/.modgraph/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (<root>/.modgraph/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".modgraph").join("config.toml")
}
