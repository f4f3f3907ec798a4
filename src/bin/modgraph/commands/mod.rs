//! Command implementations

pub mod check;
pub mod completions;
pub mod explain;
pub mod includes;
pub mod pch;
pub mod plan;
pub mod resolve;
pub mod tree;

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use modgraph::core::{ModuleId, ModuleRegistry, Workspace};
use modgraph::ops::{load_registry, unused_features};
use modgraph::resolver::{DependencyResolver, ResolveOptions, ResolvedClosure};
use modgraph::util::config::{global_config_path, load_config, Config};
use modgraph::util::diagnostic::{self, Diagnostic};

/// Loaded workspace state shared by the commands.
pub struct Session {
    pub ws: Workspace,
    pub config: Config,
    pub registry: ModuleRegistry,
    /// `[build]` options with command-line overrides applied
    pub options: ResolveOptions,
}

impl Session {
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let root = match &global.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("failed to get current directory")?,
        };

        let ws = Workspace::discover(&root)?;
        let config = load_config(global_config_path().as_deref(), &ws.config_path());
        let registry = load_registry(&ws)?;

        let mut options = config.resolve_options();
        apply_overrides(&mut options, global);

        for flag in unused_features(&registry, &options) {
            let warning =
                Diagnostic::warning(format!("feature flag `{}` is not declared by any module", flag))
                    .with_suggestion("Check the flag against the `[conditional]` tables");
            diagnostic::emit(&warning, global.color);
        }

        Ok(Session {
            ws,
            config,
            registry,
            options,
        })
    }

    /// Resolve `module` with the session's options.
    pub fn resolve(&self, module: &str) -> Result<ResolvedClosure> {
        let root = ModuleId::parse(module)?;
        Ok(DependencyResolver::new(&self.registry).resolve_with(root, &self.options)?)
    }

    pub fn root(&self) -> PathBuf {
        self.ws.root().to_path_buf()
    }
}

/// Command-line flags win over config: `--configuration` replaces, and
/// `--features` adds to the configured set.
pub fn apply_overrides(options: &mut ResolveOptions, global: &GlobalArgs) {
    if let Some(configuration) = &global.configuration {
        options.configuration = Some(configuration.clone());
    }
    options
        .features
        .extend(global.features.iter().filter(|f| !f.is_empty()).cloned());
}
