//! Registry loading from a source tree.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::{Manifest, ModuleId, ModuleRegistry, Workspace};

/// Parse every descriptor in the workspace, register it and freeze.
///
/// This is the single-threaded load phase; the returned registry is
/// read-only.
pub fn load_registry(ws: &Workspace) -> Result<ModuleRegistry> {
    let mut loader = ModuleRegistry::loader();
    let mut origins: HashMap<ModuleId, &Path> = HashMap::new();

    for path in ws.descriptor_paths() {
        let descriptor = Manifest::load(path)?
            .into_descriptor()
            .with_context(|| format!("invalid descriptor: {}", path.display()))?;
        let id = descriptor.id();

        if let Err(err) = loader.register_from(descriptor, path) {
            let first = origins.get(&id).map(|p| p.display().to_string()).unwrap_or_default();
            return Err(err).with_context(|| {
                format!("`{}` declared in both {} and {}", id, first, path.display())
            });
        }
        origins.insert(id, path);
    }

    tracing::info!("Loaded {} modules from {}", loader.len(), ws.root().display());

    loader.freeze().map_err(|err| {
        let origin = err
            .modules()
            .first()
            .and_then(|id| origins.get(id))
            .copied();
        match origin {
            Some(path) => anyhow::Error::new(err)
                .context(format!("while validating {}", path.display())),
            None => anyhow::Error::new(err),
        }
    })
}
