//! Workspace - a source tree containing module descriptors.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use walkdir::{DirEntry, WalkDir};

use crate::core::manifest::MANIFEST_NAME;
use crate::util::config::project_config_path;
use crate::util::diagnostic::suggestions;

/// Directories never searched for descriptors.
const SKIPPED_DIRS: &[&str] = &["target", "Binaries", "Intermediate"];

/// A source root and the descriptor files found beneath it.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    descriptors: Vec<PathBuf>,
}

impl Workspace {
    /// Scan `root` for `Module.toml` files.
    ///
    /// Descriptor paths are sorted, so loading is independent of the
    /// filesystem's directory order.
    pub fn discover(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            bail!("source root `{}` is not a directory", root.display());
        }

        let mut descriptors = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped(e));

        for entry in walker {
            let entry = entry
                .with_context(|| format!("failed to scan {}", root.display()))?;
            if entry.file_type().is_file() && entry.file_name() == MANIFEST_NAME {
                descriptors.push(entry.into_path());
            }
        }

        if descriptors.is_empty() {
            bail!(
                "no {} found under {}\n{}",
                MANIFEST_NAME,
                root.display(),
                suggestions::NO_DESCRIPTORS
            );
        }

        descriptors.sort();
        tracing::debug!("found {} descriptors under {}", descriptors.len(), root.display());

        Ok(Workspace {
            root: root.to_path_buf(),
            descriptors,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Descriptor files, sorted by path.
    pub fn descriptor_paths(&self) -> &[PathBuf] {
        &self.descriptors
    }

    /// Project config file (may not exist).
    pub fn config_path(&self) -> PathBuf {
        project_config_path(&self.root)
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}
