//! Precompiled header planning.
//!
//! By default each module keeps the mode it declares. A project may instead
//! force every PCH consumer onto one shared mode. Either way the effective
//! mode is validated: force-including a header needs somewhere to put it,
//! so `ForceInclude` requires at least one public include directory.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{ModuleId, PchMode};
use crate::resolver::{GraphError, ResolvedClosure, ResolvedModule};

/// Module id -> effective PCH mode.
pub type PchMap = BTreeMap<ModuleId, PchMode>;

/// Project-level PCH policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PchPolicy {
    /// Each module's declared mode is used as-is.
    #[default]
    PerModule,
    /// Every module that consumes a PCH uses this mode.
    Shared(PchMode),
}

/// Chooses the effective PCH mode for each member of a closure.
#[derive(Debug, Clone, Copy, Default)]
pub struct PchPlanner {
    policy: PchPolicy,
}

impl PchPlanner {
    pub fn new(policy: PchPolicy) -> Self {
        PchPlanner { policy }
    }

    pub fn policy(&self) -> PchPolicy {
        self.policy
    }

    /// Plan every member, stopping at the first invalid configuration.
    pub fn plan(&self, closure: &ResolvedClosure) -> Result<PchMap, GraphError> {
        closure
            .modules()
            .map(|module| Ok((module.id, self.effective_mode(module)?)))
            .collect()
    }

    /// Effective mode for one module.
    pub fn effective_mode(&self, module: &ResolvedModule) -> Result<PchMode, GraphError> {
        let mode = match self.policy {
            PchPolicy::Shared(shared) if module.pch_mode.is_consumer() => shared,
            _ => module.pch_mode,
        };

        if mode == PchMode::ForceInclude && module.public_include_dirs.is_empty() {
            return Err(GraphError::InvalidPchConfiguration {
                module: module.id,
                reason: "force-include requires at least one public include directory"
                    .to_string(),
            });
        }

        if mode != module.pch_mode {
            tracing::debug!("{}: pch {} -> {} by policy", module.id, module.pch_mode, mode);
        }
        Ok(mode)
    }
}

/// Plan with the default per-module policy.
pub fn plan(closure: &ResolvedClosure) -> Result<PchMap, GraphError> {
    PchPlanner::default().plan(closure)
}
