//! High-level operations used by the CLI.

pub mod load;
pub mod plan;

pub use load::load_registry;
pub use plan::{plan_target, plan_targets, resolve_target, unused_features, TargetSpec};
