//! Build-graph assembly.
//!
//! Everything here consumes a [`ResolvedClosure`](crate::resolver::ResolvedClosure)
//! and produces data for an external build executor; nothing here invokes a
//! compiler.

pub mod include_paths;
pub mod pch;
pub mod plan;

pub use include_paths::{aggregate, IncludeMap, IncludePathAggregator};
pub use pch::{PchMap, PchPlanner, PchPolicy};
pub use plan::{BuildPlan, PlannedModule};
