//! modgraph - module dependency manifests and build-graph resolution
//!
//! This crate provides the library behind the `modgraph` CLI: module
//! descriptors, a frozen module registry, visibility-tiered transitive
//! closure, include-path propagation and precompiled-header planning.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Registry fixtures for unit tests.
#[cfg(test)]
pub mod test_support;

pub use core::{ModuleDescriptor, ModuleId, ModuleRegistry, PchMode};
pub use resolver::{DependencyResolver, GraphError, ResolvedClosure, Visibility};
