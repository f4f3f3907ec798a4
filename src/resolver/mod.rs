//! Dependency resolution.
//!
//! Resolution is pure and synchronous: all descriptor I/O happens before the
//! registry is frozen, and each call produces its own closure.

pub mod activation;
pub mod closure;
pub mod errors;
pub mod resolve;

pub use activation::{activate, effective_module, EffectiveDependencies, ResolveOptions};
pub use closure::{DependencyKind, ResolvedClosure, ResolvedModule, Visibility};
pub use errors::GraphError;
pub use resolve::DependencyResolver;
