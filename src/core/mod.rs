//! Core data structures.
//!
//! - Interned module identifiers
//! - Module descriptors and their on-disk form
//! - The module registry
//! - Workspace discovery

pub mod descriptor;
pub mod manifest;
pub mod module_id;
pub mod registry;
pub mod workspace;

pub use descriptor::{DescriptorOverlay, ModuleDescriptor, ModuleDescriptorBuilder, PchMode};
pub use manifest::{Manifest, MANIFEST_NAME};
pub use module_id::ModuleId;
pub use registry::{ModuleRegistry, RegistryLoader};
pub use workspace::Workspace;
