//! Registry fixtures for unit tests.

use crate::core::{ModuleDescriptor, ModuleRegistry};

/// A descriptor with the given dependency tiers and nothing else.
pub fn descriptor(id: &str, public: &[&str], private: &[&str]) -> ModuleDescriptor {
    ModuleDescriptor::builder(id)
        .public_dependencies(public.iter().copied())
        .private_dependencies(private.iter().copied())
        .build()
        .unwrap()
}

/// A descriptor whose public include dir is its own name.
pub fn descriptor_with_include(id: &str, public: &[&str], private: &[&str]) -> ModuleDescriptor {
    ModuleDescriptor::builder(id)
        .public_dependencies(public.iter().copied())
        .private_dependencies(private.iter().copied())
        .public_include_dir(format!("{id}/Public"))
        .build()
        .unwrap()
}

/// Frozen registry from `(id, public deps, private deps)` rows.
pub fn registry(modules: &[(&str, &[&str], &[&str])]) -> ModuleRegistry {
    ModuleRegistry::from_descriptors(
        modules
            .iter()
            .map(|(id, public, private)| descriptor(id, public, private)),
    )
    .unwrap()
}

/// Like [`registry`], but every module exports `<id>/Public`.
pub fn registry_with_includes(modules: &[(&str, &[&str], &[&str])]) -> ModuleRegistry {
    ModuleRegistry::from_descriptors(
        modules
            .iter()
            .map(|(id, public, private)| descriptor_with_include(id, public, private)),
    )
    .unwrap()
}

/// A small engine-shaped registry used across builder tests:
///
/// ```text
/// Game -pub-> Engine -pub-> Core
///      -pub-> Slate  -priv-> SlateCore -pub-> Core
///      -priv-> Online -pub-> Json
/// ```
pub fn engine_registry() -> ModuleRegistry {
    registry_with_includes(&[
        ("Game", &["Engine", "Slate"], &["Online"]),
        ("Engine", &["Core"], &[]),
        ("Slate", &[], &["SlateCore"]),
        ("SlateCore", &["Core"], &[]),
        ("Online", &["Json"], &[]),
        ("Json", &[], &[]),
        ("Core", &[], &[]),
    ])
}
