//! Include search path propagation.
//!
//! A module sees its own public include dirs plus the public include dirs of
//! every module it reaches through public edges only. Private edges stop
//! propagation: a private dependency's headers never leak to the dependents
//! of the module that declared it.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::path::PathBuf;

use crate::core::descriptor::dedup_in_order;
use crate::core::ModuleId;
use crate::resolver::ResolvedClosure;

/// Module id -> ordered, deduplicated include directories.
pub type IncludeMap = BTreeMap<ModuleId, Vec<PathBuf>>;

/// Derives include visibility from a resolved closure.
#[derive(Debug, Clone, Copy)]
pub struct IncludePathAggregator<'a> {
    closure: &'a ResolvedClosure,
}

impl<'a> IncludePathAggregator<'a> {
    pub fn new(closure: &'a ResolvedClosure) -> Self {
        IncludePathAggregator { closure }
    }

    /// Include dirs visible to every member of the closure.
    pub fn aggregate(&self) -> IncludeMap {
        self.closure
            .modules()
            .map(|m| (m.id, self.visible_dirs(m.id)))
            .collect()
    }

    /// Dirs `id` exposes to anything that depends on it: its own public
    /// dirs, then those of modules reached through public edges, nearest
    /// first, in declaration order.
    pub fn visible_dirs(&self, id: ModuleId) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut queue = VecDeque::from([id]);

        while let Some(current) = queue.pop_front() {
            let Some(module) = self.closure.module(current) else {
                continue;
            };
            dirs.extend(module.public_include_dirs.iter().cloned());
            for &dep in &module.public_dependencies {
                if seen.insert(dep) {
                    queue.push_back(dep);
                }
            }
        }

        dedup_in_order(&mut dirs);
        dirs
    }

    /// Dirs needed to compile `id`'s own sources: what it exposes, plus
    /// what each of its private dependencies exposes. Private dependencies
    /// are visible to the declaring module, never beyond it.
    pub fn compile_dirs(&self, id: ModuleId) -> Vec<PathBuf> {
        let mut dirs = self.visible_dirs(id);
        if let Some(module) = self.closure.module(id) {
            for &dep in &module.private_dependencies {
                dirs.extend(self.visible_dirs(dep));
            }
        }
        dedup_in_order(&mut dirs);
        dirs
    }

    /// [`compile_dirs`](Self::compile_dirs) for every member.
    pub fn aggregate_compile(&self) -> IncludeMap {
        self.closure
            .modules()
            .map(|m| (m.id, self.compile_dirs(m.id)))
            .collect()
    }
}

/// Include dirs visible to each member of `closure`.
pub fn aggregate(closure: &ResolvedClosure) -> IncludeMap {
    IncludePathAggregator::new(closure).aggregate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ModuleDescriptor;
    use crate::core::ModuleRegistry;
    use crate::resolver::{DependencyResolver, Visibility};
    use crate::test_support::{engine_registry, registry_with_includes};

    fn dirs(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_private_dependency_is_opaque_to_root() {
        // A -pub-> B -priv-> C
        let reg = registry_with_includes(&[("A", &["B"], &[]), ("B", &[], &["C"]), ("C", &[], &[])]);
        let closure = DependencyResolver::new(&reg).resolve("A".into()).unwrap();
        let map = aggregate(&closure);

        assert_eq!(map[&ModuleId::new("A")], dirs(&["A/Public", "B/Public"]));
        assert_eq!(map[&ModuleId::new("B")], dirs(&["B/Public"]));
        assert_eq!(map[&ModuleId::new("C")], dirs(&["C/Public"]));
    }

    #[test]
    fn test_public_reexport_is_visible() {
        // A -pub-> B -pub-> C: B re-exposes C.
        let reg = registry_with_includes(&[("A", &["B"], &[]), ("B", &["C"], &[]), ("C", &[], &[])]);
        let closure = DependencyResolver::new(&reg).resolve("A".into()).unwrap();

        assert_eq!(
            aggregate(&closure)[&ModuleId::new("A")],
            dirs(&["A/Public", "B/Public", "C/Public"])
        );
    }

    #[test]
    fn test_root_never_sees_private_only_members() {
        let reg = engine_registry();
        let closure = DependencyResolver::new(&reg).resolve("Game".into()).unwrap();
        let map = aggregate(&closure);
        let game = &map[&ModuleId::new("Game")];

        assert_eq!(
            game,
            &dirs(&["Game/Public", "Engine/Public", "Slate/Public", "Core/Public"])
        );
        for module in closure.modules() {
            if module.visibility == Visibility::PrivateOnly {
                for dir in &module.public_include_dirs {
                    assert!(!game.contains(dir), "{} leaked", dir.display());
                }
            }
        }

        // Online re-exposes Json to its own dependents.
        assert_eq!(map[&ModuleId::new("Online")], dirs(&["Online/Public", "Json/Public"]));
    }

    #[test]
    fn test_compile_dirs_include_own_private_dependencies() {
        let reg = engine_registry();
        let closure = DependencyResolver::new(&reg).resolve("Game".into()).unwrap();
        let agg = IncludePathAggregator::new(&closure);

        assert_eq!(
            agg.compile_dirs("Game".into()),
            dirs(&[
                "Game/Public",
                "Engine/Public",
                "Slate/Public",
                "Core/Public",
                "Online/Public",
                "Json/Public",
            ])
        );
        // Slate compiles against SlateCore, but does not export it.
        assert!(agg
            .compile_dirs("Slate".into())
            .contains(&PathBuf::from("SlateCore/Public")));
        assert!(!agg
            .visible_dirs("Slate".into())
            .contains(&PathBuf::from("SlateCore/Public")));
    }

    #[test]
    fn test_shared_dirs_are_deduplicated_in_first_seen_order() {
        let reg = ModuleRegistry::from_descriptors([
            ModuleDescriptor::builder("A")
                .public_dependencies(["B", "C"])
                .public_include_dir("Shared")
                .build()
                .unwrap(),
            ModuleDescriptor::builder("B")
                .public_include_dir("B")
                .public_include_dir("Shared")
                .build()
                .unwrap(),
            ModuleDescriptor::builder("C")
                .public_include_dir("Shared")
                .public_include_dir("C")
                .build()
                .unwrap(),
        ])
        .unwrap();
        let closure = DependencyResolver::new(&reg).resolve("A".into()).unwrap();

        assert_eq!(
            aggregate(&closure)[&ModuleId::new("A")],
            dirs(&["Shared", "B", "C"])
        );
    }
}
