//! ResolvedClosure - the modules a build target needs.
//!
//! A closure is computed fresh per target and never persisted. It carries a
//! snapshot of each member's effective declarations, so include-path
//! aggregation and PCH planning never consult the registry again.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::PathBuf;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use crate::core::{ModuleId, PchMode};
use crate::resolver::activation::{EffectiveModule, ResolveOptions};

/// How a member is reachable from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    /// Reachable through at least one chain of public edges (or the root).
    Public,
    /// Every chain from the root crosses a private edge.
    PrivateOnly,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::PrivateOnly => write!(f, "private-only"),
        }
    }
}

/// Tier of a single dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Public,
    Private,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyKind::Public => write!(f, "public"),
            DependencyKind::Private => write!(f, "private"),
        }
    }
}

/// One member of a closure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedModule {
    pub id: ModuleId,
    pub visibility: Visibility,
    pub public_dependencies: Vec<ModuleId>,
    pub private_dependencies: Vec<ModuleId>,
    pub public_include_dirs: Vec<PathBuf>,
    /// Declared mode after overlays, before any project policy
    pub pch_mode: PchMode,
}

impl ResolvedModule {
    pub(crate) fn new(module: EffectiveModule, visibility: Visibility) -> Self {
        ResolvedModule {
            id: module.id,
            visibility,
            public_dependencies: module.dependencies.public,
            private_dependencies: module.dependencies.private,
            public_include_dirs: module.public_include_dirs,
            pch_mode: module.pch_mode,
        }
    }

    /// Tier of the edge from this module to `dep`, if there is one.
    pub fn edge_to(&self, dep: ModuleId) -> Option<DependencyKind> {
        if self.public_dependencies.contains(&dep) {
            Some(DependencyKind::Public)
        } else if self.private_dependencies.contains(&dep) {
            Some(DependencyKind::Private)
        } else {
            None
        }
    }

    /// Outgoing edges, public first.
    pub fn edges(&self) -> impl Iterator<Item = (ModuleId, DependencyKind)> + '_ {
        self.public_dependencies
            .iter()
            .map(|&id| (id, DependencyKind::Public))
            .chain(
                self.private_dependencies
                    .iter()
                    .map(|&id| (id, DependencyKind::Private)),
            )
    }
}

/// The transitive set of modules required to build `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedClosure {
    root: ModuleId,
    options: ResolveOptions,
    modules: BTreeMap<ModuleId, ResolvedModule>,
}

impl ResolvedClosure {
    pub(crate) fn new(
        root: ModuleId,
        options: ResolveOptions,
        modules: BTreeMap<ModuleId, ResolvedModule>,
    ) -> Self {
        ResolvedClosure {
            root,
            options,
            modules,
        }
    }

    pub fn root(&self) -> ModuleId {
        self.root
    }

    /// Options the closure was resolved with.
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Member ids, sorted.
    pub fn members(&self) -> BTreeSet<ModuleId> {
        self.modules.keys().copied().collect()
    }

    pub fn contains(&self, id: ModuleId) -> bool {
        self.modules.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn visibility(&self, id: ModuleId) -> Option<Visibility> {
        self.modules.get(&id).map(|m| m.visibility)
    }

    pub fn module(&self, id: ModuleId) -> Option<&ResolvedModule> {
        self.modules.get(&id)
    }

    /// Members sorted by id.
    pub fn modules(&self) -> impl Iterator<Item = &ResolvedModule> {
        self.modules.values()
    }

    /// Members in build order: every module after all of its dependencies.
    pub fn build_order(&self) -> Vec<ModuleId> {
        let mut graph: DiGraph<ModuleId, ()> = DiGraph::new();
        let mut nodes: HashMap<ModuleId, NodeIndex> = HashMap::new();

        for &id in self.modules.keys() {
            nodes.insert(id, graph.add_node(id));
        }
        for module in self.modules.values() {
            for (dep, _) in module.edges() {
                if let Some(&to) = nodes.get(&dep) {
                    graph.add_edge(nodes[&module.id], to, ());
                }
            }
        }

        match toposort(&graph, None) {
            Ok(order) => order.into_iter().rev().map(|n| graph[n]).collect(),
            // Closures are only built from acyclic graphs.
            Err(_) => self.modules.keys().copied().collect(),
        }
    }

    /// Shortest chain of modules from the root to `target`.
    ///
    /// A chain made only of public edges is preferred when one exists.
    pub fn path_to(&self, target: ModuleId) -> Option<Vec<ModuleId>> {
        if !self.contains(target) {
            return None;
        }
        self.shortest_path(target, true)
            .or_else(|| self.shortest_path(target, false))
    }

    fn shortest_path(&self, target: ModuleId, public_only: bool) -> Option<Vec<ModuleId>> {
        let mut parent: HashMap<ModuleId, ModuleId> = HashMap::new();
        let mut seen: HashSet<ModuleId> = HashSet::from([self.root]);
        let mut queue = VecDeque::from([self.root]);

        while let Some(current) = queue.pop_front() {
            if current == target {
                let mut path = vec![current];
                let mut cursor = current;
                while let Some(&prev) = parent.get(&cursor) {
                    path.push(prev);
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }

            let Some(module) = self.modules.get(&current) else {
                continue;
            };
            for (dep, kind) in module.edges() {
                if public_only && kind == DependencyKind::Private {
                    continue;
                }
                if seen.insert(dep) {
                    parent.insert(dep, current);
                    queue.push_back(dep);
                }
            }
        }

        None
    }
}
