//! Module registry - the table of every known descriptor.
//!
//! The registry has two phases. During loading a [`RegistryLoader`] accepts
//! descriptors one at a time. [`RegistryLoader::freeze`] validates the
//! whole graph and returns a [`ModuleRegistry`], which has no mutating
//! methods and can be shared across threads for concurrent resolution.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::core::{ModuleDescriptor, ModuleId};
use crate::resolver::errors::GraphError;

/// Load-phase registry.
#[derive(Debug, Default)]
pub struct RegistryLoader {
    modules: BTreeMap<ModuleId, ModuleDescriptor>,
    origins: BTreeMap<ModuleId, PathBuf>,
}

impl RegistryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor.
    ///
    /// Fails with [`GraphError::DuplicateModule`] if the id is taken; the
    /// first registration is kept.
    pub fn register(&mut self, descriptor: ModuleDescriptor) -> Result<(), GraphError> {
        let id = descriptor.id();
        if self.modules.contains_key(&id) {
            return Err(GraphError::DuplicateModule { module: id });
        }
        tracing::debug!("registered module {}", id);
        self.modules.insert(id, descriptor);
        Ok(())
    }

    /// Register a descriptor and remember the file it was loaded from.
    pub fn register_from(
        &mut self,
        descriptor: ModuleDescriptor,
        origin: impl Into<PathBuf>,
    ) -> Result<(), GraphError> {
        let id = descriptor.id();
        self.register(descriptor)?;
        self.origins.insert(id, origin.into());
        Ok(())
    }

    /// File a registered module was loaded from, if known.
    pub fn origin(&self, id: ModuleId) -> Option<&Path> {
        self.origins.get(&id).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// End the load phase.
    ///
    /// Rejects any cycle among the base public/private edges. Edges to ids
    /// that are not registered are skipped here; resolution reports them
    /// with the module that references them.
    pub fn freeze(self) -> Result<ModuleRegistry, GraphError> {
        let mut graph: DiGraph<ModuleId, ()> = DiGraph::with_capacity(self.modules.len(), 0);
        let mut nodes: HashMap<ModuleId, NodeIndex> = HashMap::with_capacity(self.modules.len());

        for &id in self.modules.keys() {
            nodes.insert(id, graph.add_node(id));
        }

        for (id, descriptor) in &self.modules {
            for dep in descriptor.dependencies() {
                if let Some(&to) = nodes.get(&dep) {
                    graph.add_edge(nodes[id], to, ());
                }
            }
        }

        if let Err(cycle) = toposort(&graph, None) {
            let members = self
                .find_cycle()
                .unwrap_or_else(|| vec![graph[cycle.node_id()]]);
            return Err(GraphError::CyclicDependency { cycle: members });
        }

        tracing::debug!("registry frozen with {} modules", self.modules.len());

        Ok(ModuleRegistry {
            modules: self.modules,
            origins: self.origins,
        })
    }

    /// First cycle met by a depth-first walk started from each module in
    /// id order, as the modules on the loop in traversal order.
    fn find_cycle(&self) -> Option<Vec<ModuleId>> {
        let mut done: HashSet<ModuleId> = HashSet::new();

        for &start in self.modules.keys() {
            if done.contains(&start) {
                continue;
            }

            // Explicit stack of (module, remaining deps); long chains must
            // not exhaust the thread stack.
            let mut stack: Vec<(ModuleId, std::vec::IntoIter<ModuleId>)> =
                vec![(start, self.base_edges(start))];
            let mut on_stack: HashSet<ModuleId> = HashSet::from([start]);

            while let Some((_, deps)) = stack.last_mut() {
                let Some(dep) = deps.next() else {
                    if let Some((id, _)) = stack.pop() {
                        on_stack.remove(&id);
                        done.insert(id);
                    }
                    continue;
                };

                if on_stack.contains(&dep) {
                    let pos = stack.iter().position(|(id, _)| *id == dep).unwrap_or(0);
                    return Some(stack[pos..].iter().map(|(id, _)| *id).collect());
                }
                if done.contains(&dep) || !self.modules.contains_key(&dep) {
                    continue;
                }
                on_stack.insert(dep);
                stack.push((dep, self.base_edges(dep)));
            }
        }

        None
    }

    fn base_edges(&self, id: ModuleId) -> std::vec::IntoIter<ModuleId> {
        self.modules
            .get(&id)
            .map(|d| d.dependencies().collect::<Vec<_>>())
            .unwrap_or_default()
            .into_iter()
    }
}

/// Frozen, read-only registry of module descriptors.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<ModuleId, ModuleDescriptor>,
    origins: BTreeMap<ModuleId, PathBuf>,
}

impl ModuleRegistry {
    /// Start a load phase.
    pub fn loader() -> RegistryLoader {
        RegistryLoader::new()
    }

    /// Register every descriptor and freeze.
    pub fn from_descriptors<I>(descriptors: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = ModuleDescriptor>,
    {
        let mut loader = RegistryLoader::new();
        for descriptor in descriptors {
            loader.register(descriptor)?;
        }
        loader.freeze()
    }

    /// Look up a descriptor, failing with [`GraphError::UnknownModule`].
    pub fn lookup(&self, id: ModuleId) -> Result<&ModuleDescriptor, GraphError> {
        self.modules.get(&id).ok_or(GraphError::UnknownModule {
            module: id,
            referenced_by: None,
        })
    }

    pub fn get(&self, id: ModuleId) -> Option<&ModuleDescriptor> {
        self.modules.get(&id)
    }

    pub fn contains(&self, id: ModuleId) -> bool {
        self.modules.contains_key(&id)
    }

    pub fn origin(&self, id: ModuleId) -> Option<&Path> {
        self.origins.get(&id).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Descriptors sorted by module id.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.modules.keys().copied()
    }
}
