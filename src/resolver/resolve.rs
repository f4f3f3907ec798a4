//! Transitive closure over public and private dependency edges.
//!
//! Resolution is two walks over the frozen registry:
//! 1. A depth-first walk over all effective edges collects the members,
//!    reports unknown modules with their referrer, and detects cycles with
//!    an in-progress mark per module.
//! 2. A breadth-first walk over public edges only marks the members that
//!    are reachable through an all-public chain.
//!
//! Membership and classification are both pure functions of the graph, so
//! the result does not depend on declaration or registration order.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::core::{ModuleId, ModuleRegistry};
use crate::resolver::activation::{effective_module, EffectiveModule, ResolveOptions};
use crate::resolver::closure::{ResolvedClosure, ResolvedModule, Visibility};
use crate::resolver::errors::GraphError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Computes closures against a frozen registry.
///
/// Holds only a shared reference, so any number of resolvers may run on
/// separate threads against the same registry.
#[derive(Debug, Clone, Copy)]
pub struct DependencyResolver<'a> {
    registry: &'a ModuleRegistry,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(registry: &'a ModuleRegistry) -> Self {
        DependencyResolver { registry }
    }

    /// Resolve `root` with no configuration overlay and no feature flags.
    pub fn resolve(&self, root: ModuleId) -> Result<ResolvedClosure, GraphError> {
        self.resolve_with(root, &ResolveOptions::default())
    }

    /// Resolve `root` under the given configuration and feature flags.
    pub fn resolve_with(
        &self,
        root: ModuleId,
        options: &ResolveOptions,
    ) -> Result<ResolvedClosure, GraphError> {
        let root_descriptor = self.registry.lookup(root)?;
        tracing::debug!("resolving {} ({:?})", root, options);

        let mut walk = Walk {
            registry: self.registry,
            options,
            marks: HashMap::new(),
            frames: Vec::new(),
            modules: HashMap::new(),
        };
        walk.run(root, effective_module(root_descriptor, options))?;

        let public = public_reachable(root, &walk.modules);

        let modules: BTreeMap<ModuleId, ResolvedModule> = walk
            .modules
            .into_iter()
            .map(|(id, module)| {
                let visibility = if public.contains(&id) {
                    Visibility::Public
                } else {
                    Visibility::PrivateOnly
                };
                (id, ResolvedModule::new(module, visibility))
            })
            .collect();

        tracing::debug!(
            "{} resolves to {} modules ({} public)",
            root,
            modules.len(),
            public.len()
        );

        Ok(ResolvedClosure::new(root, options.clone(), modules))
    }
}

struct Walk<'r, 'o> {
    registry: &'r ModuleRegistry,
    options: &'o ResolveOptions,
    marks: HashMap<ModuleId, Mark>,
    /// Modules in progress, outermost first
    frames: Vec<Frame>,
    modules: HashMap<ModuleId, EffectiveModule>,
}

struct Frame {
    id: ModuleId,
    module: EffectiveModule,
    deps: std::vec::IntoIter<ModuleId>,
}

impl Walk<'_, '_> {
    /// Depth-first walk from `root` on an explicit stack, so chain length
    /// is bounded by memory rather than thread stack size.
    fn run(&mut self, root: ModuleId, module: EffectiveModule) -> Result<(), GraphError> {
        self.enter(root, module);

        while let Some(frame) = self.frames.last_mut() {
            let id = frame.id;
            let Some(dep) = frame.deps.next() else {
                if let Some(frame) = self.frames.pop() {
                    self.marks.insert(frame.id, Mark::Done);
                    self.modules.insert(frame.id, frame.module);
                }
                continue;
            };

            match self.marks.get(&dep) {
                Some(Mark::Done) => continue,
                Some(Mark::InProgress) => {
                    let start = self.frames.iter().position(|f| f.id == dep).unwrap_or(0);
                    return Err(GraphError::CyclicDependency {
                        cycle: self.frames[start..].iter().map(|f| f.id).collect(),
                    });
                }
                None => {}
            }

            let descriptor = self.registry.get(dep).ok_or(GraphError::UnknownModule {
                module: dep,
                referenced_by: Some(id),
            })?;
            let effective = effective_module(descriptor, self.options);
            self.enter(dep, effective);
        }

        Ok(())
    }

    fn enter(&mut self, id: ModuleId, module: EffectiveModule) {
        self.marks.insert(id, Mark::InProgress);
        let deps: Vec<ModuleId> = module.dependencies.iter().collect();
        self.frames.push(Frame {
            id,
            module,
            deps: deps.into_iter(),
        });
    }
}

/// Members reachable from `root` through public edges only.
fn public_reachable(
    root: ModuleId,
    modules: &HashMap<ModuleId, EffectiveModule>,
) -> HashSet<ModuleId> {
    let mut reached = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);

    while let Some(current) = queue.pop_front() {
        let Some(module) = modules.get(&current) else {
            continue;
        };
        for &dep in &module.dependencies.public {
            if reached.insert(dep) {
                queue.push_back(dep);
            }
        }
    }

    reached
}
