//! Graph configuration errors and their diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::ModuleId;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// An error in the declared module graph.
///
/// These are deterministic configuration errors: retrying the same
/// operation on the same descriptors always fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum GraphError {
    #[error("module `{module}` is registered more than once")]
    #[diagnostic(code(modgraph::registry::duplicate))]
    DuplicateModule { module: ModuleId },

    #[error("{}", unknown_message(.module, .referenced_by))]
    #[diagnostic(code(modgraph::resolve::unknown))]
    UnknownModule {
        module: ModuleId,
        referenced_by: Option<ModuleId>,
    },

    #[error("cyclic dependency: {}", format_cycle(.cycle))]
    #[diagnostic(
        code(modgraph::resolve::cycle),
        help("break the cycle by removing or restructuring a dependency")
    )]
    CyclicDependency { cycle: Vec<ModuleId> },

    #[error("invalid precompiled header configuration for `{module}`: {reason}")]
    #[diagnostic(code(modgraph::pch::invalid))]
    InvalidPchConfiguration { module: ModuleId, reason: String },

    #[error("module `{module}` declares `{dependency}` as both a public and a private dependency")]
    #[diagnostic(code(modgraph::descriptor::visibility))]
    ConflictingVisibility {
        module: ModuleId,
        dependency: ModuleId,
    },
}

fn unknown_message(module: &ModuleId, referenced_by: &Option<ModuleId>) -> String {
    match referenced_by {
        Some(from) => format!("module `{}` (required by `{}`) is not registered", module, from),
        None => format!("module `{}` is not registered", module),
    }
}

/// Render a cycle as `A -> B -> A`.
fn format_cycle(cycle: &[ModuleId]) -> String {
    let mut parts: Vec<&str> = cycle.iter().map(|id| id.as_str()).collect();
    if let Some(first) = cycle.first() {
        parts.push(first.as_str());
    }
    parts.join(" -> ")
}

impl GraphError {
    /// Module ids this error is about, in the order they should be reported.
    pub fn modules(&self) -> Vec<ModuleId> {
        match self {
            GraphError::DuplicateModule { module } => vec![*module],
            GraphError::UnknownModule {
                module,
                referenced_by,
            } => std::iter::once(*module).chain(*referenced_by).collect(),
            GraphError::CyclicDependency { cycle } => cycle.clone(),
            GraphError::InvalidPchConfiguration { module, .. } => vec![*module],
            GraphError::ConflictingVisibility { module, dependency } => {
                vec![*module, *dependency]
            }
        }
    }

    /// Convert to a user-facing diagnostic.
    ///
    /// The headline is the error's own message; the diagnostic adds the
    /// facts behind it and suggested fixes.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            GraphError::DuplicateModule { .. } => diag
                .with_suggestion("Rename one of the modules or remove the stale descriptor"),

            GraphError::UnknownModule {
                module,
                referenced_by,
            } => {
                let diag = match referenced_by {
                    Some(from) => diag.with_context(format!("`{}` depends on `{}`", from, module)),
                    None => diag,
                };
                diag.with_suggestion("Check that the module name is spelled correctly")
                    .with_suggestion(suggestions::MISSING_DESCRIPTOR)
            }

            GraphError::CyclicDependency { .. } => diag
                .with_suggestion("Break the cycle by removing or restructuring dependencies")
                .with_suggestion(
                    "Move the shared interface into a separate module both can depend on",
                ),

            GraphError::InvalidPchConfiguration { .. } => diag
                .with_suggestion("Declare a public include directory for the module")
                .with_suggestion("Use `pch = \"use-shared-or-explicit\"` instead"),

            GraphError::ConflictingVisibility { .. } => {
                diag.with_suggestion("Keep the dependency in exactly one list")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_closes_loop() {
        let err = GraphError::CyclicDependency {
            cycle: vec![ModuleId::new("A"), ModuleId::new("B")],
        };
        assert_eq!(err.to_string(), "cyclic dependency: A -> B -> A");
    }

    #[test]
    fn test_unknown_module_diagnostic_names_referrer() {
        let err = GraphError::UnknownModule {
            module: ModuleId::new("OnlineModule"),
            referenced_by: Some(ModuleId::new("Game")),
        };

        assert_eq!(
            err.modules(),
            vec![ModuleId::new("OnlineModule"), ModuleId::new("Game")]
        );

        let output = err.to_diagnostic().format(false);
        assert!(output.starts_with(
            "error: module `OnlineModule` (required by `Game`) is not registered"
        ));
        assert!(output.contains("`Game` depends on `OnlineModule`"));
        assert!(output.contains("help: consider:"));
    }

    #[test]
    fn test_pch_diagnostic_carries_reason() {
        let err = GraphError::InvalidPchConfiguration {
            module: ModuleId::new("Renderer"),
            reason: "force-include requires a public include directory".to_string(),
        };
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("Renderer"));
        assert!(output.contains("force-include requires"));
    }

    #[test]
    fn test_diagnostic_headline_matches_error_message() {
        let errors = [
            GraphError::DuplicateModule {
                module: ModuleId::new("Core"),
            },
            GraphError::CyclicDependency {
                cycle: vec![ModuleId::new("A"), ModuleId::new("B")],
            },
            GraphError::ConflictingVisibility {
                module: ModuleId::new("A"),
                dependency: ModuleId::new("B"),
            },
        ];
        for err in errors {
            assert_eq!(err.to_diagnostic().message, err.to_string());
        }
    }
}
