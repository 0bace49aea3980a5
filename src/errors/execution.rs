// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors produced while executing a graph.
//!
//! Every node ends a run with either success or one of these errors. Errors
//! are cheap to clone (`Arc` inside) because a node's terminal error is read
//! by every dependent that waits on it.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::errors::graph::join_path;
use crate::graph::Node;

/// A failed direct dependency, as seen by the node that was skipped because of it.
#[derive(Debug, Clone)]
pub struct DependencyFailure {
    pub dependency: Node,
    pub error: Arc<ExecutionError>,
}

impl fmt::Display for DependencyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.dependency)
    }
}

#[derive(Error, Debug, Clone)]
pub enum ExecutionError {
    /// The node did not run because at least one direct dependency ended in error.
    #[error(
        "node '{node}' skipped: failed dependencies [{}]; root cause: {}",
        join_failures(.failures),
        describe_root_causes(.failures)
    )]
    AncestorFailed {
        node: Node,
        failures: Vec<DependencyFailure>,
    },

    /// The work callback returned an error.
    #[error("node '{node}' work failed: {error:#}")]
    WorkFailed {
        node: Node,
        error: Arc<anyhow::Error>,
    },

    /// The node or run deadline elapsed before the node finished.
    #[error("node '{node}' exceeded its deadline after {elapsed:?}")]
    DeadlineExceeded { node: Node, elapsed: Duration },

    /// The run was cancelled before the node finished.
    #[error("node '{node}' cancelled before completion")]
    Cancelled { node: Node },

    /// The work callback panicked.
    #[error("node '{node}' work panicked: {message}")]
    TaskPanicked { node: Node, message: String },

    /// Pre-flight check found a dependency cycle; nothing was run.
    #[error("dependency graph contains a cycle: {}", join_path(.cycle))]
    CycleDetected { cycle: Vec<Node> },

    #[error("internal execution error: {message}")]
    Internal { message: String },
}

impl ExecutionError {
    /// The node this error belongs to, if it is node-scoped.
    pub fn node(&self) -> Option<&Node> {
        match self {
            ExecutionError::AncestorFailed { node, .. }
            | ExecutionError::WorkFailed { node, .. }
            | ExecutionError::DeadlineExceeded { node, .. }
            | ExecutionError::Cancelled { node }
            | ExecutionError::TaskPanicked { node, .. } => Some(node),
            ExecutionError::CycleDetected { .. } | ExecutionError::Internal { .. } => None,
        }
    }

    /// True when the node was skipped because of a failed ancestor.
    pub fn is_skip(&self) -> bool {
        matches!(self, ExecutionError::AncestorFailed { .. })
    }

    /// The originating errors behind a chain of skips.
    ///
    /// For a non-skip error this is the error itself. Each originating node
    /// appears once even when it is reachable along several paths.
    pub fn root_causes(&self) -> Vec<&ExecutionError> {
        match self {
            ExecutionError::AncestorFailed { failures, .. } => collect_root_causes(failures),
            other => vec![other],
        }
    }
}

fn collect_root_causes(failures: &[DependencyFailure]) -> Vec<&ExecutionError> {
    let mut causes = Vec::new();
    let mut seen: HashSet<&Node> = HashSet::new();
    let mut pending: Vec<&ExecutionError> = Vec::new();

    for failure in failures.iter().rev() {
        if seen.insert(&failure.dependency) {
            pending.push(failure.error.as_ref());
        }
    }

    while let Some(error) = pending.pop() {
        match error {
            ExecutionError::AncestorFailed { failures, .. } => {
                for failure in failures.iter().rev() {
                    if seen.insert(&failure.dependency) {
                        pending.push(failure.error.as_ref());
                    }
                }
            }
            other => causes.push(other),
        }
    }

    causes
}

fn join_failures(failures: &[DependencyFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_root_causes(failures: &[DependencyFailure]) -> String {
    collect_root_causes(failures)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work_failed(node: &str, message: &str) -> ExecutionError {
        ExecutionError::WorkFailed {
            node: Node::from(node),
            error: Arc::new(anyhow::anyhow!(message.to_string())),
        }
    }

    fn skipped(node: &str, failures: Vec<(&str, ExecutionError)>) -> ExecutionError {
        ExecutionError::AncestorFailed {
            node: Node::from(node),
            failures: failures
                .into_iter()
                .map(|(dependency, error)| DependencyFailure {
                    dependency: Node::from(dependency),
                    error: Arc::new(error),
                })
                .collect(),
        }
    }

    #[test]
    fn test_root_causes_walk_skip_chain() {
        let root = work_failed("3", "boom");
        let middle = skipped("8", vec![("3", root)]);
        let leaf = skipped("88", vec![("8", middle)]);

        let causes = leaf.root_causes();
        assert_eq!(causes.len(), 1);
        assert_eq!(causes[0].node(), Some(&Node::from("3")));
        assert!(leaf.is_skip());
        assert!(!causes[0].is_skip());
    }

    #[test]
    fn test_root_causes_deduplicate_diamond() {
        // d depends on b and c, both skipped because of a
        let root = work_failed("a", "boom");
        let b = skipped("b", vec![("a", root.clone())]);
        let c = skipped("c", vec![("a", root)]);
        let d = skipped("d", vec![("b", b), ("c", c)]);

        assert_eq!(d.root_causes().len(), 1);
    }

    #[test]
    fn test_display_messages() {
        let root = work_failed("3", "boom");
        assert_eq!(root.to_string(), "node '3' work failed: boom");

        let leaf = skipped("8", vec![("3", root)]);
        assert_eq!(
            leaf.to_string(),
            "node '8' skipped: failed dependencies ['3']; root cause: node '3' work failed: boom"
        );
    }
}
