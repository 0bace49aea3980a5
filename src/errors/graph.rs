// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while building a dependency graph.
//!
//! Both variants are recoverable: the rejected edge is not inserted and the
//! caller may keep adding edges.

use thiserror::Error;

use crate::graph::Node;

/// Edge-insertion failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The identical edge is already present.
    #[error("edge [{current} -> {previous}] already exists")]
    DuplicateEdge { current: Node, previous: Node },

    /// Inserting the edge would close a dependency cycle.
    #[error("edge [{current} -> {previous}] would create a cycle: {}", join_path(.cycle))]
    CycleDetected {
        current: Node,
        previous: Node,
        /// Closed path through the would-be cycle, starting at `current`.
        cycle: Vec<Node>,
    },
}

pub(crate) fn join_path(path: &[Node]) -> String {
    path.iter()
        .map(Node::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_cycle_path() {
        let err = GraphError::CycleDetected {
            current: Node::from("b"),
            previous: Node::from("a"),
            cycle: vec![Node::from("b"), Node::from("a"), Node::from("b")],
        };
        assert_eq!(
            err.to_string(),
            "edge [b -> a] would create a cycle: b -> a -> b"
        );
    }
}
