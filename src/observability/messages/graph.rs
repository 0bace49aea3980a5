// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph construction events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An edge was rejected by the graph.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use dagflow::errors::GraphError;
/// use dagflow::graph::Node;
/// use dagflow::observability::messages::graph::EdgeRejected;
///
/// let error = GraphError::DuplicateEdge {
///     current: Node::from("2"),
///     previous: Node::from("0"),
/// };
/// let msg = EdgeRejected { current: "2", previous: "0", error: &error };
///
/// assert_eq!(msg.to_string(), "Rejected edge [2 -> 0]: edge [2 -> 0] already exists");
/// ```
pub struct EdgeRejected<'a> {
    pub current: &'a str,
    pub previous: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for EdgeRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rejected edge [{} -> {}]: {}",
            self.current, self.previous, self.error
        )
    }
}

impl StructuredLog for EdgeRejected<'_> {
    fn log(&self) {
        tracing::error!(
            current = self.current,
            previous = self.previous,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "edge_rejected",
            span_name = name,
            current = self.current,
            previous = self.previous,
        )
    }
}

/// A node was added that already exists; the call is a no-op.
///
/// # Log Level
/// `debug!` - Expected when several edges share an endpoint
pub struct NodeAlreadyPresent<'a> {
    pub node: &'a str,
}

impl Display for NodeAlreadyPresent<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Node '{}' already present, skipped", self.node)
    }
}

impl StructuredLog for NodeAlreadyPresent<'_> {
    fn log(&self) {
        tracing::debug!(node = self.node, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("node_already_present", span_name = name, node = self.node)
    }
}
