// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency graph storage.
//!
//! The graph records nodes, dependency edges, and for each node the ordered
//! list of nodes it directly depends on. Mutation takes `&mut self` and the
//! executor only ever borrows the graph immutably, so a graph cannot change
//! while a run is reading it.

use serde::Deserialize;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::errors::GraphError;
use crate::graph::cycle;
use crate::graph::{Edge, Node};
use crate::observability::messages::graph::{EdgeRejected, NodeAlreadyPresent};
use crate::observability::messages::StructuredLog;

/// How aggressively `add_edge` rejects cycles.
///
/// # Variants
/// * `Direct` - Only reject an edge whose exact reverse already exists (a
///   two-node cycle) or a self-dependency. Longer cycles are accepted here
///   and caught by the executor before a run starts.
/// * `Reachability` - Reject any edge that would close a cycle of any length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    #[default]
    Direct,
    Reachability,
}

/// A directed acyclic graph of named tasks.
///
/// # Examples
/// ```
/// use dagflow::graph::{Graph, Node};
/// use dagflow::errors::GraphError;
///
/// let mut graph = Graph::new();
/// graph.add_edge("2", "0").unwrap();
/// graph.add_edge("4", "2").unwrap();
///
/// assert!(graph.has_node(&Node::from("0")));
/// assert_eq!(graph.dependencies(&Node::from("4")), vec![Node::from("2")]);
///
/// // Duplicates and direct reverse edges are rejected
/// assert!(matches!(graph.add_edge("2", "0"), Err(GraphError::DuplicateEdge { .. })));
/// assert!(matches!(graph.add_edge("0", "2"), Err(GraphError::CycleDetected { .. })));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    policy: CyclePolicy,
    nodes: BTreeSet<Node>,
    edges: HashSet<Edge>,
    dependencies: HashMap<Node, Vec<Node>>,
    dependents: HashMap<Node, Vec<Node>>,
}

impl Graph {
    /// Create an empty graph using [`CyclePolicy::Direct`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with an explicit cycle policy.
    pub fn with_cycle_policy(policy: CyclePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Build a graph from `(current, previous)` pairs, stopping at the first rejected edge.
    pub fn from_edges<I, C, P>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (C, P)>,
        C: Into<Node>,
        P: Into<Node>,
    {
        let mut graph = Self::new();
        for (current, previous) in edges {
            graph.add_edge(current, previous)?;
        }
        Ok(graph)
    }

    pub fn cycle_policy(&self) -> CyclePolicy {
        self.policy
    }

    /// Ensure `node` exists. Adding a node that is already present is a no-op.
    pub fn add_node(&mut self, node: impl Into<Node>) {
        let node = node.into();
        if self.nodes.contains(&node) {
            NodeAlreadyPresent { node: node.as_str() }.log();
            return;
        }
        self.nodes.insert(node);
    }

    /// Record that `current` depends on `previous`.
    ///
    /// Both endpoints are added to the node set and `previous` is appended to
    /// `current`'s dependency list. On error the graph is left unchanged.
    ///
    /// # Errors
    /// - [`GraphError::DuplicateEdge`] if the identical edge already exists.
    /// - [`GraphError::CycleDetected`] if the edge would close a cycle that the
    ///   graph's [`CyclePolicy`] rejects.
    pub fn add_edge(
        &mut self,
        current: impl Into<Node>,
        previous: impl Into<Node>,
    ) -> Result<(), GraphError> {
        let edge = Edge::new(current, previous);

        if let Err(err) = self.check_edge(&edge) {
            EdgeRejected {
                current: edge.current.as_str(),
                previous: edge.previous.as_str(),
                error: &err,
            }
            .log();
            return Err(err);
        }

        self.add_node(edge.current.clone());
        self.add_node(edge.previous.clone());
        self.dependencies
            .entry(edge.current.clone())
            .or_default()
            .push(edge.previous.clone());
        self.dependents
            .entry(edge.previous.clone())
            .or_default()
            .push(edge.current.clone());
        self.edges.insert(edge);

        Ok(())
    }

    fn check_edge(&self, edge: &Edge) -> Result<(), GraphError> {
        if self.edges.contains(edge) {
            return Err(GraphError::DuplicateEdge {
                current: edge.current.clone(),
                previous: edge.previous.clone(),
            });
        }

        if let Some(cycle) = self.cycle_closed_by(edge) {
            return Err(GraphError::CycleDetected {
                current: edge.current.clone(),
                previous: edge.previous.clone(),
                cycle,
            });
        }

        Ok(())
    }

    /// The cycle path `edge` would close under the current policy, if any.
    fn cycle_closed_by(&self, edge: &Edge) -> Option<Vec<Node>> {
        if edge.current == edge.previous {
            return Some(vec![edge.current.clone(), edge.current.clone()]);
        }

        match self.policy {
            CyclePolicy::Direct => self.edges.contains(&edge.reversed()).then(|| {
                vec![
                    edge.current.clone(),
                    edge.previous.clone(),
                    edge.current.clone(),
                ]
            }),
            CyclePolicy::Reachability => {
                cycle::path_between(&self.dependencies, &edge.previous, &edge.current).map(
                    |path| {
                        let mut cycle = Vec::with_capacity(path.len() + 1);
                        cycle.push(edge.current.clone());
                        cycle.extend(path);
                        cycle
                    },
                )
            }
        }
    }

    pub fn has_node(&self, node: &Node) -> bool {
        self.nodes.contains(node)
    }

    pub fn has_edge(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    /// Direct predecessors of `node` in edge-insertion order.
    ///
    /// Unknown nodes yield an empty list.
    pub fn dependencies(&self, node: &Node) -> Vec<Node> {
        self.dependencies.get(node).cloned().unwrap_or_default()
    }

    /// Direct successors of `node` (nodes that list it as a dependency), in
    /// edge-insertion order.
    pub fn dependents(&self, node: &Node) -> Vec<Node> {
        self.dependents.get(node).cloned().unwrap_or_default()
    }

    /// All nodes, sorted.
    pub fn nodes(&self) -> Vec<Node> {
        self.nodes.iter().cloned().collect()
    }

    /// All edges, sorted by `(current, previous)`.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self.edges.iter().cloned().collect();
        edges.sort_by(|a, b| {
            (a.current.as_str(), a.previous.as_str()).cmp(&(b.current.as_str(), b.previous.as_str()))
        });
        edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Search the whole graph for a dependency cycle of any length.
    ///
    /// Returns the cycle as a path that starts and ends on the same node.
    pub fn find_cycle(&self) -> Option<Vec<Node>> {
        cycle::find_cycle(&self.nodes, &self.dependencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> Node {
        Node::from(id)
    }

    #[test]
    fn test_add_edge_inserts_both_endpoints() {
        let mut graph = Graph::new();
        graph.add_edge("2", "0").unwrap();

        assert!(graph.has_node(&node("2")));
        assert!(graph.has_node(&node("0")));
        assert!(graph.has_edge(&Edge::new("2", "0")));
        assert!(!graph.has_edge(&Edge::new("0", "2")));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_dependencies_keep_insertion_order() {
        let mut graph = Graph::new();
        graph.add_edge("d", "c").unwrap();
        graph.add_edge("d", "a").unwrap();
        graph.add_edge("d", "b").unwrap();

        assert_eq!(graph.dependencies(&node("d")), vec![node("c"), node("a"), node("b")]);
        assert!(graph.dependencies(&node("a")).is_empty());
        assert!(graph.dependencies(&node("missing")).is_empty());
    }

    #[test]
    fn test_duplicate_edge_rejected_and_graph_unchanged() {
        let mut graph = Graph::new();
        graph.add_edge("2", "0").unwrap();

        let err = graph.add_edge("2", "0").unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateEdge {
                current: node("2"),
                previous: node("0"),
            }
        );
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.dependencies(&node("2")), vec![node("0")]);
    }

    #[test]
    fn test_reverse_edge_rejected_and_graph_unchanged() {
        let mut graph = Graph::new();
        graph.add_edge("a", "b").unwrap();

        let err = graph.add_edge("b", "a").unwrap_err();
        assert!(matches!(err, GraphError::CycleDetected { .. }));
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.dependencies(&node("b")).is_empty());
    }

    #[test]
    fn test_self_dependency_rejected() {
        let mut graph = Graph::new();
        let err = graph.add_edge("a", "a").unwrap_err();
        assert!(matches!(err, GraphError::CycleDetected { .. }));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_direct_policy_accepts_longer_cycle() {
        let mut graph = Graph::new();
        graph.add_edge("a", "b").unwrap();
        graph.add_edge("b", "c").unwrap();
        graph.add_edge("c", "a").unwrap();

        let cycle = graph.find_cycle().expect("three-node cycle should be found");
        assert_eq!(cycle.first(), cycle.last());
        assert_eq!(cycle.len(), 4);
    }

    #[test]
    fn test_reachability_policy_rejects_longer_cycle() {
        let mut graph = Graph::with_cycle_policy(CyclePolicy::Reachability);
        graph.add_edge("a", "b").unwrap();
        graph.add_edge("b", "c").unwrap();

        let err = graph.add_edge("c", "a").unwrap_err();
        match err {
            GraphError::CycleDetected { cycle, .. } => {
                assert_eq!(cycle, vec![node("c"), node("a"), node("b"), node("c")]);
            }
            other => panic!("expected CycleDetected, got {other:?}"),
        }
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.find_cycle().is_none());
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut graph = Graph::new();
        graph.add_node("solo");
        graph.add_node("solo");

        assert_eq!(graph.node_count(), 1);
        assert!(graph.dependencies(&node("solo")).is_empty());
    }

    #[test]
    fn test_dependents_and_snapshots() {
        let graph = Graph::from_edges([("4", "2"), ("5", "2"), ("2", "0")]).unwrap();

        assert_eq!(graph.dependents(&node("2")), vec![node("4"), node("5")]);
        assert_eq!(graph.nodes(), vec![node("0"), node("2"), node("4"), node("5")]);
        assert_eq!(
            graph.edges(),
            vec![Edge::new("2", "0"), Edge::new("4", "2"), Edge::new("5", "2")]
        );
    }

    #[test]
    fn test_dependents_follow_insertion_order() {
        let mut graph = Graph::new();
        graph.add_edge("z", "root").unwrap();
        graph.add_edge("a", "root").unwrap();
        assert!(graph.add_edge("a", "root").is_err());

        assert_eq!(graph.dependents(&node("root")), vec![node("z"), node("a")]);
        assert!(graph.dependents(&node("a")).is_empty());
        assert!(graph.dependents(&node("missing")).is_empty());
    }

    #[test]
    fn test_find_cycle_on_deep_chain() {
        let mut graph = Graph::new();
        for i in 1..200_000 {
            graph.add_edge(format!("n{i}"), format!("n{}", i - 1)).unwrap();
        }

        assert_eq!(graph.node_count(), 200_000);
        assert!(graph.find_cycle().is_none());
    }

    #[test]
    fn test_from_edges_stops_at_first_error() {
        let result = Graph::from_edges([("a", "b"), ("a", "b")]);
        assert!(matches!(result, Err(GraphError::DuplicateEdge { .. })));
    }
}
