// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::engine::run_state::NodeStatus;
use crate::errors::ExecutionError;
use crate::graph::Node;

/// Outcome of one run: every node's terminal status plus run-level facts.
///
/// `first_error` is the first node error observed in completion order; it may
/// be a skip rather than the root failure when both finish close together.
/// The per-node statuses keep that distinction.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    statuses: BTreeMap<Node, NodeStatus>,
    completion_order: Vec<Node>,
    #[serde(skip)]
    first_error: Option<ExecutionError>,
    duration: Duration,
}

impl ExecutionReport {
    pub(crate) fn new(duration: Duration) -> Self {
        Self {
            statuses: BTreeMap::new(),
            completion_order: Vec::new(),
            first_error: None,
            duration,
        }
    }

    pub(crate) fn record(&mut self, node: Node, status: NodeStatus) {
        if self.first_error.is_none() {
            self.first_error = status.error().cloned();
        }
        self.completion_order.push(node.clone());
        self.statuses.insert(node, status);
    }

    pub(crate) fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn status(&self, node: &Node) -> Option<&NodeStatus> {
        self.statuses.get(node)
    }

    pub fn statuses(&self) -> &BTreeMap<Node, NodeStatus> {
        &self.statuses
    }

    /// Nodes in the order their tasks finished.
    pub fn completion_order(&self) -> &[Node] {
        &self.completion_order
    }

    pub fn succeeded(&self) -> Vec<&Node> {
        self.nodes_where(|status| matches!(status, NodeStatus::Succeeded))
    }

    pub fn failed(&self) -> Vec<&Node> {
        self.nodes_where(|status| matches!(status, NodeStatus::Failed(_)))
    }

    pub fn skipped(&self) -> Vec<&Node> {
        self.nodes_where(|status| matches!(status, NodeStatus::Skipped(_)))
    }

    fn nodes_where(&self, predicate: impl Fn(&NodeStatus) -> bool) -> Vec<&Node> {
        self.statuses
            .iter()
            .filter(|(_, status)| predicate(status))
            .map(|(node, _)| node)
            .collect()
    }

    pub fn first_error(&self) -> Option<&ExecutionError> {
        self.first_error.as_ref()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.first_error.is_none()
    }

    /// Collapse to the first error, if any node failed or was skipped.
    pub fn into_result(self) -> Result<(), ExecutionError> {
        match self.first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_in_completion_order() {
        let mut report = ExecutionReport::new(Duration::ZERO);
        report.record(Node::from("a"), NodeStatus::Succeeded);
        report.record(
            Node::from("b"),
            NodeStatus::Failed(ExecutionError::Cancelled { node: Node::from("b") }),
        );
        report.record(
            Node::from("c"),
            NodeStatus::Failed(ExecutionError::Cancelled { node: Node::from("c") }),
        );

        assert_eq!(report.len(), 3);
        assert_eq!(report.succeeded(), vec![&Node::from("a")]);
        assert_eq!(report.failed().len(), 2);
        assert_eq!(report.first_error().and_then(|e| e.node()), Some(&Node::from("b")));
        assert!(!report.is_success());
        assert!(report.into_result().is_err());
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = ExecutionReport::new(Duration::ZERO);
        assert!(report.is_empty());
        assert!(report.is_success());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_report_serializes_statuses() {
        let mut report = ExecutionReport::new(Duration::from_millis(5));
        report.record(Node::from("a"), NodeStatus::Succeeded);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["statuses"]["a"]["state"], "succeeded");
        assert_eq!(json["completion_order"][0], "a");
    }
}
