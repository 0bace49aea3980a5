// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-run bookkeeping: one completion signal and terminal status per node.
//!
//! Each entry is a `watch` channel holding `None` until the node's own task
//! records its status. Recording happens at most once; any number of
//! dependents can wait on the same entry and all observe the same status.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use tokio::sync::watch;

use crate::errors::ExecutionError;
use crate::graph::Node;

/// Terminal state of one node in one run.
#[derive(Debug, Clone)]
pub enum NodeStatus {
    Succeeded,
    /// The node's work (or its admission) ended in error.
    Failed(ExecutionError),
    /// The node never ran because a dependency ended in error.
    Skipped(ExecutionError),
}

impl NodeStatus {
    pub fn error(&self) -> Option<&ExecutionError> {
        match self {
            NodeStatus::Succeeded => None,
            NodeStatus::Failed(error) | NodeStatus::Skipped(error) => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, NodeStatus::Succeeded)
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeStatus::Succeeded => "succeeded",
            NodeStatus::Failed(_) => "failed",
            NodeStatus::Skipped(_) => "skipped",
        }
    }
}

impl Serialize for NodeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("NodeStatus", 2)?;
        state.serialize_field("state", self.label())?;
        state.serialize_field("error", &self.error().map(ToString::to_string))?;
        state.end()
    }
}

/// Single-fire, multi-waiter completion signal for one node.
pub(crate) struct CompletionSignal {
    sender: watch::Sender<Option<NodeStatus>>,
}

impl CompletionSignal {
    fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    /// Record `status` and wake all waiters. Returns false if already fired.
    fn fire(&self, status: NodeStatus) -> bool {
        self.sender.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(status);
            true
        })
    }

    async fn wait(&self) -> Option<NodeStatus> {
        let mut receiver = self.sender.subscribe();
        let status = receiver.wait_for(Option::is_some).await.ok()?;
        status.clone()
    }
}

/// Completion signals for every node of one run.
pub(crate) struct RunStateTable {
    entries: HashMap<Node, CompletionSignal>,
}

impl RunStateTable {
    pub(crate) fn new<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let entries = nodes
            .into_iter()
            .map(|node| (node.clone(), CompletionSignal::new()))
            .collect();
        Self { entries }
    }

    /// Fire `node`'s signal. Returns false if the node is unknown or already fired.
    pub(crate) fn record(&self, node: &Node, status: NodeStatus) -> bool {
        self.entries
            .get(node)
            .is_some_and(|signal| signal.fire(status))
    }

    /// Wait until `node` has a terminal status. `None` means the node is unknown.
    pub(crate) async fn wait(&self, node: &Node) -> Option<NodeStatus> {
        self.entries.get(node)?.wait().await
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn nodes(ids: &[&str]) -> Vec<Node> {
        ids.iter().map(|id| Node::from(*id)).collect()
    }

    #[tokio::test]
    async fn test_signal_fires_once() {
        let all = nodes(&["a"]);
        let table = RunStateTable::new(&all);
        let a = Node::from("a");

        let pending = tokio::time::timeout(Duration::from_millis(10), table.wait(&a)).await;
        assert!(pending.is_err(), "signal must not fire before record");

        assert!(table.record(&a, NodeStatus::Succeeded));
        assert!(!table.record(
            &a,
            NodeStatus::Failed(ExecutionError::Cancelled { node: a.clone() })
        ));
        assert!(table.wait(&a).await.unwrap().is_success());
    }

    #[tokio::test]
    async fn test_many_waiters_observe_same_status() {
        let all = nodes(&["a"]);
        let table = Arc::new(RunStateTable::new(&all));

        let mut waiters = Vec::new();
        for _ in 0..8 {
            let table = Arc::clone(&table);
            waiters.push(tokio::spawn(async move {
                table.wait(&Node::from("a")).await
            }));
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
        table.record(
            &Node::from("a"),
            NodeStatus::Skipped(ExecutionError::Cancelled {
                node: Node::from("a"),
            }),
        );

        for waiter in waiters {
            let status = waiter.await.unwrap().unwrap();
            assert_eq!(status.label(), "skipped");
        }
    }

    #[tokio::test]
    async fn test_wait_after_fire_returns_immediately() {
        let all = nodes(&["a"]);
        let table = RunStateTable::new(&all);
        table.record(&Node::from("a"), NodeStatus::Succeeded);

        let status = tokio::time::timeout(Duration::from_millis(20), table.wait(&Node::from("a")))
            .await
            .expect("already-fired signal must not block");
        assert!(status.unwrap().is_success());
    }

    #[tokio::test]
    async fn test_unknown_node() {
        let table = RunStateTable::new(&nodes(&["a"]));
        assert_eq!(table.len(), 1);
        assert!(table.wait(&Node::from("zzz")).await.is_none());
        assert!(!table.record(&Node::from("zzz"), NodeStatus::Succeeded));
    }

    #[test]
    fn test_status_serializes_with_error_text() {
        let status = NodeStatus::Failed(ExecutionError::Cancelled {
            node: Node::from("a"),
        });
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["error"], "node 'a' cancelled before completion");
    }
}
