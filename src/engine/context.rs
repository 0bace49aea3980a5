// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Cancellation and deadline scopes for a run and for each node.
//!
//! A [`RunContext`] bounds a whole execution. Each node derives a
//! [`NodeContext`] from it once its dependencies are satisfied: a child
//! cancellation token plus a deadline no later than the run's own.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::graph::Node;

/// Cancellation token and optional deadline shared by every node of one run.
///
/// # Examples
/// ```
/// use dagflow::engine::RunContext;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let ctx = RunContext::with_timeout(Duration::from_secs(30));
/// assert!(ctx.deadline().is_some());
/// assert!(!ctx.is_cancelled());
///
/// ctx.cancel();
/// assert!(ctx.is_cancelled());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RunContext {
    /// A context with no deadline that is only cancelled explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Use an externally owned token, e.g. one wired to Ctrl-C.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Resolves when the run is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Resolves when the run deadline passes; never resolves without a deadline.
    pub async fn deadline_elapsed(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    }

    /// Derive the scope a node's admission and work run under.
    pub(crate) fn node_context(&self, node: &Node, node_timeout: Duration) -> NodeContext {
        let node_deadline = Instant::now() + node_timeout;
        let deadline = match self.deadline {
            Some(run_deadline) if run_deadline < node_deadline => run_deadline,
            _ => node_deadline,
        };

        NodeContext {
            node: node.clone(),
            token: self.token.child_token(),
            deadline,
        }
    }
}

/// Scope handed to a node's work callback.
///
/// Cancelled when the run is cancelled or the node's deadline passes. Work
/// that awaits long operations should race them against [`NodeContext::cancelled`].
#[derive(Debug, Clone)]
pub struct NodeContext {
    node: Node,
    token: CancellationToken,
    deadline: Instant,
}

impl NodeContext {
    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the node deadline; zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_node_deadline_capped_by_run_deadline() {
        let run = RunContext::with_timeout(Duration::from_millis(50));
        let node = run.node_context(&Node::from("a"), Duration::from_secs(60));

        assert_eq!(Some(node.deadline()), run.deadline());
        assert!(node.remaining() <= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_node_deadline_uses_node_timeout_when_sooner() {
        let run = RunContext::with_timeout(Duration::from_secs(60));
        let node = run.node_context(&Node::from("a"), Duration::from_millis(50));

        assert!(Some(node.deadline()) < run.deadline());
    }

    #[tokio::test]
    async fn test_run_cancellation_reaches_node() {
        let run = RunContext::new();
        let node = run.node_context(&Node::from("a"), Duration::from_secs(1));

        run.cancel();
        assert!(node.is_cancelled());
        node.cancelled().await;
    }

    #[tokio::test]
    async fn test_node_cancellation_does_not_reach_run() {
        let run = RunContext::new();
        let node = run.node_context(&Node::from("a"), Duration::from_secs(1));

        node.cancel();
        assert!(node.is_cancelled());
        assert!(!run.is_cancelled());
    }
}
