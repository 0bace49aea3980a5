// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for run lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Run start with graph size and concurrency configuration
//! * Run completion with per-outcome node counts
//! * Run failure, including pre-flight cycle rejection

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Run started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use dagflow::observability::messages::engine::ExecutionStarted;
///
/// let msg = ExecutionStarted {
///     node_count: 11,
///     edge_count: 9,
///     max_concurrency: 4,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Starting DAG execution: 11 nodes, 9 edges, max_concurrency=4"
/// );
/// ```
pub struct ExecutionStarted {
    pub node_count: usize,
    pub edge_count: usize,
    pub max_concurrency: usize,
}

impl Display for ExecutionStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting DAG execution: {} nodes, {} edges, max_concurrency={}",
            self.node_count, self.edge_count, self.max_concurrency
        )
    }
}

impl StructuredLog for ExecutionStarted {
    fn log(&self) {
        tracing::info!(
            node_count = self.node_count,
            edge_count = self.edge_count,
            max_concurrency = self.max_concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution",
            span_name = name,
            node_count = self.node_count,
            edge_count = self.edge_count,
            max_concurrency = self.max_concurrency,
        )
    }
}

/// Run finished; every node reached a terminal state.
///
/// # Log Level
/// `info!` when nothing failed, `warn!` otherwise
///
/// # Example
/// ```
/// use dagflow::observability::messages::engine::ExecutionCompleted;
/// use std::time::Duration;
///
/// let msg = ExecutionCompleted {
///     node_count: 11,
///     succeeded: 6,
///     failed: 1,
///     skipped: 4,
///     duration: Duration::from_millis(250),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ExecutionCompleted {
    pub node_count: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration: std::time::Duration,
}

impl Display for ExecutionCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "DAG execution completed: {} nodes in {:?} (succeeded={}, failed={}, skipped={})",
            self.node_count, self.duration, self.succeeded, self.failed, self.skipped
        )
    }
}

impl StructuredLog for ExecutionCompleted {
    fn log(&self) {
        if self.failed == 0 && self.skipped == 0 {
            tracing::info!(
                node_count = self.node_count,
                succeeded = self.succeeded,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            );
        } else {
            tracing::warn!(
                node_count = self.node_count,
                succeeded = self.succeeded,
                failed = self.failed,
                skipped = self.skipped,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            );
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution_completed",
            span_name = name,
            node_count = self.node_count,
            succeeded = self.succeeded,
            failed = self.failed,
            skipped = self.skipped,
            duration = ?self.duration,
        )
    }
}

/// Run could not start or a node task was lost.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use dagflow::observability::messages::engine::ExecutionFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
/// let msg = ExecutionFailed { error: &error };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ExecutionFailed<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for ExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "DAG execution failed: {}", self.error)
    }
}

impl StructuredLog for ExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "execution_failed",
            span_name = name,
            error = %self.error,
        )
    }
}
