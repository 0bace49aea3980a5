// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for per-node scheduling events.
//!
//! These follow one node task through its protocol:
//! * Waiting on direct dependencies
//! * Skipped because a dependency failed
//! * Admitted into the concurrency pool
//! * Finished successfully or with an error
//! * Work that kept running after its node gave up on it

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Node task started and is waiting on its dependencies.
///
/// # Log Level
/// `debug!` - Scheduling detail
///
/// # Example
/// ```
/// use dagflow::observability::messages::node::NodeWaiting;
///
/// let deps = vec!["2"];
/// let msg = NodeWaiting { node: "4", dependencies: &deps };
///
/// assert_eq!(msg.to_string(), "Node '4' waiting on 1 dependencies: [2]");
/// ```
pub struct NodeWaiting<'a> {
    pub node: &'a str,
    pub dependencies: &'a [&'a str],
}

impl Display for NodeWaiting<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' waiting on {} dependencies: [{}]",
            self.node,
            self.dependencies.len(),
            self.dependencies.join(", ")
        )
    }
}

impl StructuredLog for NodeWaiting<'_> {
    fn log(&self) {
        tracing::debug!(
            node = self.node,
            dependency_count = self.dependencies.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "node_waiting",
            span_name = name,
            node = self.node,
            dependency_count = self.dependencies.len(),
        )
    }
}

/// Node skipped because one or more direct dependencies ended in error.
///
/// # Log Level
/// `warn!` - Degraded outcome caused elsewhere
///
/// # Example
/// ```
/// use dagflow::observability::messages::node::NodeSkipped;
///
/// let failed = vec!["3"];
/// let msg = NodeSkipped { node: "8", failed_dependencies: &failed };
///
/// assert_eq!(msg.to_string(), "Node '8' skipped: failed dependencies [3]");
/// ```
pub struct NodeSkipped<'a> {
    pub node: &'a str,
    pub failed_dependencies: &'a [&'a str],
}

impl Display for NodeSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' skipped: failed dependencies [{}]",
            self.node,
            self.failed_dependencies.join(", ")
        )
    }
}

impl StructuredLog for NodeSkipped<'_> {
    fn log(&self) {
        tracing::warn!(
            node = self.node,
            failed_dependencies = %self.failed_dependencies.join(", "),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "node_skipped",
            span_name = name,
            node = self.node,
            failed_dependencies = %self.failed_dependencies.join(", "),
        )
    }
}

/// Node acquired an admission slot and is about to run its work.
///
/// # Log Level
/// `debug!` - Scheduling detail
pub struct NodeAdmitted<'a> {
    pub node: &'a str,
    pub waited: Duration,
    pub available_slots: usize,
}

impl Display for NodeAdmitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' admitted after {:?} ({} slots free)",
            self.node, self.waited, self.available_slots
        )
    }
}

impl StructuredLog for NodeAdmitted<'_> {
    fn log(&self) {
        tracing::debug!(
            node = self.node,
            waited_ms = self.waited.as_millis() as u64,
            available_slots = self.available_slots,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "node_admitted",
            span_name = name,
            node = self.node,
            waited = ?self.waited,
        )
    }
}

/// Node work finished successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use dagflow::observability::messages::node::NodeSucceeded;
/// use std::time::Duration;
///
/// let msg = NodeSucceeded { node: "55", duration: Duration::from_millis(10) };
///
/// tracing::info!("{}", msg);
/// ```
pub struct NodeSucceeded<'a> {
    pub node: &'a str,
    pub duration: Duration,
}

impl Display for NodeSucceeded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Node '{}' succeeded in {:?}", self.node, self.duration)
    }
}

impl StructuredLog for NodeSucceeded<'_> {
    fn log(&self) {
        tracing::info!(
            node = self.node,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "node_succeeded",
            span_name = name,
            node = self.node,
            duration = ?self.duration,
        )
    }
}

/// Node ended in error: work failure, timeout, cancellation or panic.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use dagflow::observability::messages::node::NodeFailed;
/// use std::time::Duration;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// let msg = NodeFailed {
///     node: "3",
///     error: &error,
///     duration: Duration::from_millis(5),
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct NodeFailed<'a> {
    pub node: &'a str,
    pub error: &'a dyn std::error::Error,
    pub duration: Duration,
}

impl Display for NodeFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' failed after {:?}: {}",
            self.node, self.duration, self.error
        )
    }
}

impl StructuredLog for NodeFailed<'_> {
    fn log(&self) {
        tracing::error!(
            node = self.node,
            error = %self.error,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "node_failed",
            span_name = name,
            node = self.node,
            error = %self.error,
        )
    }
}

/// Work callback returned after its node had already timed out or been cancelled.
///
/// The node's status was published when it gave up; the admission slot stayed
/// taken until this point.
///
/// # Log Level
/// `warn!` - Work ignored cancellation and held a slot past its deadline
///
/// # Example
/// ```
/// use dagflow::observability::messages::node::NodeWorkOverran;
/// use std::time::Duration;
///
/// let msg = NodeWorkOverran { node: "z", overrun: Duration::from_millis(300) };
///
/// assert_eq!(
///     msg.to_string(),
///     "Node 'z' work returned 300ms after the node gave up on it"
/// );
/// ```
pub struct NodeWorkOverran<'a> {
    pub node: &'a str,
    pub overrun: Duration,
}

impl Display for NodeWorkOverran<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' work returned {:?} after the node gave up on it",
            self.node, self.overrun
        )
    }
}

impl StructuredLog for NodeWorkOverran<'_> {
    fn log(&self) {
        tracing::warn!(
            node = self.node,
            overrun_ms = self.overrun.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "node_work_overran",
            span_name = name,
            node = self.node,
            overrun = ?self.overrun,
        )
    }
}
