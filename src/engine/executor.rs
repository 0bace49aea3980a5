// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency-driven DAG executor.
//!
//! Every node gets its own task, and all tasks are spawned up front. There is
//! no topological sort: ordering comes entirely from each task waiting on its
//! direct dependencies' completion signals in the run state table.
//!
//! ## Node protocol
//!
//! 1. Wait for every direct dependency to signal (no admission slot held).
//! 2. If any dependency ended in error, record `AncestorFailed` and stop.
//!    Checking only direct dependencies is enough: a node two levels below a
//!    failure sees its parent's propagated error and propagates it in turn.
//! 3. Acquire an admission slot, bounded by the node deadline.
//! 4. Run the work callback, bounded by the node deadline. The slot travels
//!    with the callback and is released when the callback returns.
//! 5. Fire the node's own signal. A callback that outlived its deadline is
//!    then awaited, so the task only ends once the slot is free again.
//!
//! Sibling and unrelated nodes only share the admission pool, so a failure
//! never affects nodes outside the failed node's descendants.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use std::future::Future;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::Instant;
use tracing::Instrument;

use crate::config::consts::DEFAULT_NODE_TIMEOUT;
use crate::engine::admission::{AdmissionPermit, AdmissionPool};
use crate::engine::context::{NodeContext, RunContext};
use crate::engine::report::ExecutionReport;
use crate::engine::run_state::{NodeStatus, RunStateTable};
use crate::errors::{DependencyFailure, ExecutionError};
use crate::graph::{Graph, Node};
use crate::observability::messages::engine::{
    ExecutionCompleted, ExecutionFailed, ExecutionStarted,
};
use crate::observability::messages::node::{
    NodeAdmitted, NodeFailed, NodeSkipped, NodeSucceeded, NodeWaiting, NodeWorkOverran,
};
use crate::observability::messages::StructuredLog;
use crate::traits::Work;

/// Executes a [`Graph`] under a global concurrency cap.
///
/// The executor itself only holds configuration; every call to
/// [`Executor::run`] or [`Executor::execute`] builds its own admission pool and
/// run state table, so one executor can drive many runs.
///
/// # Examples
/// ```
/// use dagflow::engine::{Executor, RunContext};
/// use dagflow::graph::Graph;
/// use dagflow::traits::work_fn;
///
/// # #[tokio::main]
/// # async fn main() {
/// let graph = Graph::from_edges([("b", "a"), ("c", "a")]).unwrap();
/// let executor = Executor::new(2);
///
/// let result = executor
///     .execute(&RunContext::new(), &graph, work_fn(|_ctx, _node| async { anyhow::Ok(()) }))
///     .await;
///
/// assert!(result.is_ok());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Executor {
    /// Maximum number of work callbacks running at once
    max_concurrency: usize,
    /// Deadline for admission plus work, per node
    node_timeout: Duration,
}

impl Executor {
    /// Create an executor with the specified concurrency limit.
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1), // Ensure at least 1
            node_timeout: DEFAULT_NODE_TIMEOUT,
        }
    }

    /// Replace the per-node deadline (admission wait plus work).
    pub fn with_node_timeout(mut self, node_timeout: Duration) -> Self {
        self.node_timeout = node_timeout;
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub fn node_timeout(&self) -> Duration {
        self.node_timeout
    }

    /// Run every node of `graph` and return the first error observed, if any.
    ///
    /// The graph must be fully built before the call. It is borrowed for the
    /// whole run, so it cannot be mutated while nodes are executing.
    ///
    /// # Errors
    /// - [`ExecutionError::CycleDetected`] if the graph contains a cycle (nothing runs).
    /// - Otherwise the first node error in completion order: `WorkFailed`,
    ///   `AncestorFailed`, `DeadlineExceeded`, `Cancelled` or `TaskPanicked`.
    pub async fn execute<W>(
        &self,
        ctx: &RunContext,
        graph: &Graph,
        work: W,
    ) -> Result<(), ExecutionError>
    where
        W: Work + 'static,
    {
        self.run(ctx, graph, work).await?.into_result()
    }

    /// Run every node of `graph` and report each node's terminal status.
    ///
    /// Only a failed pre-flight check returns `Err`; node failures are in the report.
    pub async fn run<W>(
        &self,
        ctx: &RunContext,
        graph: &Graph,
        work: W,
    ) -> Result<ExecutionReport, ExecutionError>
    where
        W: Work + 'static,
    {
        let pool = Arc::new(AdmissionPool::new(self.max_concurrency));
        let span = ExecutionStarted {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            max_concurrency: pool.capacity(),
        }
        .span("dag_execution");

        self.drive(ctx, graph, Arc::new(work), pool)
            .instrument(span)
            .await
    }

    async fn drive(
        &self,
        ctx: &RunContext,
        graph: &Graph,
        work: Arc<dyn Work>,
        pool: Arc<AdmissionPool>,
    ) -> Result<ExecutionReport, ExecutionError> {
        let started = Instant::now();

        if let Some(cycle) = graph.find_cycle() {
            let error = ExecutionError::CycleDetected { cycle };
            ExecutionFailed { error: &error }.log();
            return Err(error);
        }

        let nodes = graph.nodes();
        ExecutionStarted {
            node_count: nodes.len(),
            edge_count: graph.edge_count(),
            max_concurrency: pool.capacity(),
        }
        .log();

        let table = Arc::new(RunStateTable::new(&nodes));
        let mut tasks = JoinSet::new();

        for node in nodes {
            let span = tracing::info_span!("node", node = %node);
            let task = NodeTask {
                dependencies: graph.dependencies(&node),
                node,
                ctx: ctx.clone(),
                node_timeout: self.node_timeout,
                table: Arc::clone(&table),
                pool: Arc::clone(&pool),
                work: Arc::clone(&work),
            };
            tasks.spawn(task.run().instrument(span));
        }

        let mut report = ExecutionReport::new(Duration::ZERO);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((node, status)) => report.record(node, status),
                Err(join_error) => {
                    // Work panics are caught inside the node task, so this is an abort.
                    let error = ExecutionError::Internal {
                        message: format!("node task aborted: {join_error}"),
                    };
                    ExecutionFailed { error: &error }.log();
                }
            }
        }
        report.set_duration(started.elapsed());

        if report.len() != table.len() {
            return Err(ExecutionError::Internal {
                message: format!(
                    "{} of {} node tasks did not report a status",
                    table.len() - report.len(),
                    table.len()
                ),
            });
        }

        ExecutionCompleted {
            node_count: report.len(),
            succeeded: report.succeeded().len(),
            failed: report.failed().len(),
            skipped: report.skipped().len(),
            duration: report.duration(),
        }
        .log();

        Ok(report)
    }
}

impl Default for Executor {
    /// Concurrency defaults to the number of available CPU cores.
    fn default() -> Self {
        let concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(crate::config::consts::FALLBACK_CONCURRENCY);
        Self::new(concurrency)
    }
}

/// Everything one node's task needs; moved into the spawned future.
struct NodeTask {
    node: Node,
    dependencies: Vec<Node>,
    ctx: RunContext,
    node_timeout: Duration,
    table: Arc<RunStateTable>,
    pool: Arc<AdmissionPool>,
    work: Arc<dyn Work>,
}

impl NodeTask {
    async fn run(self) -> (Node, NodeStatus) {
        let started = Instant::now();
        let (status, overrun) = self.resolve(started).await;

        // Only this task fires this node's signal, so this cannot already be set.
        self.table.record(&self.node, status.clone());

        match &status {
            NodeStatus::Succeeded => NodeSucceeded {
                node: self.node.as_str(),
                duration: started.elapsed(),
            }
            .log(),
            NodeStatus::Failed(error) => NodeFailed {
                node: self.node.as_str(),
                error,
                duration: started.elapsed(),
            }
            .log(),
            NodeStatus::Skipped(_) => {}
        }

        // Dependents already see the status; the admission slot stays taken
        // until the abandoned callback actually returns.
        if let Some(callback) = overrun {
            let abandoned_at = Instant::now();
            callback.finish().await;
            NodeWorkOverran {
                node: self.node.as_str(),
                overrun: abandoned_at.elapsed(),
            }
            .log();
        }

        (self.node, status)
    }

    /// Terminal status, plus the callback task when it outlived the node.
    async fn resolve(&self, started: Instant) -> (NodeStatus, Option<CallbackTask>) {
        let failures = match self.await_dependencies(started).await {
            Ok(failures) => failures,
            Err(error) => return (NodeStatus::Failed(error), None),
        };

        if !failures.is_empty() {
            let failed: Vec<&str> = failures.iter().map(|f| f.dependency.as_str()).collect();
            NodeSkipped {
                node: self.node.as_str(),
                failed_dependencies: &failed,
            }
            .log();
            let skipped = NodeStatus::Skipped(ExecutionError::AncestorFailed {
                node: self.node.clone(),
                failures,
            });
            return (skipped, None);
        }

        let node_ctx = self.ctx.node_context(&self.node, self.node_timeout);

        let permit = match self.admit(&node_ctx, started).await {
            Ok(permit) => permit,
            Err(error) => return (NodeStatus::Failed(error), None),
        };

        match self.invoke(node_ctx, permit, started).await {
            (Ok(()), overrun) => (NodeStatus::Succeeded, overrun),
            (Err(error), overrun) => (NodeStatus::Failed(error), overrun),
        }
    }

    /// Wait for every direct dependency to signal, then collect the failed ones.
    async fn await_dependencies(
        &self,
        started: Instant,
    ) -> Result<Vec<DependencyFailure>, ExecutionError> {
        if !self.dependencies.is_empty() {
            let deps: Vec<&str> = self.dependencies.iter().map(Node::as_str).collect();
            NodeWaiting {
                node: self.node.as_str(),
                dependencies: &deps,
            }
            .log();
        }

        let mut failures = Vec::new();
        for dependency in &self.dependencies {
            let status = tokio::select! {
                biased;
                _ = self.ctx.cancelled() => {
                    return Err(ExecutionError::Cancelled { node: self.node.clone() });
                }
                _ = self.ctx.deadline_elapsed() => {
                    return Err(ExecutionError::DeadlineExceeded {
                        node: self.node.clone(),
                        elapsed: started.elapsed(),
                    });
                }
                status = self.table.wait(dependency) => status,
            };

            let status = status.ok_or_else(|| ExecutionError::Internal {
                message: format!(
                    "node '{}' depends on '{}', which is not part of this run",
                    self.node, dependency
                ),
            })?;

            if let Some(error) = status.error() {
                failures.push(DependencyFailure {
                    dependency: dependency.clone(),
                    error: Arc::new(error.clone()),
                });
            }
        }

        Ok(failures)
    }

    /// Acquire an admission slot before the node deadline.
    async fn admit(
        &self,
        node_ctx: &NodeContext,
        started: Instant,
    ) -> Result<AdmissionPermit, ExecutionError> {
        let waiting_since = Instant::now();

        let admitted = tokio::select! {
            biased;
            _ = node_ctx.cancelled() => {
                return Err(ExecutionError::Cancelled { node: self.node.clone() });
            }
            admitted = tokio::time::timeout_at(node_ctx.deadline(), self.pool.admit()) => admitted,
        };

        match admitted {
            Ok(Ok(permit)) => {
                NodeAdmitted {
                    node: self.node.as_str(),
                    waited: waiting_since.elapsed(),
                    available_slots: self.pool.available(),
                }
                .log();
                Ok(permit)
            }
            Ok(Err(closed)) => Err(ExecutionError::Internal {
                message: format!("admission pool closed: {closed}"),
            }),
            Err(_elapsed) => Err(ExecutionError::DeadlineExceeded {
                node: self.node.clone(),
                elapsed: started.elapsed(),
            }),
        }
    }

    /// Run the work callback on its own task so panics are contained.
    ///
    /// The permit moves into the callback task and is released only when the
    /// callback returns. On deadline or cancellation the node's token is
    /// cancelled and the still-running callback is handed back to the caller.
    async fn invoke(
        &self,
        node_ctx: NodeContext,
        permit: AdmissionPermit,
        started: Instant,
    ) -> (Result<(), ExecutionError>, Option<CallbackTask>) {
        let deadline = node_ctx.deadline();
        let scope = node_ctx.clone();
        let work = Arc::clone(&self.work);
        let node = self.node.clone();

        let mut callback = CallbackTask::spawn(
            async move {
                let _permit = permit;
                work.run(node_ctx, node).await
            }
            .in_current_span(),
        );

        let joined = tokio::select! {
            biased;
            _ = scope.cancelled() => None,
            joined = tokio::time::timeout_at(deadline, &mut callback.handle) => Some(joined),
        };

        let abandoned = match joined {
            Some(Ok(Ok(Ok(())))) => return (Ok(()), None),
            Some(Ok(Ok(Err(error)))) => {
                let failed = ExecutionError::WorkFailed {
                    node: self.node.clone(),
                    error: Arc::new(error),
                };
                return (Err(failed), None);
            }
            Some(Ok(Err(join_error))) => return (Err(self.join_failure(join_error)), None),
            Some(Err(_elapsed)) => ExecutionError::DeadlineExceeded {
                node: self.node.clone(),
                elapsed: started.elapsed(),
            },
            None => ExecutionError::Cancelled {
                node: self.node.clone(),
            },
        };

        scope.cancel();
        (Err(abandoned), Some(callback))
    }

    fn join_failure(&self, join_error: JoinError) -> ExecutionError {
        if join_error.is_panic() {
            ExecutionError::TaskPanicked {
                node: self.node.clone(),
                message: panic_message(join_error.into_panic()),
            }
        } else {
            ExecutionError::Cancelled {
                node: self.node.clone(),
            }
        }
    }
}

/// A spawned work callback, aborted if dropped before it finishes.
///
/// Dropping the run future drops the node tasks, and with them these guards,
/// so no callback outlives its run unobserved.
struct CallbackTask {
    handle: JoinHandle<anyhow::Result<()>>,
}

impl CallbackTask {
    fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    /// Wait for a callback that was still running when its node gave up on it.
    async fn finish(mut self) {
        let _ = (&mut self.handle).await;
    }
}

impl Drop for CallbackTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
