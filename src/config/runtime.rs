// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::WorkflowConfig;
use crate::engine::{Executor, ExecutorFactory, RunContext};
use crate::errors::ConfigError;
use crate::graph::Graph;

/// DAG runtime builder - assembles the graph, executor and run context from a workflow.
///
/// # Examples
/// ```
/// use dagflow::config::{parse_yaml, RuntimeBuilder};
///
/// let config = parse_yaml(r#"
/// executor_options:
///   max_concurrency: 2
/// edges:
///   - node: b
///     depends_on: [a]
/// "#).unwrap();
///
/// let (graph, executor, ctx) = RuntimeBuilder::from_config(&config).unwrap();
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(executor.max_concurrency(), 2);
/// assert!(ctx.deadline().is_none());
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build a complete DAG runtime from configuration.
    ///
    /// Returns the graph, an executor configured from `executor_options`, and
    /// a run context carrying the run deadline when `run_timeout_seconds` is set.
    /// The deadline starts counting when this is called.
    pub fn from_config(cfg: &WorkflowConfig) -> Result<(Graph, Executor, RunContext), ConfigError> {
        let graph = cfg.build_graph()?;
        let executor = ExecutorFactory::from_options(&cfg.executor_options);
        let ctx = match cfg.executor_options.run_timeout() {
            Some(timeout) => RunContext::with_timeout(timeout),
            None => RunContext::new(),
        };
        Ok((graph, executor, ctx))
    }
}
