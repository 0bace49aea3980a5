// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_NODE_TIMEOUT_SECS, FALLBACK_CONCURRENCY};
use crate::errors::ConfigError;
use crate::graph::{CyclePolicy, Graph, Node};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Workflow file: executor options plus the graph to run.
///
/// Typically loaded from YAML; TOML is accepted when the file ends in `.toml`.
///
/// # Fields
/// * `executor_options` - Concurrency and deadline settings (optional)
/// * `cycle_policy` - How strictly `add_edge` checks for cycles (optional, defaults to `direct`)
/// * `nodes` - Standalone nodes, including ones with no edges (optional)
/// * `edges` - Each entry names a node and the nodes it depends on
///
/// # Example
/// ```yaml
/// executor_options:
///   max_concurrency: 4
///   node_timeout_seconds: 30
/// cycle_policy: reachability
/// nodes: ["cleanup"]
/// edges:
///   - node: "transform"
///     depends_on: ["extract"]
///   - node: "load"
///     depends_on: ["transform"]
/// ```
#[derive(Debug, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub executor_options: ExecutorOptions,
    #[serde(default)]
    pub cycle_policy: CyclePolicy,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<EdgeConfig>,
}

/// Executor-specific configuration options.
///
/// # Fields
/// * `max_concurrency` - Maximum number of work callbacks running at once (optional, defaults to CPU cores)
/// * `node_timeout_seconds` - Deadline for one node's admission wait plus work (optional, defaults to 60)
/// * `run_timeout_seconds` - Deadline for the whole run (optional, unbounded when absent)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutorOptions {
    pub max_concurrency: Option<usize>,
    pub node_timeout_seconds: Option<u64>,
    pub run_timeout_seconds: Option<u64>,
}

impl ExecutorOptions {
    /// Configured concurrency, or the number of available CPU cores.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(FALLBACK_CONCURRENCY)
        })
    }

    pub fn node_timeout(&self) -> Duration {
        Duration::from_secs(self.node_timeout_seconds.unwrap_or(DEFAULT_NODE_TIMEOUT_SECS))
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_seconds.map(Duration::from_secs)
    }
}

/// One node and its direct dependencies.
///
/// # Example
/// ```yaml
/// node: "report"
/// depends_on: ["aggregate", "validate"]
/// ```
#[derive(Debug, Deserialize)]
pub struct EdgeConfig {
    pub node: Node,
    #[serde(default)]
    pub depends_on: Vec<Node>, // defaults empty
}

impl WorkflowConfig {
    /// Build the graph described by this workflow.
    ///
    /// Edges are added in file order, so the first duplicate or cycle-closing
    /// edge is the one reported.
    pub fn build_graph(&self) -> Result<Graph, ConfigError> {
        let mut graph = Graph::with_cycle_policy(self.cycle_policy);

        for node in &self.nodes {
            graph.add_node(node.clone());
        }

        for entry in &self.edges {
            graph.add_node(entry.node.clone());
            for dependency in &entry.depends_on {
                graph.add_edge(entry.node.clone(), dependency.clone())?;
            }
        }

        Ok(graph)
    }
}

/// Load a workflow from a YAML or TOML file, chosen by extension.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<WorkflowConfig, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("yaml") | Some("yml") => parse_yaml(&fs::read_to_string(path)?),
        Some("toml") => parse_toml(&fs::read_to_string(path)?),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

pub fn parse_yaml(content: &str) -> Result<WorkflowConfig, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}

pub fn parse_toml(content: &str) -> Result<WorkflowConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}
