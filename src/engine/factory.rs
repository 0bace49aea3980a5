// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::ExecutorOptions;
use crate::engine::executor::Executor;

/// Factory for creating DAG executors from configuration
pub struct ExecutorFactory;

impl ExecutorFactory {
    /// Create an executor from the configured concurrency and node deadline
    pub fn from_options(options: &ExecutorOptions) -> Executor {
        Executor::new(options.max_concurrency()).with_node_timeout(options.node_timeout())
    }
}
