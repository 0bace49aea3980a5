// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;

use crate::engine::NodeContext;
use crate::graph::Node;
use crate::traits::Work;

/// Sleeps for a fixed delay per node, failing on a chosen set of nodes.
///
/// The sleep races the node's cancellation, so a run deadline or Ctrl-C
/// interrupts it promptly.
#[derive(Debug, Clone, Default)]
pub struct SleepingWork {
    delay: Duration,
    failing: HashSet<Node>,
}

impl SleepingWork {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failing: HashSet::new(),
        }
    }

    /// Make the listed nodes return an error after their delay.
    pub fn failing_on<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.failing.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl Work for SleepingWork {
    async fn run(&self, ctx: NodeContext, node: Node) -> anyhow::Result<()> {
        tokio::select! {
            _ = ctx.cancelled() => anyhow::bail!("node '{node}' interrupted while working"),
            _ = tokio::time::sleep(self.delay) => {}
        }

        if self.failing.contains(&node) {
            anyhow::bail!("simulated failure in node '{node}'");
        }
        Ok(())
    }
}
