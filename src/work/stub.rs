// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::engine::NodeContext;
use crate::graph::Node;
use crate::traits::Work;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started(Node),
    Finished(Node),
}

/// Work that records what the executor asked of it
#[derive(Default)]
pub struct RecordingWork {
    delay: Duration,
    failing: HashSet<Node>,
    events: Mutex<Vec<Event>>,
    running: AtomicUsize,
    peak: AtomicUsize,
}

impl RecordingWork {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn failing_on<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.failing.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Nodes whose work was invoked, in start order
    pub fn invoked(&self) -> Vec<Node> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Started(node) => Some(node),
                Event::Finished(_) => None,
            })
            .collect()
    }

    pub fn invocations_of(&self, node: &str) -> usize {
        self.invoked().iter().filter(|n| n.as_str() == node).count()
    }

    pub fn was_invoked(&self, node: &str) -> bool {
        self.invocations_of(node) > 0
    }

    /// True if `dependency` finished before `node` started
    pub fn finished_before_started(&self, dependency: &Node, node: &Node) -> bool {
        let events = self.events();
        let finished = events
            .iter()
            .position(|e| *e == Event::Finished(dependency.clone()));
        let started = events.iter().position(|e| *e == Event::Started(node.clone()));
        matches!((finished, started), (Some(f), Some(s)) if f < s)
    }

    /// Highest number of callbacks observed running at once
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Work for RecordingWork {
    async fn run(&self, _ctx: NodeContext, node: Node) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(Event::Started(node.clone()));
        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.running.fetch_sub(1, Ordering::SeqCst);
        self.events.lock().unwrap().push(Event::Finished(node.clone()));

        if self.failing.contains(&node) {
            anyhow::bail!("simulated failure in node '{node}'");
        }
        Ok(())
    }
}
