// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod cycle;
mod dependency_graph;
mod node;

pub use dependency_graph::{CyclePolicy, Graph};
pub use node::{Edge, Node};
