// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque identifier naming one schedulable unit of work.
///
/// A node carries no payload. The work callback receives the identifier and
/// decides what to do with it.
///
/// # Examples
/// ```
/// use dagflow::graph::Node;
///
/// let node = Node::from("compile");
/// assert_eq!(node.as_str(), "compile");
/// assert_eq!(node.to_string(), "compile");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node(String);

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Node {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Node {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&Node> for Node {
    fn from(node: &Node) -> Self {
        node.clone()
    }
}

impl From<Node> for String {
    fn from(node: Node) -> Self {
        node.0
    }
}

impl AsRef<str> for Node {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Node {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Directed dependency: `current` depends on `previous`.
///
/// `previous` must complete before `current` may run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub current: Node,
    pub previous: Node,
}

impl Edge {
    pub fn new(current: impl Into<Node>, previous: impl Into<Node>) -> Self {
        Self {
            current: current.into(),
            previous: previous.into(),
        }
    }

    /// The same pair with the dependency direction flipped.
    pub fn reversed(&self) -> Self {
        Self {
            current: self.previous.clone(),
            previous: self.current.clone(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.current, self.previous)
    }
}
