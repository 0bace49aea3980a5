// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Cycle search over the dependency adjacency map.
//!
//! `find_cycle` is a depth-first search that tracks the nodes on the current
//! path: meeting one of them again means the path loops. Both searches keep
//! their own stacks, so very deep chains do not exhaust the thread stack. Cost is
//! O(V + E) time and O(V) space.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::graph::Node;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnPath,
    Finished,
}

/// Find any dependency cycle, returned as a closed path (`a -> b -> c -> a`).
///
/// Roots are visited in sorted order and dependencies in insertion order,
/// so the reported cycle is stable for a given graph.
pub(crate) fn find_cycle(
    nodes: &BTreeSet<Node>,
    dependencies: &HashMap<Node, Vec<Node>>,
) -> Option<Vec<Node>> {
    let mut marks: HashMap<&Node, Mark> = HashMap::with_capacity(nodes.len());

    for root in nodes {
        if marks.contains_key(root) {
            continue;
        }
        if let Some(cycle) = visit(root, dependencies, &mut marks) {
            return Some(cycle);
        }
    }

    None
}

/// Iterative DFS from `root`; stack depth is bounded by the heap, not the thread stack.
fn visit<'a>(
    root: &'a Node,
    dependencies: &'a HashMap<Node, Vec<Node>>,
    marks: &mut HashMap<&'a Node, Mark>,
) -> Option<Vec<Node>> {
    // Each frame is a node on the current path and the index of its next dependency.
    let mut path: Vec<(&'a Node, usize)> = vec![(root, 0)];
    marks.insert(root, Mark::OnPath);

    while let Some((node, next)) = path.last_mut() {
        let node: &'a Node = *node;
        let dep = dependencies.get(node).and_then(|deps| deps.get(*next));
        *next += 1;

        let Some(dep) = dep else {
            path.pop();
            marks.insert(node, Mark::Finished);
            continue;
        };

        match marks.get(dep).copied() {
            Some(Mark::OnPath) => {
                if let Some(start) = path.iter().position(|(n, _)| *n == dep) {
                    let mut cycle: Vec<Node> =
                        path[start..].iter().map(|(n, _)| (*n).clone()).collect();
                    cycle.push(dep.clone());
                    return Some(cycle);
                }
            }
            Some(Mark::Finished) => {}
            None => {
                marks.insert(dep, Mark::OnPath);
                path.push((dep, 0));
            }
        }
    }

    None
}

/// Dependency path from `from` to `to`, inclusive of both ends, if `to` is reachable.
pub(crate) fn path_between<'a>(
    dependencies: &'a HashMap<Node, Vec<Node>>,
    from: &'a Node,
    to: &Node,
) -> Option<Vec<Node>> {
    let mut parents: HashMap<&Node, &Node> = HashMap::new();
    let mut visited: HashSet<&Node> = HashSet::from([from]);
    let mut stack = vec![from];

    while let Some(node) = stack.pop() {
        if node == to {
            let mut path = vec![node.clone()];
            let mut cursor = node;
            while let Some(parent) = parents.get(cursor) {
                path.push((*parent).clone());
                cursor = *parent;
            }
            path.reverse();
            return Some(path);
        }

        for dep in dependencies.get(node).into_iter().flatten().rev() {
            if visited.insert(dep) {
                parents.insert(dep, node);
                stack.push(dep);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(edges: &[(&str, &str)]) -> (BTreeSet<Node>, HashMap<Node, Vec<Node>>) {
        let mut nodes = BTreeSet::new();
        let mut deps: HashMap<Node, Vec<Node>> = HashMap::new();
        for (current, previous) in edges {
            nodes.insert(Node::from(*current));
            nodes.insert(Node::from(*previous));
            deps.entry(Node::from(*current))
                .or_default()
                .push(Node::from(*previous));
        }
        (nodes, deps)
    }

    #[test]
    fn test_acyclic_diamond_has_no_cycle() {
        let (nodes, deps) = adjacency(&[("b", "a"), ("c", "a"), ("d", "b"), ("d", "c")]);
        assert!(find_cycle(&nodes, &deps).is_none());
    }

    #[test]
    fn test_finds_three_node_cycle() {
        let (nodes, deps) = adjacency(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let cycle = find_cycle(&nodes, &deps).unwrap();
        let ids: Vec<&str> = cycle.iter().map(Node::as_str).collect();
        assert_eq!(ids, vec!["a", "b", "c", "a"]);
    }

    fn chain(len: usize) -> (BTreeSet<Node>, HashMap<Node, Vec<Node>>) {
        let mut nodes = BTreeSet::new();
        let mut deps: HashMap<Node, Vec<Node>> = HashMap::new();
        nodes.insert(Node::from("n0"));
        for i in 1..len {
            let current = Node::from(format!("n{i}"));
            nodes.insert(current.clone());
            deps.insert(current, vec![Node::from(format!("n{}", i - 1))]);
        }
        (nodes, deps)
    }

    #[test]
    fn test_deep_chain_has_no_cycle() {
        let (nodes, deps) = chain(200_000);
        assert!(find_cycle(&nodes, &deps).is_none());
    }

    #[test]
    fn test_deep_chain_closed_into_cycle() {
        let (nodes, mut deps) = chain(200_000);
        deps.insert(Node::from("n0"), vec![Node::from("n199999")]);

        let cycle = find_cycle(&nodes, &deps).unwrap();
        assert_eq!(cycle.len(), 200_001);
        assert_eq!(cycle.first(), cycle.last());
    }

    #[test]
    fn test_path_between() {
        let (_, deps) = adjacency(&[("d", "b"), ("b", "a"), ("d", "c")]);
        let path = path_between(&deps, &Node::from("d"), &Node::from("a")).unwrap();
        let ids: Vec<&str> = path.iter().map(Node::as_str).collect();
        assert_eq!(ids, vec!["d", "b", "a"]);

        assert!(path_between(&deps, &Node::from("a"), &Node::from("d")).is_none());
    }
}
