//! Stop connectivity graph and unweighted route search.
//!
//! Nodes are stops; there is a directed edge `a -> b` whenever some line
//! calls at `b` immediately after `a`. Travel times are kept on the edges
//! for display only: the search counts hops.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;
use tracing::{debug, trace};

use crate::domain::{Line, LineId, NetworkKind, StopId};

/// Measured travel between two consecutive stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TravelTime {
    pub minutes: u32,
    pub distance_m: u32,
}

/// A line on an edge. Ids are only unique within one network kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LineRef {
    pub kind: NetworkKind,
    pub id: LineId,
}

/// A directed hop between consecutive stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: StopId,
    pub to: StopId,
    /// Average travel time, when the dataset has one.
    pub weight: Option<TravelTime>,
    /// Lines making this hop, in load order, without duplicates.
    pub lines: Vec<LineRef>,
}

/// Directed adjacency over stops.
///
/// Neighbour lists keep insertion order (line load order, then stop
/// sequence order). Route search explores neighbours in that order, which
/// is what decides between equally short routes.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: HashSet<StopId>,
    adjacency: HashMap<StopId, Vec<StopId>>,
    edges: HashMap<(StopId, StopId), Edge>,
    edge_order: Vec<(StopId, StopId)>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from every consecutive pair of every line.
    pub fn build<'a>(
        lines: impl IntoIterator<Item = &'a Line>,
        travel: &HashMap<(StopId, StopId), TravelTime>,
    ) -> Self {
        let mut graph = Self::new();
        for line in lines {
            for (from, to) in line.hops() {
                let line_ref = LineRef {
                    kind: line.kind,
                    id: line.id,
                };
                graph.add_hop(from, to, line_ref, travel.get(&(from, to)).copied());
            }
        }
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built stop graph"
        );
        graph
    }

    /// Record that `line` travels `from -> to`.
    ///
    /// Repeated hops do not add parallel edges; they only extend the set
    /// of lines on the existing edge.
    pub fn add_hop(&mut self, from: StopId, to: StopId, line: LineRef, weight: Option<TravelTime>) {
        self.nodes.insert(from);
        self.nodes.insert(to);

        let neighbours = self.adjacency.entry(from).or_default();
        if !neighbours.contains(&to) {
            neighbours.push(to);
        }

        let edge = self.edges.entry((from, to)).or_insert_with(|| {
            self.edge_order.push((from, to));
            Edge {
                from,
                to,
                weight,
                lines: Vec::new(),
            }
        });
        if edge.weight.is_none() {
            edge.weight = weight;
        }
        if !edge.lines.contains(&line) {
            edge.lines.push(line);
        }
    }

    pub fn contains(&self, stop: StopId) -> bool {
        self.nodes.contains(&stop)
    }

    /// Direct successors of a stop, in insertion order.
    pub fn neighbours(&self, stop: StopId) -> &[StopId] {
        self.adjacency.get(&stop).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge(&self, from: StopId, to: StopId) -> Option<&Edge> {
        self.edges.get(&(from, to))
    }

    /// Every edge, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edge_order.iter().filter_map(|key| self.edges.get(key))
    }

    /// Lines that call at `to` immediately after `from`.
    pub fn lines_between(&self, from: StopId, to: StopId) -> &[LineRef] {
        self.edges
            .get(&(from, to))
            .map(|e| e.lines.as_slice())
            .unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Fewest-hop route from `start` to `end`, both included.
    ///
    /// Returns `[start]` when they are equal and an empty vector when `end`
    /// cannot be reached. The frontier holds whole partial paths, so the
    /// route comes out of the queue ready-made.
    pub fn find_route(&self, start: StopId, end: StopId) -> Vec<StopId> {
        if start == end {
            return vec![start];
        }

        let mut visited: HashSet<StopId> = HashSet::new();
        let mut queue: VecDeque<Vec<StopId>> = VecDeque::new();
        queue.push_back(vec![start]);

        while let Some(path) = queue.pop_front() {
            let Some(&node) = path.last() else {
                continue;
            };
            if !visited.insert(node) {
                continue;
            }

            let neighbours = self.neighbours(node);
            if neighbours.is_empty() {
                trace!(stop = %node, "stop has no successors");
                continue;
            }

            for &next in neighbours {
                let mut extended = Vec::with_capacity(path.len() + 1);
                extended.extend_from_slice(&path);
                extended.push(next);

                // First path to touch the target is a shortest one.
                if next == end {
                    return extended;
                }
                queue.push_back(extended);
            }
        }

        debug!(from = %start, to = %end, "destination unreachable");
        Vec::new()
    }
}
