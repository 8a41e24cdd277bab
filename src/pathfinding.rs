//! Single-source shortest paths over one city's base graph.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::debug;
use ordered_float::OrderedFloat;

use crate::locations::{Base, GraphError};

/// Node sequence from the source to the target, inclusive.
///
/// An empty path means the target cannot be reached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub nodes: Vec<usize>,
    pub cost: f32,
}

impl Path {
    pub fn unreachable() -> Self {
        Self {
            nodes: Vec::new(),
            cost: f32::INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Dijkstra from `home` to `target`.
///
/// Equal-distance frontier entries pop in insertion order, so among paths of
/// identical cost the one discovered first wins.
pub fn shortest_path(bases: &[Base], home: usize, target: usize) -> Result<Path, GraphError> {
    let n = bases.len();
    for index in [home, target] {
        if index >= n {
            return Err(GraphError::InvalidIndex { index, len: n });
        }
    }

    let mut dist = vec![f32::INFINITY; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut frontier = BinaryHeap::new();
    let mut seq: u64 = 0;

    dist[home] = 0.0;
    frontier.push(Reverse((OrderedFloat(0.0f32), seq, home)));

    while let Some(Reverse((_, _, u))) = frontier.pop() {
        if visited[u] {
            continue;
        }
        visited[u] = true;
        if u == target {
            break;
        }

        for edge in &bases[u].neighbors {
            if edge.to >= n {
                return Err(GraphError::InvalidEdge { from: u, to: edge.to, len: n });
            }
            let candidate = dist[u] + edge.cost;
            if candidate < dist[edge.to] {
                dist[edge.to] = candidate;
                parent[edge.to] = Some(u);
                seq += 1;
                frontier.push(Reverse((OrderedFloat(candidate), seq, edge.to)));
            }
        }
    }

    if dist[target].is_infinite() {
        debug!("no path {} -> {}", home, target);
        return Ok(Path::unreachable());
    }

    let mut nodes = vec![target];
    let mut v = target;
    while let Some(p) = parent[v] {
        nodes.push(p);
        v = p;
    }
    nodes.reverse();
    debug!("path {} -> {}: {:?} cost {}", home, target, nodes, dist[target]);

    Ok(Path { nodes, cost: dist[target] })
}

/// Sum of edge costs along `nodes`, or `None` if a hop has no direct edge.
pub fn path_cost(bases: &[Base], nodes: &[usize]) -> Option<f32> {
    nodes.windows(2).try_fold(0.0, |acc, hop| {
        bases
            .get(hop[0])?
            .edge_to(hop[1])
            .map(|e| acc + e.cost)
    })
}
