use std::{cmp::Ordering, collections::BinaryHeap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    graph::{Graph, NodeIdx},
    NodeId,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub path: Vec<NodeId>,
    pub distance: f64,
}

struct SearchState {
    node: NodeIdx,
    distance: f64,
}

impl Eq for SearchState {}
impl PartialEq for SearchState {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for SearchState {
    fn cmp(&self, other: &Self) -> Ordering {
        // Inverted for min-heap. Equal distances settle in node order.
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for SearchState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra search over a [`Graph`] snapshot.
///
/// The buffers are kept between queries, so a router can answer several
/// queries against the same snapshot without reallocating.
pub struct Router<'g> {
    graph: &'g Graph,
    queue: BinaryHeap<SearchState>,
    distances: Vec<f64>,
    predecessors: Vec<Option<NodeIdx>>,
    settled: Vec<bool>,
}

impl<'g> Router<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        let node_count = graph.node_count() as usize;
        Self {
            graph,
            queue: BinaryHeap::new(),
            distances: vec![f64::INFINITY; node_count],
            predecessors: vec![None; node_count],
            settled: vec![false; node_count],
        }
    }

    pub fn distance(&mut self, start: &str, target: &str) -> Option<f64> {
        self.route(start, target).map(|route| route.distance)
    }

    /// Finds the minimum-weight path from `start` to `target`.
    ///
    /// Returns `None` when either id is not a node of the snapshot or when
    /// `target` cannot be reached. Weights are taken as given: negative
    /// weights are not detected and may yield non-optimal routes.
    pub fn route(&mut self, start: &str, target: &str) -> Option<Route> {
        let start_idx = self.graph.index_of(start)?;
        let target_idx = self.graph.index_of(target)?;

        let found = self.dijkstra(start_idx, target_idx);

        let route = found.then(|| Route {
            path: self.unfold(target_idx),
            distance: self.distances[target_idx as usize],
        });

        debug!(
            start,
            target,
            distance = route.as_ref().map(|r| r.distance),
            "route query"
        );

        route
    }

    fn dijkstra(&mut self, start: NodeIdx, target: NodeIdx) -> bool {
        self.reset();

        self.distances[start as usize] = 0.0;
        self.queue.push(SearchState {
            node: start,
            distance: 0.0,
        });

        while let Some(SearchState { node, distance }) = self.queue.pop() {
            if self.settled[node as usize] || distance > self.distances[node as usize] {
                continue;
            }

            if node == target {
                break;
            }

            self.settled[node as usize] = true;

            for edge in self.graph.neighbors(self.graph.id_at(node)) {
                let Some(next) = self.graph.index_of(&edge.to) else {
                    continue;
                };
                if self.settled[next as usize] {
                    continue;
                }

                let next_distance = distance + edge.weight;
                if next_distance < self.distances[next as usize] {
                    self.distances[next as usize] = next_distance;
                    self.predecessors[next as usize] = Some(node);
                    self.queue.push(SearchState {
                        node: next,
                        distance: next_distance,
                    });
                }
            }
        }

        self.queue.clear();

        self.distances[target as usize] != f64::INFINITY
    }

    fn unfold(&self, target: NodeIdx) -> Vec<NodeId> {
        let mut path = vec![self.graph.id_at(target).to_owned()];

        let mut node = target;
        while let Some(pred) = self.predecessors[node as usize] {
            path.push(self.graph.id_at(pred).to_owned());
            node = pred;
        }

        path.reverse();
        path
    }

    fn reset(&mut self) {
        self.queue.clear();
        self.distances.fill(f64::INFINITY);
        self.predecessors.fill(None);
        self.settled.fill(false);
    }
}

/// One-shot shortest path query over a snapshot.
pub fn shortest_path(graph: &Graph, start: &str, target: &str) -> Option<Route> {
    Router::new(graph).route(start, target)
}
