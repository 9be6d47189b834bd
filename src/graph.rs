use rustc_hash::FxHashMap;

use crate::{Edge, NodeId};

pub(crate) type HashMap<K, V> = FxHashMap<K, V>;

pub(crate) type NodeIdx = u32;

#[derive(Clone, Debug, PartialEq)]
pub struct Neighbor {
    pub to: NodeId,
    pub weight: f64,
}

/// Immutable adjacency snapshot of the road network.
///
/// Roads are undirected, so every edge is stored once per direction. Edge
/// endpoints are not checked against the node list: an unknown endpoint gets
/// an adjacency entry of its own but can never be reached by the router.
pub struct Graph {
    nodes: Vec<NodeId>,
    node_idx: HashMap<NodeId, NodeIdx>,
    adjacency: HashMap<NodeId, Vec<Neighbor>>,
}

impl Graph {
    pub fn new<'a>(node_ids: impl IntoIterator<Item = &'a str>, edges: &[Edge]) -> Self {
        let mut nodes = vec![];
        let mut node_idx = HashMap::default();
        let mut adjacency: HashMap<NodeId, Vec<Neighbor>> = HashMap::default();

        for id in node_ids {
            if node_idx.contains_key(id) {
                continue;
            }
            node_idx.insert(id.to_owned(), nodes.len() as NodeIdx);
            adjacency.insert(id.to_owned(), vec![]);
            nodes.push(id.to_owned());
        }

        for edge in edges {
            adjacency.entry(edge.from.clone()).or_default().push(Neighbor {
                to: edge.to.clone(),
                weight: edge.weight,
            });
            adjacency.entry(edge.to.clone()).or_default().push(Neighbor {
                to: edge.from.clone(),
                weight: edge.weight,
            });
        }

        Self {
            nodes,
            node_idx,
            adjacency,
        }
    }

    /// Node ids in iteration order. The router breaks distance ties by this order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn node_count(&self) -> u32 {
        self.nodes.len() as u32
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_idx.contains_key(id)
    }

    pub fn neighbors(&self, id: &str) -> &[Neighbor] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIdx> {
        self.node_idx.get(id).copied()
    }

    pub(crate) fn id_at(&self, idx: NodeIdx) -> &str {
        &self.nodes[idx as usize]
    }
}
