mod defaults;
mod error;
mod graph;
mod input;
mod network;
mod render;
mod router;
mod session;
mod storage;

use serde::{Deserialize, Deserializer, Serialize};

pub use defaults::default_nodes;
pub use error::{EditError, SessionError, StorageError};
pub use graph::{Graph, Neighbor};
pub use input::{parse_number, CoordinateFields, NodeForm, RoadForm, WeightForm};
pub use network::{NetworkEvent, RoadKey, RoadNetwork, SubscriptionId};
pub use render::{MapScene, MapView, Marker, RoadSegment, RouteSegment};
pub use router::{shortest_path, Route, Router};
pub use session::Session;
pub use storage::{
    load_network, save_network, FileStore, KeyValueStore, MemoryStore, EDGES_KEY, NODES_KEY,
};

pub type NodeId = String;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<[f64; 2]> for Position {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Position> for [f64; 2] {
    fn from(position: Position) -> Self {
        [position.latitude, position.longitude]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(deserialize_with = "node_id")]
    pub id: NodeId,
    pub name: String,
    pub position: Position,
}

impl Node {
    /// Creates a node named the way new intersections are named in the editor.
    pub fn new(id: impl Into<NodeId>, position: Position) -> Self {
        let id = id.into();
        Self {
            name: format!("Intersection {id}"),
            id,
            position,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(deserialize_with = "node_id")]
    pub from: NodeId,
    #[serde(deserialize_with = "node_id")]
    pub to: NodeId,
    pub weight: f64,
}

impl Edge {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>, weight: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight,
        }
    }
}

// Older snapshots store ids as JSON numbers.
fn node_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NodeId, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
