use serde::{Deserialize, Serialize};

use crate::{NodeId, Position, RoadNetwork, Route};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Position,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: Position::new(39.96, -75.60),
            zoom: 14,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: NodeId,
    pub label: String,
    pub position: Position,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub from: NodeId,
    pub to: NodeId,
    pub positions: [Position; 2],
    pub weight: f64,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub from: NodeId,
    pub to: NodeId,
    pub positions: [Position; 2],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapScene {
    pub view: MapView,
    pub markers: Vec<Marker>,
    pub roads: Vec<RoadSegment>,
    pub route: Vec<RouteSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_distance: Option<f64>,
}

impl MapScene {
    /// Roads or route legs whose endpoints are no longer in the network are
    /// left out.
    pub fn build(view: MapView, network: &RoadNetwork, route: Option<&Route>) -> Self {
        let position = |id: &str| network.node(id).map(|node| node.position);

        let markers = network
            .nodes()
            .iter()
            .map(|node| Marker {
                id: node.id.clone(),
                label: node.name.clone(),
                position: node.position,
            })
            .collect();

        let roads = network
            .edges()
            .iter()
            .filter_map(|edge| {
                Some(RoadSegment {
                    positions: [position(edge.from.as_str())?, position(edge.to.as_str())?],
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    weight: edge.weight,
                    label: format!("Weight: {}", edge.weight),
                })
            })
            .collect();

        let route_segments = route
            .map(|route| {
                route
                    .path
                    .windows(2)
                    .filter_map(|leg| {
                        Some(RouteSegment {
                            positions: [position(leg[0].as_str())?, position(leg[1].as_str())?],
                            from: leg[0].clone(),
                            to: leg[1].clone(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            view,
            markers,
            roads,
            route: route_segments,
            route_distance: route.map(|route| route.distance),
        }
    }
}
