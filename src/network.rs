use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{router, EditError, Edge, Graph, Node, NodeId, Position, Route};

/// Addresses a road by its two endpoints, in either order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoadKey {
    a: NodeId,
    b: NodeId,
}

impl RoadKey {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        let (from, to) = (from.into(), to.into());
        if from <= to {
            Self { a: from, b: to }
        } else {
            Self { a: to, b: from }
        }
    }

    pub fn of(edge: &Edge) -> Self {
        Self::new(edge.from.as_str(), edge.to.as_str())
    }

    pub fn endpoints(&self) -> (&str, &str) {
        (&self.a, &self.b)
    }

    pub fn matches(&self, edge: &Edge) -> bool {
        (edge.from == self.a && edge.to == self.b) || (edge.from == self.b && edge.to == self.a)
    }

    fn validate(&self) -> Result<(), EditError> {
        if self.a.is_empty() || self.b.is_empty() {
            return Err(EditError::MissingField("road"));
        }
        Ok(())
    }
}

impl fmt::Display for RoadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NetworkEvent {
    NodeAdded(NodeId),
    EdgeAdded {
        from: NodeId,
        to: NodeId,
        weight: f64,
    },
    EdgeWeightChanged {
        road: RoadKey,
        weight: f64,
        count: usize,
    },
    NodeRemoved {
        id: NodeId,
        edges_removed: usize,
    },
    EdgeRemoved {
        road: RoadKey,
        count: usize,
    },
    Replaced,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&NetworkEvent)>;

/// The editable road network: intersections, roads and their change
/// subscribers.
///
/// Every mutation validates its input first and leaves the network untouched
/// when it fails. Subscribers are called after a mutation that changed
/// something, never for rejected or no-op edits.
#[derive(Default)]
pub struct RoadNetwork {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl RoadNetwork {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes,
            edges,
            ..Self::default()
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&NetworkEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn add_node(&mut self, id: impl Into<NodeId>, position: Position) -> Result<(), EditError> {
        let id = id.into();

        if id.is_empty() {
            return Err(EditError::MissingField("intersection id"));
        }
        check_number("latitude", position.latitude)?;
        check_number("longitude", position.longitude)?;
        if self.node(&id).is_some() {
            return Err(EditError::DuplicateNode(id));
        }

        debug!(%id, ?position, "adding intersection");
        self.nodes.push(Node::new(id.as_str(), position));
        self.notify(NetworkEvent::NodeAdded(id));

        Ok(())
    }

    pub fn add_edge(
        &mut self,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        weight: f64,
    ) -> Result<(), EditError> {
        let (from, to) = (from.into(), to.into());

        if from.is_empty() {
            return Err(EditError::MissingField("start of road"));
        }
        if to.is_empty() {
            return Err(EditError::MissingField("end of road"));
        }
        check_number("weight", weight)?;
        if from == to {
            return Err(EditError::SelfLoop(from));
        }

        for endpoint in [&from, &to] {
            if self.node(endpoint).is_none() {
                warn!(%endpoint, "road references an unknown intersection");
            }
        }

        debug!(%from, %to, weight, "adding road");
        self.edges.push(Edge::new(from.as_str(), to.as_str(), weight));
        self.notify(NetworkEvent::EdgeAdded { from, to, weight });

        Ok(())
    }

    /// Sets the weight of every road matching `road`. Returns how many roads
    /// were updated.
    pub fn set_edge_weight(&mut self, road: &RoadKey, weight: f64) -> Result<usize, EditError> {
        road.validate()?;
        check_number("weight", weight)?;

        let mut count = 0;
        for edge in self.edges.iter_mut().filter(|edge| road.matches(edge)) {
            edge.weight = weight;
            count += 1;
        }

        debug!(%road, weight, count, "modified road weight");
        if count > 0 {
            self.notify(NetworkEvent::EdgeWeightChanged {
                road: road.clone(),
                weight,
                count,
            });
        }

        Ok(count)
    }

    /// Removes an intersection together with every road touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<Option<Node>, EditError> {
        if id.is_empty() {
            return Err(EditError::MissingField("intersection"));
        }

        let removed = self
            .nodes
            .iter()
            .position(|node| node.id == id)
            .map(|idx| self.nodes.remove(idx));

        let before = self.edges.len();
        self.edges.retain(|edge| edge.from != id && edge.to != id);
        let edges_removed = before - self.edges.len();

        debug!(id, edges_removed, found = removed.is_some(), "removed intersection");
        if removed.is_some() || edges_removed > 0 {
            self.notify(NetworkEvent::NodeRemoved {
                id: id.to_owned(),
                edges_removed,
            });
        }

        Ok(removed)
    }

    /// Removes every road matching `road`. Returns how many were removed.
    pub fn remove_edge(&mut self, road: &RoadKey) -> Result<usize, EditError> {
        road.validate()?;

        let before = self.edges.len();
        self.edges.retain(|edge| !road.matches(edge));
        let count = before - self.edges.len();

        debug!(%road, count, "removed road");
        if count > 0 {
            self.notify(NetworkEvent::EdgeRemoved {
                road: road.clone(),
                count,
            });
        }

        Ok(count)
    }

    /// Swaps in a whole new node and edge list, e.g. after loading or a reset.
    pub fn replace(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        self.nodes = nodes;
        self.edges = edges;
        self.notify(NetworkEvent::Replaced);
    }

    /// Builds a fresh adjacency snapshot of the current network.
    pub fn snapshot(&self) -> Graph {
        Graph::new(self.nodes.iter().map(|node| node.id.as_str()), &self.edges)
    }

    /// Shortest route between two intersections. `Ok(None)` means there is
    /// no path.
    pub fn route(&self, start: &str, end: &str) -> Result<Option<Route>, EditError> {
        if start.is_empty() {
            return Err(EditError::MissingField("start intersection"));
        }
        if end.is_empty() {
            return Err(EditError::MissingField("end intersection"));
        }

        Ok(router::shortest_path(&self.snapshot(), start, end))
    }

    fn notify(&mut self, event: NetworkEvent) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&event);
        }
    }
}

impl fmt::Debug for RoadNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoadNetwork")
            .field("nodes", &self.nodes)
            .field("edges", &self.edges)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

fn check_number(field: &'static str, value: f64) -> Result<(), EditError> {
    if value.is_nan() {
        return Err(EditError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crate::*;

    fn triangle() -> RoadNetwork {
        let mut network = RoadNetwork::default();
        network.add_node("1", Position::new(0.0, 0.0)).unwrap();
        network.add_node("2", Position::new(0.0, 1.0)).unwrap();
        network.add_node("3", Position::new(1.0, 1.0)).unwrap();
        network.add_edge("1", "2", 2.0).unwrap();
        network.add_edge("2", "3", 3.0).unwrap();
        network.add_edge("1", "3", 10.0).unwrap();
        network
    }

    #[test]
    fn test_add_node() {
        let network = triangle();

        let node = network.node("2").unwrap();
        assert_eq!(node.name, "Intersection 2");
        assert_eq!(node.position, Position::new(0.0, 1.0));
    }

    #[test]
    fn test_add_node_rejections() {
        let mut network = triangle();

        assert_eq!(
            network.add_node("", Position::new(0.0, 0.0)),
            Err(EditError::MissingField("intersection id"))
        );
        assert_eq!(
            network.add_node("2", Position::new(5.0, 5.0)),
            Err(EditError::DuplicateNode("2".into()))
        );
        assert!(matches!(
            network.add_node("9", Position::new(f64::NAN, 0.0)),
            Err(EditError::InvalidNumber { field: "latitude", .. })
        ));
        assert_eq!(network.nodes().len(), 3);
    }

    #[test]
    fn test_ids_compare_exactly() {
        let mut network = RoadNetwork::default();
        network.add_node("a", Position::new(0.0, 0.0)).unwrap();

        assert!(network.add_node("A", Position::new(0.0, 0.0)).is_ok());
        assert!(network.add_node("a", Position::new(0.0, 0.0)).is_err());
    }

    #[test]
    fn test_add_edge_rejections() {
        let mut network = triangle();
        let edges = network.edges().to_vec();

        assert_eq!(network.add_edge("1", "1", 1.0), Err(EditError::SelfLoop("1".into())));
        assert_eq!(
            network.add_edge("", "1", 1.0),
            Err(EditError::MissingField("start of road"))
        );
        assert!(network.add_edge("1", "2", f64::NAN).is_err());
        assert_eq!(network.edges(), edges);
    }

    #[test]
    fn test_parallel_edges_allowed() {
        let mut network = triangle();
        network.add_edge("2", "1", 1.0).unwrap();

        assert_eq!(network.edges().len(), 4);
        assert_eq!(network.route("1", "2").unwrap().unwrap().distance, 1.0);
    }

    #[test]
    fn test_set_edge_weight_either_direction() {
        let mut network = triangle();

        assert_eq!(network.set_edge_weight(&RoadKey::new("3", "1"), 1.0), Ok(1));
        assert_eq!(network.edges()[2].weight, 1.0);

        let route = network.route("1", "3").unwrap().unwrap();
        assert_eq!(route.path, vec!["1", "3"]);
        assert_eq!(route.distance, 1.0);

        assert_eq!(network.set_edge_weight(&RoadKey::new("1", "9"), 1.0), Ok(0));
        assert_eq!(
            network.set_edge_weight(&RoadKey::new("", "1"), 1.0),
            Err(EditError::MissingField("road"))
        );
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut network = triangle();

        let removed = network.remove_node("2").unwrap();
        assert_eq!(removed.map(|node| node.id), Some("2".to_string()));
        assert_eq!(network.edges(), [Edge::new("1", "3", 10.0)]);
        assert!(network.node("2").is_none());
    }

    #[test]
    fn test_remove_edge() {
        let mut network = triangle();
        network.add_edge("2", "1", 7.0).unwrap();

        assert_eq!(network.remove_edge(&RoadKey::new("2", "1")), Ok(2));
        assert_eq!(network.edges().len(), 2);
        assert_eq!(network.remove_edge(&RoadKey::new("2", "1")), Ok(0));
    }

    #[test]
    fn test_set_edge_weight_updates_parallel_edges() {
        let mut network = triangle();
        network.add_edge("2", "1", 7.0).unwrap();

        assert_eq!(network.set_edge_weight(&RoadKey::new("1", "2"), 4.0), Ok(2));
        assert_eq!(network.edges()[0], Edge::new("1", "2", 4.0));
        assert_eq!(network.edges()[3], Edge::new("2", "1", 4.0));
        assert_eq!(network.edges()[1].weight, 3.0);
    }

    #[test]
    fn test_route_requires_selection() {
        let network = triangle();

        assert_eq!(
            network.route("", "3"),
            Err(EditError::MissingField("start intersection"))
        );
        assert_eq!(
            network.route("1", "3").unwrap().map(|route| route.path),
            Some(vec!["1".to_string(), "2".to_string(), "3".to_string()])
        );
    }

    #[test]
    fn test_subscribers() {
        let mut network = triangle();
        let events = Rc::new(RefCell::new(vec![]));

        let sink = events.clone();
        let id = network.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        network.add_node("4", Position::new(2.0, 2.0)).unwrap();
        network.add_edge("4", "4", 1.0).unwrap_err();
        network.remove_edge(&RoadKey::new("1", "4")).unwrap();
        network.remove_node("2").unwrap();

        assert!(network.unsubscribe(id));
        network.add_node("5", Position::new(3.0, 3.0)).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                NetworkEvent::NodeAdded("4".into()),
                NetworkEvent::NodeRemoved {
                    id: "2".into(),
                    edges_removed: 2,
                },
            ]
        );
    }
}
