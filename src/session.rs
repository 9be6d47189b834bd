use tracing::info;

use crate::{
    storage, EditError, KeyValueStore, NetworkEvent, Node, NodeForm, NodeId, Position, RoadForm,
    RoadKey, RoadNetwork, Route, SessionError, SubscriptionId, WeightForm,
};

/// A road network mirrored into a key-value store.
///
/// Every successful edit is written back to the store before the call
/// returns. Rejected edits touch neither the network nor the store.
pub struct Session<S: KeyValueStore> {
    network: RoadNetwork,
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    pub fn open(mut store: S) -> Result<Self, SessionError> {
        let network = storage::load_network(&mut store)?;
        Ok(Self { network, store })
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&NetworkEvent) + 'static) -> SubscriptionId {
        self.network.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.network.unsubscribe(id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn add_node(&mut self, id: impl Into<NodeId>, position: Position) -> Result<(), SessionError> {
        self.edit(|network| network.add_node(id, position))
    }

    pub fn add_edge(
        &mut self,
        from: impl Into<NodeId>,
        to: impl Into<NodeId>,
        weight: f64,
    ) -> Result<(), SessionError> {
        self.edit(|network| network.add_edge(from, to, weight))
    }

    pub fn set_edge_weight(&mut self, road: &RoadKey, weight: f64) -> Result<usize, SessionError> {
        self.edit(|network| network.set_edge_weight(road, weight))
    }

    pub fn remove_node(&mut self, id: &str) -> Result<Option<Node>, SessionError> {
        self.edit(|network| network.remove_node(id))
    }

    pub fn remove_edge(&mut self, road: &RoadKey) -> Result<usize, SessionError> {
        self.edit(|network| network.remove_edge(road))
    }

    pub fn submit_node(&mut self, form: &NodeForm) -> Result<(), SessionError> {
        let (id, position) = form.parse()?;
        self.add_node(id, position)
    }

    pub fn submit_road(&mut self, form: &RoadForm) -> Result<(), SessionError> {
        let (from, to, weight) = form.parse()?;
        self.add_edge(from, to, weight)
    }

    pub fn submit_weight(&mut self, form: &WeightForm) -> Result<usize, SessionError> {
        let (road, weight) = form.parse()?;
        self.set_edge_weight(&road, weight)
    }

    pub fn route(&self, start: &str, end: &str) -> Result<Option<Route>, EditError> {
        self.network.route(start, end)
    }

    /// Drops the stored network and starts over from the default
    /// intersections.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.store.remove(storage::NODES_KEY)?;
        self.store.remove(storage::EDGES_KEY)?;

        let defaults = storage::load_network(&mut self.store)?;
        let (nodes, edges) = (defaults.nodes().to_vec(), defaults.edges().to_vec());
        self.network.replace(nodes, edges);

        info!("road network reset to defaults");
        Ok(())
    }

    // A storage error leaves the edit applied in memory but unsaved; the next
    // successful edit writes it out.
    fn edit<T>(
        &mut self,
        edit: impl FnOnce(&mut RoadNetwork) -> Result<T, EditError>,
    ) -> Result<T, SessionError> {
        let result = edit(&mut self.network)?;
        storage::save_network(&mut self.store, &self.network)?;
        Ok(result)
    }
}
