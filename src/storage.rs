use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{defaults, graph::HashMap, Edge, Node, RoadNetwork, StorageError};

pub const NODES_KEY: &str = "traffic-nodes";
pub const EDGES_KEY: &str = "traffic-edges";

/// A string key-value store the network is mirrored into.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Keeps each key in its own `<key>.json` file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key);
        let temp = path.with_extension("tmp");
        fs::write(&temp, value)?;
        fs::rename(&temp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// Reads the persisted network.
///
/// Missing nodes fall back to the default intersections and missing edges to
/// no roads. An entry that fails to parse is dropped from the store and
/// treated as missing.
pub fn load_network(store: &mut impl KeyValueStore) -> Result<RoadNetwork, StorageError> {
    let nodes = load_list::<Node>(store, NODES_KEY)?.unwrap_or_else(defaults::default_nodes);
    let edges = load_list::<Edge>(store, EDGES_KEY)?.unwrap_or_default();

    debug!(nodes = nodes.len(), edges = edges.len(), "loaded road network");
    Ok(RoadNetwork::new(nodes, edges))
}

pub fn save_network(
    store: &mut impl KeyValueStore,
    network: &RoadNetwork,
) -> Result<(), StorageError> {
    store.set(NODES_KEY, &serde_json::to_string(network.nodes())?)?;
    store.set(EDGES_KEY, &serde_json::to_string(network.edges())?)?;
    Ok(())
}

fn load_list<T: DeserializeOwned>(
    store: &mut impl KeyValueStore,
    key: &str,
) -> Result<Option<Vec<T>>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(list) => Ok(Some(list)),
        Err(err) => {
            warn!(key, %err, "discarding malformed stored data");
            store.remove(key)?;
            Ok(None)
        }
    }
}
