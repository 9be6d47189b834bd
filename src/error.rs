use thiserror::Error;

use crate::NodeId;

/// Validation failures of an edit or query. The network is left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("invalid {field}: {value:?} is not a number")]
    InvalidNumber { field: &'static str, value: String },

    #[error("intersection {0} already exists")]
    DuplicateNode(NodeId),

    #[error("cannot connect intersection {0} to itself")]
    SelfLoop(NodeId),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
