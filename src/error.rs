//! Error type shared by the graph, the model and the compiler.
//!
//! Only programmer-contract violations and upstream fetch failures are
//! errors. User-actionable conditions travel as [`crate::notices::Notice`]s.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("node '{0}' is not in the graph")]
    UnknownNode(String),

    #[error("group '{0}' does not exist")]
    UnknownGroup(String),

    #[error("group '{0}' already exists")]
    DuplicateGroup(String),

    #[error("'{member}' is not a member of group '{group}'")]
    NotAMember { member: String, group: String },

    #[error("'{member}' already belongs to group '{group}'")]
    AlreadyGrouped { member: String, group: String },

    #[error("group '{0}' cannot be a member of another group")]
    NestedGroup(String),

    #[error("no position stored for '{0}'")]
    MissingPosition(String),

    #[error("selection spans groups '{first}' and '{second}'")]
    AmbiguousGroup { first: String, second: String },

    #[error("connection fetch failed: {0}")]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
