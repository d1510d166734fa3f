//! connectome-scene: working model of a connectivity network and the
//! compiler that turns it into render records.
//!
//! Modules:
//!   graph     : DualEdgeGraph (chemical + electrical edge sets over petgraph)
//!   layout    : grid and circle placement
//!   catalogue : cells, classes, datasets
//!   provider  : connection records and the fetch boundary
//!   config    : display options
//!   notices   : user-facing warnings and info
//!   model     : groups, positions, split/join, hide/select/input, snapshots
//!   compiler  : model state + connections → nodes, edges, positions

pub mod catalogue;
pub mod compiler;
pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod model;
pub mod notices;
pub mod provider;

#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(test)]
#[path = "../tests/rust/fixtures.rs"]
pub(crate) mod fixtures;

pub use catalogue::{Catalogue, CatalogueParts, CellInfo, CellKind, DatasetInfo};
pub use compiler::{CompiledNetwork, EdgeRecord, NodeRecord, NodeRole, compile};
pub use config::{DisplayOptions, DisplayToggles, LayoutKind, NodeColor, Thresholds};
pub use error::{NetworkError, Result};
pub use graph::{DualEdgeGraph, Edge, EdgeAttrs, EdgeKind};
pub use layout::Position;
pub use model::{Model, NetworkState, StateSnapshot, UpdateTicket};
pub use notices::{Notice, NoticeKind, NoticeLevel};
pub use provider::{Connection, ConnectionProvider, ConnectionRequest, StaticConnections};

/// Compiled network plus the notices raised while restoring and compiling.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SceneOutput {
    pub network: CompiledNetwork,
    pub notices: Vec<Notice>,
}

/// Restore `state` over `catalogue`, compile it against `connections` and
/// return the result.
pub fn compile_scene(
    catalogue: Catalogue,
    state: StateSnapshot,
    connections: Vec<Connection>,
) -> Result<SceneOutput> {
    let mut model = Model::new(catalogue);
    model.set_state(state)?;
    let provider = StaticConnections::new(connections);
    let network = model.update(&provider)?.clone();
    Ok(SceneOutput {
        network,
        notices: model.take_notices(),
    })
}

/// JSON-in, JSON-out form of [`compile_scene`].
pub fn compile_scene_json(
    catalogue_json: &str,
    state_json: &str,
    connections_json: &str,
    pretty: bool,
) -> Result<String> {
    let catalogue: Catalogue = serde_json::from_str(catalogue_json)?;
    let state = StateSnapshot::from_json(state_json)?;
    let connections: Vec<Connection> = serde_json::from_str(connections_json)?;
    let output = compile_scene(catalogue, state, connections)?;
    let json = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    Ok(json)
}
