//! The network model: every mutable state slice plus the compile cycle.
//!
//! [`NetworkState`] is the plain data the compiler reads. [`Model`] owns it
//! together with the catalogue and display options; its operations are
//! spread over the submodules by concern (grouping, split/join, visibility,
//! input, snapshots), all as `impl Model` blocks over the same struct.

pub mod groups;
pub mod grouping;
pub mod input;
pub mod positions;
pub mod split_join;
pub mod state;
pub mod visibility;

use std::collections::{BTreeMap, BTreeSet};

use crate::catalogue::Catalogue;
use crate::compiler::{self, CompiledNetwork};
use crate::config::DisplayOptions;
use crate::error::Result;
use crate::layout::Position;
use crate::notices::Notice;
use crate::provider::{Connection, ConnectionProvider, ConnectionRequest};

use groups::GroupRegistry;
use positions::PositionStore;

pub use input::parse_input_query;
pub use state::{Coordinates, StateSnapshot};

// ─── NetworkState ─────────────────────────────────────────────────────────────

/// Everything the user has done to the network, minus display options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkState {
    /// Ids the user asked to see, in order.
    pub input: Vec<String>,
    pub hidden: BTreeSet<String>,
    /// Classes shown by their members.
    pub split: BTreeSet<String>,
    /// Classes shown as one node although members exist.
    pub joined: BTreeSet<String>,
    /// Raw selection; may hold group ids.
    pub selected: Vec<String>,
    pub groups: GroupRegistry,
    pub positions: PositionStore,
}

impl NetworkState {
    pub fn new() -> Self {
        Self::default()
    }
}

// ─── Model ────────────────────────────────────────────────────────────────────

/// Proof that connections were requested for a given state generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTicket {
    pub generation: u64,
    pub request: ConnectionRequest,
}

#[derive(Debug, Clone, Default)]
pub struct Model {
    catalogue: Catalogue,
    database: String,
    options: DisplayOptions,
    state: NetworkState,
    legend_items: BTreeMap<String, bool>,
    notices: Vec<Notice>,
    generation: u64,
    /// Classes split since the last compile, checked once it lands.
    pending_split_check: Vec<String>,
    network: Option<CompiledNetwork>,
}

impl Model {
    pub fn new(catalogue: Catalogue) -> Self {
        Self {
            catalogue,
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: DisplayOptions) -> Self {
        self.options = options;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn set_database(&mut self, database: &str) {
        self.database = database.to_string();
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut DisplayOptions {
        &mut self.options
    }

    pub fn state(&self) -> &NetworkState {
        &self.state
    }

    pub fn input(&self) -> &[String] {
        &self.state.input
    }

    pub fn hidden(&self) -> &BTreeSet<String> {
        &self.state.hidden
    }

    pub fn split_classes(&self) -> &BTreeSet<String> {
        &self.state.split
    }

    pub fn joined_classes(&self) -> &BTreeSet<String> {
        &self.state.joined
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.state.groups
    }

    pub fn legend_items(&self) -> &BTreeMap<String, bool> {
        &self.legend_items
    }

    pub fn set_legend_item(&mut self, item: &str, visible: bool) {
        self.legend_items.insert(item.to_string(), visible);
    }

    /// Most recent compile result.
    pub fn network(&self) -> Option<&CompiledNetwork> {
        self.network.as_ref()
    }

    /// Drain queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, notice: Notice) {
        tracing::info!(kind = notice.kind.id(), cells = ?notice.cells, "{}", notice.message);
        self.notices.push(notice);
    }

    // ── Positions ─────────────────────────────────────────────────────────

    pub fn positions(&self) -> &PositionStore {
        &self.state.positions
    }

    pub fn position(&self, id: &str) -> Result<Position> {
        self.state.positions.position(id)
    }

    pub fn position_exists(&self, id: &str) -> bool {
        self.state.positions.position_exists(id)
    }

    pub fn locked_positions(&self) -> Vec<String> {
        self.state.positions.locked_positions()
    }

    pub fn set_position(&mut self, id: &str, position: Position) {
        self.state.positions.set_position(id, position);
    }

    pub fn set_positions<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = (String, Position)>,
    {
        self.state.positions.set_positions(positions);
    }

    pub fn set_positions_from_array<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = (String, Position)>,
    {
        self.state.positions.set_positions_from_array(positions);
    }

    /// Set and lock positions, propagating one hop through groups.
    pub fn lock_positions<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = (String, Position)>,
    {
        self.state.positions.lock_positions(positions, &self.state.groups);
    }

    pub fn unlock_positions(&mut self, ids: &[String]) {
        self.state.positions.unlock(ids);
    }

    pub fn remove_positions(&mut self, ids: Option<&[String]>) {
        self.state.positions.remove_positions(ids);
    }

    // ── Compile cycle ─────────────────────────────────────────────────────

    /// Cells the provider is asked about: the input, the members of input
    /// classes and the classes of input cells.
    pub fn connection_request(&self) -> ConnectionRequest {
        let mut cells: BTreeSet<String> = BTreeSet::new();
        for id in &self.state.input {
            cells.insert(id.clone());
            cells.extend(self.catalogue.members_of(id).iter().cloned());
            if let Some(class) = self.catalogue.class_of(id) {
                cells.insert(class.to_string());
            }
        }
        ConnectionRequest {
            cells: cells.into_iter().collect(),
            datasets: self.options.datasets.clone(),
            thresholds: self.options.thresholds,
            include_linked: self.options.toggles.show_linked,
        }
    }

    /// Start a compile cycle. Any ticket handed out earlier becomes stale.
    pub fn begin_update(&mut self) -> UpdateTicket {
        self.generation += 1;
        UpdateTicket {
            generation: self.generation,
            request: self.connection_request(),
        }
    }

    /// Compile with connections fetched for `ticket`. Results for a stale
    /// ticket are dropped and `Ok(None)` is returned.
    pub fn apply_connections(
        &mut self,
        ticket: &UpdateTicket,
        connections: &[Connection],
    ) -> Result<Option<&CompiledNetwork>> {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale connections"
            );
            return Ok(None);
        }
        self.compile_current(connections).map(Some)
    }

    /// Fetch and compile in one go.
    pub fn update<P>(&mut self, provider: &P) -> Result<&CompiledNetwork>
    where
        P: ConnectionProvider + ?Sized,
    {
        let ticket = self.begin_update();
        let connections = provider.fetch(&ticket.request)?;
        self.compile_current(&connections)
    }

    fn compile_current(&mut self, connections: &[Connection]) -> Result<&CompiledNetwork> {
        let network =
            compiler::compile(connections, &self.options, &self.state, &self.catalogue)?;
        self.check_split_members(&network);
        Ok(self.network.insert(network))
    }

    /// Report split classes none of whose members made it into `network`,
    /// either directly or absorbed into a rendered group.
    fn check_split_members(&mut self, network: &CompiledNetwork) {
        let pending = std::mem::take(&mut self.pending_split_check);
        let rendered: BTreeSet<&str> = network.node_ids().into_iter().collect();
        let missing: Vec<String> = pending
            .into_iter()
            .filter(|class| {
                !self.catalogue.members_of(class).iter().any(|m| {
                    rendered.contains(m.as_str())
                        || self
                            .state
                            .groups
                            .parent(m)
                            .is_some_and(|g| rendered.contains(g))
                })
            })
            .collect();
        if !missing.is_empty() {
            let notice = Notice::split_members_filtered(missing, self.options.thresholds);
            self.notify(notice);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_model.rs"]
mod tests;
