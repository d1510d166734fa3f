//! Display configuration consumed by the compiler.
//!
//! Everything here is plain data owned by the model and persisted verbatim
//! in the state snapshot.

use serde::{Deserialize, Serialize};

// ─── Enums ────────────────────────────────────────────────────────────────────

/// Which cell attribute drives node color buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeColor {
    #[default]
    Type,
    Nt,
}

/// Layout the rendering collaborator runs when the compiler asks for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutKind {
    #[default]
    Concentric,
    ForceDirected,
    Hierarchical,
    Grid,
}

// ─── Thresholds ───────────────────────────────────────────────────────────────

/// Minimum mean synapse count for a connection to be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub chemical: u32,
    pub electrical: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            chemical: 3,
            electrical: 2,
        }
    }
}

// ─── DisplayToggles ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayToggles {
    /// Keep connections between two nodes that are not in the input.
    pub show_linked: bool,
    /// Show classes by their member cells unless overridden per class.
    pub show_individual: bool,
    pub show_edge_label: bool,
    /// Show cells that are only added after embryogenesis.
    pub show_postemb: bool,
    /// Color edges by their annotation class.
    pub show_connection_color: bool,
}

impl Default for DisplayToggles {
    fn default() -> Self {
        Self {
            show_linked: true,
            show_individual: false,
            show_edge_label: false,
            show_postemb: false,
            show_connection_color: false,
        }
    }
}

// ─── DisplayOptions ───────────────────────────────────────────────────────────

/// Options that shape one compile cycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOptions {
    /// Selected dataset ids. Edge weights average over these.
    pub datasets: Vec<String>,
    pub thresholds: Thresholds,
    pub toggles: DisplayToggles,
    pub node_color: NodeColor,
    pub layout: LayoutKind,
}

impl DisplayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_datasets<I, S>(mut self, datasets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.datasets = datasets.into_iter().map(Into::into).collect();
        self
    }
}
