//! Render records handed to the drawing collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalogue::Catalogue;
use crate::config::{DisplayOptions, NodeColor};
use crate::graph::{Edge, EdgeAttrs, EdgeKind};
use crate::provider::mean_synapses;

use super::NodeRole;

pub const MIN_EDGE_WIDTH: f64 = 1.0;
pub const MAX_EDGE_WIDTH: f64 = 10.0;

/// Fraction of a node's type/nt code taken by each letter.
pub type ColorBuckets = BTreeMap<String, f64>;

// ─── Nodes ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    pub role: NodeRole,
    /// Open group this node is drawn inside.
    pub parent: Option<String>,
    pub color: ColorBuckets,
    pub input: bool,
    pub selected: bool,
    pub locked: bool,
    /// Group state; `false` and empty for cells and classes.
    pub open: bool,
    pub members: Vec<String>,
}

/// Letter fractions over the concatenation of `codes`.
pub fn color_buckets<'a, I>(codes: I) -> ColorBuckets
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<String, f64> = BTreeMap::new();
    let mut total = 0.0;
    for code in codes {
        for letter in code.chars() {
            *counts.entry(letter.to_string()).or_insert(0.0) += 1.0;
            total += 1.0;
        }
    }
    if total > 0.0 {
        for value in counts.values_mut() {
            *value /= total;
        }
    }
    counts
}

/// The color code of one catalogue entry.
pub fn color_code<'a>(catalogue: &'a Catalogue, id: &str, color: NodeColor) -> &'a str {
    match (catalogue.cell(id), color) {
        (Some(cell), NodeColor::Type) => &cell.cell_type,
        (Some(cell), NodeColor::Nt) => &cell.nt,
        (None, _) => "",
    }
}

// ─── Edges ────────────────────────────────────────────────────────────────────

/// Display class of an edge, derived from its annotation tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationClass {
    Increase,
    Decrease,
    Stable,
    Postembryonic,
    Variable,
    NotClassified,
}

/// First match wins.
const ANNOTATION_PRIORITY: [(&str, AnnotationClass); 5] = [
    ("increase", AnnotationClass::Increase),
    ("decrease", AnnotationClass::Decrease),
    ("stable", AnnotationClass::Stable),
    ("postembryonic", AnnotationClass::Postembryonic),
    ("variable", AnnotationClass::Variable),
];

/// Tags compare case-insensitively, ignoring separators
/// (`Post-embryonic` == `postembryonic`).
fn normalize_tag(tag: &str) -> String {
    tag.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn annotation_class<'a, I>(tags: I) -> AnnotationClass
where
    I: IntoIterator<Item = &'a String>,
{
    let tags: Vec<String> = tags.into_iter().map(|t| normalize_tag(t)).collect();
    ANNOTATION_PRIORITY
        .iter()
        .find(|(tag, _)| tags.iter().any(|t| t == tag))
        .map(|&(_, class)| class)
        .unwrap_or(AnnotationClass::NotClassified)
}

/// Drawn width for a mean synapse count.
pub fn edge_width(kind: EdgeKind, mean: f64) -> f64 {
    let raw = match kind {
        EdgeKind::Chemical => 3.0 * mean.cbrt() - 2.0,
        EdgeKind::Electrical => mean / 2.0,
    };
    raw.clamp(MIN_EDGE_WIDTH, MAX_EDGE_WIDTH)
}

/// Label text for a mean synapse count: integral means print without a
/// fraction, others with one decimal.
pub fn edge_label(mean: f64) -> String {
    if mean.fract() == 0.0 {
        format!("{mean:.0}")
    } else {
        format!("{mean:.1}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    pub synapses: BTreeMap<String, u32>,
    pub annotations: Vec<String>,
    pub width: f64,
    /// Mean synapse count, when edge labels are on.
    pub label: Option<String>,
    /// Set when connection coloring is on.
    pub annotation_class: Option<AnnotationClass>,
}

impl EdgeRecord {
    pub fn from_edge(edge: Edge, options: &DisplayOptions) -> Self {
        let Edge {
            source,
            target,
            kind,
            attrs: EdgeAttrs {
                synapses,
                annotations,
            },
        } = edge;
        let mean = mean_synapses(&synapses, &options.datasets);
        let toggles = options.toggles;
        Self {
            id: edge_id(&source, &target, kind),
            label: toggles.show_edge_label.then(|| edge_label(mean)),
            annotation_class: toggles
                .show_connection_color
                .then(|| annotation_class(&annotations)),
            width: edge_width(kind, mean),
            annotations: annotations.into_iter().collect(),
            source,
            target,
            kind,
            synapses,
        }
    }
}

/// Stable edge id: `A->B` for chemical, `A--B` for electrical.
pub fn edge_id(source: &str, target: &str, kind: EdgeKind) -> String {
    match kind {
        EdgeKind::Chemical => format!("{source}->{target}"),
        EdgeKind::Electrical => format!("{source}--{target}"),
    }
}
