//! Static cell, class and dataset catalogue.
//!
//! Resolves class ↔ member mappings and the validity predicates the model
//! needs (post-embryonic cells, dataset coverage, legacy split limits).
//! Ids are upper-cased on the way in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ─── Records ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    #[default]
    Cell,
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellInfo {
    pub id: String,
    /// Display name; falls back to the id when empty.
    pub name: String,
    pub kind: CellKind,
    /// Owning class for an individual cell.
    pub class: Option<String>,
    /// One letter per cell type (s, i, m, n, b, u, …).
    pub cell_type: String,
    /// One letter per neurotransmitter (a, d, g, l, o, s, t, u, n, …).
    pub nt: String,
    pub postembryonic: bool,
    /// Datasets that contain this cell. Empty means every dataset.
    pub datasets: Vec<String>,
}

impl CellInfo {
    pub fn cell(id: impl Into<String>, class: Option<&str>) -> Self {
        Self {
            id: id.into(),
            kind: CellKind::Cell,
            class: class.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn class(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: CellKind::Class,
            ..Self::default()
        }
    }

    pub fn with_type(mut self, cell_type: &str, nt: &str) -> Self {
        self.cell_type = cell_type.to_string();
        self.nt = nt.to_string();
        self
    }

    pub fn postembryonic(mut self) -> Self {
        self.postembryonic = true;
        self
    }

    pub fn in_datasets(mut self, datasets: &[&str]) -> Self {
        self.datasets = datasets.iter().map(|d| d.to_string()).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetInfo {
    pub id: String,
    pub name: String,
    /// Reconstructions that predate member-level annotation of some classes.
    /// Carried through for front ends to label such datasets; split limits
    /// come from `unsplittable_classes` alone.
    pub legacy: bool,
    /// Classes whose members this dataset cannot show individually.
    pub unsplittable_classes: Vec<String>,
}

impl DatasetInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

// ─── Catalogue ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "CatalogueParts", into = "CatalogueParts")]
pub struct Catalogue {
    cells: BTreeMap<String, CellInfo>,
    members: BTreeMap<String, Vec<String>>,
    datasets: Vec<DatasetInfo>,
}

/// Serialized shape of a [`Catalogue`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueParts {
    pub cells: Vec<CellInfo>,
    pub datasets: Vec<DatasetInfo>,
}

impl From<CatalogueParts> for Catalogue {
    fn from(parts: CatalogueParts) -> Self {
        Catalogue::from_parts(parts.cells, parts.datasets)
    }
}

impl From<Catalogue> for CatalogueParts {
    fn from(catalogue: Catalogue) -> Self {
        CatalogueParts {
            cells: catalogue.cells.into_values().collect(),
            datasets: catalogue.datasets,
        }
    }
}

impl Catalogue {
    /// Build from raw records. Member lists follow record order.
    pub fn from_parts(cells: Vec<CellInfo>, datasets: Vec<DatasetInfo>) -> Self {
        let mut by_id = BTreeMap::new();
        let mut members: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for mut cell in cells {
            cell.id = cell.id.to_uppercase();
            cell.class = cell.class.map(|c| c.to_uppercase());
            if let (CellKind::Cell, Some(class)) = (cell.kind, &cell.class) {
                let list = members.entry(class.clone()).or_default();
                if !list.contains(&cell.id) {
                    list.push(cell.id.clone());
                }
            }
            by_id.insert(cell.id.clone(), cell);
        }
        let datasets = datasets
            .into_iter()
            .map(|mut d| {
                d.unsplittable_classes = d
                    .unsplittable_classes
                    .iter()
                    .map(|c| c.to_uppercase())
                    .collect();
                d
            })
            .collect();
        Self {
            cells: by_id,
            members,
            datasets,
        }
    }

    pub fn cell(&self, id: &str) -> Option<&CellInfo> {
        self.cells.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cells.contains_key(id)
    }

    pub fn is_class(&self, id: &str) -> bool {
        self.cells.get(id).is_some_and(|c| c.kind == CellKind::Class)
    }

    pub fn is_cell(&self, id: &str) -> bool {
        self.cells.get(id).is_some_and(|c| c.kind == CellKind::Cell)
    }

    /// Class of an individual cell. A cell that shares its id with its class
    /// has no distinct class.
    pub fn class_of(&self, id: &str) -> Option<&str> {
        let cell = self.cells.get(id)?;
        match (&cell.kind, &cell.class) {
            (CellKind::Cell, Some(class)) if class != id => Some(class.as_str()),
            _ => None,
        }
    }

    /// Member cells of a class, in catalogue order.
    pub fn members_of(&self, class: &str) -> &[String] {
        self.members.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if the class has individually addressable members, i.e. it is
    /// not just a single cell that shares the class id.
    pub fn has_members(&self, class: &str) -> bool {
        match self.members_of(class) {
            [] => false,
            [only] => only != class,
            _ => true,
        }
    }

    pub fn is_postembryonic(&self, id: &str) -> bool {
        self.cells.get(id).is_some_and(|c| c.postembryonic)
    }

    pub fn name(&self, id: &str) -> String {
        match self.cells.get(id) {
            Some(c) if !c.name.is_empty() => c.name.clone(),
            _ => id.to_string(),
        }
    }

    pub fn dataset(&self, id: &str) -> Option<&DatasetInfo> {
        self.datasets.iter().find(|d| d.id == id)
    }

    pub fn datasets(&self) -> &[DatasetInfo] {
        &self.datasets
    }

    /// True if `id` appears in at least one of `datasets`. A class is
    /// present wherever any of its members is.
    pub fn in_datasets(&self, id: &str, datasets: &[String]) -> bool {
        let Some(cell) = self.cells.get(id) else {
            return false;
        };
        let covered = |c: &CellInfo| {
            c.datasets.is_empty() || c.datasets.iter().any(|d| datasets.contains(d))
        };
        if covered(cell) {
            return true;
        }
        self.members_of(id)
            .iter()
            .filter_map(|m| self.cells.get(m))
            .any(covered)
    }

    /// True if `id` appears in any catalogued dataset.
    pub fn in_any_dataset(&self, id: &str) -> bool {
        let all: Vec<String> = self.datasets.iter().map(|d| d.id.clone()).collect();
        self.in_datasets(id, &all)
    }

    /// True if any of `datasets` forbids splitting `class`.
    pub fn unsplittable_in(&self, class: &str, datasets: &[String]) -> bool {
        self.datasets
            .iter()
            .filter(|d| datasets.contains(&d.id))
            .any(|d| d.unsplittable_classes.iter().any(|c| c == class))
    }
}
