//! Input list validation and the notices tied to it.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::notices::Notice;

use super::Model;

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,;]+").expect("valid separator regex"));
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_\-]*$").expect("valid token regex"));

/// Split free text into upper-cased ids. Malformed tokens are dropped.
pub fn parse_input_query(text: &str) -> Vec<String> {
    SEPARATOR
        .split(text.trim())
        .filter(|token| TOKEN.is_match(token))
        .map(str::to_uppercase)
        .collect()
}

impl Model {
    /// Normalize a raw input list: upper-case, drop unknown ids and
    /// duplicates, and drop any member whose class is also present.
    pub fn valid_input(&self, raw: &[String]) -> Vec<String> {
        let mut deduped: Vec<String> = Vec::new();
        for id in raw {
            let id = id.to_uppercase();
            if self.catalogue.contains(&id) && !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        let present: HashSet<&str> = deduped.iter().map(String::as_str).collect();
        deduped
            .iter()
            .filter(|id| {
                self.catalogue
                    .class_of(id)
                    .is_none_or(|class| !present.contains(class))
            })
            .cloned()
            .collect()
    }

    /// Replace the input.
    ///
    /// Newly added ids may raise notices (post-embryonic while those are
    /// hidden, or absent from the selected datasets but present in others),
    /// are unhidden, and bring split/joined in line with the representation
    /// actually present.
    pub fn set_input(&mut self, raw: &[String]) -> Result<()> {
        let input = self.valid_input(raw);
        let previous: HashSet<&String> = self.state.input.iter().collect();
        let added: Vec<String> = input
            .iter()
            .filter(|id| !previous.contains(id))
            .cloned()
            .collect();

        if !self.options.toggles.show_postemb {
            let postemb: Vec<String> = added
                .iter()
                .filter(|id| self.catalogue.is_postembryonic(id))
                .cloned()
                .collect();
            if !postemb.is_empty() {
                tracing::warn!(cells = ?postemb, "post-embryonic cells requested while hidden");
                self.notify(Notice::postembryonic_hidden(postemb));
            }
        }
        if !self.options.datasets.is_empty() {
            let elsewhere: Vec<String> = added
                .iter()
                .filter(|id| {
                    !self.catalogue.in_datasets(id, &self.options.datasets)
                        && self.catalogue.in_any_dataset(id)
                })
                .cloned()
                .collect();
            if !elsewhere.is_empty() {
                self.notify(Notice::connections_elsewhere(elsewhere));
            }
        }

        for id in &input {
            if let Some(class) = self.catalogue.class_of(id) {
                self.state.joined.remove(class);
                self.state.split.insert(class.to_string());
            } else if self.catalogue.has_members(id) {
                self.state.split.remove(id);
            }
        }

        self.state.input = input;
        let reappeared: Vec<String> = added
            .into_iter()
            .filter(|id| self.state.hidden.contains(id))
            .collect();
        self.unhide(&reappeared)?;
        tracing::debug!(input = ?self.state.input, "input set");
        Ok(())
    }

    /// Restore input from a saved state: classes listed in `split` are
    /// expanded into their members before validation.
    pub fn set_input_from_url_state(&mut self, raw: &[String], split: &[String]) -> Result<()> {
        let split: BTreeSet<String> = split.iter().map(|c| c.to_uppercase()).collect();
        let mut expanded = Vec::new();
        for id in raw {
            let id = id.to_uppercase();
            if split.contains(&id) && self.catalogue.has_members(&id) {
                expanded.extend(self.catalogue.members_of(&id).iter().cloned());
            } else {
                expanded.push(id);
            }
        }
        self.state.split.extend(split);
        self.set_input(&expanded)
    }

    pub fn add_input(&mut self, ids: &[String]) -> Result<()> {
        let mut raw = self.state.input.clone();
        raw.extend(ids.iter().cloned());
        self.set_input(&raw)
    }

    pub fn remove_input(&mut self, ids: &[String]) -> Result<()> {
        let drop: HashSet<String> = ids.iter().map(|id| id.to_uppercase()).collect();
        let raw: Vec<String> = self
            .state
            .input
            .iter()
            .filter(|id| !drop.contains(*id))
            .cloned()
            .collect();
        self.set_input(&raw)
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_input.rs"]
mod tests;
