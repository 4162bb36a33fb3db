use std::collections::HashSet;

use crate::catalog::Catalog;

/// Ids of the catalog entries marked for the next batch write.
///
/// Every emitted change bumps `revision`, so dependents can tell a replaced
/// selection from one that was left alone.
#[derive(Default, Debug)]
pub struct SelectionTracker {
    selected: HashSet<String>,
    revision: u64,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `id`. Ids unknown to the catalog are ignored.
    pub fn toggle(&mut self, id: &str, catalog: &Catalog) {
        if !self.selected.remove(id) {
            if !catalog.contains(id) {
                return;
            }
            self.selected.insert(id.to_string());
        }
        self.revision += 1;
    }

    /// none/some -> all -> none.
    pub fn toggle_all(&mut self, catalog: &Catalog) {
        if !catalog.is_empty() && self.selected.len() == catalog.len() {
            self.selected.clear();
        } else {
            self.selected = catalog.ids().clone();
        }
        self.revision += 1;
    }

    /// Drops ids that left the catalog. Returns true when a new selection was
    /// emitted.
    pub fn reconcile(&mut self, catalog: &Catalog) -> bool {
        if catalog.is_empty() {
            self.selected.clear();
            self.revision += 1;
            return true;
        }
        let before = self.selected.len();
        self.selected.retain(|id| catalog.contains(id));
        if self.selected.len() == before {
            return false;
        }
        self.revision += 1;
        true
    }

    pub fn clear(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.revision += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.selected
    }

    /// Selected ids in catalog order.
    pub fn targets(&self, catalog: &Catalog) -> Vec<String> {
        catalog
            .iter()
            .filter(|entry| self.selected.contains(&entry.id))
            .map(|entry| entry.id.clone())
            .collect()
    }
}
