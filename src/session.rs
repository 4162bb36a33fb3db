use std::collections::HashSet;

use crate::{
    catalog::{Catalog, CatalogChange},
    geotag::WriteOutcome,
    picker::CoordinatePicker,
    presenter::ResultPresenter,
    selection::SelectionTracker,
    ui::ListViewport,
};

/// All state shared between the list, the map and the writer.
///
/// Catalog mutations go through here so the selection and the list viewport
/// see every change before control returns to the caller.
#[derive(Default, Debug)]
pub struct Session {
    catalog: Catalog,
    selection: SelectionTracker,
    pub viewport: ListViewport,
    pub picker: CoordinatePicker,
    pub presenter: ResultPresenter,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn add_paths<I, S>(&mut self, paths: I) -> CatalogChange
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let change = self.catalog.add(paths);
        self.catalog_changed(change);
        change
    }

    pub fn remove(&mut self, ids: &HashSet<String>) -> CatalogChange {
        let change = self.catalog.remove(ids);
        self.catalog_changed(change);
        change
    }

    pub fn remove_selected(&mut self) -> CatalogChange {
        let ids = self.selection.ids().clone();
        self.selection.clear();
        self.remove(&ids)
    }

    pub fn clear(&mut self) -> CatalogChange {
        let change = self.catalog.clear();
        self.catalog_changed(change);
        change
    }

    pub fn apply_write_results(&mut self, results: &[WriteOutcome]) -> CatalogChange {
        let change = self.catalog.apply_write_results(results);
        self.catalog_changed(change);
        change
    }

    pub fn toggle(&mut self, id: &str) {
        self.selection.toggle(id, &self.catalog);
    }

    pub fn toggle_all(&mut self) {
        self.selection.toggle_all(&self.catalog);
    }

    /// Selected ids in catalog order.
    pub fn targets(&self) -> Vec<String> {
        self.selection.targets(&self.catalog)
    }

    fn catalog_changed(&mut self, change: CatalogChange) {
        if change == CatalogChange::Unchanged {
            return;
        }
        if self.selection.reconcile(&self.catalog) {
            tracing::debug!(selected = self.selection.len(), "selection pruned");
        }
        if change.resizes() {
            self.viewport.set_len(self.catalog.len());
        }
    }
}
