use std::collections::{HashMap, HashSet};

use crate::geotag::WriteOutcome;

/// Result of the most recent batch write that included an entry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum WriteStatus {
    /// Never part of a completed write.
    #[default]
    Unset,
    Succeeded,
    Failed,
}

impl WriteStatus {
    pub fn from_success(success: bool) -> Self {
        if success {
            WriteStatus::Succeeded
        } else {
            WriteStatus::Failed
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageEntry {
    pub id: String,
    pub status: WriteStatus,
}

impl ImageEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: WriteStatus::Unset,
        }
    }

    /// Last path component, used as the row title.
    pub fn file_name(&self) -> &str {
        self.id
            .rsplit(is_separator)
            .find(|part| !part.is_empty())
            .unwrap_or(&self.id)
    }

    /// Parent directory and file name, used as the row subtitle.
    pub fn short_path(&self) -> String {
        let mut parts = self.id.rsplit(is_separator).filter(|part| !part.is_empty());
        match (parts.next(), parts.next()) {
            (Some(name), Some(parent)) => format!("{parent}/{name}"),
            (Some(name), None) => name.to_string(),
            _ => self.id.clone(),
        }
    }
}

/// What a catalog mutation did, forwarded to the selection and list view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CatalogChange {
    Unchanged,
    Grew { added: usize },
    Shrunk { removed: usize },
    Cleared,
    StatusesUpdated { updated: usize },
}

impl CatalogChange {
    /// True when ids may have disappeared from the catalog.
    pub fn shrinks(self) -> bool {
        matches!(self, CatalogChange::Shrunk { .. } | CatalogChange::Cleared)
    }

    pub fn resizes(self) -> bool {
        matches!(
            self,
            CatalogChange::Grew { .. } | CatalogChange::Shrunk { .. } | CatalogChange::Cleared
        )
    }
}

/// Ordered image entries keyed by their path.
#[derive(Default, Debug)]
pub struct Catalog {
    entries: Vec<ImageEntry>,
    ids: HashSet<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every path not already present, keeping existing order.
    pub fn add<I, S>(&mut self, paths: I) -> CatalogChange
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for path in paths {
            let path = path.into();
            if self.ids.contains(&path) {
                continue;
            }
            self.ids.insert(path.clone());
            self.entries.push(ImageEntry::new(path));
            added += 1;
        }
        if added == 0 {
            CatalogChange::Unchanged
        } else {
            CatalogChange::Grew { added }
        }
    }

    pub fn remove(&mut self, ids: &HashSet<String>) -> CatalogChange {
        if ids.is_empty() {
            return CatalogChange::Unchanged;
        }
        let before = self.entries.len();
        self.entries.retain(|entry| !ids.contains(&entry.id));
        let removed = before - self.entries.len();
        if removed == 0 {
            return CatalogChange::Unchanged;
        }
        self.ids.retain(|id| !ids.contains(id));
        if self.entries.is_empty() {
            CatalogChange::Cleared
        } else {
            CatalogChange::Shrunk { removed }
        }
    }

    pub fn clear(&mut self) -> CatalogChange {
        if self.entries.is_empty() {
            return CatalogChange::Unchanged;
        }
        self.entries.clear();
        self.ids.clear();
        CatalogChange::Cleared
    }

    /// Overwrites the status of every entry mentioned in `results`.
    pub fn apply_write_results(&mut self, results: &[WriteOutcome]) -> CatalogChange {
        let by_path: HashMap<&str, bool> = results
            .iter()
            .map(|r| (r.path.as_str(), r.success))
            .collect();
        let mut updated = 0;
        for entry in &mut self.entries {
            if let Some(&success) = by_path.get(entry.id.as_str()) {
                entry.status = WriteStatus::from_success(success);
                updated += 1;
            }
        }
        if updated == 0 {
            CatalogChange::Unchanged
        } else {
            CatalogChange::StatusesUpdated { updated }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ImageEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.ids
    }

    pub fn status_of(&self, id: &str) -> Option<WriteStatus> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.status)
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}
