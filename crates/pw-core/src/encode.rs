//! Category label encoding.
//!
//! Builds the sorted-label-to-integer table once per run. Keeping the table
//! explicit (rather than leaning on any container's iteration order) makes
//! the determinism contract visible: the same label set always yields the
//! same ids, regardless of input row order.

use std::collections::HashMap;

use crate::event::PathEvent;
use crate::types::CategoryId;

/// A label↔id bijection over the distinct categories of one run.
///
/// Ids are dense, 1-based, and assigned in lexicographic label order, so
/// `id(a) < id(b)` exactly when `a < b` for distinct labels.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    /// Position `i` holds the label for id `i + 1`.
    labels: Vec<String>,
    ids: HashMap<String, CategoryId>,
}

impl CategoryIndex {
    /// Builds the index from the categories observed in `events`.
    pub fn from_events(events: &[PathEvent]) -> Self {
        Self::from_labels(events.iter().map(|e| e.category.as_str()))
    }

    /// Builds the index from raw labels. Duplicates are welcome.
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut distinct: Vec<&str> = labels.into_iter().collect();
        distinct.sort_unstable();
        distinct.dedup();

        let labels: Vec<String> = distinct.into_iter().map(str::to_owned).collect();
        let ids = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), CategoryId::from_index(i)))
            .collect();

        Self { labels, ids }
    }

    /// Number of distinct categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when the run has no categories at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The id assigned to `label`, if the label was present at encoding time.
    pub fn id_of(&self, label: &str) -> Option<CategoryId> {
        self.ids.get(label).copied()
    }

    /// The label carrying `id`, if the id is in range.
    pub fn label_of(&self, id: CategoryId) -> Option<&str> {
        self.labels.get(id.index()).map(String::as_str)
    }

    /// All `(id, label)` pairs, id ascending.
    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, &str)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| (CategoryId::from_index(i), label.as_str()))
    }
}
