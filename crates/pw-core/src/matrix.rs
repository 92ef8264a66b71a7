//! Transition counting.
//!
//! Walks each entity's chronological event sequence and counts how often one
//! category is immediately followed by another. Frequencies are raw counts;
//! no normalization or decay is applied.

use serde::{Serialize, Serializer};

use crate::encode::CategoryIndex;
use crate::event::PathEvent;
use crate::types::{CategoryId, EntityId};

/// Dense `N × N` matrix of consecutive-transition counts.
///
/// Cell `[r][c]` counts the times an event with category id `r + 1` was
/// immediately followed, within one entity's sequence, by an event with
/// category id `c + 1`. Dense storage is adequate for category counts in the
/// tens to low hundreds; a sparse map keyed by `(source, target)` would be a
/// drop-in replacement if cardinality ever grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionMatrix {
    len: usize,
    /// Row-major cells, `len * len` entries.
    cells: Vec<u64>,
}

impl TransitionMatrix {
    pub(crate) fn zeroed(len: usize) -> Self {
        Self {
            len,
            cells: vec![0; len * len],
        }
    }

    /// Number of categories (rows and columns).
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for the zero-category matrix of an empty run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The count for the `source → target` transition.
    #[must_use]
    pub fn get(&self, source: CategoryId, target: CategoryId) -> u64 {
        self.cells
            .get(source.index() * self.len + target.index())
            .copied()
            .unwrap_or(0)
    }

    fn increment(&mut self, source: CategoryId, target: CategoryId) {
        let cell = source.index() * self.len + target.index();
        if let Some(count) = self.cells.get_mut(cell) {
            *count += 1;
        }
    }

    /// Sum of all cells: the total number of observed transitions.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.cells.iter().sum()
    }

    /// Rows in id order; row `r` holds the outgoing counts of category `r + 1`.
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        self.cells.chunks(self.len.max(1))
    }
}

impl Serialize for TransitionMatrix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.rows())
    }
}

/// Entities that contributed exactly one event, in input order.
///
/// A singleton yields no transition and never materializes into an edge; the
/// record exists purely as a diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Singletons {
    pub entities: Vec<EntityId>,
}

impl Singletons {
    /// Number of singleton entities.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entities.len()
    }
}

/// Counts consecutive transitions for every entity in `events`.
///
/// Events must arrive grouped contiguously by entity, each group in
/// chronological order; ids are resolved through `index`, which is expected
/// to have been built from the same event set.
pub fn count_transitions(
    events: &[PathEvent],
    index: &CategoryIndex,
) -> (TransitionMatrix, Singletons) {
    let mut matrix = TransitionMatrix::zeroed(index.len());
    let mut singletons = Singletons::default();

    for group in events.chunk_by(|a, b| a.entity == b.entity) {
        if group.len() == 1 {
            singletons.entities.push(group[0].entity.clone());
            continue;
        }
        for pair in group.windows(2) {
            let (Some(source), Some(target)) = (
                index.id_of(&pair[0].category),
                index.id_of(&pair[1].category),
            ) else {
                tracing::warn!(
                    entity = %pair[0].entity,
                    "category missing from index; skipping transition"
                );
                continue;
            };
            matrix.increment(source, target);
        }
    }

    (matrix, singletons)
}
