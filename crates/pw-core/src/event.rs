//! Cleaned pathway events ready for graph construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// One cleaned, chronologically ranked service-use record.
///
/// Events reach the core already sorted: all events of an entity are
/// contiguous, in chronological order. Order within an entity is significant
/// and irreversible information; the core never re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEvent {
    /// The entity whose sequence this event belongs to.
    pub entity: EntityId,
    /// The category occupied (becomes a graph node).
    pub category: String,
    /// The setting attribute carried onto the category's node row.
    pub setting: String,
    /// Length of stay in days.
    pub duration_days: f64,
    /// Subgrouping attributes, keyed by group column name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub groups: BTreeMap<String, String>,
}

impl PathEvent {
    /// Value of a group column, if the event carries it.
    pub fn group_value(&self, column: &str) -> Option<&str> {
        self.groups.get(column).map(String::as_str)
    }
}
