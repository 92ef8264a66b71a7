//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Category ids are 1-based; zero never names a category.
    #[error("category id must be at least 1")]
    ZeroCategoryId,
}

/// The `setting` marker carried by collapsed subgroup nodes, which stand in
/// for events from many categories at once.
pub const MIXTURE_SETTING: &str = "Mixture";

/// A validated entity identifier.
///
/// Entity ids must be non-empty strings. They identify the unit whose
/// chronological event sequence forms one path through the network
/// (e.g., a patient).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::Empty { field: "entity ID" });
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EntityId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A dense 1-based category id assigned by the encoder.
///
/// Ids run from 1 to N for the N distinct category labels of one run and are
/// used directly as node references in the output tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(u32);

impl CategoryId {
    /// Creates a category id after validation.
    pub fn new(id: u32) -> Result<Self, ValidationError> {
        if id == 0 {
            return Err(ValidationError::ZeroCategoryId);
        }
        Ok(Self(id))
    }

    /// The id for the category at zero-based `index` in the encoder's table.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Returns the 1-based id value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the zero-based position for matrix and table indexing.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_rejects_empty() {
        assert!(EntityId::new("").is_err());
        assert!(EntityId::new("1004961").is_ok());
    }

    #[test]
    fn entity_id_serde_roundtrip() {
        let id = EntityId::new("client-42").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"client-42\"");
        let parsed: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn entity_id_serde_rejects_empty() {
        let result: Result<EntityId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn category_id_rejects_zero() {
        assert!(CategoryId::new(0).is_err());
        assert_eq!(CategoryId::new(3).unwrap().get(), 3);
    }

    #[test]
    fn category_id_index_is_zero_based() {
        let id = CategoryId::new(1).unwrap();
        assert_eq!(id.index(), 0);
        assert_eq!(CategoryId::from_index(4).get(), 5);
    }

    #[test]
    fn category_id_serializes_as_number() {
        let id = CategoryId::new(7).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
