//! Error types for network construction.

use thiserror::Error;

/// Fatal errors raised while building one network run.
///
/// The pipeline has no recoverable internal failure path: a detected
/// violation aborts the run and carries enough context (offending label or
/// id) to diagnose it. Zero events or zero categories are not errors; they
/// produce empty tables.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// A category label carries more than one setting value. The caller must
    /// disambiguate such labels into distinct categories before the run.
    #[error("category {label:?} maps to multiple settings: {settings:?}")]
    AmbiguousSetting {
        label: String,
        settings: Vec<String>,
    },

    /// The selected group column is absent from every event in the input.
    #[error("group column {column:?} is absent from the input")]
    MissingGroupColumn { column: String },

    /// An encoded category id has no contributing events at aggregation.
    /// Indicates a bug in the encode/build pipeline, not a data problem.
    #[error("category id {id} ({label:?}) has no contributing events")]
    EmptyCategory { id: u32, label: String },
}
