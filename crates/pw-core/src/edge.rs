//! Edge extraction from the transition matrix.

use serde::Serialize;

use crate::matrix::TransitionMatrix;
use crate::types::CategoryId;

/// Edge directionality. Pathway edges are always directed: an entity used one
/// service and then the other, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EdgeKind {
    Directed,
}

impl EdgeKind {
    /// String form used in the output tables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Directed => "Directed",
        }
    }
}

/// One observed category-to-category transition, weighted by frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: CategoryId,
    pub target: CategoryId,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    /// 0-based sequential id in emission order.
    pub id: u64,
    /// Raw transition count from the matrix cell.
    pub weight: u64,
}

/// Emits one edge per nonzero matrix cell.
///
/// Iteration is target-major: target id ascending in the outer loop, source
/// id ascending in the inner loop, with edge ids assigned sequentially from 0
/// in that exact order. Consumers may rely on this ordering for determinism.
/// Self-loops are ordinary edges; nothing suppresses them.
pub fn extract_edges(matrix: &TransitionMatrix) -> Vec<Edge> {
    let mut edges = Vec::new();
    for target_index in 0..matrix.len() {
        for source_index in 0..matrix.len() {
            let source = CategoryId::from_index(source_index);
            let target = CategoryId::from_index(target_index);
            let weight = matrix.get(source, target);
            if weight > 0 {
                edges.push(Edge {
                    source,
                    target,
                    kind: EdgeKind::Directed,
                    id: edges.len() as u64,
                    weight,
                });
            }
        }
    }
    edges
}
