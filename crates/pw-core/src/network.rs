//! The per-run pipeline: recode → encode → count → extract.
//!
//! One run takes an immutable configuration and an immutable event set and
//! returns a fresh snapshot of the three output tables. Runs share no state
//! and are free to execute in parallel.

use serde::{Deserialize, Serialize};

use crate::edge::{Edge, extract_edges};
use crate::encode::CategoryIndex;
use crate::error::NetworkError;
use crate::event::PathEvent;
use crate::matrix::{Singletons, TransitionMatrix, count_transitions};
use crate::node::{Node, aggregate_nodes};
use crate::recode::{SubgroupSpec, recode_for_subgroup};

/// Default reserved marker for missing group values.
pub const DEFAULT_SENTINEL: &str = "None";

/// Configuration for one network run.
///
/// An explicit immutable value passed by argument; no stage reaches into
/// shared mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Group column driving the subgroup, if any. `None` builds the whole
    /// network.
    pub group_column: Option<String>,
    /// The subgroup value in focus.
    pub focus_value: Option<String>,
    /// Collapse excluded subgroup values into placeholder nodes. When unset,
    /// the caller must already have filtered the event set down to the focus
    /// value; events outside it must not reach the encoder.
    pub collapse_excluded: bool,
    /// Label prefix for collapsed placeholder nodes.
    pub collapsed_label_prefix: String,
    /// Reserved marker for missing group values.
    pub missing_sentinel: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            group_column: None,
            focus_value: None,
            collapse_excluded: false,
            collapsed_label_prefix: String::new(),
            missing_sentinel: DEFAULT_SENTINEL.to_owned(),
        }
    }
}

/// The immutable outputs of one run.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkTables {
    pub matrix: TransitionMatrix,
    pub edges: Vec<Edge>,
    pub nodes: Vec<Node>,
    /// Diagnostic only; not consumed by edge or node extraction.
    pub singletons: Singletons,
}

/// Runs the full pipeline for one subgroup configuration.
///
/// Zero events or zero categories yield empty tables, not an error; only
/// genuine invariant violations abort the run.
pub fn build_network(
    events: &[PathEvent],
    config: &RunConfig,
) -> Result<NetworkTables, NetworkError> {
    let recoded = match &config.group_column {
        Some(column) => Some(recode_for_subgroup(
            events,
            &SubgroupSpec {
                column,
                focus: config.focus_value.as_deref().unwrap_or_default(),
                collapse_excluded: config.collapse_excluded,
                collapsed_label_prefix: &config.collapsed_label_prefix,
                sentinel: &config.missing_sentinel,
            },
        )?),
        None => None,
    };
    let events = recoded.as_deref().unwrap_or(events);

    let index = CategoryIndex::from_events(events);
    let (matrix, singletons) = count_transitions(events, &index);
    let edges = extract_edges(&matrix);
    let nodes = aggregate_nodes(events, &index)?;

    tracing::debug!(
        categories = index.len(),
        transitions = matrix.total(),
        edges = edges.len(),
        singletons = singletons.count(),
        "built network"
    );

    Ok(NetworkTables {
        matrix,
        edges,
        nodes,
        singletons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityId;
    use std::collections::BTreeMap;

    fn ev(entity: &str, category: &str, setting: &str, duration_days: f64) -> PathEvent {
        PathEvent {
            entity: EntityId::new(entity).unwrap(),
            category: category.to_owned(),
            setting: setting.to_owned(),
            duration_days,
            groups: BTreeMap::new(),
        }
    }

    fn ev_in(entity: &str, category: &str, locality: &str) -> PathEvent {
        PathEvent {
            entity: EntityId::new(entity).unwrap(),
            category: category.to_owned(),
            setting: "Community".to_owned(),
            duration_days: 1.0,
            groups: BTreeMap::from([("Locality".to_owned(), locality.to_owned())]),
        }
    }

    #[test]
    fn whole_network_scenario() {
        let events = vec![
            ev("A", "Ward1", "Community", 10.0),
            ev("A", "Ward2", "Inpatient", 10.0),
            ev("A", "Ward2", "Inpatient", 5.0),
            ev("A", "Ward3", "Community", 5.0),
        ];
        let tables = build_network(&events, &RunConfig::default()).unwrap();

        assert_eq!(tables.nodes.len(), 3);
        assert_eq!(tables.edges.len(), 3);
        assert!(tables.edges.iter().all(|e| e.weight == 1));
        assert_eq!(
            tables.edges.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(tables.matrix.total(), 3);
        assert_eq!(tables.singletons.count(), 0);
    }

    #[test]
    fn empty_input_yields_empty_tables_cleanly() {
        let tables = build_network(&[], &RunConfig::default()).unwrap();

        assert!(tables.matrix.is_empty());
        assert!(tables.edges.is_empty());
        assert!(tables.nodes.is_empty());
        assert_eq!(tables.singletons.count(), 0);
    }

    #[test]
    fn rebuilding_identical_input_is_deterministic() {
        let events = vec![
            ev_in("A", "Ward1", "North"),
            ev_in("A", "Ward8", "South"),
            ev_in("A", "Ward2", "North"),
            ev_in("B", "Ward1", "North"),
        ];
        let config = RunConfig {
            group_column: Some("Locality".to_owned()),
            focus_value: Some("North".to_owned()),
            collapse_excluded: true,
            collapsed_label_prefix: "Locality ".to_owned(),
            ..RunConfig::default()
        };

        let first = build_network(&events, &config).unwrap();
        let second = build_network(&events, &config).unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn collapsed_run_keeps_excluded_transitions() {
        // A travels North -> South -> North; the South stop becomes a
        // placeholder node but both hops around it survive.
        let events = vec![
            ev_in("A", "Ward1", "North"),
            ev_in("A", "Ward8", "South"),
            ev_in("A", "Ward2", "North"),
        ];
        let config = RunConfig {
            group_column: Some("Locality".to_owned()),
            focus_value: Some("North".to_owned()),
            collapse_excluded: true,
            collapsed_label_prefix: "Locality ".to_owned(),
            ..RunConfig::default()
        };
        let tables = build_network(&events, &config).unwrap();

        let labels: Vec<&str> = tables.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Locality South", "Ward1", "Ward2"]);
        assert_eq!(tables.matrix.total(), 2);
        assert_eq!(tables.edges.len(), 2);
    }

    #[test]
    fn singleton_contributes_no_edges_and_is_counted() {
        let events = vec![
            ev("A", "Ward1", "Community", 1.0),
            ev("B", "Ward1", "Community", 1.0),
            ev("B", "Ward2", "Inpatient", 2.0),
        ];
        let tables = build_network(&events, &RunConfig::default()).unwrap();

        assert_eq!(tables.singletons.count(), 1);
        assert_eq!(tables.singletons.entities[0].as_str(), "A");
        assert_eq!(tables.edges.len(), 1);
    }

    #[test]
    fn ambiguous_setting_aborts_the_run() {
        let events = vec![
            ev("A", "Harford", "Inpatient", 1.0),
            ev("A", "Harford", "OOA", 1.0),
        ];
        let err = build_network(&events, &RunConfig::default()).unwrap_err();
        assert!(matches!(err, NetworkError::AmbiguousSetting { .. }));
    }
}
