//! Per-category node attributes.
//!
//! Aggregates duration statistics across every event mapped to a category,
//! regardless of which entity contributed it, and carries the category's
//! label and setting onto the node row.

use serde::Serialize;

use crate::encode::CategoryIndex;
use crate::error::NetworkError;
use crate::event::PathEvent;
use crate::types::CategoryId;

/// One node row: a category with its duration statistics and setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: CategoryId,
    pub label: String,
    pub mean_duration: f64,
    pub median_duration: f64,
    pub setting: String,
}

/// Computes one node row per category id, ascending.
///
/// The label→setting mapping must be single-valued; two settings under one
/// label abort the run. An id with zero contributing events cannot occur when
/// `index` was built from `events`, so hitting it means the pipeline itself
/// is broken and is reported as such.
pub fn aggregate_nodes(
    events: &[PathEvent],
    index: &CategoryIndex,
) -> Result<Vec<Node>, NetworkError> {
    let mut durations: Vec<Vec<f64>> = vec![Vec::new(); index.len()];
    let mut settings: Vec<Option<String>> = vec![None; index.len()];

    for event in events {
        let Some(id) = index.id_of(&event.category) else {
            tracing::warn!(
                category = %event.category,
                "category missing from index; skipping event"
            );
            continue;
        };
        durations[id.index()].push(event.duration_days);
        match &settings[id.index()] {
            None => settings[id.index()] = Some(event.setting.clone()),
            Some(existing) if *existing != event.setting => {
                return Err(NetworkError::AmbiguousSetting {
                    label: event.category.clone(),
                    settings: vec![existing.clone(), event.setting.clone()],
                });
            }
            Some(_) => {}
        }
    }

    let mut nodes = Vec::with_capacity(index.len());
    for (id, label) in index.iter() {
        let Some(setting) = settings[id.index()].take() else {
            return Err(NetworkError::EmptyCategory {
                id: id.get(),
                label: label.to_owned(),
            });
        };
        let values = &mut durations[id.index()];
        nodes.push(Node {
            id,
            label: label.to_owned(),
            mean_duration: mean(values),
            median_duration: median(values),
            setting,
        });
    }

    Ok(nodes)
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median with the usual midpoint convention for even-length sets.
fn median(values: &mut [f64]) -> f64 {
    values.sort_unstable_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        f64::midpoint(values[mid - 1], values[mid])
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityId;

    fn ev(entity: &str, category: &str, setting: &str, duration_days: f64) -> PathEvent {
        PathEvent {
            entity: EntityId::new(entity).unwrap(),
            category: category.to_owned(),
            setting: setting.to_owned(),
            duration_days,
            groups: std::collections::BTreeMap::new(),
        }
    }

    #[test]
    fn one_row_per_category_sorted_by_id() {
        let events = vec![
            ev("A", "Ward2", "Inpatient", 10.0),
            ev("A", "Ward1", "Community", 5.0),
            ev("B", "Ward1", "Community", 7.0),
        ];
        let index = CategoryIndex::from_events(&events);
        let nodes = aggregate_nodes(&events, &index).unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].label, "Ward1");
        assert_eq!(nodes[0].id.get(), 1);
        assert_eq!(nodes[1].label, "Ward2");
        assert_eq!(nodes[1].id.get(), 2);
    }

    #[test]
    fn duration_statistics_pool_events_across_entities() {
        let events = vec![
            ev("A", "Ward1", "Community", 2.0),
            ev("B", "Ward1", "Community", 4.0),
            ev("C", "Ward1", "Community", 12.0),
        ];
        let index = CategoryIndex::from_events(&events);
        let nodes = aggregate_nodes(&events, &index).unwrap();

        assert!((nodes[0].mean_duration - 6.0).abs() < f64::EPSILON);
        assert!((nodes[0].median_duration - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn even_count_median_takes_the_midpoint() {
        let events = vec![
            ev("A", "Ward1", "Community", 1.0),
            ev("B", "Ward1", "Community", 3.0),
        ];
        let index = CategoryIndex::from_events(&events);
        let nodes = aggregate_nodes(&events, &index).unwrap();

        assert!((nodes[0].median_duration - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ambiguous_setting_is_fatal_and_names_the_label() {
        let events = vec![
            ev("A", "Harford", "Inpatient", 1.0),
            ev("B", "Harford", "OOA", 2.0),
        ];
        let index = CategoryIndex::from_events(&events);
        let err = aggregate_nodes(&events, &index).unwrap_err();

        match err {
            NetworkError::AmbiguousSetting { label, settings } => {
                assert_eq!(label, "Harford");
                assert_eq!(settings, vec!["Inpatient".to_owned(), "OOA".to_owned()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn id_without_events_is_a_consistency_error() {
        let events = vec![ev("A", "Ward1", "Community", 1.0)];
        // An index that claims a category the events never mention.
        let index = CategoryIndex::from_labels(["Ward1", "Ward2"]);
        let err = aggregate_nodes(&events, &index).unwrap_err();

        assert!(matches!(err, NetworkError::EmptyCategory { id: 2, .. }));
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let events: Vec<PathEvent> = Vec::new();
        let index = CategoryIndex::from_events(&events);
        assert!(aggregate_nodes(&events, &index).unwrap().is_empty());
    }
}
