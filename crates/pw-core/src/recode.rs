//! Subgroup relabeling policies.
//!
//! A subgroup run looks at one value of one group column. Events outside the
//! focus value are either gone before the encoder sees them (the caller
//! filtered the set down) or collapsed into one placeholder node per excluded
//! value, so the chronology of every entity survives intact. Sentinel-valued
//! events never appear in any subgroup's graph under either policy.

use std::collections::BTreeSet;

use crate::error::NetworkError;
use crate::event::PathEvent;
use crate::types::MIXTURE_SETTING;

/// One subgroup run's relabeling parameters.
#[derive(Debug, Clone, Copy)]
pub struct SubgroupSpec<'a> {
    /// Group column driving the subgroup.
    pub column: &'a str,
    /// The subgroup value in focus.
    pub focus: &'a str,
    /// Collapse excluded values into placeholder nodes instead of expecting
    /// the caller to have dropped their events.
    pub collapse_excluded: bool,
    /// Prefix for collapsed node labels; the excluded value is appended.
    pub collapsed_label_prefix: &'a str,
    /// Reserved missing-value marker. Events carrying it (or lacking the
    /// column) are removed outright.
    pub sentinel: &'a str,
}

/// Sorted distinct non-sentinel values of a group column.
///
/// Errors when no event in a nonempty input carries the column at all; a
/// misspelled selector should not masquerade as an empty result.
pub fn group_values(
    events: &[PathEvent],
    column: &str,
    sentinel: &str,
) -> Result<BTreeSet<String>, NetworkError> {
    let mut seen_column = false;
    let mut values = BTreeSet::new();
    for event in events {
        if let Some(value) = event.group_value(column) {
            seen_column = true;
            if value != sentinel {
                values.insert(value.to_owned());
            }
        }
    }
    if !seen_column && !events.is_empty() {
        return Err(NetworkError::MissingGroupColumn {
            column: column.to_owned(),
        });
    }
    Ok(values)
}

/// Applies the excluded-subgroup policy for one run.
///
/// Always removes sentinel-valued events (a missing column on an event counts
/// as the sentinel). With `collapse_excluded` set, events outside the focus
/// value keep their position in each entity's sequence but take the label
/// `collapsed_label_prefix + value` and the [`MIXTURE_SETTING`] marker;
/// without it, remaining events pass through unchanged, on the premise that
/// the caller already filtered the set down to the focus value.
pub fn recode_for_subgroup(
    events: &[PathEvent],
    spec: &SubgroupSpec<'_>,
) -> Result<Vec<PathEvent>, NetworkError> {
    if events.is_empty() {
        return Ok(Vec::new());
    }
    if !events.iter().any(|e| e.group_value(spec.column).is_some()) {
        return Err(NetworkError::MissingGroupColumn {
            column: spec.column.to_owned(),
        });
    }

    let mut recoded = Vec::with_capacity(events.len());
    let mut dropped = 0_usize;
    for event in events {
        let value = event.group_value(spec.column).unwrap_or(spec.sentinel);
        if value == spec.sentinel {
            dropped += 1;
            continue;
        }
        if !spec.collapse_excluded || value == spec.focus {
            recoded.push(event.clone());
        } else {
            let mut event = event.clone();
            event.category = format!("{}{value}", spec.collapsed_label_prefix);
            event.setting = MIXTURE_SETTING.to_owned();
            recoded.push(event);
        }
    }
    if dropped > 0 {
        tracing::debug!(
            column = spec.column,
            dropped,
            "removed sentinel-valued events"
        );
    }
    Ok(recoded)
}

/// Rewrites every event of one setting to a single shared category label.
///
/// Used to represent many rarely-used categories of one setting (out-of-area
/// services, say) as a single node so they stop adding noise to the graph.
/// The setting itself is left as-is.
pub fn merge_setting(events: &[PathEvent], setting: &str, merged_label: &str) -> Vec<PathEvent> {
    events
        .iter()
        .map(|event| {
            if event.setting == setting {
                let mut event = event.clone();
                event.category = merged_label.to_owned();
                event
            } else {
                event.clone()
            }
        })
        .collect()
}
