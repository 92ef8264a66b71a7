//! Implementation of the `pw batch` command.
//!
//! One network per distinct non-sentinel value of a group column. Runs are
//! independent — they read the same immutable event set and write disjoint
//! files — so the fan-out goes through rayon with no coordination beyond
//! collecting each run's written paths.

use std::path::PathBuf;

use anyhow::Result;
use rayon::prelude::*;

use pw_core::{PathEvent, RunConfig, build_network, group_values, merge_setting};

use crate::cli::BatchArgs;
use crate::config::Config;
use crate::dataset;
use crate::output;

pub fn run(args: &BatchArgs, config: &Config) -> Result<()> {
    let mut events = dataset::load_events(&args.input, config)?;

    if let (Some(setting), Some(label)) = (&args.merge_setting, &args.merged_label) {
        events = merge_setting(&events, setting, label);
    }

    let values: Vec<String> = group_values(&events, &args.group_column, &config.missing_sentinel)?
        .into_iter()
        .collect();
    tracing::info!(
        column = %args.group_column,
        runs = values.len(),
        "starting batch"
    );

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());
    let input_stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("network")
        .to_owned();

    let results: Vec<Result<Vec<PathBuf>>> = values
        .par_iter()
        .map(|focus| build_one(args, config, &events, focus, &output_dir, &input_stem))
        .collect();

    let mut written = Vec::new();
    for result in results {
        written.extend(result?);
    }
    for path in &written {
        println!("{}", path.display());
    }
    tracing::info!(runs = values.len(), files = written.len(), "batch complete");

    Ok(())
}

fn build_one(
    args: &BatchArgs,
    config: &Config,
    events: &[PathEvent],
    focus: &str,
    output_dir: &std::path::Path,
    input_stem: &str,
) -> Result<Vec<PathBuf>> {
    let filtered: Vec<PathEvent>;
    let run_events: &[PathEvent] = if args.collapse_excluded {
        events
    } else {
        filtered = events
            .iter()
            .filter(|e| e.group_value(&args.group_column) == Some(focus))
            .cloned()
            .collect();
        &filtered
    };

    let run = RunConfig {
        group_column: Some(args.group_column.clone()),
        focus_value: Some(focus.to_owned()),
        collapse_excluded: args.collapse_excluded,
        collapsed_label_prefix: args.collapse_prefix.clone().unwrap_or_default(),
        missing_sentinel: config.missing_sentinel.clone(),
    };
    let tables = build_network(run_events, &run)?;

    tracing::debug!(
        focus,
        nodes = tables.nodes.len(),
        edges = tables.edges.len(),
        "built subgroup network"
    );

    let stem = format!(
        "{input_stem}_{}_{}",
        output::sanitize_for_filename(&args.group_column),
        output::sanitize_for_filename(focus)
    );
    output::write_tables(&tables, output_dir, &stem)
}
