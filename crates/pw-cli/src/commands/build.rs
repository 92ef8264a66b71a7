//! Implementation of the `pw build` command.
//!
//! Builds one network from one run configuration: load and clean the input,
//! apply the optional entity filter, setting merge, and subgroup policy, run
//! the core pipeline, and write (or print) the three tables.

use anyhow::{Context, Result};

use pw_core::{RunConfig, build_network, group_values, merge_setting};

use crate::cli::BuildArgs;
use crate::config::Config;
use crate::dataset;
use crate::output;

pub fn run(args: &BuildArgs, config: &Config) -> Result<()> {
    let mut events = dataset::load_events(&args.input, config)?;

    if !args.entities.is_empty() {
        events.retain(|e| args.entities.iter().any(|id| e.entity.as_str() == id));
        tracing::debug!(kept = events.len(), "applied entity filter");
    }

    if let (Some(setting), Some(label)) = (&args.merge_setting, &args.merged_label) {
        events = merge_setting(&events, setting, label);
    }

    // Under the drop-excluded policy only focus rows may reach the encoder.
    // The column is validated against the full set first, so a misspelled
    // selector surfaces as an error rather than an empty graph.
    if let (Some(column), Some(focus)) = (&args.group_column, &args.focus) {
        if !args.collapse_excluded {
            group_values(&events, column, &config.missing_sentinel)?;
            events.retain(|e| e.group_value(column) == Some(focus.as_str()));
        }
    }

    let run = RunConfig {
        group_column: args.group_column.clone(),
        focus_value: args.focus.clone(),
        collapse_excluded: args.collapse_excluded,
        collapsed_label_prefix: args.collapse_prefix.clone().unwrap_or_default(),
        missing_sentinel: config.missing_sentinel.clone(),
    };
    let tables = build_network(&events, &run)?;

    tracing::info!(
        nodes = tables.nodes.len(),
        edges = tables.edges.len(),
        singletons = tables.singletons.count(),
        "network built"
    );

    if args.json {
        let json =
            serde_json::to_string_pretty(&tables).context("failed to serialize tables")?;
        println!("{json}");
        return Ok(());
    }

    let stem = output_stem(args);
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());
    let paths = output::write_tables(&tables, &output_dir, &stem)?;
    for path in &paths {
        println!("{}", path.display());
    }

    Ok(())
}

/// Output filename stem: input stem, optional tag, then the subgroup parts.
fn output_stem(args: &BuildArgs) -> String {
    let mut stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("network")
        .to_owned();
    if let Some(tag) = &args.tag {
        stem.push('_');
        stem.push_str(&output::sanitize_for_filename(tag));
    }
    if let (Some(column), Some(focus)) = (&args.group_column, &args.focus) {
        stem.push('_');
        stem.push_str(&output::sanitize_for_filename(column));
        stem.push('_');
        stem.push_str(&output::sanitize_for_filename(focus));
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(input: &str) -> BuildArgs {
        BuildArgs {
            input: PathBuf::from(input),
            output_dir: None,
            tag: None,
            entities: Vec::new(),
            merge_setting: None,
            merged_label: None,
            group_column: None,
            focus: None,
            collapse_excluded: false,
            collapse_prefix: None,
            json: false,
        }
    }

    #[test]
    fn stem_uses_the_input_file_stem() {
        assert_eq!(output_stem(&args("data/ServUse15To18.csv")), "ServUse15To18");
    }

    #[test]
    fn stem_appends_sanitized_tag_and_subgroup_parts() {
        let mut a = args("data/admissions.csv");
        a.tag = Some("OneOOA".to_owned());
        a.group_column = Some("Locality".to_owned());
        a.focus = Some("North, Devon".to_owned());
        assert_eq!(output_stem(&a), "admissions_OneOOA_Locality_North_Devon");
    }
}
