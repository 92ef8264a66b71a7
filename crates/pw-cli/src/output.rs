//! CSV rendering for the three output tables.
//!
//! Rendering is split from file writing so table content stays testable as
//! plain strings. Field quoting follows the usual CSV convention; category
//! labels with embedded commas do occur in real data.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use pw_core::{Edge, NetworkTables, Node, TransitionMatrix};

/// Replaces characters that do not belong in filenames with underscores.
pub fn sanitize_for_filename(value: &str) -> String {
    value.replace(", ", "_").replace([' ', '.', ','], "_")
}

/// Renders the transition matrix: one row per line, no header row or column.
pub fn render_matrix(matrix: &TransitionMatrix) -> String {
    if matrix.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for row in matrix.rows() {
        let cells: Vec<String> = row.iter().map(u64::to_string).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

/// Renders the edge table with its `Source,Target,Type,Id,Weight` header.
pub fn render_edges(edges: &[Edge]) -> String {
    let mut out = String::from("Source,Target,Type,Id,Weight\n");
    for edge in edges {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            edge.source,
            edge.target,
            edge.kind.as_str(),
            edge.id,
            edge.weight
        ));
    }
    out
}

/// Renders the node table with its
/// `ID,Label,MeanDuration,MedianDuration,Setting` header.
pub fn render_nodes(nodes: &[Node]) -> String {
    let mut out = String::from("ID,Label,MeanDuration,MedianDuration,Setting\n");
    for node in nodes {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            node.id,
            csv_field(&node.label),
            node.mean_duration,
            node.median_duration,
            csv_field(&node.setting)
        ));
    }
    out
}

/// Writes all three tables for one run and returns the written paths,
/// matrix first.
pub fn write_tables(tables: &NetworkTables, output_dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).with_context(|| {
        format!("failed to create output directory: {}", output_dir.display())
    })?;

    let files = [
        ("matrix", render_matrix(&tables.matrix)),
        ("edges", render_edges(&tables.edges)),
        ("nodes", render_nodes(&tables.nodes)),
    ];

    let mut paths = Vec::with_capacity(files.len());
    for (suffix, content) in files {
        let path = output_dir.join(format!("{stem}_{suffix}.csv"));
        fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        paths.push(path);
    }
    Ok(paths)
}

/// Quotes a field when it contains a comma, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}
