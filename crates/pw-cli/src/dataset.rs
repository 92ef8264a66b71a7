//! Raw table loading and cleaning.
//!
//! Reads the service-use export (CSV with a header row) and produces the
//! cleaned, chronologically sorted event set the core engine requires:
//! missing group values become the reserved sentinel, dates are parsed and
//! turned into stay durations, rows that cannot contribute are dropped with
//! a counter, labels that carry two settings are disambiguated, and the rows
//! are sorted into contiguous per-entity chronological blocks.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use pw_core::PathEvent;
use pw_core::types::EntityId;

use crate::config::Config;

/// Header positions of the role columns; everything else is a group column.
#[derive(Debug)]
struct ColumnMap {
    entity: usize,
    category: usize,
    setting: usize,
    start: usize,
    end: usize,
    groups: Vec<(String, usize)>,
}

impl ColumnMap {
    fn from_header(header: &[String], config: &Config) -> Result<Self> {
        let position = |name: &str| -> Result<usize> {
            header.iter().position(|h| h == name).with_context(|| {
                format!("column {name:?} not found in header: {}", header.join(", "))
            })
        };

        let entity = position(&config.entity_column)?;
        let category = position(&config.category_column)?;
        let setting = position(&config.setting_column)?;
        let start = position(&config.start_column)?;
        let end = position(&config.end_column)?;

        let roles = [entity, category, setting, start, end];
        let groups = header
            .iter()
            .enumerate()
            .filter(|(i, _)| !roles.contains(i))
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Ok(Self {
            entity,
            category,
            setting,
            start,
            end,
            groups,
        })
    }
}

/// A cleaned row, still carrying its start date for the final sort.
struct CleanRow {
    event: PathEvent,
    start: NaiveDate,
}

/// Reads and cleans the table at `path`.
pub fn load_events(path: &Path, config: &Config) -> Result<Vec<PathEvent>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open input file: {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header_line = match lines.next() {
        Some(line) => line.context("failed to read header row")?,
        None => bail!("input file is empty: {}", path.display()),
    };
    let Some(header) = split_record(header_line.trim_end_matches('\r')) else {
        bail!("header row has an unterminated quoted field");
    };
    let columns = ColumnMap::from_header(&header, config)?;

    let fallback_end = config
        .fallback_end_date
        .as_deref()
        .map(|value| NaiveDate::parse_from_str(value, &config.date_format))
        .transpose()
        .context("invalid fallback end date in configuration")?;

    let mut rows: Vec<CleanRow> = Vec::new();
    let mut skipped_malformed = 0_usize;
    let mut dropped_missing_start = 0_usize;
    let mut dropped_missing_end = 0_usize;
    let mut dropped_negative = 0_usize;

    for (line_num, line_result) in lines.enumerate() {
        let line = line_result.with_context(|| format!("failed to read line {}", line_num + 2))?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        let fields = match split_record(line) {
            Some(fields) if fields.len() == header.len() => fields,
            _ => {
                skipped_malformed += 1;
                tracing::debug!(line = line_num + 2, "skipping malformed row");
                continue;
            }
        };

        let Ok(entity) = EntityId::new(fields[columns.entity].as_str()) else {
            skipped_malformed += 1;
            tracing::debug!(line = line_num + 2, "skipping row with empty entity id");
            continue;
        };
        let category = fields[columns.category].clone();
        if category.is_empty() {
            skipped_malformed += 1;
            tracing::debug!(line = line_num + 2, "skipping row with empty category");
            continue;
        }

        let Ok(start) = NaiveDate::parse_from_str(&fields[columns.start], &config.date_format)
        else {
            dropped_missing_start += 1;
            continue;
        };
        let end = match NaiveDate::parse_from_str(&fields[columns.end], &config.date_format) {
            Ok(end) => end,
            Err(_) => match fallback_end {
                // The record is still open; stand in the configured cutoff.
                Some(end) => end,
                None => {
                    dropped_missing_end += 1;
                    continue;
                }
            },
        };
        let duration = (end - start).num_days();
        if duration < 0 {
            dropped_negative += 1;
            continue;
        }

        let groups: BTreeMap<String, String> = columns
            .groups
            .iter()
            .map(|(name, i)| {
                let value = fields[*i].as_str();
                let value = if value.is_empty() {
                    config.missing_sentinel.clone()
                } else {
                    value.to_owned()
                };
                (name.clone(), value)
            })
            .collect();

        #[allow(clippy::cast_precision_loss)]
        rows.push(CleanRow {
            event: PathEvent {
                entity,
                category,
                setting: fields[columns.setting].clone(),
                duration_days: duration as f64,
                groups,
            },
            start,
        });
    }

    disambiguate_settings(&mut rows);

    // Stable sort: entity blocks become contiguous, chronological within,
    // and same-day rows keep their file order.
    rows.sort_by(|a, b| {
        a.event
            .entity
            .cmp(&b.event.entity)
            .then_with(|| a.start.cmp(&b.start))
    });

    tracing::debug!(
        kept = rows.len(),
        skipped_malformed,
        dropped_missing_start,
        dropped_missing_end,
        dropped_negative,
        "loaded input table"
    );

    Ok(rows.into_iter().map(|row| row.event).collect())
}

/// Rewrites labels observed with more than one setting to
/// `"{label} {setting}"`, so each remaining label carries a single setting.
fn disambiguate_settings(rows: &mut [CleanRow]) {
    let mut settings_by_label: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for row in rows.iter() {
        settings_by_label
            .entry(&row.event.category)
            .or_default()
            .insert(&row.event.setting);
    }
    let ambiguous: BTreeSet<String> = settings_by_label
        .iter()
        .filter(|(_, settings)| settings.len() > 1)
        .map(|(label, settings)| {
            tracing::debug!(
                label,
                settings = ?settings,
                "label carries multiple settings; splitting by setting"
            );
            (*label).to_owned()
        })
        .collect();

    for row in rows.iter_mut() {
        if ambiguous.contains(&row.event.category) {
            row.event.category = format!("{} {}", row.event.category, row.event.setting);
        }
    }
}

/// Splits one CSV record, honoring double-quoted fields with embedded commas
/// and doubled quotes. Returns `None` on an unterminated quote.
fn split_record(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut field)),
                _ => field.push(c),
            }
        }
    }
    if in_quotes {
        return None;
    }
    fields.push(field);
    Some(fields)
}
