use crate::config::FilterConfig;
use crate::engine::FilterInputs;
use crate::extractor::{ExtractedTable, TableRow};
use crate::pattern::FilterKind;
use crate::replay::ReplayStep;
use colored::Colorize;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use serde_json::json;
use std::fmt::Write;
use std::path::Path;

pub fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    table
}

fn describe_inputs(inputs: &FilterInputs) -> String {
    let active: Vec<String> = FilterKind::ALL
        .into_iter()
        .filter(|&kind| !inputs.get(kind).trim().is_empty())
        .map(|kind| format!("{kind}={:?}", inputs.get(kind)))
        .collect();
    if active.is_empty() {
        "none".to_string()
    } else {
        active.join(", ")
    }
}

pub fn format_rows_text<'a>(
    rows: impl IntoIterator<Item = &'a TableRow>,
    total: usize,
    inputs: &FilterInputs,
) -> String {
    let rows: Vec<&TableRow> = rows.into_iter().collect();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} of {} row{}",
        "SHOWING".bold(),
        rows.len(),
        total,
        if total == 1 { "" } else { "s" }
    );
    let _ = writeln!(out, "Filters: {}", describe_inputs(inputs));

    if rows.is_empty() {
        let _ = writeln!(out, "{}", "No rows match the current filters.".yellow());
        return out;
    }

    let mut table = create_styled_table(&["#", "Command ID", "Keyboard Shortcuts", "Command Palette"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.ordinal),
            Cell::new(&row.command_id),
            Cell::new(&row.key_shortcut),
            Cell::new(&row.command_palette),
        ]);
    }
    let _ = writeln!(out, "{table}");
    out
}

pub fn format_rows_json<'a>(
    file: &Path,
    rows: impl IntoIterator<Item = &'a TableRow>,
    total: usize,
    inputs: &FilterInputs,
) -> String {
    let rows: Vec<&TableRow> = rows.into_iter().collect();

    serde_json::to_string_pretty(&json!({
        "filter": {
            "file": file.display().to_string(),
            "inputs": inputs,
            "total_rows": total,
            "visible_rows": rows.len(),
            "rows": rows,
        }
    }))
    .unwrap_or_else(|_| "{\"filter\":{\"error\":\"failed to serialize filter output\"}}".into())
}

/// Input ids the config expects that the document does not contain.
pub fn missing_input_ids<'a>(table: &ExtractedTable, config: &'a FilterConfig) -> Vec<&'a str> {
    FilterKind::ALL
        .into_iter()
        .map(|kind| config.inputs.id_for(kind))
        .filter(|id| !table.input_ids.contains(*id))
        .collect()
}

pub fn format_info_text(file: &Path, table: &ExtractedTable, config: &FilterConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "DOCUMENT".bold(), file.display());
    let _ = writeln!(out, "Table marker:     {}", config.table_class);
    let _ = writeln!(out, "Data rows:        {}", table.rows.len());
    if table.incomplete_rows > 0 {
        let _ = writeln!(
            out,
            "Incomplete rows:  {}",
            table.incomplete_rows.to_string().yellow()
        );
    }
    let _ = writeln!(out);

    let missing = missing_input_ids(table, config);
    let mut bindings = create_styled_table(&["Filter", "Input id", "Column", "Status"]);
    for kind in FilterKind::ALL {
        let id = config.inputs.id_for(kind);
        let status = if missing.contains(&id) {
            "missing".red().to_string()
        } else {
            "found".green().to_string()
        };
        bindings.add_row(vec![
            Cell::new(kind.label()),
            Cell::new(id),
            Cell::new(config.columns.position_for(kind)),
            Cell::new(status),
        ]);
    }
    let _ = writeln!(out, "{bindings}");

    let other_inputs: Vec<&str> = table
        .input_ids
        .iter()
        .map(String::as_str)
        .filter(|id| config.inputs.kind_for(id).is_none())
        .collect();
    if !other_inputs.is_empty() {
        let _ = writeln!(out, "Other inputs:     {}", other_inputs.join(", "));
    }

    out
}

pub fn format_info_json(file: &Path, table: &ExtractedTable, config: &FilterConfig) -> String {
    let missing = missing_input_ids(table, config);
    let bindings: Vec<_> = FilterKind::ALL
        .into_iter()
        .map(|kind| {
            let id = config.inputs.id_for(kind);
            json!({
                "filter": kind,
                "input_id": id,
                "column": config.columns.position_for(kind),
                "found": !missing.contains(&id),
            })
        })
        .collect();

    serde_json::to_string_pretty(&json!({
        "info": {
            "file": file.display().to_string(),
            "table_class": config.table_class,
            "rows": table.rows.len(),
            "incomplete_rows": table.incomplete_rows,
            "input_ids": table.input_ids,
            "bindings": bindings,
        }
    }))
    .unwrap_or_else(|_| "{\"info\":{\"error\":\"failed to serialize info output\"}}".into())
}

pub fn format_replay_text(steps: &[ReplayStep]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} event{}",
        "REPLAY".bold(),
        steps.len(),
        if steps.len() == 1 { "" } else { "s" }
    );
    if steps.is_empty() {
        return out;
    }
    out.push('\n');

    for step in steps {
        let _ = writeln!(
            out,
            "{:>5}: {}={:?} -> {}/{}",
            step.line_number, step.element_id, step.value, step.visible, step.total
        );
    }
    out
}

pub fn format_replay_json(file: &Path, steps: &[ReplayStep]) -> String {
    serde_json::to_string_pretty(&json!({
        "replay": {
            "file": file.display().to_string(),
            "events": steps,
        }
    }))
    .unwrap_or_else(|_| "{\"replay\":{\"error\":\"failed to serialize replay output\"}}".into())
}
