//! Single-pass extraction of the shortcut table from an HTML document.

use crate::config::FilterConfig;
use crate::pattern::FilterKind;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, warn};

mod entities;

pub use entities::{ColumnTextIndex, ExtractedTable, HIDDEN_STYLE, TableRow};

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<(/?)([A-Za-z][A-Za-z0-9]*)((?:[^>\x22']|\x22[^\x22]*\x22|'[^']*')*)>")
        .expect("valid tag regex")
});
static CLASS_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)class\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid class attribute regex")
});
static ID_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid id attribute regex")
});
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z]+);").expect("valid entity regex")
});
static MULTISPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid multispace regex"));

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read document '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read a document from disk.
pub fn read_document(path: impl AsRef<Path>) -> Result<String, ExtractError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| ExtractError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Remove the commas separating alternative shortcuts in a key cell.
///
/// A comma directly after a single `+` is the key of a `Ctrl+,` combination
/// and is kept. A comma after `++` follows a `Ctrl++` combination and is a
/// separator like any other.
pub fn normalize_shortcut_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| {
            if c != ',' {
                return true;
            }
            let after_plus = i >= 1 && chars[i - 1] == '+';
            let after_double_plus = i >= 2 && chars[i - 1] == '+' && chars[i - 2] == '+';
            after_plus && !after_double_plus
        })
        .map(|(_, &c)| c)
        .collect()
}

/// Extract rows, column index and input ids from `html`.
///
/// Data rows are the `<tr>` elements of every table whose class contains
/// `config.table_class`, outside `<thead>` and `<tfoot>`. A row where any
/// cell holds an `<input>` is the filter row and is skipped, as is a row
/// without `<td>` cells.
pub fn extract_table(html: &str, config: &FilterConfig) -> ExtractedTable {
    let scan = scan_document(html, &config.table_class);

    let mut rows = Vec::with_capacity(scan.rows.len());
    let mut incomplete_rows = 0;
    for (ordinal, cells) in scan.rows.into_iter().enumerate() {
        let mut missing = false;
        let mut cell_for = |kind: FilterKind| {
            let position = config.columns.position_for(kind);
            cells.get(position.wrapping_sub(1)).cloned().unwrap_or_else(|| {
                missing = true;
                String::new()
            })
        };
        let row = TableRow::new(
            ordinal,
            cell_for(FilterKind::CommandId),
            cell_for(FilterKind::KeyShortcut),
            cell_for(FilterKind::CommandPalette),
        );
        if missing {
            incomplete_rows += 1;
        }
        rows.push(row);
    }

    if incomplete_rows > 0 {
        warn!(
            incomplete_rows,
            "rows are missing configured cells; treating them as empty"
        );
    }
    debug!(
        rows = rows.len(),
        inputs = scan.input_ids.len(),
        table_class = %config.table_class,
        "extracted shortcut table"
    );

    let index = ColumnTextIndex::from_rows(&rows);
    ExtractedTable {
        rows,
        index,
        input_ids: scan.input_ids,
        incomplete_rows,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Body,
    Head,
    Foot,
}

#[derive(Debug, Default)]
struct CellBuilder {
    text: String,
    is_data: bool,
    has_input: bool,
}

#[derive(Debug, Default)]
struct RowBuilder {
    cells: Vec<CellBuilder>,
    open_cell: Option<CellBuilder>,
}

impl RowBuilder {
    fn close_cell(&mut self) {
        if let Some(cell) = self.open_cell.take() {
            self.cells.push(cell);
        }
    }
}

#[derive(Debug)]
struct TableFrame {
    marked: bool,
    section: Section,
    row: Option<RowBuilder>,
}

#[derive(Debug, Default)]
struct DocumentScan {
    rows: Vec<Vec<String>>,
    input_ids: BTreeSet<String>,
}

impl DocumentScan {
    fn close_row(&mut self, frame: &mut TableFrame) {
        let Some(mut row) = frame.row.take() else {
            return;
        };
        row.close_cell();

        if !frame.marked || frame.section != Section::Body {
            return;
        }
        if row.cells.iter().any(|cell| cell.has_input) {
            return;
        }

        let cells: Vec<String> = row
            .cells
            .into_iter()
            .filter(|cell| cell.is_data)
            .map(|cell| rendered_text(&cell.text))
            .collect();
        if !cells.is_empty() {
            self.rows.push(cells);
        }
    }
}

fn attr_value<'a>(re: &Regex, attrs: &'a str) -> Option<&'a str> {
    re.captures(attrs).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
    })
}

fn scan_document(html: &str, table_class: &str) -> DocumentScan {
    let mut scan = DocumentScan::default();
    let mut frames: Vec<TableFrame> = Vec::new();
    let mut raw_text_until: Option<String> = None;
    let mut last_end = 0;

    for caps in TOKEN_RE.captures_iter(html) {
        let Some(whole) = caps.get(0) else { continue };
        let text = &html[last_end..whole.start()];
        last_end = whole.end();

        if raw_text_until.is_none() {
            append_text(&mut frames, text);
        }

        let Some(name) = caps.get(2) else {
            // comment
            continue;
        };
        let name = name.as_str().to_ascii_lowercase();
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let attrs = caps.get(3).map_or("", |m| m.as_str());

        if let Some(until) = &raw_text_until {
            if closing && *until == name {
                raw_text_until = None;
            }
            continue;
        }

        match (name.as_str(), closing) {
            ("script" | "style", false) if !attrs.trim_end().ends_with('/') => {
                raw_text_until = Some(name.clone());
            }
            ("table", false) => {
                let marked = attr_value(&CLASS_ATTR_RE, attrs)
                    .is_some_and(|class| class.contains(table_class));
                frames.push(TableFrame {
                    marked,
                    section: Section::Body,
                    row: None,
                });
            }
            ("table", true) => {
                if let Some(mut frame) = frames.pop() {
                    scan.close_row(&mut frame);
                }
            }
            ("thead" | "tbody" | "tfoot", _) => {
                if let Some(frame) = frames.last_mut() {
                    scan.close_row(frame);
                    frame.section = match (name.as_str(), closing) {
                        ("thead", false) => Section::Head,
                        ("tfoot", false) => Section::Foot,
                        _ => Section::Body,
                    };
                }
            }
            ("tr", false) => {
                if let Some(frame) = frames.last_mut() {
                    scan.close_row(frame);
                    frame.row = Some(RowBuilder::default());
                }
            }
            ("tr", true) => {
                if let Some(frame) = frames.last_mut() {
                    scan.close_row(frame);
                }
            }
            ("td" | "th", false) => {
                if let Some(frame) = frames.last_mut() {
                    let row = frame.row.get_or_insert_with(RowBuilder::default);
                    row.close_cell();
                    row.open_cell = Some(CellBuilder {
                        is_data: name == "td",
                        ..CellBuilder::default()
                    });
                }
            }
            ("td" | "th", true) => {
                if let Some(row) = frames.last_mut().and_then(|frame| frame.row.as_mut()) {
                    row.close_cell();
                }
            }
            ("input", false) => {
                if let Some(id) = attr_value(&ID_ATTR_RE, attrs) {
                    scan.input_ids.insert(id.to_string());
                }
                if let Some(cell) = frames
                    .last_mut()
                    .and_then(|frame| frame.row.as_mut())
                    .and_then(|row| row.open_cell.as_mut())
                {
                    cell.has_input = true;
                }
            }
            ("br" | "p" | "div" | "li", _) => append_text(&mut frames, " "),
            _ => {}
        }
    }

    if raw_text_until.is_none() {
        append_text(&mut frames, &html[last_end..]);
    }
    while let Some(mut frame) = frames.pop() {
        scan.close_row(&mut frame);
    }

    scan
}

fn append_text(frames: &mut [TableFrame], text: &str) {
    if text.is_empty() {
        return;
    }
    for cell in frames
        .iter_mut()
        .filter_map(|frame| frame.row.as_mut())
        .filter_map(|row| row.open_cell.as_mut())
    {
        cell.text.push_str(text);
    }
}

/// Decode entities, collapse whitespace and trim, approximating what a
/// browser renders for the cell.
fn rendered_text(raw: &str) -> String {
    let decoded = ENTITY_RE.replace_all(raw, |caps: &regex::Captures| {
        decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });
    MULTISPACE_RE.replace_all(&decoded, " ").trim().to_string()
}

fn decode_entity(entity: &str) -> Option<String> {
    let c = if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        char::from_u32(u32::from_str_radix(hex, 16).ok()?)?
    } else if let Some(dec) = entity.strip_prefix('#') {
        char::from_u32(dec.parse().ok()?)?
    } else {
        match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => '\u{a0}',
            "hellip" => '\u{2026}',
            "ndash" => '\u{2013}',
            "mdash" => '\u{2014}',
            _ => return None,
        }
    };
    Some(c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_removes_separator_commas() {
        assert_eq!(normalize_shortcut_commas("Ctrl+C, Ctrl+V"), "Ctrl+C Ctrl+V");
        assert_eq!(normalize_shortcut_commas("a,b,c"), "abc");
    }

    #[test]
    fn test_normalize_keeps_comma_key() {
        assert_eq!(normalize_shortcut_commas("Ctrl+,"), "Ctrl+,");
        assert_eq!(normalize_shortcut_commas("Ctrl+,, F1"), "Ctrl+, F1");
    }

    #[test]
    fn test_normalize_double_plus() {
        assert_eq!(normalize_shortcut_commas("Ctrl++"), "Ctrl++");
        assert_eq!(normalize_shortcut_commas("Ctrl++, Ctrl+-"), "Ctrl++ Ctrl+-");
    }

    #[test]
    fn test_rendered_text_decodes_and_collapses() {
        assert_eq!(rendered_text("  Ctrl&nbsp;+\n  A&amp;B &#65;&#x42; "), "Ctrl + A&B AB");
        assert_eq!(rendered_text("&unknown; x"), "&unknown; x");
    }

    #[test]
    fn test_scan_handles_omitted_end_tags() {
        let html = r#"<table class="collection-content">
            <tr><td>CmdOne<td>F1<td>One
            <tr><td>CmdTwo<td>F2<td>Two
            </table>"#;
        let scan = scan_document(html, "collection-content");
        assert_eq!(
            scan.rows,
            vec![
                vec!["CmdOne".to_string(), "F1".to_string(), "One".to_string()],
                vec!["CmdTwo".to_string(), "F2".to_string(), "Two".to_string()],
            ]
        );
    }

    #[test]
    fn test_scan_ignores_script_and_comments() {
        let html = r#"<script>var t = "<table class='collection-content'><tr><td>x</td></tr>";</script>
            <!-- <table class="collection-content"><tr><td>y</td></tr></table> -->
            <table class="collection-content"><tr><td>real</td></tr></table>"#;
        let scan = scan_document(html, "collection-content");
        assert_eq!(scan.rows, vec![vec!["real".to_string()]]);
    }

    #[test]
    fn test_attr_value_quoting_styles() {
        assert_eq!(attr_value(&CLASS_ATTR_RE, r#" class="a b""#), Some("a b"));
        assert_eq!(attr_value(&CLASS_ATTR_RE, " class='c'"), Some("c"));
        assert_eq!(attr_value(&ID_ATTR_RE, " type=text id=cmd_ids"), Some("cmd_ids"));
        assert_eq!(attr_value(&ID_ATTR_RE, r#" data-id="x""#), None);
    }
}
