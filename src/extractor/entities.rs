use crate::pattern::FilterKind;
use serde::Serialize;
use std::collections::BTreeSet;

/// Inline style that suppresses a row.
pub const HIDDEN_STYLE: &str = "display: none;";

/// One data row of the shortcut table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub ordinal: usize,
    pub command_id: String,
    pub key_shortcut: String,
    pub command_palette: String,
    /// Inline `style` attribute; `None` means the row is displayed.
    #[serde(skip)]
    pub style: Option<String>,
}

impl TableRow {
    pub fn new(
        ordinal: usize,
        command_id: impl Into<String>,
        key_shortcut: impl Into<String>,
        command_palette: impl Into<String>,
    ) -> Self {
        Self {
            ordinal,
            command_id: command_id.into(),
            key_shortcut: key_shortcut.into(),
            command_palette: command_palette.into(),
            style: None,
        }
    }

    /// Rendered cell text for the column a filter kind reads.
    pub fn text_for(&self, kind: FilterKind) -> &str {
        match kind {
            FilterKind::CommandId => &self.command_id,
            FilterKind::KeyShortcut => &self.key_shortcut,
            FilterKind::CommandPalette => &self.command_palette,
        }
    }
}

/// Per-column cell text, index-aligned with row ordinals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnTextIndex {
    columns: [Vec<String>; 3],
}

impl ColumnTextIndex {
    /// Build the index from rows, normalizing the key-shortcut column.
    pub fn from_rows(rows: &[TableRow]) -> Self {
        let mut columns: [Vec<String>; 3] = Default::default();
        for row in rows {
            columns[FilterKind::CommandId.index()].push(row.command_id.clone());
            columns[FilterKind::KeyShortcut.index()]
                .push(super::normalize_shortcut_commas(&row.key_shortcut));
            columns[FilterKind::CommandPalette.index()].push(row.command_palette.clone());
        }
        Self { columns }
    }

    pub fn column(&self, kind: FilterKind) -> &[String] {
        &self.columns[kind.index()]
    }

    pub fn len(&self) -> usize {
        self.columns[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything the extractor pulls out of a document in its single pass.
#[derive(Debug, Clone, Default)]
pub struct ExtractedTable {
    pub rows: Vec<TableRow>,
    pub index: ColumnTextIndex,
    /// Ids of every `<input>` element in the document.
    pub input_ids: BTreeSet<String>,
    /// Rows that lacked one of the configured cells.
    pub incomplete_rows: usize,
}
