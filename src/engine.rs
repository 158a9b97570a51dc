//! Filter pass: compile the inputs, fold the active filters per row, and
//! apply the result to the rows' display state.

use crate::extractor::{ColumnTextIndex, HIDDEN_STYLE, TableRow};
use crate::pattern::{CompiledPattern, FilterKind};
use serde::Serialize;
use tracing::{debug, trace};

/// Live values of the three filter inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterInputs {
    pub command_id: String,
    pub key_shortcut: String,
    pub command_palette: String,
}

impl FilterInputs {
    pub fn new(
        command_id: impl Into<String>,
        key_shortcut: impl Into<String>,
        command_palette: impl Into<String>,
    ) -> Self {
        Self {
            command_id: command_id.into(),
            key_shortcut: key_shortcut.into(),
            command_palette: command_palette.into(),
        }
    }

    pub fn get(&self, kind: FilterKind) -> &str {
        match kind {
            FilterKind::CommandId => &self.command_id,
            FilterKind::KeyShortcut => &self.key_shortcut,
            FilterKind::CommandPalette => &self.command_palette,
        }
    }

    pub fn set(&mut self, kind: FilterKind, value: impl Into<String>) {
        let slot = match kind {
            FilterKind::CommandId => &mut self.command_id,
            FilterKind::KeyShortcut => &mut self.key_shortcut,
            FilterKind::CommandPalette => &mut self.command_palette,
        };
        *slot = value.into();
    }

    /// Compile every input with its own pattern language.
    pub fn compile(&self) -> [CompiledPattern; 3] {
        FilterKind::ALL.map(|kind| kind.compile(self.get(kind)))
    }
}

/// Final per-row visibility after a filter pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityDecision {
    visible: Vec<bool>,
}

impl VisibilityDecision {
    pub fn all_visible(rows: usize) -> Self {
        Self {
            visible: vec![true; rows],
        }
    }

    pub fn is_visible(&self, ordinal: usize) -> bool {
        self.visible.get(ordinal).copied().unwrap_or(false)
    }

    pub fn visible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.visible
            .iter()
            .enumerate()
            .filter_map(|(idx, &shown)| shown.then_some(idx))
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|&&shown| shown).count()
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.visible
    }
}

/// Compile `inputs` and decide which rows of `index` are shown.
pub fn evaluate(inputs: &FilterInputs, index: &ColumnTextIndex) -> VisibilityDecision {
    evaluate_patterns(&inputs.compile(), index)
}

/// Fold the active patterns over the index with AND semantics.
///
/// With no active pattern every row is shown. Otherwise the first active
/// pattern seeds each row's accumulator and later ones can only clear it.
pub fn evaluate_patterns(
    patterns: &[CompiledPattern; 3],
    index: &ColumnTextIndex,
) -> VisibilityDecision {
    let rows = index.len();
    let active: Vec<_> = FilterKind::ALL
        .into_iter()
        .filter_map(|kind| patterns[kind.index()].matcher().map(|m| (kind, m)))
        .collect();

    if active.is_empty() {
        debug!(rows, "no active filters; showing every row");
        return VisibilityDecision::all_visible(rows);
    }

    let mut shortlist: Vec<Option<bool>> = vec![None; rows];
    for &(kind, matcher) in &active {
        trace!(%kind, %matcher, "applying filter");
        for (slot, text) in shortlist.iter_mut().zip(index.column(kind)) {
            *slot = match *slot {
                Some(false) => Some(false),
                None | Some(true) => Some(matcher.is_match(text)),
            };
        }
    }

    let decision = VisibilityDecision {
        visible: shortlist.into_iter().map(|f| f == Some(true)).collect(),
    };
    debug!(
        rows,
        active_filters = active.len(),
        visible = decision.visible_count(),
        "filter pass complete"
    );
    decision
}

/// Display state of one row.
pub trait RowDisplay {
    fn hide(&mut self);
    fn show(&mut self);
    fn is_shown(&self) -> bool;
}

impl RowDisplay for TableRow {
    fn hide(&mut self) {
        self.style = Some(HIDDEN_STYLE.to_string());
    }

    fn show(&mut self) {
        self.style = None;
    }

    fn is_shown(&self) -> bool {
        self.style.is_none()
    }
}

/// Hide every row, then show the rows `decision` selects.
pub fn apply_visibility<R: RowDisplay>(rows: &mut [R], decision: &VisibilityDecision) {
    for row in rows.iter_mut() {
        row.hide();
    }
    for idx in decision.visible_indices() {
        if let Some(row) = rows.get_mut(idx) {
            row.show();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<TableRow> {
        vec![
            TableRow::new(0, "CmdOpenFile", "Ctrl+O", "Open File"),
            TableRow::new(1, "CmdZoomIn", "Ctrl++, Ctrl+=", "Zoom In"),
            TableRow::new(2, "CmdCopySelection", "Ctrl+C, Ctrl+Insert", "Copy Selection"),
            TableRow::new(3, "CmdOpenPrevFile", "Ctrl+Shift+O", "Open Recent File"),
        ]
    }

    #[test]
    fn test_all_empty_shows_everything() {
        let index = ColumnTextIndex::from_rows(&sample_rows());
        let decision = evaluate(&FilterInputs::default(), &index);
        assert_eq!(decision.visible_count(), 4);
    }

    #[test]
    fn test_single_filter() {
        let index = ColumnTextIndex::from_rows(&sample_rows());
        let decision = evaluate(&FilterInputs::new("open", "", ""), &index);
        assert_eq!(decision.visible_indices().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let index = ColumnTextIndex::from_rows(&sample_rows());
        let decision = evaluate(&FilterInputs::new("open", "ctrl+o", ""), &index);
        assert_eq!(decision.visible_indices().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_false_is_never_revisited() {
        let index = ColumnTextIndex::from_rows(&sample_rows());
        // row 1 fails the id filter but would pass the palette filter
        let decision = evaluate(&FilterInputs::new("copy", "", "zoom"), &index);
        assert_eq!(decision.visible_count(), 0);
    }

    #[test]
    fn test_empty_index() {
        let index = ColumnTextIndex::default();
        let decision = evaluate(&FilterInputs::new("x", "y", "z"), &index);
        assert!(decision.is_empty());
        assert!(!decision.is_visible(0));
    }

    #[test]
    fn test_apply_visibility_is_idempotent() {
        let mut rows = sample_rows();
        let index = ColumnTextIndex::from_rows(&rows);
        let decision = evaluate(&FilterInputs::new("", "ctrl+c", ""), &index);

        apply_visibility(&mut rows, &decision);
        let first: Vec<_> = rows.iter().map(|r| r.style.clone()).collect();
        apply_visibility(&mut rows, &decision);
        let second: Vec<_> = rows.iter().map(|r| r.style.clone()).collect();

        assert_eq!(first, second);
        assert!(rows[2].is_shown());
        assert_eq!(rows[0].style.as_deref(), Some(HIDDEN_STYLE));
    }

    #[test]
    fn test_inputs_set_and_get() {
        let mut inputs = FilterInputs::default();
        inputs.set(FilterKind::KeyShortcut, "F11");
        assert_eq!(inputs.get(FilterKind::KeyShortcut), "F11");
        assert_eq!(inputs.compile()[0], CompiledPattern::Absent);
        assert!(inputs.compile()[1].is_active());
    }
}
