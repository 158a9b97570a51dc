//! Filter session: the rows and column index of one document plus the live
//! filter inputs, driven by `on_input_changed`.

use crate::config::{ConfigError, FilterConfig, InputIds};
use crate::engine::{FilterInputs, VisibilityDecision, apply_visibility, evaluate};
use crate::extractor::{ColumnTextIndex, TableRow, extract_table};
use crate::pattern::FilterKind;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Filter input element(s) not found in document: {}", .0.join(", "))]
    MissingInputs(Vec<String>),

    #[error("Unknown filter input '{0}'")]
    UnknownInput(String),
}

#[derive(Debug, Clone)]
pub struct FilterSession {
    rows: Vec<TableRow>,
    index: ColumnTextIndex,
    inputs: FilterInputs,
    bindings: InputIds,
    decision: VisibilityDecision,
}

impl FilterSession {
    /// Extract the table from `html` and start a session with empty inputs.
    ///
    /// Fails once here, rather than on every keystroke, when the config is
    /// invalid or a configured input element is missing.
    pub fn from_document(html: &str, config: &FilterConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let extracted = extract_table(html, config);

        if config.require_inputs {
            let missing: Vec<String> = FilterKind::ALL
                .into_iter()
                .map(|kind| config.inputs.id_for(kind))
                .filter(|id| !extracted.input_ids.contains(*id))
                .map(str::to_string)
                .collect();
            if !missing.is_empty() {
                return Err(SessionError::MissingInputs(missing));
            }
        }

        Ok(Self::from_rows(extracted.rows, config.inputs.clone()))
    }

    /// Start a session over already extracted rows.
    pub fn from_rows(rows: Vec<TableRow>, bindings: InputIds) -> Self {
        let index = ColumnTextIndex::from_rows(&rows);
        let mut session = Self {
            decision: VisibilityDecision::all_visible(rows.len()),
            rows,
            index,
            inputs: FilterInputs::default(),
            bindings,
        };
        session.refresh();
        session
    }

    /// Keystroke handler for the input element `element_id`.
    pub fn on_input_changed(
        &mut self,
        element_id: &str,
        value: &str,
    ) -> Result<&VisibilityDecision, SessionError> {
        let kind = self
            .bindings
            .kind_for(element_id)
            .ok_or_else(|| SessionError::UnknownInput(element_id.to_string()))?;
        trace!(input = element_id, %kind, value, "input changed");

        self.inputs.set(kind, value);
        Ok(self.refresh())
    }

    /// Replace all three inputs and run one filter pass.
    pub fn set_inputs(&mut self, inputs: FilterInputs) -> &VisibilityDecision {
        self.inputs = inputs;
        self.refresh()
    }

    /// Re-run the filter pass over the current inputs.
    pub fn refresh(&mut self) -> &VisibilityDecision {
        self.decision = evaluate(&self.inputs, &self.index);
        apply_visibility(&mut self.rows, &self.decision);
        debug!(
            visible = self.decision.visible_count(),
            total = self.rows.len(),
            "rows updated"
        );
        &self.decision
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn index(&self) -> &ColumnTextIndex {
        &self.index
    }

    pub fn inputs(&self) -> &FilterInputs {
        &self.inputs
    }

    pub fn bindings(&self) -> &InputIds {
        &self.bindings
    }

    pub fn decision(&self) -> &VisibilityDecision {
        &self.decision
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows.iter().filter(|row| row.style.is_none())
    }

    pub fn visible_count(&self) -> usize {
        self.decision.visible_count()
    }
}
