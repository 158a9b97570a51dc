//! Replay of recorded input events through a session's keystroke handler.

use crate::session::{FilterSession, SessionError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Invalid event on line {line_number}: expected 'element_id=value', got '{line}'")]
    InvalidLine { line_number: usize, line: String },

    #[error("Event on line {line_number} failed: {source}")]
    Session {
        line_number: usize,
        #[source]
        source: SessionError,
    },
}

/// One `element_id=value` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub line_number: usize,
    pub element_id: String,
    pub value: String,
}

/// Outcome of one replayed event.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayStep {
    pub line_number: usize,
    pub element_id: String,
    pub value: String,
    pub visible: usize,
    pub total: usize,
}

/// Parse an event script. Blank lines and `#` comments are skipped; the
/// value is everything after the first `=` and may be empty.
pub fn parse_events(script: &str) -> Result<Vec<InputEvent>, ReplayError> {
    let mut events = Vec::new();

    for (idx, line) in script.lines().enumerate() {
        let line_number = idx + 1;
        let trimmed = line.trim_start();
        if trimmed.trim_end().is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((element_id, value)) = trimmed.split_once('=') else {
            return Err(ReplayError::InvalidLine {
                line_number,
                line: line.to_string(),
            });
        };
        let element_id = element_id.trim();
        if element_id.is_empty() {
            return Err(ReplayError::InvalidLine {
                line_number,
                line: line.to_string(),
            });
        }

        events.push(InputEvent {
            line_number,
            element_id: element_id.to_string(),
            value: value.to_string(),
        });
    }

    Ok(events)
}

/// Feed `events` to the session in order, recording the visible count after
/// each one.
pub fn replay_events(
    session: &mut FilterSession,
    events: &[InputEvent],
) -> Result<Vec<ReplayStep>, ReplayError> {
    let total = session.rows().len();
    let mut steps = Vec::with_capacity(events.len());

    for event in events {
        let decision = session
            .on_input_changed(&event.element_id, &event.value)
            .map_err(|source| ReplayError::Session {
                line_number: event.line_number,
                source,
            })?;
        steps.push(ReplayStep {
            line_number: event.line_number,
            element_id: event.element_id.clone(),
            value: event.value.clone(),
            visible: decision.visible_count(),
            total,
        });
    }

    Ok(steps)
}
