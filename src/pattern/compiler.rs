use super::matcher::{Matcher, is_word_char};
use serde::Serialize;
use std::fmt;

/// The three filter inputs, one per filterable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    CommandId,
    KeyShortcut,
    CommandPalette,
}

impl FilterKind {
    pub const ALL: [FilterKind; 3] = [
        FilterKind::CommandId,
        FilterKind::KeyShortcut,
        FilterKind::CommandPalette,
    ];

    /// Position of this kind in per-kind arrays.
    pub fn index(self) -> usize {
        match self {
            FilterKind::CommandId => 0,
            FilterKind::KeyShortcut => 1,
            FilterKind::CommandPalette => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterKind::CommandId => "command id",
            FilterKind::KeyShortcut => "key shortcut",
            FilterKind::CommandPalette => "command palette",
        }
    }

    /// Compile `raw` with this kind's pattern language.
    pub fn compile(self, raw: &str) -> CompiledPattern {
        match self {
            FilterKind::CommandId => compile_command_id(raw),
            FilterKind::KeyShortcut => compile_key_shortcut(raw),
            FilterKind::CommandPalette => compile_command_palette(raw),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of compiling one filter input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledPattern {
    /// Empty input: the filter imposes no constraint.
    Absent,
    Compiled(Matcher),
}

impl CompiledPattern {
    pub fn is_active(&self) -> bool {
        matches!(self, CompiledPattern::Compiled(_))
    }

    pub fn matcher(&self) -> Option<&Matcher> {
        match self {
            CompiledPattern::Absent => None,
            CompiledPattern::Compiled(matcher) => Some(matcher),
        }
    }
}

fn tokens(text: &str) -> Vec<Vec<char>> {
    text.split_whitespace()
        .map(|token| token.chars().collect())
        .collect()
}

/// Command-id filter.
///
/// Characters that are neither word characters nor whitespace are dropped
/// (`cmd-open` becomes `cmdopen`). The remaining whitespace-separated tokens
/// must all appear in the target as case-insensitive substrings, in any
/// order. Nothing left after cleaning means no constraint.
pub fn compile_command_id(raw: &str) -> CompiledPattern {
    let cleaned: String = raw
        .chars()
        .filter(|&c| is_word_char(c) || c.is_whitespace())
        .collect();
    let tokens = tokens(&cleaned);

    if tokens.is_empty() {
        CompiledPattern::Absent
    } else {
        CompiledPattern::Compiled(Matcher::AllSubstrings(tokens))
    }
}

/// Key-shortcut filter.
///
/// Each whitespace-separated token is taken literally (`+` and other symbols
/// match themselves) and the target matches when ANY token occurs in it
/// without splitting a word-character run at either edge: `ctrl+a` matches
/// `ctrl+a ctrl+shift+a` but not `ctrl+ab`.
pub fn compile_key_shortcut(raw: &str) -> CompiledPattern {
    let tokens = tokens(raw);

    if tokens.is_empty() {
        CompiledPattern::Absent
    } else {
        CompiledPattern::Compiled(Matcher::AnyToken(tokens))
    }
}

/// Command-palette filter.
///
/// The first token must occur where it does not continue a word run. Any
/// text after the first whitespace run is kept verbatim as a phrase that
/// must appear later on the same line, starting at a word boundary:
/// `open recent file` matches `Open Recent File Explorer` but not
/// `Reopen File`.
pub fn compile_command_palette(raw: &str) -> CompiledPattern {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CompiledPattern::Absent;
    }

    let (head, tail) = match trimmed.find(char::is_whitespace) {
        Some(split) => (&trimmed[..split], Some(trimmed[split..].trim_start())),
        None => (trimmed, None),
    };

    CompiledPattern::Compiled(Matcher::Phrase {
        head: head.chars().collect(),
        tail: tail.map(|tail| tail.chars().collect()),
    })
}
