use std::fmt;

/// ASCII word character: letter, digit or underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// A compiled, non-empty filter predicate over a single cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Every token must occur somewhere in the text, in any order.
    AllSubstrings(Vec<Vec<char>>),
    /// At least one token must occur without splitting a word run at either edge.
    AnyToken(Vec<Vec<char>>),
    /// `head` must occur without continuing a word run; `tail`, when present,
    /// must follow it on the same line starting at a word boundary.
    Phrase {
        head: Vec<char>,
        tail: Option<Vec<char>>,
    },
}

impl Matcher {
    /// Test the predicate against `text`.
    pub fn is_match(&self, text: &str) -> bool {
        let hay: Vec<char> = text.chars().collect();

        match self {
            Matcher::AllSubstrings(tokens) => tokens.iter().all(|token| contains(&hay, token)),
            Matcher::AnyToken(tokens) => tokens.iter().any(|token| {
                (0..hay.len()).any(|at| {
                    occurs_at(&hay, at, token)
                        && !inside_word_run(&hay, at)
                        && !inside_word_run(&hay, at + token.len())
                })
            }),
            Matcher::Phrase { head, tail } => (0..hay.len()).any(|at| {
                if !occurs_at(&hay, at, head) || inside_word_run(&hay, at) {
                    return false;
                }
                match tail {
                    Some(tail) => tail_follows(&hay, at + head.len(), tail),
                    None => true,
                }
            }),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(tokens: &[Vec<char>], sep: &str) -> String {
            tokens
                .iter()
                .map(|t| t.iter().collect::<String>())
                .collect::<Vec<_>>()
                .join(sep)
        }

        match self {
            Matcher::AllSubstrings(tokens) => write!(f, "all of [{}]", join(tokens, ", ")),
            Matcher::AnyToken(tokens) => write!(f, "any of [{}]", join(tokens, " | ")),
            Matcher::Phrase { head, tail } => {
                write!(f, "starts-word '{}'", head.iter().collect::<String>())?;
                if let Some(tail) = tail {
                    write!(f, " then '{}'", tail.iter().collect::<String>())?;
                }
                Ok(())
            }
        }
    }
}

fn occurs_at(hay: &[char], at: usize, needle: &[char]) -> bool {
    at + needle.len() <= hay.len()
        && hay[at..at + needle.len()]
            .iter()
            .zip(needle)
            .all(|(&h, &n)| chars_eq_ignore_case(h, n))
}

fn contains(hay: &[char], needle: &[char]) -> bool {
    needle.is_empty() || (0..hay.len()).any(|at| occurs_at(hay, at, needle))
}

/// True when `pos` sits between two word characters.
fn inside_word_run(hay: &[char], pos: usize) -> bool {
    pos > 0 && pos < hay.len() && is_word_char(hay[pos - 1]) && is_word_char(hay[pos])
}

fn is_word_boundary(hay: &[char], pos: usize) -> bool {
    let before = pos > 0 && is_word_char(hay[pos - 1]);
    let after = pos < hay.len() && is_word_char(hay[pos]);
    before != after
}

fn tail_follows(hay: &[char], from: usize, tail: &[char]) -> bool {
    for at in from..hay.len() {
        if occurs_at(hay, at, tail) && is_word_boundary(hay, at) {
            return true;
        }
        if is_line_terminator(hay[at]) {
            return false;
        }
    }
    false
}
