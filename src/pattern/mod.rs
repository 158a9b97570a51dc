//! Filter input compilation and matching
//!
//! Each of the three filter inputs on the reference page has its own small
//! pattern language. A raw input string is compiled once per filter pass into
//! a [`CompiledPattern`], which is either absent (the input imposes no
//! constraint) or a [`Matcher`] tested against one column's cell text.
//!
//! # Languages
//!
//! ```text
//! command id       add remove        every token is a substring, any order
//! key shortcut     ctrl+a alt+f4     any one token, not embedded in a word run
//! command palette  open recent file  "open" starts a word, "recent file"
//!                                    follows later at a word boundary
//! ```
//!
//! All matching is case-insensitive. Word characters are ASCII letters,
//! digits and `_`.

pub mod compiler;
pub mod matcher;

pub use compiler::{
    CompiledPattern, FilterKind, compile_command_id, compile_command_palette,
    compile_key_shortcut,
};
pub use matcher::{Matcher, is_word_char};
