//! # Line Classification
//!
//! Every input line is either literal text or a macro construct introduced by
//! the sigil (`#`). This module recognizes the construct and splits it into a
//! keyword, a body and an assignment flag. It performs no lookups; see
//! [`registry`] for name resolution and [`crate::engine`] for evaluation.
//!
//! | Line              | Classification                        |
//! |-------------------|---------------------------------------|
//! | `plain text`      | [`LineKind::NotAMacro`]               |
//! | `#`, `#!..`, `##..` | [`LineKind::NoOp`]                  |
//! | `#NAME=TEXT`      | [`LineKind::Definition`]              |
//! | `#NAME ARGS..`    | [`LineKind::Invocation`]              |

pub mod builtins;
pub mod registry;

pub use registry::{BuiltinEntry, BuiltinFn, MacroRegistry};

/// Leading character of every macro construct.
pub const SIGIL: char = '#';

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A parsed macro construct. Borrowed from the line it was parsed from.
///
/// An empty `keyword` marks a no-op construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Macro<'a> {
    pub keyword: &'a str,
    pub body: &'a str,
    pub is_assignment: bool,
}

impl Macro<'_> {
    pub fn is_noop(&self) -> bool {
        self.keyword.is_empty()
    }
}

/// Classification of a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    NotAMacro,
    NoOp,
    Definition { keyword: &'a str, body: &'a str },
    Invocation { keyword: &'a str, body: &'a str },
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Parses `line` into a [`Macro`], or `None` if it does not start with the sigil.
pub fn parse_macro(line: &str) -> Option<Macro<'_>> {
    let rest = line.strip_prefix(SIGIL)?;

    // "#", "#!shebang", "##comment"
    if matches!(rest.chars().next(), None | Some('!') | Some('#')) {
        return Some(Macro::default());
    }

    let parsed = match rest.find([' ', '=']) {
        Some(pos) => Macro {
            keyword: &rest[..pos],
            body: &rest[pos + 1..],
            is_assignment: rest[pos..].starts_with('='),
        },
        None => Macro {
            keyword: rest,
            body: "",
            is_assignment: false,
        },
    };
    Some(parsed)
}

/// Decides what kind of construct `line` is.
pub fn classify(line: &str) -> LineKind<'_> {
    match parse_macro(line) {
        None => LineKind::NotAMacro,
        Some(m) if m.is_noop() => LineKind::NoOp,
        Some(Macro {
            keyword,
            body,
            is_assignment: true,
        }) => LineKind::Definition { keyword, body },
        Some(Macro { keyword, body, .. }) => LineKind::Invocation { keyword, body },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_macro() {
        assert_eq!(classify("plain text"), LineKind::NotAMacro);
        assert_eq!(classify(""), LineKind::NotAMacro);
        assert_eq!(classify(" #indented"), LineKind::NotAMacro);
    }

    #[test]
    fn test_noop_lines() {
        assert_eq!(classify("#"), LineKind::NoOp);
        assert_eq!(classify("#!/bin/sh"), LineKind::NoOp);
        assert_eq!(classify("##comment"), LineKind::NoOp);
    }

    #[test]
    fn test_empty_keyword_is_noop() {
        assert_eq!(classify("# spaced"), LineKind::NoOp);
        assert_eq!(classify("#=value"), LineKind::NoOp);
    }

    #[test]
    fn test_definition() {
        assert_eq!(
            classify("#GREET=Hello %1%!"),
            LineKind::Definition {
                keyword: "GREET",
                body: "Hello %1%!"
            }
        );
    }

    #[test]
    fn test_first_separator_wins() {
        assert_eq!(
            classify("#A b=c"),
            LineKind::Invocation {
                keyword: "A",
                body: "b=c"
            }
        );
        assert_eq!(
            classify("#A=b c"),
            LineKind::Definition {
                keyword: "A",
                body: "b c"
            }
        );
    }

    #[test]
    fn test_invocation_bodies() {
        assert_eq!(
            classify("#HELP"),
            LineKind::Invocation {
                keyword: "HELP",
                body: ""
            }
        );
        assert_eq!(
            classify("#GREET "),
            LineKind::Invocation {
                keyword: "GREET",
                body: ""
            }
        );
        assert_eq!(
            classify("#EMPTY="),
            LineKind::Definition {
                keyword: "EMPTY",
                body: ""
            }
        );
    }

    #[test]
    fn test_parse_macro_flags() {
        let m = parse_macro("#X=1").unwrap();
        assert!(m.is_assignment);
        assert!(!m.is_noop());
        assert!(parse_macro("text").is_none());
    }
}
