#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `pattern` decides whether a directory entry name matches a wildcard
//! expression. Two dialects are supported. [`MatchType::Simple`] understands
//! `*` (zero or more characters) and `?` (exactly one character) and treats
//! everything else literally. [`MatchType::Dos`] reproduces legacy 8.3 name
//! matching, adding the `<`, `>` and `"` wildcards and `\` escapes.
//!
//! # Design
//!
//! - [`matches_simple`] and [`matches_dos`] share one backtracking matcher.
//!   Variable-width wildcards try the shortest span first and failed
//!   `(expression, name)` positions are memoised, so matching never degrades
//!   beyond `expression.len() * name.len()` steps.
//! - [`translate_dos_expression`] rewrites ordinary `*`/`?`/`.` expressions into
//!   the extended alphabet when legacy parity is requested.
//! - [`NamePattern`] performs translation once and is cheap to evaluate per
//!   entry.
//!
//! # Invariants
//!
//! - An empty name never matches, and neither does an empty or absent
//!   expression.
//! - A lone `*` matches every non-empty name.
//! - `<` may consume the last `.` of the name only as the final character of
//!   its span.
//! - A trailing lone `\` in a Dos expression matches a literal `\`.
//!
//! # Errors
//!
//! Matching is total: malformed expressions simply fail to match.
//!
//! # Examples
//!
//! ```
//! use pattern::{MatchType, NamePattern, is_match};
//! use std::ffi::OsStr;
//!
//! assert!(is_match(Some("*.rs"), "lib.rs", true, MatchType::Simple));
//! assert!(!is_match(None, "lib.rs", true, MatchType::Simple));
//!
//! let txt = NamePattern::new("*.txt", MatchType::Dos);
//! assert!(txt.matches(OsStr::new("notes.TXT")));
//! assert!(!txt.matches(OsStr::new("notes")));
//! ```
//!
//! # See also
//!
//! - `enumeration` evaluates a [`NamePattern`] against every listed entry.

mod compiled;
mod matcher;
mod translate;


pub use compiled::NamePattern;
pub use matcher::{DOS_DOT, DOS_QM, DOS_STAR, ESCAPE, matches_dos, matches_simple};
pub use translate::translate_dos_expression;

/// Wildcard dialect applied to entry names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MatchType {
    /// `*` and `?` only; no escaping.
    #[default]
    Simple,
    /// Legacy DOS semantics with `<`, `>`, `"` and `\` escapes.
    Dos,
}

/// Matches `name` against an optional expression using the chosen dialect.
///
/// The expression is used as given; callers that want DOS translation apply
/// [`translate_dos_expression`] first or use [`NamePattern`].
#[must_use]
pub fn is_match(expression: Option<&str>, name: &str, ignore_case: bool, match_type: MatchType) -> bool {
    let Some(expression) = expression else {
        return false;
    };

    match match_type {
        MatchType::Simple => matches_simple(expression, name, ignore_case),
        MatchType::Dos => matches_dos(expression, name, ignore_case),
    }
}
