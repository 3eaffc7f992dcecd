use std::ffi::OsStr;

use crate::MatchType;
use crate::matcher::{matches_dos, matches_simple};
use crate::translate::translate_dos_expression;

/// An expression prepared once for repeated matching against entry names.
///
/// In [`MatchType::Dos`] mode the expression is translated with
/// [`translate_dos_expression`] at construction, so every
/// [`matches`](Self::matches) call sees the extended alphabet. Matching ignores
/// case unless [`case_sensitive`](Self::case_sensitive) is requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamePattern {
    expression: String,
    match_type: MatchType,
    ignore_case: bool,
}

impl NamePattern {
    /// Compiles `expression` for the given mode.
    #[must_use]
    pub fn new(expression: &str, match_type: MatchType) -> Self {
        let expression = match match_type {
            MatchType::Simple => expression.to_owned(),
            MatchType::Dos => {
                let translated = translate_dos_expression(expression);
                if translated != expression {
                    logging::trace_pattern!(
                        original = expression,
                        translated = %translated,
                        "translated dos expression"
                    );
                }
                translated.into_owned()
            }
        };

        Self {
            expression,
            match_type,
            ignore_case: true,
        }
    }

    /// Sets whether matching distinguishes letter case.
    #[must_use]
    pub const fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.ignore_case = !case_sensitive;
        self
    }

    /// Expression used for matching, after any translation.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Mode the pattern was compiled for.
    #[must_use]
    pub const fn match_type(&self) -> MatchType {
        self.match_type
    }

    /// Reports whether matching ignores letter case.
    #[must_use]
    pub const fn ignores_case(&self) -> bool {
        self.ignore_case
    }

    /// Returns `true` when `name` matches the compiled expression.
    ///
    /// Names that are not valid UTF-8 are compared lossily.
    #[must_use]
    pub fn matches(&self, name: &OsStr) -> bool {
        let name = name.to_string_lossy();
        self.matches_str(&name)
    }

    /// [`matches`](Self::matches) for names already held as `str`.
    #[must_use]
    pub fn matches_str(&self, name: &str) -> bool {
        match self.match_type {
            MatchType::Simple => matches_simple(&self.expression, name, self.ignore_case),
            MatchType::Dos => matches_dos(&self.expression, name, self.ignore_case),
        }
    }
}
