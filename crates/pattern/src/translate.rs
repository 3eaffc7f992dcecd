use std::borrow::Cow;

use crate::matcher::{DOS_DOT, DOS_QM, DOS_STAR};

/// Rewrites a user-facing DOS expression into the extended wildcard alphabet.
///
/// `""`, `"*"` and `"*.*"` collapse to `"*"`. `?` becomes `>`, a `.` that ends
/// the expression directly after `*` turns that `*` into `<`, and a `.` that
/// precedes `?` or `*` becomes `"`. Expressions without `.` or `?` are
/// returned borrowed.
///
/// ```
/// use pattern::translate_dos_expression;
///
/// assert_eq!(translate_dos_expression("*.*"), "*");
/// assert_eq!(translate_dos_expression("*.txt"), "*.txt");
/// assert_eq!(translate_dos_expression("foo*."), "foo<");
/// assert_eq!(translate_dos_expression("a?.*"), "a>\"*");
/// ```
#[must_use]
pub fn translate_dos_expression(expression: &str) -> Cow<'_, str> {
    if expression.is_empty() || expression == "*" || expression == "*.*" {
        return Cow::Borrowed("*");
    }

    if !expression.contains(['.', '?']) {
        return Cow::Borrowed(expression);
    }

    let chars: Vec<char> = expression.chars().collect();
    let mut translated = String::with_capacity(expression.len());

    for (index, &c) in chars.iter().enumerate() {
        match c {
            '.' => {
                let is_last = index + 1 == chars.len();
                let after_star = index > 0 && chars[index - 1] == '*';
                let before_wildcard = matches!(chars.get(index + 1), Some('?' | '*'));

                if is_last && after_star {
                    translated.pop();
                    translated.push(DOS_STAR);
                } else if before_wildcard {
                    translated.push(DOS_DOT);
                } else {
                    translated.push('.');
                }
            }
            '?' => translated.push(DOS_QM),
            other => translated.push(other),
        }
    }

    Cow::Owned(translated)
}
