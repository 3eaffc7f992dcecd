//! Backtracking wildcard matcher shared by the Simple and Dos modes.
//!
//! The matcher walks the expression and the name together. Every wildcard that
//! can consume a variable number of characters first tries to consume nothing
//! and only then consumes one more character and retries, so the shortest
//! plausible span is always explored first. Positions that already failed are
//! remembered, which bounds the work by `expression.len() * name.len()`.

/// Extended DOS wildcard: zero or more characters up to the last `.`.
pub const DOS_STAR: char = '<';
/// Extended DOS wildcard: one character, lenient at `.` and end of name.
pub const DOS_QM: char = '>';
/// Extended DOS wildcard: a `.` or the end of the name.
pub const DOS_DOT: char = '"';
/// Escape prefix honoured in Dos mode.
pub const ESCAPE: char = '\\';

const SIMPLE_WILDCARDS: &[char] = &['*', '?'];
const DOS_SPECIALS: &[char] = &['*', '?', DOS_STAR, DOS_QM, DOS_DOT, ESCAPE];

/// Returns `true` when `name` matches `expression` using `*` and `?` only.
///
/// Every other character, including `\`, is compared literally.
#[must_use]
pub fn matches_simple(expression: &str, name: &str, ignore_case: bool) -> bool {
    match_pattern(expression, name, ignore_case, false)
}

/// Returns `true` when `name` matches `expression` using DOS semantics.
///
/// On top of `*` and `?` the expression may contain `<`, `>`, and `"`, and `\`
/// escapes the character that follows it. A trailing lone `\` stands for a
/// literal backslash.
#[must_use]
pub fn matches_dos(expression: &str, name: &str, ignore_case: bool) -> bool {
    match_pattern(expression, name, ignore_case, true)
}

fn match_pattern(expression: &str, name: &str, ignore_case: bool, extended: bool) -> bool {
    if expression.is_empty() || name.is_empty() {
        return false;
    }

    let expression: Vec<char> = expression.chars().collect();
    let name: Vec<char> = name.chars().collect();

    if expression[0] == '*' {
        if expression.len() == 1 {
            return true;
        }

        let tail = &expression[1..];
        let specials = if extended {
            DOS_SPECIALS
        } else {
            SIMPLE_WILDCARDS
        };
        if !tail.iter().any(|c| specials.contains(c)) {
            return ends_with(&name, tail, ignore_case);
        }
    }

    Matcher::new(&expression, &name, ignore_case, extended).run()
}

fn ends_with(name: &[char], suffix: &[char], ignore_case: bool) -> bool {
    if name.len() < suffix.len() {
        return false;
    }
    name[name.len() - suffix.len()..]
        .iter()
        .zip(suffix)
        .all(|(&a, &b)| chars_equal(a, b, ignore_case))
}

fn chars_equal(a: char, b: char, ignore_case: bool) -> bool {
    a == b || (ignore_case && a.to_uppercase().eq(b.to_uppercase()))
}

struct Matcher<'a> {
    expression: &'a [char],
    name: &'a [char],
    ignore_case: bool,
    extended: bool,
    last_period: Option<usize>,
    failed: Vec<bool>,
}

impl<'a> Matcher<'a> {
    fn new(expression: &'a [char], name: &'a [char], ignore_case: bool, extended: bool) -> Self {
        let cells = (expression.len() + 1) * (name.len() + 1);
        Self {
            expression,
            name,
            ignore_case,
            extended,
            last_period: name.iter().rposition(|&c| c == '.'),
            failed: vec![false; cells],
        }
    }

    fn run(&mut self) -> bool {
        self.visit(0, 0)
    }

    fn finished(&self, position: usize) -> bool {
        position == self.name.len()
    }

    /// Tries to match `expression[e..]` against `name[n..]`.
    fn visit(&mut self, e: usize, n: usize) -> bool {
        if e >= self.expression.len() {
            return false;
        }

        let cell = e * (self.name.len() + 1) + n;
        if self.failed[cell] {
            return false;
        }

        let matched = self.step(e, n);
        if !matched {
            self.failed[cell] = true;
        }
        matched
    }

    fn step(&mut self, e: usize, n: usize) -> bool {
        let token = self.expression[e];
        let current = self.name.get(n).copied();
        let finished = current.is_none();

        match token {
            '*' => self.skip(e, n) || self.consume_and_stay(e, n),
            DOS_STAR if self.extended => {
                let at_last_period = current == Some('.') && self.last_period == Some(n);
                if at_last_period {
                    // The final period may only be swallowed as the last
                    // character of the `<` span.
                    self.skip(e, n) || self.consume_and_leave(e, n)
                } else {
                    self.skip(e, n) || self.consume_and_stay(e, n)
                }
            }
            DOS_QM if self.extended => {
                if finished || current == Some('.') {
                    self.skip(e, n)
                } else {
                    self.consume(e + 1, n)
                }
            }
            DOS_DOT if self.extended => match current {
                None => self.skip(e, n),
                Some('.') => self.consume(e + 1, n),
                Some(_) => false,
            },
            ESCAPE if self.extended => {
                let (literal, next) = match self.expression.get(e + 1) {
                    Some(&escaped) => (escaped, e + 2),
                    None => (ESCAPE, e + 1),
                };
                match current {
                    Some(c) if chars_equal(literal, c, self.ignore_case) => self.consume(next, n),
                    _ => false,
                }
            }
            '?' => !finished && self.consume(e + 1, n),
            literal => match current {
                Some(c) if chars_equal(literal, c, self.ignore_case) => self.consume(e + 1, n),
                _ => false,
            },
        }
    }

    /// Moves past the wildcard at `e` without consuming a name character.
    fn skip(&mut self, e: usize, n: usize) -> bool {
        if e + 1 == self.expression.len() {
            // Reaching the end of the expression while a character is pending
            // counts that character as taken by the final wildcard.
            return self.finished(n) || n + 1 == self.name.len();
        }
        self.visit(e + 1, n)
    }

    /// Consumes `name[n]` and continues at expression offset `next`.
    fn consume(&mut self, next: usize, n: usize) -> bool {
        if next == self.expression.len() {
            return n + 1 == self.name.len();
        }
        self.visit(next, n + 1)
    }

    /// Consumes `name[n]` and keeps the wildcard at `e` active.
    fn consume_and_stay(&mut self, e: usize, n: usize) -> bool {
        !self.finished(n) && self.visit(e, n + 1)
    }

    /// Consumes `name[n]` as the final character of the wildcard at `e`.
    fn consume_and_leave(&mut self, e: usize, n: usize) -> bool {
        !self.finished(n) && self.visit(e + 1, n + 1)
    }
}
