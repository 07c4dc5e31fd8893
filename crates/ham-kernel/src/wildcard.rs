//! Shell-style wildcard matching for `switch`/`case` and the `Glob` rule.
//!
//! Patterns always match the whole input:
//! - `*` matches zero or more characters
//! - `?` matches exactly one character
//! - `[abc]` matches any character in the set, `[a-z]` any in the range
//! - `[!abc]` or `[^abc]` matches any character NOT in the set
//! - `\x` matches `x` literally
//!
//! A `[` without a closing `]` is an ordinary character.

use std::cell::Cell;

/// Work limit for one match. Patterns like `*a*a*a*...*b` backtrack
/// exponentially; past this many calls the match fails.
const MAX_MATCH_CALLS: usize = 100_000;

/// Match `input` against the wildcard `pattern`.
///
/// # Examples
/// ```
/// use ham_kernel::wildcard::wildcard_match;
///
/// assert!(wildcard_match("*.c", "main.c"));
/// assert!(wildcard_match("lib?", "lib1"));
/// assert!(!wildcard_match("*.c", "main.cpp"));
/// ```
pub fn wildcard_match(pattern: &str, input: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let input: Vec<char> = input.chars().collect();
    let calls = Cell::new(0usize);
    match_from(&pattern, &input, &calls)
}

fn match_from(pattern: &[char], input: &[char], calls: &Cell<usize>) -> bool {
    let count = calls.get() + 1;
    calls.set(count);
    if count > MAX_MATCH_CALLS {
        return false;
    }

    let Some((&first, rest)) = pattern.split_first() else {
        return input.is_empty();
    };

    match first {
        '*' => {
            let rest = skip_stars(rest);
            if rest.is_empty() {
                return true;
            }
            (0..=input.len()).any(|skip| match_from(rest, &input[skip..], calls))
        }
        '?' => match input.split_first() {
            Some((_, input_rest)) => match_from(rest, input_rest, calls),
            None => false,
        },
        '[' => {
            let Some((&ch, input_rest)) = input.split_first() else {
                return false;
            };
            match CharClass::parse(pattern) {
                Some((class, consumed)) => {
                    class.matches(ch) && match_from(&pattern[consumed..], input_rest, calls)
                }
                None => ch == '[' && match_from(rest, input_rest, calls),
            }
        }
        '\\' if !rest.is_empty() => match input.split_first() {
            Some((&ch, input_rest)) => ch == rest[0] && match_from(&rest[1..], input_rest, calls),
            None => false,
        },
        literal => match input.split_first() {
            Some((&ch, input_rest)) => ch == literal && match_from(rest, input_rest, calls),
            None => false,
        },
    }
}

fn skip_stars(mut pattern: &[char]) -> &[char] {
    while let Some(('*', rest)) = pattern.split_first() {
        pattern = rest;
    }
    pattern
}

/// A parsed `[...]` bracket expression.
struct CharClass {
    negated: bool,
    items: Vec<ClassItem>,
}

enum ClassItem {
    Single(char),
    Range(char, char),
}

impl CharClass {
    /// Parse a class starting at `pattern[0] == '['`.
    ///
    /// Returns the class and the number of pattern characters consumed, or
    /// `None` when the bracket is never closed.
    fn parse(pattern: &[char]) -> Option<(CharClass, usize)> {
        let mut idx = 1;
        let mut negated = false;
        if matches!(pattern.get(idx), Some('!') | Some('^')) {
            negated = true;
            idx += 1;
        }

        // `]` right after the opening bracket is a member, not the end.
        let first = idx;
        let mut items = Vec::new();
        while let Some(&c) = pattern.get(idx) {
            if c == ']' && idx > first {
                return Some((CharClass { negated, items }, idx + 1));
            }
            match (pattern.get(idx + 1), pattern.get(idx + 2)) {
                (Some('-'), Some(&end)) if end != ']' => {
                    items.push(ClassItem::Range(c, end));
                    idx += 3;
                }
                _ => {
                    items.push(ClassItem::Single(c));
                    idx += 1;
                }
            }
        }
        None
    }

    fn matches(&self, ch: char) -> bool {
        let found = self.items.iter().any(|item| match *item {
            ClassItem::Single(c) => c == ch,
            ClassItem::Range(start, end) => start <= ch && ch <= end,
        });
        found != self.negated
    }
}
