//! Variable expansion: turning `a$(X)b` into a list.
//!
//! Each `$(...)` reference becomes one factor of a product; literal text
//! between references becomes a single-element factor. The result is the
//! Cartesian product of all factors, so an empty variable empties the whole
//! word.
//!
//! A reference is `name[subscript]:mod:mod...`. When the reference itself
//! contains `$(`, it is split into those parts on the raw text, each part is
//! expanded on its own, and the reference is evaluated once for every
//! (name, subscript, modifiers) combination, the results concatenated.
//! Expanded text is never read as reference syntax again.

use ham_types::StringList;

use super::context::EvaluationContext;
use super::operations::StringListOperations;

/// A `$(...)` located in a source string.
struct ReferenceSpan<'t> {
    /// Text between the parentheses.
    inner: &'t str,
    /// Byte offset just past the closing parenthesis.
    end: usize,
    /// Whether `inner` holds nested references.
    recursive: bool,
}

/// Find the reference starting at `start`, which must point at `$(`.
fn find_reference(text: &str, start: usize) -> Option<ReferenceSpan<'_>> {
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut recursive = false;
    let mut index = start + 2;
    while index < bytes.len() {
        match bytes[index] {
            b'$' if bytes.get(index + 1) == Some(&b'(') => {
                recursive = true;
                depth += 1;
                index += 2;
                continue;
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(ReferenceSpan {
                        inner: &text[start + 2..index],
                        end: index + 1,
                        recursive,
                    });
                }
            }
            _ => {}
        }
        index += 1;
    }
    None
}

/// A reference split into its name, subscript and modifier segments.
#[derive(Debug, PartialEq, Eq)]
struct Reference<'t> {
    name: &'t str,
    subscript: Option<&'t str>,
    modifiers: Vec<&'t str>,
}

impl<'t> Reference<'t> {
    /// Split `inner` at top-level brackets and colons. Returns `None` for
    /// malformed references.
    fn parse(inner: &'t str) -> Option<Reference<'t>> {
        let mut depth = 0usize;
        let mut colons = Vec::new();
        let mut open = None;
        let mut close = None;
        for (index, c) in inner.char_indices() {
            match c {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                ':' if depth == 0 => colons.push(index),
                '[' if depth == 0 && colons.is_empty() && open.is_none() => open = Some(index),
                ']' if depth == 0 && colons.is_empty() && open.is_some() && close.is_none() => {
                    close = Some(index)
                }
                _ => {}
            }
        }

        let first_colon = colons.first().copied().unwrap_or(inner.len());
        let (name, subscript) = match (open, close) {
            (None, _) => (&inner[..first_colon], None),
            (Some(open), Some(close)) if close + 1 == first_colon => {
                (&inner[..open], Some(&inner[open + 1..close]))
            }
            _ => return None,
        };
        if name.is_empty() {
            return None;
        }

        let modifiers = colons
            .iter()
            .enumerate()
            .map(|(i, &colon)| {
                let end = colons.get(i + 1).copied().unwrap_or(inner.len());
                &inner[colon + 1..end]
            })
            .collect();

        Some(Reference {
            name,
            subscript,
            modifiers,
        })
    }
}

/// A resolved `[N]`, `[N-M]` or `[N-]` subscript: a zero-based start and an
/// optional exclusive end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Subscript {
    pub start: usize,
    pub end: Option<usize>,
}

impl Subscript {
    pub(crate) fn parse(text: &str) -> Option<Subscript> {
        let digits = text.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let first: usize = text[..digits].parse().ok()?;
        let rest = &text[digits..];

        let end = match rest.strip_prefix('-') {
            None if rest.is_empty() => Some(first),
            None => return None,
            Some("") => None,
            Some(last) => Some(last.parse::<usize>().ok()?),
        };

        // Index 0 is clamped to 1, and a closed range keeps its length, so
        // the end moves along with the start.
        if first == 0 {
            Some(Subscript {
                start: 0,
                end: end.map(|end| end.saturating_add(1)),
            })
        } else {
            Some(Subscript {
                start: first - 1,
                end,
            })
        }
    }
}

impl EvaluationContext<'_> {
    /// Expand every `$(...)` in `text`.
    pub fn expand_string(&self, text: &str) -> StringList {
        let Some(first) = text.find("$(") else {
            return StringList::from_element(text);
        };
        tracing::trace!(text, "expanding");

        let mut factors = Vec::new();
        let mut position = 0;
        let mut next = Some(first);
        while let Some(offset) = next {
            let start = position + offset;
            if start > position {
                factors.push(StringList::from_element(&text[position..start]));
            }

            let Some(span) = find_reference(text, start) else {
                return StringList::new();
            };
            let value = if span.recursive {
                self.expand_recursive_reference(span.inner)
            } else {
                self.expand_reference(span.inner)
            };
            if value.is_empty() {
                return StringList::new();
            }
            factors.push(value);

            position = span.end;
            next = text[position..].find("$(");
        }
        if position < text.len() {
            factors.push(StringList::from_element(&text[position..]));
        }

        StringList::multiply(&factors)
    }

    /// Evaluate the inside of one `$(...)` that contains no nested
    /// references.
    fn expand_reference(&self, inner: &str) -> StringList {
        match Reference::parse(inner) {
            Some(reference) => {
                self.evaluate_reference(reference.name, reference.subscript, &reference.modifiers)
            }
            None => StringList::new(),
        }
    }

    /// Evaluate a reference whose parts contain `$(...)`.
    fn expand_recursive_reference(&self, inner: &str) -> StringList {
        let Some(reference) = Reference::parse(inner) else {
            return StringList::new();
        };

        let names = self.expand_string(reference.name);
        let subscripts: Vec<Option<String>> = match reference.subscript {
            None => vec![None],
            Some(text) => self.expand_string(text).into_iter().map(Some).collect(),
        };
        let mut modifier_sets: Vec<Vec<String>> = vec![Vec::new()];
        for segment in &reference.modifiers {
            let candidates = self.expand_string(segment);
            let mut next = Vec::with_capacity(modifier_sets.len() * candidates.len());
            for set in &modifier_sets {
                for candidate in candidates.iter() {
                    let mut extended = set.clone();
                    extended.push(candidate.clone());
                    next.push(extended);
                }
            }
            modifier_sets = next;
        }

        let mut result = StringList::new();
        for name in names.iter() {
            for subscript in &subscripts {
                for set in &modifier_sets {
                    let modifiers: Vec<&str> = set.iter().map(String::as_str).collect();
                    result.append(&self.evaluate_reference(name, subscript.as_deref(), &modifiers));
                }
            }
        }
        result
    }

    /// Look up `name`, then apply the subscript and modifiers. None of the
    /// parts are expanded further.
    fn evaluate_reference(
        &self,
        name: &str,
        subscript: Option<&str>,
        modifiers: &[&str],
    ) -> StringList {
        let empty = StringList::new();
        let value = self.lookup_variable(name).unwrap_or(&empty);

        let (input, max_size) = match subscript {
            None => (value.clone(), usize::MAX),
            Some(text) => {
                let Some(subscript) = Subscript::parse(text) else {
                    return StringList::new();
                };
                let input = value.sub_list(subscript.start, value.len());
                let max_size = subscript
                    .end
                    .map_or(usize::MAX, |end| end.saturating_sub(subscript.start));
                (input, max_size)
            }
        };

        let operations = StringListOperations::from_segments(modifiers.iter().copied());
        operations.apply(&input, max_size, self.behavior())
    }
}
