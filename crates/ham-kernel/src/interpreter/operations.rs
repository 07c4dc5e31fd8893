//! The `$(var:modifiers)` engine.
//!
//! Each colon separated segment of a variable reference is fed to
//! [`StringListOperations::parse`], which accumulates the requested edits.
//! [`StringListOperations::apply`] then runs them over the variable's value.
//!
//! Letters:
//! - `G R D B S M` select a path part, or replace it when followed by `=value`
//! - `P` reduces each element to its parent directory
//! - `U` / `L` convert to upper / lower case (ASCII only)
//! - `E=value` substitutes `value` for an empty list
//! - `J=sep` joins all elements into one

use ham_types::{Behavior, BrokenSubscriptJoin, JoinCaseOperator, StringList};

use crate::path::{PathPart, PathParts};

/// Accumulated modifier state for one variable reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringListOperations {
    selected: [bool; 6],
    replacements: [Option<String>; 6],
    to_parent: bool,
    to_upper: bool,
    to_lower: bool,
    empty_replacement: Option<String>,
    join_separator: Option<String>,
}

impl StringListOperations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a sequence of modifier segments, e.g. `["B", "S=.o"]`.
    pub fn from_segments<'s>(segments: impl IntoIterator<Item = &'s str>) -> Self {
        let mut operations = Self::new();
        for segment in segments {
            operations.parse(segment);
        }
        operations
    }

    /// Accumulate one colon segment.
    ///
    /// A letter followed by `=` consumes the rest of the segment as its
    /// parameter. An unknown letter ends the segment.
    pub fn parse(&mut self, segment: &str) {
        let mut chars = segment.char_indices().peekable();
        while let Some((index, letter)) = chars.next() {
            let has_parameter = matches!(chars.peek(), Some((_, '=')));
            let parameter = || segment[index + letter.len_utf8() + 1..].to_string();

            match letter {
                'U' if !has_parameter => self.to_upper = true,
                'L' if !has_parameter => self.to_lower = true,
                'P' if !has_parameter => self.to_parent = true,
                'E' => {
                    self.empty_replacement = Some(if has_parameter { parameter() } else { String::new() });
                    if has_parameter {
                        return;
                    }
                }
                'J' => {
                    self.join_separator = Some(if has_parameter { parameter() } else { String::new() });
                    if has_parameter {
                        return;
                    }
                }
                letter => {
                    let Some(part) = PathPart::from_modifier(letter) else {
                        return;
                    };
                    if has_parameter {
                        self.replacements[part.index()] = Some(parameter());
                        return;
                    }
                    // Jam quirk: the first selector throws away every
                    // replacer set before it.
                    if !self.has_selectors() {
                        self.replacements = Default::default();
                    }
                    self.selected[part.index()] = true;
                }
            }
        }
    }

    /// Whether no modifier at all has been requested.
    pub fn is_empty(&self) -> bool {
        !self.has_path_operations()
            && !self.to_upper
            && !self.to_lower
            && self.empty_replacement.is_none()
            && self.join_separator.is_none()
    }

    pub fn has_selectors(&self) -> bool {
        self.selected.iter().any(|&selected| selected)
    }

    fn has_path_operations(&self) -> bool {
        self.to_parent || self.has_selectors() || self.replacements.iter().any(Option::is_some)
    }

    fn has_case_operation(&self) -> bool {
        self.to_upper || self.to_lower
    }

    fn convert_case(&self, text: &mut String) {
        if self.to_upper {
            text.make_ascii_uppercase();
        } else if self.to_lower {
            text.make_ascii_lowercase();
        }
    }

    fn edit_path(&self, element: &str, behavior: &Behavior) -> String {
        let mut parts = PathParts::parse(element);
        let any_selected = self.has_selectors();
        for part in PathPart::ALL {
            if let Some(replacement) = &self.replacements[part.index()] {
                parts.set(part, replacement.as_str());
            } else if any_selected && !self.selected[part.index()] {
                parts.set(part, "");
            }
        }
        if self.to_parent {
            parts.to_parent();
        }
        parts.build(behavior)
    }

    /// Run the accumulated modifiers over `input`.
    ///
    /// At most `max_size` elements are processed; the caller derives it from
    /// the subscript so that `:J` can tell a truncated list from a full one.
    pub fn apply(&self, input: &StringList, max_size: usize, behavior: &Behavior) -> StringList {
        if self.is_empty() {
            return input.sub_list(0, max_size);
        }

        let substituted;
        let input = match &self.empty_replacement {
            Some(replacement) if input.is_empty() => {
                substituted = StringList::from_element(replacement.as_str());
                &substituted
            }
            _ => input,
        };

        let join_first = self.join_separator.is_some()
            && self.has_case_operation()
            && behavior.join_case_operator() == JoinCaseOperator::JoinBeforeCaseOperator;

        let count = max_size.min(input.len());
        let mut result = StringList::new();
        for element in input.iter().take(count) {
            let mut edited = if self.has_path_operations() {
                self.edit_path(element, behavior)
            } else {
                element.clone()
            };
            if !join_first {
                self.convert_case(&mut edited);
            }
            result.push(edited);
        }

        let Some(separator) = &self.join_separator else {
            return result;
        };
        if count == 0 {
            return StringList::new();
        }
        // Jam loses the joined value when a subscript stops short of the end.
        if behavior.broken_subscript_join() == BrokenSubscriptJoin::BrokenSubscriptJoin
            && count < input.len()
        {
            return StringList::from_element("");
        }

        let mut joined = result.join_with(separator);
        if join_first {
            self.convert_case(&mut joined);
        }
        StringList::from_element(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ham_types::Compatibility;

    fn apply(segments: &[&str], input: &[&str]) -> StringList {
        let operations = StringListOperations::from_segments(segments.iter().copied());
        operations.apply(&StringList::from(input), usize::MAX, &Behavior::new(Compatibility::Ham))
    }

    fn list(elements: &[&str]) -> StringList {
        StringList::from(elements)
    }

    #[test]
    fn no_operations_truncates_only() {
        let operations = StringListOperations::new();
        let input = list(&["a", "b", "c"]);
        assert_eq!(operations.apply(&input, 2, &Behavior::default()), list(&["a", "b"]));
    }

    #[test]
    fn select_base_and_suffix() {
        assert_eq!(apply(&["B"], &["src/a.c", "b.h"]), list(&["a", "b"]));
        assert_eq!(apply(&["S"], &["src/a.c"]), list(&[".c"]));
        assert_eq!(apply(&["BS"], &["src/a.c"]), list(&["a.c"]));
        assert_eq!(apply(&["D"], &["src/a.c"]), list(&["src"]));
        assert_eq!(apply(&["G"], &["<x>a.c"]), list(&["<x>"]));
        assert_eq!(apply(&["M"], &["lib.a(m.o)"]), list(&["(m.o)"]));
    }

    #[test]
    fn replace_parts() {
        assert_eq!(apply(&["S=.o"], &["src/a.c"]), list(&["src/a.o"]));
        assert_eq!(apply(&["G=obj"], &["a.c"]), list(&["<obj>a.c"]));
        assert_eq!(apply(&["G="], &["<x>a.c"]), list(&["a.c"]));
        assert_eq!(apply(&["D=out"], &["src/a.c"]), list(&["out/a.c"]));
        assert_eq!(apply(&["R=/top"], &["src/a.c"]), list(&["/top/src/a.c"]));
    }

    #[test]
    fn replacer_after_selector_survives() {
        assert_eq!(apply(&["B", "S=.o"], &["src/a.c"]), list(&["a.o"]));
    }

    #[test]
    fn first_selector_discards_earlier_replacers() {
        // S=.o is wiped by the B that follows it.
        assert_eq!(apply(&["S=.o", "B"], &["src/a.c"]), list(&["a"]));
    }

    #[test]
    fn to_parent() {
        assert_eq!(apply(&["P"], &["src/sub/a.c"]), list(&["src/sub"]));
        assert_eq!(apply(&["P="], &["src/a.c"]), list(&["src/a.c"]));
    }

    #[test]
    fn case_conversion() {
        assert_eq!(apply(&["U"], &["MiXed"]), list(&["MIXED"]));
        assert_eq!(apply(&["L"], &["MiXed"]), list(&["mixed"]));
        assert_eq!(apply(&["UL"], &["MiXed"]), list(&["MIXED"]));
    }

    #[test]
    fn empty_replacement() {
        assert_eq!(apply(&["E=none"], &[]), list(&["none"]));
        assert_eq!(apply(&["E=none"], &["x"]), list(&["x"]));
        assert_eq!(apply(&["E"], &[]), list(&[""]));
    }

    #[test]
    fn join_parameter_runs_to_end_of_segment() {
        assert_eq!(apply(&["J=, "], &["a", "b"]), list(&["a, b"]));
        assert_eq!(apply(&["J=U"], &["a", "b"]), list(&["aUb"]));
        assert_eq!(apply(&["J"], &["a", "b"]), list(&["ab"]));
        assert_eq!(apply(&["J=-"], &[]), list(&[]));
    }

    #[test]
    fn broken_subscript_join() {
        let operations = StringListOperations::from_segments(["J=-"]);
        let input = list(&["Ham", "is", "super", "fun"]);
        let jam = Behavior::new(Compatibility::Jam);
        let ham = Behavior::new(Compatibility::Ham);

        assert_eq!(operations.apply(&input, 3, &jam), list(&[""]));
        assert_eq!(operations.apply(&input, 4, &jam), list(&["Ham-is-super-fun"]));
        assert_eq!(operations.apply(&input, 3, &ham), list(&["Ham-is-super"]));
    }

    #[test]
    fn join_before_case_converts_separator() {
        let operations = StringListOperations::from_segments(["U", "J=x"]);
        let input = list(&["a", "b"]);
        assert_eq!(
            operations.apply(&input, usize::MAX, &Behavior::new(Compatibility::Ham)),
            list(&["AXB"])
        );
        assert_eq!(
            operations.apply(&input, usize::MAX, &Behavior::new(Compatibility::Jam)),
            list(&["AxB"])
        );
    }

    #[test]
    fn unknown_letter_ends_segment() {
        assert_eq!(apply(&["QB"], &["src/a.c"]), list(&["src/a.c"]));
    }
}
