//! StringList, the one value type of the build language.
//!
//! Every expression evaluates to an ordered list of strings. Duplicates and
//! empty strings are significant; out-of-range access never fails and
//! degrades to an empty value instead.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

/// An ordered, possibly empty sequence of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StringList {
    elements: Vec<String>,
}

impl StringList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical "true" value: `["1"]`.
    pub fn true_value() -> Self {
        Self::from_element("1")
    }

    /// The canonical "false" value: the empty list.
    pub fn false_value() -> Self {
        Self::new()
    }

    /// `true_value()` or `false_value()` depending on `value`.
    pub fn from_bool(value: bool) -> Self {
        if value {
            Self::true_value()
        } else {
            Self::false_value()
        }
    }

    /// Create a list holding exactly one element.
    pub fn from_element(element: impl Into<String>) -> Self {
        Self {
            elements: vec![element.into()],
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// A list is true iff at least one of its elements is non-empty.
    pub fn is_true(&self) -> bool {
        self.elements.iter().any(|element| !element.is_empty())
    }

    /// Element at `index`, or `""` past the end.
    pub fn element_at(&self, index: usize) -> &str {
        self.elements.get(index).map(String::as_str).unwrap_or("")
    }

    /// Replace the element at `index`. Indices past the end are ignored.
    pub fn set_element_at(&mut self, index: usize, element: impl Into<String>) {
        if let Some(slot) = self.elements.get_mut(index) {
            *slot = element.into();
        }
    }

    pub fn first(&self) -> Option<&str> {
        self.elements.first().map(String::as_str)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.elements
    }

    pub fn contains(&self, element: &str) -> bool {
        self.elements.iter().any(|candidate| candidate == element)
    }

    /// Append a single element.
    pub fn push(&mut self, element: impl Into<String>) {
        self.elements.push(element.into());
    }

    /// Append all elements of `other`.
    ///
    /// `list.append(&list.clone())` doubles the list; the argument is read
    /// before anything is written.
    pub fn append(&mut self, other: &StringList) {
        self.elements.extend_from_slice(&other.elements);
    }

    /// Elements `[start, end)`, clamped to the list bounds.
    pub fn sub_list(&self, start: usize, end: usize) -> StringList {
        let end = end.min(self.len());
        if start >= end {
            return StringList::new();
        }
        Self {
            elements: self.elements[start..end].to_vec(),
        }
    }

    /// Concatenate all elements without a separator.
    pub fn join(&self) -> String {
        self.join_with("")
    }

    /// Concatenate all elements, placing `separator` between neighbours.
    pub fn join_with(&self, separator: &str) -> String {
        match self.elements.as_slice() {
            [] => String::new(),
            [single] => single.clone(),
            elements => elements.join(separator),
        }
    }

    /// Element-wise byte comparison.
    ///
    /// With `ignore_trailing_empty` the shorter list is padded with empty
    /// strings, so `["a"]` and `["a", ""]` compare equal. Without it only the
    /// common prefix is compared and the longer list sorts last.
    pub fn compare_with(&self, other: &StringList, ignore_trailing_empty: bool) -> Ordering {
        if ignore_trailing_empty {
            let count = self.len().max(other.len());
            for index in 0..count {
                match self.element_at(index).cmp(other.element_at(index)) {
                    Ordering::Equal => continue,
                    ordering => return ordering,
                }
            }
            Ordering::Equal
        } else {
            for (left, right) in self.elements.iter().zip(other.elements.iter()) {
                match left.cmp(right) {
                    Ordering::Equal => continue,
                    ordering => return ordering,
                }
            }
            self.len().cmp(&other.len())
        }
    }

    /// Cartesian product of `lists`, each combination concatenated.
    ///
    /// The first list is the outermost loop and the last list varies
    /// fastest. An empty factor empties the whole product.
    pub fn multiply(lists: &[StringList]) -> StringList {
        match lists {
            [] => StringList::new(),
            [single] => single.clone(),
            _ => {
                if lists.iter().any(StringList::is_empty) {
                    return StringList::new();
                }
                let mut product = vec![String::new()];
                for factor in lists {
                    let mut next = Vec::with_capacity(product.len() * factor.len());
                    for prefix in &product {
                        for element in &factor.elements {
                            let mut combined = String::with_capacity(prefix.len() + element.len());
                            combined.push_str(prefix);
                            combined.push_str(element);
                            next.push(combined);
                        }
                    }
                    product = next;
                }
                Self { elements: product }
            }
        }
    }
}

impl Index<usize> for StringList {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        self.element_at(index)
    }
}

impl fmt::Display for StringList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.join_with(" "))
    }
}

impl From<Vec<String>> for StringList {
    fn from(elements: Vec<String>) -> Self {
        Self { elements }
    }
}

impl From<Vec<&str>> for StringList {
    fn from(elements: Vec<&str>) -> Self {
        elements.into_iter().collect()
    }
}

impl From<&[&str]> for StringList {
    fn from(elements: &[&str]) -> Self {
        elements.iter().copied().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for StringList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for StringList {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.elements.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for StringList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a StringList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
