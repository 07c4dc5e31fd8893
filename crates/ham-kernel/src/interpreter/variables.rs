//! Variable domains: name to list bindings.

use std::collections::HashMap;

use ham_types::StringList;

/// A flat mapping from variable name to value.
///
/// Global variables, the locals of one block or rule invocation, the
/// numbered parameters of a rule call and the per-target variables are all
/// domains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableDomain {
    variables: HashMap<String, StringList>,
}

impl VariableDomain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<&StringList> {
        self.variables.get(name)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut StringList> {
        self.variables.get_mut(name)
    }

    /// Get the binding for `name`, inserting an empty list if it is absent.
    pub fn lookup_or_create(&mut self, name: &str) -> &mut StringList {
        self.variables.entry(name.to_string()).or_default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: StringList) {
        self.variables.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StringList)> {
        self.variables.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, StringList)> for VariableDomain {
    fn from_iter<I: IntoIterator<Item = (K, StringList)>>(iter: I) -> Self {
        Self {
            variables: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
