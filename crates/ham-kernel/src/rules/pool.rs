//! Rule registry.

use std::collections::HashMap;
use std::rc::Rc;

use super::actions::RuleActions;
use super::traits::RuleInstructions;

/// A named rule. Both halves are optional: a rule may be referenced before
/// it is defined, and an `actions` block may exist without a `rule` block.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    instructions: Option<Rc<dyn RuleInstructions>>,
    actions: Option<Rc<RuleActions>>,
}

impl Rule {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: None,
            actions: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> Option<&Rc<dyn RuleInstructions>> {
        self.instructions.as_ref()
    }

    pub fn set_instructions(&mut self, instructions: Rc<dyn RuleInstructions>) {
        self.instructions = Some(instructions);
    }

    pub fn actions(&self) -> Option<&Rc<RuleActions>> {
        self.actions.as_ref()
    }

    pub fn set_actions(&mut self, actions: Rc<RuleActions>) {
        self.actions = Some(actions);
    }

    /// Whether calling this rule does anything at all.
    pub fn is_defined(&self) -> bool {
        self.instructions.is_some() || self.actions.is_some()
    }
}

/// Registry of every rule known to an evaluation.
#[derive(Debug, Clone, Default)]
pub struct RulePool {
    rules: HashMap<String, Rule>,
}

impl RulePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn lookup_or_create(&mut self, name: &str) -> &mut Rule {
        self.rules
            .entry(name.to_string())
            .or_insert_with(|| Rule::new(name))
    }

    /// Register `instructions` under each of `names`.
    pub fn add_built_in(&mut self, names: &[&str], instructions: Rc<dyn RuleInstructions>) {
        for name in names {
            self.lookup_or_create(name)
                .set_instructions(Rc::clone(&instructions));
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
