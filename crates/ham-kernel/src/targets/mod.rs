//! Targets: the dependency graph evaluation writes into.
//!
//! Evaluation only ever creates targets, flags them, attaches variables and
//! records dependencies and action calls. Walking the resulting graph is the
//! job of a separate make phase.

mod binder;

pub use binder::{BoundTarget, FileStatus, TargetBinder};

use std::collections::HashMap;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::interpreter::VariableDomain;
use crate::rules::RuleActionsCall;

/// Index of a target inside its [`TargetPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(usize);

impl TargetId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Flag bits set by the built-in target rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TargetFlags(u32);

impl TargetFlags {
    pub const NONE: TargetFlags = TargetFlags(0);
    /// `Always`: rebuild even when up to date.
    pub const BUILD_ALWAYS: TargetFlags = TargetFlags(1 << 0);
    /// `Leaves`: depend only on the leaves of the dependency tree.
    pub const DEPENDS_ON_LEAVES: TargetFlags = TargetFlags(1 << 1);
    /// `NoCare`: a missing source is not an error.
    pub const IGNORE_IF_MISSING: TargetFlags = TargetFlags(1 << 2);
    /// `NotFile`: pseudo target without a file behind it.
    pub const NOT_A_FILE: TargetFlags = TargetFlags(1 << 3);
    /// `NoUpdate`: build only if missing.
    pub const DONT_UPDATE: TargetFlags = TargetFlags(1 << 4);
    /// `Temporary`: may be removed after its dependents are built.
    pub const TEMPORARY: TargetFlags = TargetFlags(1 << 5);

    pub fn contains(self, other: TargetFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: TargetFlags) {
        self.0 |= other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for TargetFlags {
    type Output = TargetFlags;

    fn bitor(self, rhs: TargetFlags) -> TargetFlags {
        TargetFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for TargetFlags {
    fn bitor_assign(&mut self, rhs: TargetFlags) {
        self.insert(rhs);
    }
}

/// A named node of the dependency graph.
#[derive(Debug, Clone)]
pub struct Target {
    name: String,
    flags: TargetFlags,
    variables: Option<VariableDomain>,
    dependencies: Vec<TargetId>,
    includes: Vec<TargetId>,
    actions_calls: Vec<RuleActionsCall>,
}

impl Target {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: TargetFlags::NONE,
            variables: None,
            dependencies: Vec::new(),
            includes: Vec::new(),
            actions_calls: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> TargetFlags {
        self.flags
    }

    pub fn is_marked(&self, flags: TargetFlags) -> bool {
        self.flags.contains(flags)
    }

    pub fn set_flags(&mut self, flags: TargetFlags) {
        self.flags.insert(flags);
    }

    /// Target-specific variables, if any were ever set.
    pub fn variables(&self) -> Option<&VariableDomain> {
        self.variables.as_ref()
    }

    /// Target-specific variables, created on first use.
    pub fn variables_or_create(&mut self) -> &mut VariableDomain {
        self.variables.get_or_insert_with(VariableDomain::new)
    }

    pub fn dependencies(&self) -> &[TargetId] {
        &self.dependencies
    }

    /// Record a dependency; adding the same target twice is a no-op.
    pub fn add_dependency(&mut self, target: TargetId) {
        if !self.dependencies.contains(&target) {
            self.dependencies.push(target);
        }
    }

    pub fn includes(&self) -> &[TargetId] {
        &self.includes
    }

    pub fn add_include(&mut self, target: TargetId) {
        if !self.includes.contains(&target) {
            self.includes.push(target);
        }
    }

    pub fn actions_calls(&self) -> &[RuleActionsCall] {
        &self.actions_calls
    }

    pub fn add_actions_call(&mut self, call: RuleActionsCall) {
        self.actions_calls.push(call);
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// All targets known to one evaluation, addressed by name or [`TargetId`].
#[derive(Debug, Clone, Default)]
pub struct TargetPool {
    targets: Vec<Target>,
    by_name: HashMap<String, TargetId>,
}

impl TargetPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<TargetId> {
        self.by_name.get(name).copied()
    }

    pub fn lookup_or_create(&mut self, name: &str) -> TargetId {
        if let Some(id) = self.lookup(name) {
            return id;
        }
        let id = TargetId(self.targets.len());
        self.targets.push(Target::new(name));
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Look up (creating as needed) every target named in `names`.
    pub fn lookup_or_create_all<'n>(&mut self, names: impl IntoIterator<Item = &'n String>) -> Vec<TargetId> {
        names.into_iter().map(|name| self.lookup_or_create(name)).collect()
    }

    pub fn get(&self, id: TargetId) -> &Target {
        &self.targets[id.0]
    }

    pub fn get_mut(&mut self, id: TargetId) -> &mut Target {
        &mut self.targets[id.0]
    }

    pub fn by_name(&self, name: &str) -> Option<&Target> {
        self.lookup(name).map(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TargetId, &Target)> {
        self.targets
            .iter()
            .enumerate()
            .map(|(index, target)| (TargetId(index), target))
    }
}
