//! Shell actions attached to rules.

use std::fmt;
use std::ops::BitOr;
use std::rc::Rc;

use ham_types::StringList;

use crate::targets::TargetId;

/// Modifiers written between `actions` and the rule name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ActionsFlags(u32);

impl ActionsFlags {
    pub const NONE: ActionsFlags = ActionsFlags(0);
    /// `updated`: `$(>)` only lists sources that are being rebuilt.
    pub const UPDATED: ActionsFlags = ActionsFlags(1 << 0);
    /// `together`: merge calls on the same target into one.
    pub const TOGETHER: ActionsFlags = ActionsFlags(1 << 1);
    /// `ignore`: a failing command does not fail the target.
    pub const IGNORE: ActionsFlags = ActionsFlags(1 << 2);
    /// `quietly`: do not echo the action.
    pub const QUIETLY: ActionsFlags = ActionsFlags(1 << 3);
    /// `piecemeal`: split `$(>)` to fit the command line limit.
    pub const PIECEMEAL: ActionsFlags = ActionsFlags(1 << 4);
    /// `existing`: `$(>)` only lists sources that exist.
    pub const EXISTING: ActionsFlags = ActionsFlags(1 << 5);

    const KEYWORDS: [(&'static str, ActionsFlags); 6] = [
        ("updated", ActionsFlags::UPDATED),
        ("together", ActionsFlags::TOGETHER),
        ("ignore", ActionsFlags::IGNORE),
        ("quietly", ActionsFlags::QUIETLY),
        ("piecemeal", ActionsFlags::PIECEMEAL),
        ("existing", ActionsFlags::EXISTING),
    ];

    /// The flag named by an `actions` modifier keyword.
    pub fn from_keyword(keyword: &str) -> Option<ActionsFlags> {
        Self::KEYWORDS
            .iter()
            .find(|(name, _)| *name == keyword)
            .map(|&(_, flag)| flag)
    }

    pub fn contains(self, other: ActionsFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: ActionsFlags) {
        self.0 |= other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ActionsFlags {
    type Output = ActionsFlags;

    fn bitor(self, rhs: ActionsFlags) -> ActionsFlags {
        ActionsFlags(self.0 | rhs.0)
    }
}

impl fmt::Display for ActionsFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::KEYWORDS
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        write!(f, "{}", names.join(" "))
    }
}

/// The body of an `actions` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleActions {
    rule_name: String,
    actions: String,
    variables: StringList,
    flags: ActionsFlags,
}

impl RuleActions {
    pub fn new(
        rule_name: impl Into<String>,
        actions: impl Into<String>,
        variables: StringList,
        flags: ActionsFlags,
    ) -> Self {
        Self {
            rule_name: rule_name.into(),
            actions: actions.into(),
            variables,
            flags,
        }
    }

    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// The raw shell text, not yet expanded.
    pub fn actions(&self) -> &str {
        &self.actions
    }

    /// Variables named by `bind`, whose values are bound as targets.
    pub fn variables(&self) -> &StringList {
        &self.variables
    }

    pub fn flags(&self) -> ActionsFlags {
        self.flags
    }
}

/// One invocation of a rule's actions, queued on its targets.
#[derive(Debug, Clone)]
pub struct RuleActionsCall {
    actions: Rc<RuleActions>,
    targets: Vec<TargetId>,
    source_targets: Vec<TargetId>,
}

impl RuleActionsCall {
    pub fn new(actions: Rc<RuleActions>, targets: Vec<TargetId>, source_targets: Vec<TargetId>) -> Self {
        Self {
            actions,
            targets,
            source_targets,
        }
    }

    pub fn actions(&self) -> &RuleActions {
        &self.actions
    }

    /// The targets of the call (`$(<)`).
    pub fn targets(&self) -> &[TargetId] {
        &self.targets
    }

    /// The sources of the call (`$(>)`).
    pub fn source_targets(&self) -> &[TargetId] {
        &self.source_targets
    }
}
