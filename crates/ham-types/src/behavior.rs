//! Compatibility behavior selection.
//!
//! Jam, Boost.Jam and ham disagree on a handful of small details. A
//! [`Behavior`] value records which side of each disagreement the evaluator
//! takes; it is built from a [`Compatibility`] preset and can be tweaked per
//! quirk afterwards.

use std::fmt;
use std::str::FromStr;

/// Which interpreter's conventions to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compatibility {
    /// Perforce Jam 2.5.
    Jam,
    /// Boost.Jam.
    BoostJam,
    /// Native mode with the known Jam bugs corrected.
    #[default]
    Ham,
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compatibility::Jam => write!(f, "jam"),
            Compatibility::BoostJam => write!(f, "boost-jam"),
            Compatibility::Ham => write!(f, "ham"),
        }
    }
}

/// Returned when a compatibility name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown compatibility mode '{0}' (expected jam, boost or ham)")]
pub struct UnknownCompatibility(pub String);

impl FromStr for Compatibility {
    type Err = UnknownCompatibility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jam" => Ok(Compatibility::Jam),
            "boost" | "boost-jam" | "boostjam" => Ok(Compatibility::BoostJam),
            "ham" => Ok(Compatibility::Ham),
            _ => Err(UnknownCompatibility(s.to_string())),
        }
    }
}

/// Whether `Echo` appends a space after the last argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EchoTrailingSpace {
    EchoTrailingSpace,
    EchoNoTrailingSpace,
}

/// How a replaced path root is joined to the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathRootReplacerSlash {
    /// Always insert a `/` after the root.
    PathRootReplacerSlashAlways,
    /// Insert a `/` only when the root does not already end with one.
    PathRootReplacerSlashAvoidDuplicate,
}

/// Jam yields an empty string when `:J` is combined with a subscript that
/// stops before the end of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrokenSubscriptJoin {
    BrokenSubscriptJoin,
    NoBrokenSubscriptJoin,
}

/// Whether `:U`/`:L` also convert the `:J` separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinCaseOperator {
    /// Join first; the separator goes through the case conversion.
    JoinBeforeCaseOperator,
    /// Case-convert the elements, then join with the separator verbatim.
    JoinAfterCaseOperator,
}

/// The full set of quirks the evaluator consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Behavior {
    compatibility: Compatibility,
    echo_trailing_space: EchoTrailingSpace,
    path_root_replacer_slash: PathRootReplacerSlash,
    broken_subscript_join: BrokenSubscriptJoin,
    join_case_operator: JoinCaseOperator,
}

impl Behavior {
    /// The preset for `compatibility`.
    pub fn new(compatibility: Compatibility) -> Self {
        match compatibility {
            Compatibility::Jam => Self {
                compatibility,
                echo_trailing_space: EchoTrailingSpace::EchoTrailingSpace,
                path_root_replacer_slash: PathRootReplacerSlash::PathRootReplacerSlashAlways,
                broken_subscript_join: BrokenSubscriptJoin::BrokenSubscriptJoin,
                join_case_operator: JoinCaseOperator::JoinAfterCaseOperator,
            },
            Compatibility::BoostJam | Compatibility::Ham => Self {
                compatibility,
                echo_trailing_space: EchoTrailingSpace::EchoNoTrailingSpace,
                path_root_replacer_slash: PathRootReplacerSlash::PathRootReplacerSlashAvoidDuplicate,
                broken_subscript_join: BrokenSubscriptJoin::NoBrokenSubscriptJoin,
                join_case_operator: JoinCaseOperator::JoinBeforeCaseOperator,
            },
        }
    }

    pub fn compatibility(&self) -> Compatibility {
        self.compatibility
    }

    pub fn echo_trailing_space(&self) -> EchoTrailingSpace {
        self.echo_trailing_space
    }

    pub fn set_echo_trailing_space(&mut self, value: EchoTrailingSpace) -> &mut Self {
        self.echo_trailing_space = value;
        self
    }

    pub fn path_root_replacer_slash(&self) -> PathRootReplacerSlash {
        self.path_root_replacer_slash
    }

    pub fn set_path_root_replacer_slash(&mut self, value: PathRootReplacerSlash) -> &mut Self {
        self.path_root_replacer_slash = value;
        self
    }

    pub fn broken_subscript_join(&self) -> BrokenSubscriptJoin {
        self.broken_subscript_join
    }

    pub fn set_broken_subscript_join(&mut self, value: BrokenSubscriptJoin) -> &mut Self {
        self.broken_subscript_join = value;
        self
    }

    pub fn join_case_operator(&self) -> JoinCaseOperator {
        self.join_case_operator
    }

    pub fn set_join_case_operator(&mut self, value: JoinCaseOperator) -> &mut Self {
        self.join_case_operator = value;
        self
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self::new(Compatibility::default())
    }
}

impl From<Compatibility> for Behavior {
    fn from(compatibility: Compatibility) -> Self {
        Self::new(compatibility)
    }
}
