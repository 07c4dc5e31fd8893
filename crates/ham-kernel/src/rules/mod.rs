//! Rules: the callables of the build language.
//!
//! A [`Rule`] is looked up by name in the [`RulePool`] and may carry
//! instructions (built-in or compiled from a `rule` block) and shell actions
//! (from an `actions` block). Calling a rule runs its instructions; if it has
//! actions, each target in the first argument also receives a
//! [`RuleActionsCall`].
//!
//! # Architecture
//!
//! ```text
//! RulePool
//! ├── Built-ins (Echo, Exit, Match, Glob, Depends, flag setters)
//! └── User rules (UserRuleInstructions from `rule` definitions)
//! ```

mod actions;
pub mod builtin;
mod pool;
mod traits;
mod user;

pub use actions::{ActionsFlags, RuleActions, RuleActionsCall};
pub use builtin::register_builtins;
pub use pool::{Rule, RulePool};
pub use traits::RuleInstructions;
pub use user::UserRuleInstructions;
