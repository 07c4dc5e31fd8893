//! Built-in rules.
//!
//! Each rule is registered under its Ham name and its Jam upper-case name;
//! `Echo` and `Exit` also answer to lower case.

mod depends;
mod echo;
mod exit;
mod glob;
mod matching;
mod target_flags;

use std::rc::Rc;

use super::RulePool;
use crate::targets::TargetFlags;

pub use depends::{Depends, Includes};
pub use echo::Echo;
pub use exit::Exit;
pub use glob::Glob;
pub use matching::Match;
pub use target_flags::SetTargetFlag;

/// Register all built-in rules with the pool.
pub fn register_builtins(rules: &mut RulePool) {
    rules.add_built_in(&["Echo", "ECHO", "echo"], Rc::new(Echo));
    rules.add_built_in(&["Exit", "EXIT", "exit"], Rc::new(Exit));
    rules.add_built_in(&["Match", "MATCH"], Rc::new(Match));
    rules.add_built_in(&["Glob", "GLOB"], Rc::new(Glob));
    rules.add_built_in(&["Depends", "DEPENDS"], Rc::new(Depends));
    rules.add_built_in(&["Includes", "INCLUDES"], Rc::new(Includes));

    let flag_rules = [
        (["Always", "ALWAYS"], TargetFlags::BUILD_ALWAYS),
        (["Leaves", "LEAVES"], TargetFlags::DEPENDS_ON_LEAVES),
        (["NoCare", "NOCARE"], TargetFlags::IGNORE_IF_MISSING),
        (["NotFile", "NOTFILE"], TargetFlags::NOT_A_FILE),
        (["NoUpdate", "NOUPDATE"], TargetFlags::DONT_UPDATE),
        (["Temporary", "TEMPORARY"], TargetFlags::TEMPORARY),
    ];
    for (names, flag) in flag_rules {
        rules.add_built_in(&names, Rc::new(SetTargetFlag::new(flag)));
    }
}
