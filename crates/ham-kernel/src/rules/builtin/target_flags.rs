//! Always, Leaves, NoCare, NotFile, NoUpdate, Temporary.

use ham_types::StringList;

use crate::error::EvalResult;
use crate::interpreter::EvaluationContext;
use crate::rules::RuleInstructions;
use crate::targets::TargetFlags;

/// Marks every target named in the first argument with one flag.
#[derive(Debug, Clone, Copy)]
pub struct SetTargetFlag {
    flag: TargetFlags,
}

impl SetTargetFlag {
    pub fn new(flag: TargetFlags) -> Self {
        Self { flag }
    }

    pub fn flag(&self) -> TargetFlags {
        self.flag
    }
}

impl RuleInstructions for SetTargetFlag {
    fn evaluate(
        &self,
        context: &mut EvaluationContext<'_>,
        parameters: &[StringList],
    ) -> EvalResult<StringList> {
        if let Some(names) = parameters.first() {
            let targets = context.targets_mut().lookup_or_create_all(names.iter());
            for target in targets {
                context.targets_mut().get_mut(target).set_flags(self.flag);
            }
        }
        Ok(StringList::new())
    }
}
