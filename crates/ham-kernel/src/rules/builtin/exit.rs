//! Exit: print like Echo, then stop evaluation.

use ham_types::StringList;

use super::echo::print_words;
use crate::error::EvalResult;
use crate::interpreter::{EvaluationContext, JumpCondition};
use crate::rules::RuleInstructions;

#[derive(Debug, Clone, Copy, Default)]
pub struct Exit;

impl RuleInstructions for Exit {
    fn evaluate(
        &self,
        context: &mut EvaluationContext<'_>,
        parameters: &[StringList],
    ) -> EvalResult<StringList> {
        print_words(context, parameters.first())?;
        context.set_jump_condition(JumpCondition::Exit);
        Ok(StringList::new())
    }
}
