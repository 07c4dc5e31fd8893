//! The callable seam between the evaluator and rule implementations.

use std::fmt;

use ham_types::StringList;

use crate::error::EvalResult;
use crate::interpreter::EvaluationContext;

/// Something a rule call can execute.
///
/// `parameters` holds one list per colon-separated argument of the call.
/// Implementations may read and mutate the context freely but must leave
/// its scopes as they found them.
pub trait RuleInstructions: fmt::Debug {
    fn evaluate(
        &self,
        context: &mut EvaluationContext<'_>,
        parameters: &[StringList],
    ) -> EvalResult<StringList>;
}
