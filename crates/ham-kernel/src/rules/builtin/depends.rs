//! Depends and Includes: record edges of the dependency graph.

use ham_types::StringList;

use crate::error::EvalResult;
use crate::interpreter::EvaluationContext;
use crate::rules::RuleInstructions;
use crate::targets::{Target, TargetId};

/// `Depends targets : sources ;`
#[derive(Debug, Clone, Copy, Default)]
pub struct Depends;

/// `Includes targets : sources ;`: sources are built along with whatever
/// depends on the targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Includes;

fn link(
    context: &mut EvaluationContext<'_>,
    parameters: &[StringList],
    add: fn(&mut Target, TargetId),
) {
    let empty = StringList::new();
    let targets = parameters.first().unwrap_or(&empty);
    let sources = parameters.get(1).unwrap_or(&empty);

    let pool = context.targets_mut();
    let targets = pool.lookup_or_create_all(targets.iter());
    let sources = pool.lookup_or_create_all(sources.iter());
    for &target in &targets {
        for &source in &sources {
            add(pool.get_mut(target), source);
        }
    }
}

impl RuleInstructions for Depends {
    fn evaluate(
        &self,
        context: &mut EvaluationContext<'_>,
        parameters: &[StringList],
    ) -> EvalResult<StringList> {
        link(context, parameters, Target::add_dependency);
        Ok(StringList::new())
    }
}

impl RuleInstructions for Includes {
    fn evaluate(
        &self,
        context: &mut EvaluationContext<'_>,
        parameters: &[StringList],
    ) -> EvalResult<StringList> {
        link(context, parameters, Target::add_include);
        Ok(StringList::new())
    }
}
