//! Rules defined in the build language with `rule Name params { ... }`.

use std::rc::Rc;

use ham_types::StringList;
use tracing::debug;

use super::traits::RuleInstructions;
use crate::ast::Node;
use crate::error::EvalResult;
use crate::interpreter::{EvaluationContext, JumpCondition, VariableDomain};

/// A compiled `rule` body together with its formal parameter names.
///
/// The body is shared with the AST it came from, so redefinitions and
/// repeated calls never copy it.
#[derive(Debug, Clone)]
pub struct UserRuleInstructions {
    parameter_names: Vec<String>,
    body: Rc<Node>,
}

impl UserRuleInstructions {
    pub fn new(parameter_names: Vec<String>, body: Rc<Node>) -> Self {
        Self {
            parameter_names,
            body,
        }
    }

    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    pub fn body(&self) -> &Node {
        &self.body
    }

    /// `$(1)`..`$(n)`, `$(<)` and `$(>)` for one call. Empty parameters are
    /// left unset.
    fn built_in_variables(parameters: &[StringList]) -> VariableDomain {
        let mut built_ins = VariableDomain::new();
        for (index, parameter) in parameters.iter().enumerate() {
            if parameter.is_empty() {
                continue;
            }
            built_ins.set((index + 1).to_string(), parameter.clone());
            match index {
                0 => built_ins.set("<", parameter.clone()),
                1 => built_ins.set(">", parameter.clone()),
                _ => {}
            }
        }
        built_ins
    }
}

impl RuleInstructions for UserRuleInstructions {
    #[tracing::instrument(level = "debug", skip_all, fields(parameters = parameters.len()))]
    fn evaluate(
        &self,
        context: &mut EvaluationContext<'_>,
        parameters: &[StringList],
    ) -> EvalResult<StringList> {
        let built_ins = Self::built_in_variables(parameters);

        // Formals without a matching actual stay unbound.
        let locals: VariableDomain = self
            .parameter_names
            .iter()
            .zip(parameters)
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        // The new frame chains onto the caller's locals, as in Jam.
        context.with_rule_scope(built_ins, locals, |context| {
            let result = context.evaluate(&self.body)?;
            if context.jump_condition() == JumpCondition::Return {
                context.set_jump_condition(JumpCondition::None);
            }
            debug!(result = %result, "rule returned");
            Ok(result)
        })
    }
}
