//! Evaluation-wide mutable state.
//!
//! One [`EvaluationContext`] lives for a whole build description. It borrows
//! the global variables and the target pool, owns the rule pool and the
//! local scope chain, and carries the pending jump condition between
//! statements.
//!
//! Scope swaps go through the `with_*` helpers, which restore the previous
//! state after the closure returns whether it succeeded or failed.

use std::fmt;
use std::io::{self, Write};
use std::mem;

use ham_types::{Behavior, StringList};

use super::scope::VariableScope;
use super::variables::VariableDomain;
use crate::error::{EvalError, EvalResult};
use crate::rules::{register_builtins, RulePool};
use crate::targets::{TargetBinder, TargetPool};

/// Maximum nesting of `include` statements.
pub const INCLUDE_DEPTH_LIMIT: usize = 256;

/// Maximum nesting of rule invocations.
pub const RULE_CALL_DEPTH_LIMIT: usize = 1024;

/// Pending non-local control flow.
///
/// Set by `break`, `continue`, `return`, `jumptoeof` and the `Exit` rule;
/// checked after every statement and cleared by the construct that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpCondition {
    #[default]
    None,
    Break,
    Continue,
    Return,
    JumpToEof,
    Exit,
}

impl JumpCondition {
    pub fn is_none(self) -> bool {
        self == JumpCondition::None
    }
}

pub struct EvaluationContext<'a> {
    behavior: Behavior,
    global_variables: &'a mut VariableDomain,
    local_scope: VariableScope,
    built_in_variables: Option<VariableDomain>,
    targets: &'a mut TargetPool,
    rules: RulePool,
    binder: TargetBinder,
    jump_condition: JumpCondition,
    include_depth: usize,
    rule_call_depth: usize,
    output: Box<dyn Write + 'a>,
    error_output: Box<dyn Write + 'a>,
}

impl<'a> EvaluationContext<'a> {
    /// Create a context writing to stdout/stderr, with the built-in rules
    /// registered.
    pub fn new(global_variables: &'a mut VariableDomain, targets: &'a mut TargetPool) -> Self {
        let mut rules = RulePool::new();
        register_builtins(&mut rules);
        Self {
            behavior: Behavior::default(),
            global_variables,
            local_scope: VariableScope::new(),
            built_in_variables: None,
            targets,
            rules,
            binder: TargetBinder::new(),
            jump_condition: JumpCondition::None,
            include_depth: 0,
            rule_call_depth: 0,
            output: Box::new(io::stdout()),
            error_output: Box::new(io::stderr()),
        }
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn set_behavior(&mut self, behavior: Behavior) {
        self.behavior = behavior;
    }

    pub fn global_variables(&self) -> &VariableDomain {
        &*self.global_variables
    }

    pub fn local_scope(&self) -> &VariableScope {
        &self.local_scope
    }

    /// The numbered parameters of the rule currently executing.
    pub fn built_in_variables(&self) -> Option<&VariableDomain> {
        self.built_in_variables.as_ref()
    }

    pub fn targets(&self) -> &TargetPool {
        &*self.targets
    }

    pub fn targets_mut(&mut self) -> &mut TargetPool {
        &mut *self.targets
    }

    pub fn rules(&self) -> &RulePool {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RulePool {
        &mut self.rules
    }

    pub fn binder(&self) -> &TargetBinder {
        &self.binder
    }

    pub fn jump_condition(&self) -> JumpCondition {
        self.jump_condition
    }

    pub fn set_jump_condition(&mut self, condition: JumpCondition) {
        self.jump_condition = condition;
    }

    pub fn include_depth(&self) -> usize {
        self.include_depth
    }

    pub fn rule_call_depth(&self) -> usize {
        self.rule_call_depth
    }

    pub fn output(&mut self) -> &mut dyn Write {
        &mut *self.output
    }

    pub fn error_output(&mut self) -> &mut dyn Write {
        &mut *self.error_output
    }

    pub fn set_output(&mut self, output: impl Write + 'a) {
        self.output = Box::new(output);
    }

    pub fn set_error_output(&mut self, error_output: impl Write + 'a) {
        self.error_output = Box::new(error_output);
    }

    /// Resolve a variable: rule parameters first, then the local chain, then
    /// globals.
    pub fn lookup_variable(&self, name: &str) -> Option<&StringList> {
        self.built_in_variables
            .as_ref()
            .and_then(|domain| domain.lookup(name))
            .or_else(|| self.local_scope.lookup(name))
            .or_else(|| self.global_variables.lookup(name))
    }

    /// The storage an assignment to `name` writes: an existing local, else
    /// the global (created on demand).
    pub fn lookup_or_create_variable(&mut self, name: &str) -> &mut StringList {
        if let Some(local) = self.local_scope.lookup_mut(name) {
            return local;
        }
        self.global_variables.lookup_or_create(name)
    }

    /// The domain `local` declarations write to.
    pub fn current_local_domain(&mut self) -> &mut VariableDomain {
        match self.local_scope.current_mut() {
            Some(domain) => domain,
            None => &mut *self.global_variables,
        }
    }

    /// Run `f` with `domain` layered over the current locals.
    pub fn with_local_scope<T>(
        &mut self,
        domain: VariableDomain,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved_depth = self.local_scope.depth();
        self.local_scope.push_frame(domain);
        let result = f(self);
        self.local_scope.truncate(saved_depth);
        result
    }

    /// Run `f` as a rule body: `built_ins` replaces the numbered parameters
    /// and `locals` is layered over the caller's locals.
    pub fn with_rule_scope<T>(
        &mut self,
        built_ins: VariableDomain,
        locals: VariableDomain,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved_built_ins = mem::replace(&mut self.built_in_variables, Some(built_ins));
        let result = self.with_local_scope(locals, f);
        self.built_in_variables = saved_built_ins;
        result
    }

    /// Run `f` one rule-call level deeper, failing once the limit is hit.
    pub fn with_rule_call_depth<T>(
        &mut self,
        rule: &str,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        self.rule_call_depth += 1;
        let result = if self.rule_call_depth >= RULE_CALL_DEPTH_LIMIT {
            Err(EvalError::RuleCallDepthExceeded {
                rule: rule.to_string(),
                limit: RULE_CALL_DEPTH_LIMIT,
            })
        } else {
            f(self)
        };
        self.rule_call_depth -= 1;
        result
    }

    /// Run `f` one include level deeper, failing once the limit is hit.
    pub fn with_include_depth<T>(
        &mut self,
        file: &str,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        self.include_depth += 1;
        let result = if self.include_depth >= INCLUDE_DEPTH_LIMIT {
            Err(EvalError::IncludeDepthExceeded {
                file: file.to_string(),
                limit: INCLUDE_DEPTH_LIMIT,
            })
        } else {
            f(self)
        };
        self.include_depth -= 1;
        result
    }

    /// Write a warning line to the error stream.
    pub fn warn(&mut self, message: fmt::Arguments<'_>) -> EvalResult<()> {
        writeln!(self.error_output, "warning: {message}")?;
        Ok(())
    }
}

impl fmt::Debug for EvaluationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("behavior", &self.behavior)
            .field("local_scope_depth", &self.local_scope.depth())
            .field("jump_condition", &self.jump_condition)
            .field("include_depth", &self.include_depth)
            .field("rule_call_depth", &self.rule_call_depth)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(text: &str) -> StringList {
        StringList::from_element(text)
    }

    #[test]
    fn lookup_order_is_built_ins_locals_globals() {
        let mut globals = VariableDomain::new();
        globals.set("X", value("global"));
        globals.set("1", value("global-one"));
        let mut targets = TargetPool::new();
        let mut context = EvaluationContext::new(&mut globals, &mut targets);

        assert_eq!(context.lookup_variable("X"), Some(&value("global")));

        let mut locals = VariableDomain::new();
        locals.set("X", value("local"));
        let mut built_ins = VariableDomain::new();
        built_ins.set("1", value("param"));

        context.with_rule_scope(built_ins, locals, |context| {
            assert_eq!(context.lookup_variable("X"), Some(&value("local")));
            assert_eq!(context.lookup_variable("1"), Some(&value("param")));
        });

        assert_eq!(context.lookup_variable("X"), Some(&value("global")));
        assert_eq!(context.lookup_variable("1"), Some(&value("global-one")));
        assert!(context.built_in_variables().is_none());
    }

    #[test]
    fn scope_is_restored_after_errors() {
        let mut globals = VariableDomain::new();
        let mut targets = TargetPool::new();
        let mut context = EvaluationContext::new(&mut globals, &mut targets);

        let result: EvalResult<()> = context.with_local_scope(VariableDomain::new(), |context| {
            context.with_local_scope(VariableDomain::new(), |_| {
                Err(EvalError::IncludeFailed {
                    file: "x".into(),
                    reason: "test".into(),
                })
            })
        });
        assert!(result.is_err());
        assert_eq!(context.local_scope().depth(), 0);
    }

    #[test]
    fn assignment_storage_prefers_existing_locals() {
        let mut globals = VariableDomain::new();
        let mut targets = TargetPool::new();
        let mut context = EvaluationContext::new(&mut globals, &mut targets);

        let mut locals = VariableDomain::new();
        locals.set("L", StringList::new());
        context.with_local_scope(locals, |context| {
            context.lookup_or_create_variable("L").push("local");
            context.lookup_or_create_variable("G").push("global");
            assert!(context.local_scope().contains("L"));
        });

        assert!(context.global_variables().lookup("L").is_none());
        assert_eq!(context.global_variables().lookup("G"), Some(&value("global")));
    }

    #[test]
    fn rule_call_depth_limit() {
        let mut globals = VariableDomain::new();
        let mut targets = TargetPool::new();
        let mut context = EvaluationContext::new(&mut globals, &mut targets);

        fn recurse(context: &mut EvaluationContext<'_>, entered: &mut usize) -> EvalResult<()> {
            context.with_rule_call_depth("Recurse", |context| {
                *entered += 1;
                recurse(context, entered)
            })
        }

        let mut entered = 0;
        let err = recurse(&mut context, &mut entered).unwrap_err();
        assert!(matches!(
            err,
            EvalError::RuleCallDepthExceeded { limit: RULE_CALL_DEPTH_LIMIT, .. }
        ));
        assert_eq!(entered, RULE_CALL_DEPTH_LIMIT - 1);
        assert_eq!(context.rule_call_depth(), 0);
    }

    #[test]
    fn built_in_rules_are_registered() {
        let mut globals = VariableDomain::new();
        let mut targets = TargetPool::new();
        let context = EvaluationContext::new(&mut globals, &mut targets);
        for name in ["Echo", "ECHO", "echo", "Exit", "Match", "Glob", "NotFile", "DEPENDS"] {
            assert!(context.rules().lookup(name).is_some(), "{name} missing");
        }
    }
}
