//! Node evaluation.
//!
//! Every node reduces to a [`StringList`]. Statements report the value of
//! their last expression, so `rule` bodies can return a value simply by
//! ending with one.
//!
//! Non-local control flow is not a Rust-level return. `break`, `continue`,
//! `return` and `jumptoeof` set the context's [`JumpCondition`]; blocks stop
//! after any statement that leaves one pending, and the construct that owns
//! the jump (loop, rule invocation, include) clears it.

use std::fs;
use std::rc::Rc;

use ham_types::StringList;
use tracing::{debug, warn};

use super::context::{EvaluationContext, JumpCondition};
use super::variables::VariableDomain;
use crate::ast::*;
use crate::error::{EvalError, EvalResult};
use crate::parser::parse;
use crate::rules::{RuleActions, RuleActionsCall, UserRuleInstructions};
use crate::targets::{FileStatus, TargetFlags};
use crate::wildcard::wildcard_match;

impl Node {
    /// Evaluate this node in `context`.
    pub fn evaluate(&self, context: &mut EvaluationContext<'_>) -> EvalResult<StringList> {
        context.evaluate(self)
    }
}

impl EvaluationContext<'_> {
    /// Evaluate a node to a list.
    pub fn evaluate(&mut self, node: &Node) -> EvalResult<StringList> {
        match node {
            Node::Leaf(text) => Ok(self.expand_string(text)),
            Node::Constant(value) => Ok(value.clone()),
            Node::List(items) => {
                let mut result = StringList::new();
                for item in items {
                    result.append(&self.evaluate(item)?);
                }
                Ok(result)
            }
            Node::Block(block) => self.eval_block(block),
            Node::Assignment(assignment) => self.eval_assignment(assignment),
            Node::Binary(binary) => self.eval_binary(binary),
            Node::Not(operand) => {
                let value = self.evaluate(operand)?;
                Ok(StringList::from_bool(!value.is_true()))
            }
            Node::InList { left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                Ok(StringList::from_bool(
                    left.iter().all(|element| right.contains(element)),
                ))
            }
            Node::If(statement) => self.eval_if(statement),
            Node::For(for_loop) => self.eval_for(for_loop),
            Node::While(while_loop) => self.eval_while(while_loop),
            Node::Switch(switch) => self.eval_switch(switch),
            Node::FunctionCall(call) => self.eval_function_call(call),
            Node::On(on) => self.eval_on(on),
            Node::Include(files) => self.eval_include(files),
            Node::Jump(jump) => {
                let result = self.evaluate(&jump.result)?;
                self.set_jump_condition(match jump.kind {
                    JumpKind::Break => JumpCondition::Break,
                    JumpKind::Continue => JumpCondition::Continue,
                    JumpKind::Return => JumpCondition::Return,
                    JumpKind::JumpToEof => JumpCondition::JumpToEof,
                });
                Ok(result)
            }
            Node::LocalVariableDeclaration(declaration) => self.eval_local(declaration),
            Node::RuleDefinition(definition) => {
                debug!(rule = %definition.name, parameters = ?definition.parameters, "defining rule");
                let instructions = UserRuleInstructions::new(
                    definition.parameters.clone(),
                    Rc::clone(&definition.body),
                );
                self.rules_mut()
                    .lookup_or_create(&definition.name)
                    .set_instructions(Rc::new(instructions));
                Ok(StringList::new())
            }
            Node::ActionsDefinition(definition) => {
                let variables = match &definition.variables {
                    Some(variables) => self.evaluate(variables)?,
                    None => StringList::new(),
                };
                debug!(rule = %definition.rule_name, flags = %definition.flags, "defining actions");
                let actions = RuleActions::new(
                    definition.rule_name.as_str(),
                    definition.actions.as_str(),
                    variables,
                    definition.flags,
                );
                self.rules_mut()
                    .lookup_or_create(&definition.rule_name)
                    .set_actions(Rc::new(actions));
                Ok(StringList::new())
            }
        }
    }

    fn eval_block(&mut self, block: &Block) -> EvalResult<StringList> {
        if block.local_scope_needed {
            self.with_local_scope(VariableDomain::new(), |context| {
                context.eval_statements(&block.statements)
            })
        } else {
            self.eval_statements(&block.statements)
        }
    }

    fn eval_statements(&mut self, statements: &[Node]) -> EvalResult<StringList> {
        let mut result = StringList::new();
        for statement in statements {
            result = self.evaluate(statement)?;
            if !self.jump_condition().is_none() {
                break;
            }
        }
        Ok(result)
    }

    fn eval_assignment(&mut self, assignment: &Assignment) -> EvalResult<StringList> {
        let names = self.evaluate(&assignment.variables)?;

        if let Some(on_targets) = &assignment.on_targets {
            let target_names = self.evaluate(on_targets)?;
            let value = self.evaluate(&assignment.value)?;
            let targets = self.targets_mut().lookup_or_create_all(target_names.iter());
            for target in targets {
                let domain = self.targets_mut().get_mut(target).variables_or_create();
                for name in names.iter() {
                    match assignment.operator {
                        AssignmentOperator::Assign => domain.set(name.as_str(), value.clone()),
                        AssignmentOperator::Append => domain.lookup_or_create(name).append(&value),
                        AssignmentOperator::Default => {
                            if domain.lookup(name).is_none() {
                                domain.set(name.as_str(), value.clone());
                            }
                        }
                    }
                }
            }
            return Ok(value);
        }

        let value = self.evaluate(&assignment.value)?;
        for name in names.iter() {
            let storage = self.lookup_or_create_variable(name);
            match assignment.operator {
                AssignmentOperator::Assign => *storage = value.clone(),
                AssignmentOperator::Append => storage.append(&value),
                AssignmentOperator::Default => {
                    if storage.is_empty() {
                        *storage = value.clone();
                    }
                }
            }
        }
        Ok(value)
    }

    fn eval_binary(&mut self, binary: &BinaryExpression) -> EvalResult<StringList> {
        // Both sides always run; `&&` and `||` do not short-circuit.
        let left = self.evaluate(&binary.left)?;
        let right = self.evaluate(&binary.right)?;
        let ordering = || left.compare_with(&right, true);
        let result = match binary.operator {
            BinaryOperator::Equal => ordering().is_eq(),
            BinaryOperator::NotEqual => ordering().is_ne(),
            BinaryOperator::Less => ordering().is_lt(),
            BinaryOperator::LessOrEqual => ordering().is_le(),
            BinaryOperator::Greater => ordering().is_gt(),
            BinaryOperator::GreaterOrEqual => ordering().is_ge(),
            BinaryOperator::And => left.is_true() && right.is_true(),
            BinaryOperator::Or => left.is_true() || right.is_true(),
        };
        Ok(StringList::from_bool(result))
    }

    fn eval_if(&mut self, statement: &IfStatement) -> EvalResult<StringList> {
        if self.evaluate(&statement.condition)?.is_true() {
            self.evaluate(&statement.then_block)
        } else if let Some(else_block) = &statement.else_block {
            self.evaluate(else_block)
        } else {
            Ok(StringList::new())
        }
    }

    /// What a loop does after its body ran once.
    fn loop_step(&mut self) -> LoopStep {
        match self.jump_condition() {
            JumpCondition::None => LoopStep::Next,
            JumpCondition::Continue => {
                self.set_jump_condition(JumpCondition::None);
                LoopStep::Next
            }
            JumpCondition::Break => {
                self.set_jump_condition(JumpCondition::None);
                LoopStep::Stop
            }
            JumpCondition::Return | JumpCondition::JumpToEof | JumpCondition::Exit => {
                LoopStep::Stop
            }
        }
    }

    fn eval_for(&mut self, for_loop: &ForLoop) -> EvalResult<StringList> {
        let list = self.evaluate(&for_loop.list)?;
        let mut result = StringList::new();
        for element in list.iter() {
            // The body is a scoped block, so the scope chain is back at the
            // same depth here and the variable resolves to the same slot on
            // every iteration.
            *self.lookup_or_create_variable(&for_loop.variable) =
                StringList::from_element(element.as_str());
            result = self.evaluate(&for_loop.body)?;
            if self.loop_step() == LoopStep::Stop {
                break;
            }
        }
        Ok(result)
    }

    fn eval_while(&mut self, while_loop: &WhileLoop) -> EvalResult<StringList> {
        let mut result = StringList::new();
        while self.evaluate(&while_loop.condition)?.is_true() {
            result = self.evaluate(&while_loop.body)?;
            if self.loop_step() == LoopStep::Stop {
                break;
            }
        }
        Ok(result)
    }

    fn eval_switch(&mut self, switch: &SwitchStatement) -> EvalResult<StringList> {
        let subject = self.evaluate(&switch.subject)?;
        let value = subject.element_at(0);
        for case in &switch.cases {
            if wildcard_match(&case.pattern, value) {
                return self.evaluate(&case.body);
            }
        }
        Ok(StringList::false_value())
    }

    fn eval_function_call(&mut self, call: &FunctionCall) -> EvalResult<StringList> {
        let mut parameters = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            parameters.push(self.evaluate(argument)?);
        }
        let names = self.evaluate(&call.function)?;

        let mut result = StringList::new();
        for name in names.iter() {
            let value =
                self.with_rule_call_depth(name, |context| context.invoke_rule(name, &parameters))?;
            result.append(&value);
        }
        Ok(result)
    }

    fn invoke_rule(&mut self, name: &str, parameters: &[StringList]) -> EvalResult<StringList> {
        let (instructions, actions) = match self.rules().lookup(name) {
            Some(rule) if rule.is_defined() => {
                (rule.instructions().cloned(), rule.actions().cloned())
            }
            _ => {
                warn!(rule = name, "unknown rule");
                self.warn(format_args!("unknown rule {name}"))?;
                return Ok(StringList::new());
            }
        };
        debug!(rule = name, depth = self.rule_call_depth(), "calling rule");

        if let Some(actions) = actions {
            let empty = StringList::new();
            let target_names = parameters.first().unwrap_or(&empty);
            let source_names = parameters.get(1).unwrap_or(&empty);
            let targets = self.targets_mut().lookup_or_create_all(target_names.iter());
            let sources = self.targets_mut().lookup_or_create_all(source_names.iter());
            for &target in &targets {
                let call = RuleActionsCall::new(Rc::clone(&actions), targets.clone(), sources.clone());
                self.targets_mut().get_mut(target).add_actions_call(call);
            }
        }

        match instructions {
            Some(instructions) => instructions.evaluate(self, parameters),
            None => Ok(StringList::new()),
        }
    }

    fn eval_on(&mut self, on: &OnExpression) -> EvalResult<StringList> {
        let names = self.evaluate(&on.targets)?;
        let Some(name) = names.first() else {
            return Ok(StringList::false_value());
        };
        let target = self.targets_mut().lookup_or_create(name);
        let domain = self
            .targets()
            .get(target)
            .variables()
            .cloned()
            .unwrap_or_default();
        self.with_local_scope(domain, |context| context.evaluate(&on.expression))
    }

    fn eval_include(&mut self, files: &Node) -> EvalResult<StringList> {
        let names = self.evaluate(files)?;
        let Some(file) = names.first() else {
            return Ok(StringList::false_value());
        };
        self.with_include_depth(file, |context| context.include_file(file))
    }

    #[tracing::instrument(level = "debug", skip(self), fields(depth = self.include_depth()))]
    fn include_file(&mut self, file: &str) -> EvalResult<StringList> {
        let target = self.targets_mut().lookup_or_create(file);
        let bound = self.binder().bind(self.global_variables(), self.targets().get(target));

        if bound.status == FileStatus::Missing {
            if self.targets().get(target).is_marked(TargetFlags::IGNORE_IF_MISSING) {
                debug!(path = %bound.path.display(), "optional include missing");
                return Ok(StringList::false_value());
            }
            return Err(EvalError::IncludeFailed {
                file: file.to_string(),
                reason: format!("{} does not exist", bound.path.display()),
            });
        }

        let source = fs::read_to_string(&bound.path).map_err(|err| EvalError::IncludeFailed {
            file: file.to_string(),
            reason: err.to_string(),
        })?;
        let program = parse(&source).map_err(|error| EvalError::Parse {
            file: bound.path.display().to_string(),
            error,
        })?;
        debug!(path = %bound.path.display(), "evaluating include");

        self.evaluate(&program)?;
        if self.jump_condition() == JumpCondition::JumpToEof {
            self.set_jump_condition(JumpCondition::None);
        }
        Ok(StringList::false_value())
    }

    fn eval_local(&mut self, declaration: &LocalVariableDeclaration) -> EvalResult<StringList> {
        let names = self.evaluate(&declaration.variables)?;
        let value = match &declaration.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => StringList::new(),
        };
        let domain = self.current_local_domain();
        for name in names.iter() {
            domain.set(name.as_str(), value.clone());
        }
        Ok(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopStep {
    Next,
    Stop,
}
