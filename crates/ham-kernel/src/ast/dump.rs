//! Indented text rendering of a tree, one node per line.

use std::fmt::Write;

use super::types::Node;

/// Accumulates the output of [`Node::dump`].
#[derive(Debug, Default)]
pub struct DumpContext {
    output: String,
    indent: usize,
}

impl DumpContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
        self.output.push_str(text.as_ref());
        self.output.push('\n');
    }

    /// Run `f` one indentation level deeper.
    pub fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }
}

impl Node {
    pub fn dump(&self, context: &mut DumpContext) {
        match self {
            Node::Leaf(text) => context.line(format!("Leaf {text:?}")),
            Node::Constant(list) => context.line(format!("Constant {:?}", list.as_slice())),
            Node::List(items) => {
                context.line("List");
                context.nested(|context| items.iter().for_each(|item| item.dump(context)));
            }
            Node::Block(block) => {
                let label = if block.local_scope_needed { "Block" } else { "Block (no scope)" };
                context.line(label);
                context.nested(|context| {
                    block.statements.iter().for_each(|statement| statement.dump(context))
                });
            }
            Node::Assignment(assignment) => {
                context.line(format!("Assignment {}", assignment.operator));
                context.nested(|context| {
                    assignment.variables.dump(context);
                    if let Some(targets) = &assignment.on_targets {
                        context.line("on");
                        context.nested(|context| targets.dump(context));
                    }
                    assignment.value.dump(context);
                });
            }
            Node::Binary(binary) => {
                context.line(format!("Binary {}", binary.operator));
                context.nested(|context| {
                    binary.left.dump(context);
                    binary.right.dump(context);
                });
            }
            Node::Not(operand) => {
                context.line("Not");
                context.nested(|context| operand.dump(context));
            }
            Node::InList { left, right } => {
                context.line("InList");
                context.nested(|context| {
                    left.dump(context);
                    right.dump(context);
                });
            }
            Node::If(statement) => {
                context.line("If");
                context.nested(|context| {
                    statement.condition.dump(context);
                    statement.then_block.dump(context);
                    if let Some(else_block) = &statement.else_block {
                        context.line("else");
                        context.nested(|context| else_block.dump(context));
                    }
                });
            }
            Node::For(for_loop) => {
                context.line(format!("For {:?}", for_loop.variable));
                context.nested(|context| {
                    for_loop.list.dump(context);
                    for_loop.body.dump(context);
                });
            }
            Node::While(while_loop) => {
                context.line("While");
                context.nested(|context| {
                    while_loop.condition.dump(context);
                    while_loop.body.dump(context);
                });
            }
            Node::Switch(switch) => {
                context.line("Switch");
                context.nested(|context| {
                    switch.subject.dump(context);
                    for case in &switch.cases {
                        context.line(format!("Case {:?}", case.pattern));
                        context.nested(|context| case.body.dump(context));
                    }
                });
            }
            Node::FunctionCall(call) => {
                context.line("FunctionCall");
                context.nested(|context| {
                    call.function.dump(context);
                    call.arguments.iter().for_each(|argument| argument.dump(context));
                });
            }
            Node::On(on) => {
                context.line("On");
                context.nested(|context| {
                    on.targets.dump(context);
                    on.expression.dump(context);
                });
            }
            Node::Include(files) => {
                context.line("Include");
                context.nested(|context| files.dump(context));
            }
            Node::Jump(jump) => {
                context.line(format!("Jump {}", jump.kind));
                context.nested(|context| jump.result.dump(context));
            }
            Node::LocalVariableDeclaration(declaration) => {
                context.line("Local");
                context.nested(|context| {
                    declaration.variables.dump(context);
                    if let Some(initializer) = &declaration.initializer {
                        initializer.dump(context);
                    }
                });
            }
            Node::RuleDefinition(definition) => {
                let mut line = format!("Rule {:?}", definition.name);
                for parameter in &definition.parameters {
                    let _ = write!(line, " {parameter:?}");
                }
                context.line(line);
                context.nested(|context| definition.body.dump(context));
            }
            Node::ActionsDefinition(definition) => {
                context.line(format!(
                    "Actions {:?} [{}]",
                    definition.rule_name, definition.flags
                ));
                context.nested(|context| {
                    if let Some(variables) = &definition.variables {
                        context.line("bind");
                        context.nested(|context| variables.dump(context));
                    }
                    context.line(format!("{:?}", definition.actions));
                });
            }
        }
    }

    /// Render the whole tree to a string.
    pub fn dump_to_string(&self) -> String {
        let mut context = DumpContext::new();
        self.dump(&mut context);
        context.into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Jump, JumpKind};

    #[test]
    fn nested_indentation() {
        let node = Node::Jump(Jump {
            kind: JumpKind::Return,
            result: Box::new(Node::words(["a"])),
        });
        assert_eq!(node.dump_to_string(), "Jump return\n  List\n    Leaf \"a\"\n");
    }
}
