//! AST type definitions.

use std::fmt;
use std::rc::Rc;

use ham_types::StringList;

use crate::rules::ActionsFlags;

/// A node of the build-language tree.
///
/// Every node evaluates to a [`StringList`]; statements return the value of
/// their last expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A word, expanded on evaluation: `$(SRCS:S=.o)`
    Leaf(String),
    /// A precomputed list.
    Constant(StringList),
    /// Words and `[ ... ]` calls, concatenated.
    List(Vec<Node>),
    /// Statement sequence: `{ ... }` or a whole file.
    Block(Block),
    /// `X = ...`, `X += ...`, `X ?= ...`, `X on T = ...`
    Assignment(Assignment),
    /// Comparison or logical operator.
    Binary(BinaryExpression),
    /// `! expr`
    Not(Box<Node>),
    /// `arg in list`
    InList { left: Box<Node>, right: Box<Node> },
    /// `if cond { ... } else ...`
    If(IfStatement),
    /// `for X in list { ... }`
    For(ForLoop),
    /// `while cond { ... }`
    While(WhileLoop),
    /// `switch list { case pattern : ... }`
    Switch(SwitchStatement),
    /// Rule invocation: `Rule a : b ;` or `[ Rule a : b ]`
    FunctionCall(FunctionCall),
    /// `on target statement` or `[ on target Rule args ]`
    On(OnExpression),
    /// `include file ;`
    Include(Box<Node>),
    /// `break`, `continue`, `return` or `jumptoeof`
    Jump(Jump),
    /// `local X = ... ;`
    LocalVariableDeclaration(LocalVariableDeclaration),
    /// `rule Name params { ... }`
    RuleDefinition(RuleDefinition),
    /// `actions flags Name bind VARS { ... }`
    ActionsDefinition(ActionsDefinition),
}

impl Node {
    pub fn leaf(text: impl Into<String>) -> Node {
        Node::Leaf(text.into())
    }

    /// A list of plain words.
    pub fn words<'w>(words: impl IntoIterator<Item = &'w str>) -> Node {
        Node::List(words.into_iter().map(Node::leaf).collect())
    }

    pub fn empty_list() -> Node {
        Node::List(Vec::new())
    }

    /// Immediate children in evaluation order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Leaf(_) | Node::Constant(_) => Vec::new(),
            Node::List(items) => items.iter().collect(),
            Node::Block(block) => block.statements.iter().collect(),
            Node::Assignment(assignment) => {
                let mut children = vec![assignment.variables.as_ref()];
                if let Some(targets) = &assignment.on_targets {
                    children.push(targets.as_ref());
                }
                children.push(assignment.value.as_ref());
                children
            }
            Node::Binary(binary) => vec![binary.left.as_ref(), binary.right.as_ref()],
            Node::Not(operand) => vec![operand.as_ref()],
            Node::InList { left, right } => vec![left.as_ref(), right.as_ref()],
            Node::If(statement) => {
                let mut children = vec![statement.condition.as_ref(), statement.then_block.as_ref()];
                if let Some(else_block) = &statement.else_block {
                    children.push(else_block.as_ref());
                }
                children
            }
            Node::For(for_loop) => vec![for_loop.list.as_ref(), for_loop.body.as_ref()],
            Node::While(while_loop) => vec![while_loop.condition.as_ref(), while_loop.body.as_ref()],
            Node::Switch(switch) => {
                let mut children = vec![switch.subject.as_ref()];
                children.extend(switch.cases.iter().map(|case| &case.body));
                children
            }
            Node::FunctionCall(call) => {
                let mut children = vec![call.function.as_ref()];
                children.extend(call.arguments.iter());
                children
            }
            Node::On(on) => vec![on.targets.as_ref(), on.expression.as_ref()],
            Node::Include(files) => vec![files.as_ref()],
            Node::Jump(jump) => vec![jump.result.as_ref()],
            Node::LocalVariableDeclaration(declaration) => {
                let mut children = vec![declaration.variables.as_ref()];
                if let Some(initializer) = &declaration.initializer {
                    children.push(initializer.as_ref());
                }
                children
            }
            Node::RuleDefinition(definition) => vec![definition.body.as_ref()],
            Node::ActionsDefinition(definition) => {
                definition.variables.iter().map(|vars| vars.as_ref()).collect()
            }
        }
    }
}

/// A sequence of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Node>,
    /// False for rule bodies, whose invocation already pushes a scope.
    pub local_scope_needed: bool,
}

impl Block {
    pub fn new(statements: Vec<Node>) -> Self {
        Self {
            statements,
            local_scope_needed: true,
        }
    }

    pub fn without_scope(statements: Vec<Node>) -> Self {
        Self {
            statements,
            local_scope_needed: false,
        }
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    /// `=` replaces the value.
    Assign,
    /// `+=` appends to the value.
    Append,
    /// `?=` / `default =` sets the value only if it is unset.
    Default,
}

impl fmt::Display for AssignmentOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentOperator::Assign => write!(f, "="),
            AssignmentOperator::Append => write!(f, "+="),
            AssignmentOperator::Default => write!(f, "?="),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Variable names (a list, each element names one variable).
    pub variables: Box<Node>,
    pub operator: AssignmentOperator,
    pub value: Box<Node>,
    /// Targets whose private variables are assigned instead of the globals.
    pub on_targets: Option<Box<Node>>,
}

/// Binary operators.
///
/// Comparisons look at whole lists, ignoring trailing empty elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    And,
    Or,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Equal => write!(f, "="),
            BinaryOperator::NotEqual => write!(f, "!="),
            BinaryOperator::Less => write!(f, "<"),
            BinaryOperator::LessOrEqual => write!(f, "<="),
            BinaryOperator::Greater => write!(f, ">"),
            BinaryOperator::GreaterOrEqual => write!(f, ">="),
            BinaryOperator::And => write!(f, "&&"),
            BinaryOperator::Or => write!(f, "||"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Box<Node>,
    pub then_block: Box<Node>,
    pub else_block: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub variable: String,
    pub list: Box<Node>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub condition: Box<Node>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStatement {
    pub subject: Box<Node>,
    pub cases: Vec<Case>,
}

/// One `case pattern : statements` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    /// Wildcard pattern, not expanded.
    pub pattern: String,
    pub body: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Evaluates to the names of the rules to call.
    pub function: Box<Node>,
    /// One list per colon-separated argument.
    pub arguments: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnExpression {
    /// Only the first element names the target.
    pub targets: Box<Node>,
    pub expression: Box<Node>,
}

/// Kinds of jump statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Break,
    Continue,
    Return,
    JumpToEof,
}

impl fmt::Display for JumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpKind::Break => write!(f, "break"),
            JumpKind::Continue => write!(f, "continue"),
            JumpKind::Return => write!(f, "return"),
            JumpKind::JumpToEof => write!(f, "jumptoeof"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Jump {
    pub kind: JumpKind,
    /// Evaluated before the jump takes effect; becomes the statement value.
    pub result: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalVariableDeclaration {
    pub variables: Box<Node>,
    pub initializer: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleDefinition {
    pub name: String,
    pub parameters: Vec<String>,
    /// Shared with the rule pool once the definition is evaluated.
    pub body: Rc<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionsDefinition {
    pub flags: ActionsFlags,
    pub rule_name: String,
    /// The `bind` list, if any.
    pub variables: Option<Box<Node>>,
    /// Raw shell text between the braces.
    pub actions: String,
}
