//! Recursive descent parser for Jam build descriptions.
//!
//! The parser pulls words from the logos lexer one at a time. Keywords are
//! recognized here, not in the lexer: inside an argument list the
//! alphabetic keywords (`rule`, `on`, `case`, ...) are plain words, while
//! punctuation such as `;`, `:` and `]` still ends the list.
//!
//! Action bodies are not tokenized at all. After the `{` of an `actions`
//! definition the parser hands the lexer to [`lexer::action_body`], which
//! returns the raw text up to the matching brace.

use std::rc::Rc;

use logos::Logos;
use thiserror::Error;

use crate::ast::*;
use crate::lexer::{self, Spanned, Token, Word};
use crate::rules::ActionsFlags;

/// A syntax error with a 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// Words that are punctuation keywords everywhere.
const PUNCTUATION: &[&str] = &[
    "!", "!=", "&", "&&", "(", ")", "+=", ":", ";", "<", "<=", "=", ">", ">=", "?=", "[", "]",
    "{", "|", "||", "}",
];

/// Words that are keywords outside of argument lists.
const KEYWORDS: &[&str] = &[
    "actions",
    "bind",
    "break",
    "case",
    "continue",
    "default",
    "else",
    "existing",
    "for",
    "if",
    "ignore",
    "in",
    "include",
    "jumptoeof",
    "local",
    "on",
    "piecemeal",
    "quietly",
    "return",
    "rule",
    "switch",
    "together",
    "updated",
    "while",
];

/// Where a word is read, which decides what counts as a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Statement,
    List,
}

fn keyword_of(word: &Word, mode: Mode) -> Option<&'static str> {
    if word.quoted {
        return None;
    }
    let punctuation = PUNCTUATION.iter().find(|k| **k == word.text);
    let found = match mode {
        Mode::Statement => punctuation.or_else(|| KEYWORDS.iter().find(|k| **k == word.text)),
        Mode::List => punctuation,
    };
    found.copied()
}

/// Parse a whole build description into a top-level block.
pub fn parse(source: &str) -> Result<Node, ParseError> {
    let mut parser = Parser::new(source);
    let statements = parser.statements(&[])?;
    if parser.peek()?.is_some() {
        return Err(parser.unexpected("expected a statement")?);
    }
    Ok(Node::Block(Block::new(statements)))
}

struct Parser<'s> {
    source: &'s str,
    lexer: logos::Lexer<'s, Token>,
    peeked: Option<Spanned<Word>>,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            lexer: Token::lexer(source),
            peeked: None,
        }
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> ParseError {
        let before = &self.source[..offset.min(self.source.len())];
        let line = before.matches('\n').count() + 1;
        let column = before.rfind('\n').map_or(before.len(), |nl| before.len() - nl - 1) + 1;
        ParseError {
            message: message.into(),
            line,
            column,
        }
    }

    fn fill(&mut self) -> Result<(), ParseError> {
        if self.peeked.is_some() {
            return Ok(());
        }
        match self.lexer.next() {
            None => {}
            Some(Ok(Token::Word(word))) => {
                self.peeked = Some(Spanned::new(word, self.lexer.span()));
            }
            Some(Err(err)) => {
                let err = lexer::classify_error(err, self.lexer.slice());
                return Err(self.error_at(self.lexer.span().start, err.to_string()));
            }
        }
        Ok(())
    }

    fn peek(&mut self) -> Result<Option<&Spanned<Word>>, ParseError> {
        self.fill()?;
        Ok(self.peeked.as_ref())
    }

    fn next_word(&mut self) -> Result<Option<Spanned<Word>>, ParseError> {
        self.fill()?;
        Ok(self.peeked.take())
    }

    fn peek_keyword(&mut self, mode: Mode) -> Result<Option<&'static str>, ParseError> {
        Ok(self.peek()?.and_then(|word| keyword_of(&word.token, mode)))
    }

    /// Consume `keyword` if it comes next.
    fn eat(&mut self, keyword: &str) -> Result<bool, ParseError> {
        if self.peek_keyword(Mode::Statement)? == Some(keyword) {
            self.peeked = None;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect(&mut self, keyword: &str) -> Result<(), ParseError> {
        if self.eat(keyword)? {
            return Ok(());
        }
        Err(self.unexpected(&format!("expected '{keyword}'"))?)
    }

    /// An error describing the next word, or the end of input.
    fn unexpected(&mut self, expected: &str) -> Result<ParseError, ParseError> {
        let found = self
            .peek()?
            .map(|word| (word.span.start, format!("'{}'", word.token.text)));
        let (offset, found) =
            found.unwrap_or_else(|| (self.source.len(), "end of input".to_string()));
        Ok(self.error_at(offset, format!("{expected}, found {found}")))
    }

    /// A plain word that is not a keyword, e.g. a rule or loop variable name.
    fn name(&mut self) -> Result<String, ParseError> {
        let is_name = matches!(
            self.peek()?,
            Some(word) if keyword_of(&word.token, Mode::Statement).is_none()
        );
        if is_name {
            if let Some(word) = self.next_word()? {
                return Ok(word.token.text);
            }
        }
        Err(self.unexpected("expected a name")?)
    }

    /// Statements up to (not including) one of `terminators` or the end.
    fn statements(&mut self, terminators: &[&str]) -> Result<Vec<Node>, ParseError> {
        let mut statements = Vec::new();
        loop {
            if self.peek()?.is_none() {
                break;
            }
            if let Some(keyword) = self.peek_keyword(Mode::Statement)? {
                if terminators.contains(&keyword) {
                    break;
                }
            }
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    /// `{ statements }`, as a scoped block.
    fn braced_block(&mut self) -> Result<Node, ParseError> {
        self.expect("{")?;
        let statements = self.statements(&["}"])?;
        self.expect("}")?;
        Ok(Node::Block(Block::new(statements)))
    }

    fn statement(&mut self) -> Result<Node, ParseError> {
        match self.peek_keyword(Mode::Statement)? {
            Some("{") => self.braced_block(),
            Some("include") => {
                self.peeked = None;
                let files = self.list()?;
                self.expect(";")?;
                Ok(Node::Include(Box::new(files)))
            }
            Some("local") => {
                self.peeked = None;
                let variables = self.list()?;
                let initializer = if self.eat("=")? {
                    Some(Box::new(self.list()?))
                } else {
                    None
                };
                self.expect(";")?;
                Ok(Node::LocalVariableDeclaration(LocalVariableDeclaration {
                    variables: Box::new(variables),
                    initializer,
                }))
            }
            Some(keyword @ ("break" | "continue" | "return" | "jumptoeof")) => {
                self.peeked = None;
                let kind = match keyword {
                    "break" => JumpKind::Break,
                    "continue" => JumpKind::Continue,
                    "return" => JumpKind::Return,
                    _ => JumpKind::JumpToEof,
                };
                let result = self.list()?;
                self.expect(";")?;
                Ok(Node::Jump(Jump {
                    kind,
                    result: Box::new(result),
                }))
            }
            Some("for") => {
                self.peeked = None;
                let variable = self.name()?;
                self.expect("in")?;
                let list = self.list()?;
                let body = self.braced_block()?;
                Ok(Node::For(ForLoop {
                    variable,
                    list: Box::new(list),
                    body: Box::new(body),
                }))
            }
            Some("switch") => {
                self.peeked = None;
                self.switch()
            }
            Some("if") => {
                self.peeked = None;
                let condition = self.expression()?;
                let then_block = self.braced_block()?;
                let else_block = if self.eat("else")? {
                    Some(Box::new(self.statement()?))
                } else {
                    None
                };
                Ok(Node::If(IfStatement {
                    condition: Box::new(condition),
                    then_block: Box::new(then_block),
                    else_block,
                }))
            }
            Some("while") => {
                self.peeked = None;
                let condition = self.expression()?;
                let body = self.braced_block()?;
                Ok(Node::While(WhileLoop {
                    condition: Box::new(condition),
                    body: Box::new(body),
                }))
            }
            Some("rule") => {
                self.peeked = None;
                self.rule_definition()
            }
            Some("on") => {
                self.peeked = None;
                let targets = self.arg(Mode::Statement)?;
                let expression = self.statement()?;
                Ok(Node::On(OnExpression {
                    targets: Box::new(targets),
                    expression: Box::new(expression),
                }))
            }
            Some("actions") => {
                self.peeked = None;
                self.actions_definition()
            }
            Some("[") | None => self.arg_statement(),
            Some(_) => Err(self.unexpected("expected a statement")?),
        }
    }

    fn switch(&mut self) -> Result<Node, ParseError> {
        let subject = self.list()?;
        self.expect("{")?;
        let mut cases = Vec::new();
        while self.eat("case")? {
            let pattern = match self.next_word()? {
                Some(word) if keyword_of(&word.token, Mode::List).is_none() => word.token.text,
                Some(word) => {
                    return Err(self.error_at(word.span.start, "expected a case pattern"));
                }
                None => return Err(self.error_at(self.source.len(), "expected a case pattern")),
            };
            self.expect(":")?;
            let statements = self.statements(&["case", "}"])?;
            cases.push(Case {
                pattern,
                body: Node::Block(Block::new(statements)),
            });
        }
        self.expect("}")?;
        Ok(Node::Switch(SwitchStatement {
            subject: Box::new(subject),
            cases,
        }))
    }

    fn rule_definition(&mut self) -> Result<Node, ParseError> {
        let name = self.name()?;
        let mut parameters = Vec::new();
        if self.peek_keyword(Mode::Statement)? != Some("{") {
            parameters.push(self.name()?);
            while self.eat(":")? {
                parameters.push(self.name()?);
            }
        }
        self.expect("{")?;
        let statements = self.statements(&["}"])?;
        self.expect("}")?;
        Ok(Node::RuleDefinition(RuleDefinition {
            name,
            parameters,
            body: Rc::new(Node::Block(Block::without_scope(statements))),
        }))
    }

    fn actions_definition(&mut self) -> Result<Node, ParseError> {
        let mut flags = ActionsFlags::default();
        while let Some(keyword) = self.peek_keyword(Mode::Statement)? {
            let Some(flag) = ActionsFlags::from_keyword(keyword) else {
                break;
            };
            flags.insert(flag);
            self.peeked = None;
        }
        let rule_name = self.name()?;
        let variables = if self.eat("bind")? {
            Some(Box::new(self.list()?))
        } else {
            None
        };
        // Consuming `{` leaves nothing buffered, so the lexer sits right
        // after it.
        self.expect("{")?;
        let start = self.lexer.span().end;
        let actions = lexer::action_body(&mut self.lexer)
            .map_err(|err| self.error_at(start, err.to_string()))?;
        self.expect("}")?;
        Ok(Node::ActionsDefinition(ActionsDefinition {
            flags,
            rule_name,
            variables,
            actions,
        }))
    }

    /// A statement that starts with an argument: an assignment or a call.
    fn arg_statement(&mut self) -> Result<Node, ParseError> {
        let first = self.arg(Mode::Statement)?;

        if let Some(operator) = self.assignment_operator()? {
            let value = self.list()?;
            self.expect(";")?;
            return Ok(Node::Assignment(Assignment {
                variables: Box::new(first),
                operator,
                value: Box::new(value),
                on_targets: None,
            }));
        }

        if self.eat("on")? {
            let targets = self.list()?;
            let Some(operator) = self.assignment_operator()? else {
                return Err(self.unexpected("expected an assignment operator")?);
            };
            let value = self.list()?;
            self.expect(";")?;
            return Ok(Node::Assignment(Assignment {
                variables: Box::new(first),
                operator,
                value: Box::new(value),
                on_targets: Some(Box::new(targets)),
            }));
        }

        let arguments = self.list_of_lists()?;
        self.expect(";")?;
        Ok(Node::FunctionCall(FunctionCall {
            function: Box::new(first),
            arguments,
        }))
    }

    fn assignment_operator(&mut self) -> Result<Option<AssignmentOperator>, ParseError> {
        let operator = match self.peek_keyword(Mode::Statement)? {
            Some("=") => AssignmentOperator::Assign,
            Some("+=") => AssignmentOperator::Append,
            Some("?=") => AssignmentOperator::Default,
            Some("default") => {
                self.peeked = None;
                self.expect("=")?;
                return Ok(Some(AssignmentOperator::Default));
            }
            _ => return Ok(None),
        };
        self.peeked = None;
        Ok(Some(operator))
    }

    /// A word or a bracketed call.
    fn arg(&mut self, mode: Mode) -> Result<Node, ParseError> {
        let keyword = self.peek()?.map(|word| keyword_of(&word.token, mode));
        match keyword {
            Some(Some("[")) => {
                self.peeked = None;
                let call = self.bracketed_call()?;
                self.expect("]")?;
                Ok(call)
            }
            Some(None) => match self.next_word()? {
                Some(word) => Ok(Node::Leaf(word.token.text)),
                None => Err(self.unexpected("expected an argument")?),
            },
            _ => Err(self.unexpected("expected an argument")?),
        }
    }

    /// The inside of `[ ... ]`.
    fn bracketed_call(&mut self) -> Result<Node, ParseError> {
        if self.eat("on")? {
            let targets = self.arg(Mode::Statement)?;
            let expression = if self.eat("return")? {
                self.list()?
            } else {
                let function = self.arg(Mode::Statement)?;
                let arguments = self.list_of_lists()?;
                Node::FunctionCall(FunctionCall {
                    function: Box::new(function),
                    arguments,
                })
            };
            return Ok(Node::On(OnExpression {
                targets: Box::new(targets),
                expression: Box::new(expression),
            }));
        }
        let function = self.arg(Mode::Statement)?;
        let arguments = self.list_of_lists()?;
        Ok(Node::FunctionCall(FunctionCall {
            function: Box::new(function),
            arguments,
        }))
    }

    /// Words and calls up to the next punctuation keyword.
    fn list(&mut self) -> Result<Node, ParseError> {
        let mut items = Vec::new();
        loop {
            match self.peek()?.map(|word| keyword_of(&word.token, Mode::List)) {
                Some(Some("[")) | Some(None) => items.push(self.arg(Mode::List)?),
                _ => break,
            }
        }
        Ok(Node::List(items))
    }

    /// Colon-separated lists: `a b : c : d`.
    fn list_of_lists(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut lists = vec![self.list()?];
        while self.eat(":")? {
            lists.push(self.list()?);
        }
        Ok(lists)
    }

    fn expression(&mut self) -> Result<Node, ParseError> {
        let mut left = self.conjunction()?;
        while self.eat("||")? || self.eat("|")? {
            let right = self.conjunction()?;
            left = binary(BinaryOperator::Or, left, right);
        }
        Ok(left)
    }

    fn conjunction(&mut self) -> Result<Node, ParseError> {
        let mut left = self.equality()?;
        while self.eat("&&")? || self.eat("&")? {
            let right = self.equality()?;
            left = binary(BinaryOperator::And, left, right);
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<Node, ParseError> {
        let mut left = self.relational()?;
        loop {
            let operator = match self.peek_keyword(Mode::Statement)? {
                Some("=") => BinaryOperator::Equal,
                Some("!=") => BinaryOperator::NotEqual,
                _ => return Ok(left),
            };
            self.peeked = None;
            let right = self.relational()?;
            left = binary(operator, left, right);
        }
    }

    fn relational(&mut self) -> Result<Node, ParseError> {
        let mut left = self.unary()?;
        loop {
            let operator = match self.peek_keyword(Mode::Statement)? {
                Some("<") => BinaryOperator::Less,
                Some("<=") => BinaryOperator::LessOrEqual,
                Some(">") => BinaryOperator::Greater,
                Some(">=") => BinaryOperator::GreaterOrEqual,
                _ => return Ok(left),
            };
            self.peeked = None;
            let right = self.unary()?;
            left = binary(operator, left, right);
        }
    }

    fn unary(&mut self) -> Result<Node, ParseError> {
        if self.eat("!")? {
            return Ok(Node::Not(Box::new(self.unary()?)));
        }
        if self.eat("(")? {
            let inner = self.expression()?;
            self.expect(")")?;
            return Ok(inner);
        }
        let left = self.arg(Mode::Statement)?;
        if self.eat("in")? {
            let right = self.list()?;
            return Ok(Node::InList {
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        Ok(left)
    }
}

fn binary(operator: BinaryOperator, left: Node, right: Node) -> Node {
    Node::Binary(BinaryExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}
