//! ham-kernel: the evaluator core of ham, a Jam-compatible build tool.
//!
//! This crate provides:
//!
//! - **Lexer**: Tokenizes Jam source text using logos
//! - **Parser**: Recursive descent from words to the AST
//! - **AST**: The `Node` tree, with visiting and dumping helpers
//! - **Interpreter**: Variable domains and scopes, `$(...)` expansion, the
//!   modifier engine and node evaluation
//! - **Rules**: The rule pool, user rules, actions and the built-in rules
//! - **Targets**: The target pool evaluation fills in, and the binder that
//!   maps target names to files
//! - **Wildcard / Path**: Shell patterns and Jam path decomposition
//!
//! Building (walking the target graph and running actions) is not part of
//! this crate.

pub mod ast;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod path;
pub mod rules;
pub mod targets;
pub mod wildcard;

pub use error::{EvalError, EvalResult};
pub use interpreter::{EvaluationContext, JumpCondition, OutputBuffer, VariableDomain};
pub use parser::{parse, ParseError};
pub use targets::TargetPool;

// Value types, so embedders need only one dependency
pub use ham_types::{Behavior, Compatibility, StringList};
