//! The evaluator for Jam build descriptions.
//!
//! # Architecture
//!
//! The interpreter is built in layers:
//!
//! - **VariableDomain / VariableScope**: name to list bindings, and the
//!   chain of local frames
//! - **StringListOperations**: the `:B`, `:S=.o`, `:J=,` modifier engine
//! - **Expansion**: `$(...)` references and the product rule
//! - **EvaluationContext**: everything one evaluation mutates
//! - **Eval**: reduces [`Node`](crate::ast::Node) trees to lists
//!
//! # Example
//!
//! ```
//! use ham_kernel::interpreter::{EvaluationContext, OutputBuffer, VariableDomain};
//! use ham_kernel::targets::TargetPool;
//!
//! let program = ham_kernel::parse("X = a b ; Echo $(X:U) ;").unwrap();
//!
//! let mut globals = VariableDomain::new();
//! let mut targets = TargetPool::new();
//! let output = OutputBuffer::new();
//! let mut context = EvaluationContext::new(&mut globals, &mut targets);
//! context.set_output(output.clone());
//! context.evaluate(&program).unwrap();
//! assert_eq!(output.contents(), "A B\n");
//! ```

mod context;
mod eval;
mod expansion;
mod operations;
mod output;
mod scope;
mod variables;

pub use context::{EvaluationContext, JumpCondition, INCLUDE_DEPTH_LIMIT, RULE_CALL_DEPTH_LIMIT};
pub use operations::StringListOperations;
pub use output::OutputBuffer;
pub use scope::VariableScope;
pub use variables::VariableDomain;
