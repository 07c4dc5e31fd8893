//! Fatal evaluation errors.
//!
//! Anything that aborts a whole evaluation is an [`EvalError`]. Conditions
//! Jam treats as recoverable (unknown rules, bad patterns) are reported on
//! the context's error stream instead and never show up here.

use std::io;

use thiserror::Error;

use crate::parser::ParseError;

/// Result type for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that abort evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("rule call depth limit of {limit} exceeded while calling rule {rule}")]
    RuleCallDepthExceeded { rule: String, limit: usize },

    #[error("include depth limit of {limit} exceeded while including {file}")]
    IncludeDepthExceeded { file: String, limit: usize },

    #[error("failed to include {file}: {reason}")]
    IncludeFailed { file: String, reason: String },

    #[error("{file}:{error}")]
    Parse {
        file: String,
        #[source]
        error: ParseError,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}
