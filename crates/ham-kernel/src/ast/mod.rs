//! Abstract syntax tree for the Jam build language.

mod dump;
mod types;
mod visit;

pub use dump::DumpContext;
pub use types::*;
pub use visit::NodeVisitor;
