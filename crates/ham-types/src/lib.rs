//! Pure data types for ham: string lists and compatibility behavior.
//!
//! This crate is a leaf dependency without a parser or evaluator.
//! Everything the build language computes is a [`StringList`], and every
//! Jam-compatibility quirk the evaluator honors is selected by a [`Behavior`].

pub mod behavior;
pub mod string_list;

// Flat re-exports for convenience
pub use behavior::*;
pub use string_list::*;
