//! Finite automaton loading, validation, execution, and NFA-λ to DFA conversion.

#![warn(clippy::all)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(missing_docs)]

mod error;
mod tape;

/// Automaton model and algorithms.
pub mod automaton;

/// Configuration documents: loading, validation, and export.
pub mod config;

/// Document file I/O.
pub mod fs;

pub use {error::*, tape::*};
