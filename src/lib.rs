//! # san_core
//!
//! A parser and formatter for textual SAN (Stochastic Automata Network)
//! model descriptions.
//!
//! A SAN file describes a system as a set of interacting finite automata
//! synchronized by named events with firing rates, organized into five
//! ordered blocks: `identifiers`, `events`, reachability, `network`, and
//! `results`.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dsl`] - Scanner, syntax tree, and parser for the SAN language
//! - [`model`] - Flat domain model, lowering from the syntax tree, and the
//!   canonical formatter
//! - [`error`] - The unified error type
//!
//! ## Usage
//!
//! ```
//! let src = b"identifiers
//!   r_proc = 6;
//! events
//!   loc l_proc (r_proc);
//! reachability = 1;
//! network Machine (continuous)
//!   aut Client
//!     stt Idle to (Working) l_proc
//!     stt Working to (Idle) l_proc
//! results
//!   busy = st Client == Working;
//! ";
//!
//! let model = san_core::parse(src)?;
//! assert_eq!(model.identifiers[0].name, "r_proc");
//!
//! let text = san_core::compile(&model)?;
//! assert_eq!(san_core::parse(&text)?, model);
//! # Ok::<(), san_core::SanError>(())
//! ```
//!
//! Parsing reports at most one error, carrying a `line:column` source
//! position. The formatter output is canonical: comments are dropped,
//! whitespace is normalized, and automaton states are re-emitted in sorted
//! order, so compiling a parsed model is deterministic and semantically
//! idempotent.

pub mod dsl;
pub mod error;
pub mod model;

// Re-export main types for convenience
pub use error::{Result, SanError};
pub use model::Model;

/// Parse a textual SAN model into a machine friendly structure.
pub fn parse(src: &[u8]) -> Result<Model> {
    let file = dsl::parse(src)?;
    Ok(Model::from_ast(&file))
}

/// Render a model back into canonical SAN text.
pub fn compile(model: &Model) -> Result<Vec<u8>> {
    model::to_san(model)
}
