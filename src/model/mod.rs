//! Domain model for parsed SAN files.

mod format;
mod from_ast;
mod types;

pub use format::to_san;
pub use types::{
    Automaton, Event, EventType, Identifier, IdentifierKind, Model, Network, Reachability,
    ResultEntry, Transition, TransitionEvent,
};
