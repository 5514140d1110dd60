//! Domain model records for a parsed SAN file.
//!
//! The model is flat and language-neutral: plain records with owned
//! strings, independent of the syntax tree that produced them. All records
//! serialize to the same JSON shape the original tooling exposed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dsl::Value;

/// A model that has been parsed from SAN text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Identifiers from the `identifiers` block, in source order
    pub identifiers: Vec<Identifier>,
    /// Events from the `events` block, in source order
    pub events: Vec<Event>,
    /// Reachability information about the model network
    pub reachability: Reachability,
    /// The automata network from the `network` block
    pub network: Network,
    /// Results from the `results` block, in source order
    pub results: Vec<ResultEntry>,
}

impl Model {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an identifier.
    pub fn add_identifier(&mut self, identifier: Identifier) {
        self.identifiers.push(identifier);
    }

    /// Append an event.
    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Append a result.
    pub fn add_result(&mut self, result: ResultEntry) {
        self.results.push(result);
    }
}

/// A single identifier from the `identifiers` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    /// The identifier name
    pub name: String,
    /// Whether the identifier holds a constant or an expression
    #[serde(rename = "type")]
    pub kind: IdentifierKind,
    /// The typed constant value, or the normalized expression text
    pub value: Value,
}

/// Classification of an identifier's right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    /// A single literal
    Constant,
    /// A multi-token expression
    Expression,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => f.write_str("constant"),
            Self::Expression => f.write_str("expression"),
        }
    }
}

/// A single event from the `events` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The event name
    pub name: String,
    /// Whether the event is local or synchronizing
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// The identifier naming the firing rate
    pub rate: String,
}

/// The type of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// Affects a single automaton
    Local,
    /// Fires simultaneously in all automata that reference it
    Synchronizing,
}

impl EventType {
    /// The SAN keyword introducing events of this type.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Local => "loc",
            Self::Synchronizing => "syn",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Synchronizing => f.write_str("synchronizing"),
        }
    }
}

/// Reachability information about the model network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reachability {
    /// True when the reachable space is declared partial
    pub partial: bool,
    /// The normalized reachability expression text
    pub expression: String,
}

/// The automata network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    /// The network name
    pub name: String,
    /// The network type (`continuous`)
    #[serde(rename = "type")]
    pub network_type: String,
    /// The automata, in source order
    pub automata: Vec<Automaton>,
}

impl Network {
    /// Append an automaton.
    pub fn add_automaton(&mut self, automaton: Automaton) {
        self.automata.push(automaton);
    }
}

/// A single automaton.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Automaton {
    /// The automaton name
    pub name: String,
    /// The transitions, in source order
    pub transitions: Vec<Transition>,
}

impl Automaton {
    /// Append a transition.
    pub fn add_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }
}

/// A single automaton transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// The source state
    pub from: String,
    /// The destination state
    pub to: String,
    /// The events firing this transition
    pub events: Vec<TransitionEvent>,
}

/// An event firing a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// The event name
    pub name: String,
    /// The probability identifier, or empty when none was given
    pub probability: String,
}

/// A single result from the `results` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    /// The result label
    pub label: String,
    /// The normalized result expression text
    pub expression: String,
}
