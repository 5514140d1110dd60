//! Syntax tree types for parsed SAN sources.
//!
//! Every node keeps the tokens that produced it, so positions and literal
//! spellings survive until lowering.

use super::token::{Pos, Token, TokenType, Value};

/// A single parsed SAN file. Each block is independently optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct File {
    /// The `identifiers` block
    pub identifiers: Option<IdentifiersDefinition>,
    /// The `events` block
    pub events: Option<EventsDefinition>,
    /// The `reachability` block
    pub reachability: Option<ReachabilityDefinition>,
    /// The `network` block
    pub network: Option<NetworkDefinition>,
    /// The `results` block
    pub results: Option<ResultsDefinition>,
}

/// The set of identifiers defined on the SAN file.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifiersDefinition {
    /// The `identifiers` keyword token
    pub token: Token,
    /// The assignments, in source order
    pub assignments: Vec<IdentifierAssignment>,
}

/// A single identifier definition inside the identifiers block.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierAssignment {
    /// The identifier name itself
    pub identifier: Token,
    /// The value assigned to the identifier
    pub expression: Expression,
}

/// The set of events defined on the SAN file.
#[derive(Debug, Clone, PartialEq)]
pub struct EventsDefinition {
    /// The `events` keyword token
    pub token: Token,
    /// The event descriptions, in source order
    pub descriptions: Vec<EventDescription>,
}

/// A single event description inside the events block.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDescription {
    /// The type of event (`loc` or `syn`)
    pub event_type: Token,
    /// The name of the event
    pub name: Token,
    /// The firing rate of the event
    pub rate: Token,
}

/// The reachability expression constraining the model's state space.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachabilityDefinition {
    /// The leading keyword tokens: `[reachability]` or `[partial, reachability]`
    pub tokens: Vec<Token>,
    /// The reachability predicate
    pub expression: Expression,
}

/// The network information, composed of a set of automata.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkDefinition {
    /// The `network` keyword token
    pub token: Token,
    /// The network name
    pub name: Token,
    /// The network type (`continuous`)
    pub network_type: Token,
    /// The automata, in source order
    pub automata: Vec<AutomatonDescription>,
}

/// A single automaton definition inside the network block.
#[derive(Debug, Clone, PartialEq)]
pub struct AutomatonDescription {
    /// The `aut` keyword token
    pub token: Token,
    /// The automaton name
    pub name: Token,
    /// The transitions, in source order
    pub transitions: Vec<AutomatonTransition>,
}

/// A single automaton transition.
#[derive(Debug, Clone, PartialEq)]
pub struct AutomatonTransition {
    /// The source state
    pub from: Token,
    /// The destination state
    pub to: Token,
    /// The events firing this transition, never empty
    pub events: Vec<TransitionEvent>,
}

/// An event firing a transition, with an optional probability.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionEvent {
    /// The event name
    pub name: Token,
    /// The parenthesized probability identifier, if present
    pub probability: Option<Token>,
}

/// The set of results defined on the SAN file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsDefinition {
    /// The `results` keyword token
    pub token: Token,
    /// The result descriptions, in source order
    pub descriptions: Vec<ResultDescription>,
}

/// A single result description inside the results block.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultDescription {
    /// The result name itself
    pub label: Token,
    /// The expression that represents the result
    pub expression: Expression,
}

/// An expression used on the identifiers, reachability or results
/// definitions, kept as its source tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// The expression tokens, in source order; never empty
    pub tokens: Vec<Token>,
}

impl Expression {
    /// True if the expression is a single literal token.
    pub fn is_constant(&self) -> bool {
        self.tokens.len() == 1 && self.tokens[0].token_type.is_literal()
    }

    /// The expression tokens joined by single spaces.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|tok| tok.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The properly typed value for this expression: the literal's value
    /// for a constant, the joined text otherwise.
    pub fn value(&self) -> Value {
        if self.is_constant() {
            self.tokens[0].value()
        } else {
            Value::Text(self.text())
        }
    }
}

/// A single `//` or `/*`-style comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Position of the leading `/`
    pub start: Pos,
    /// The comment text, including delimiters
    pub text: String,
}

/// A sequence of comments with no other tokens and no empty lines between.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentGroup {
    /// The comments; never empty
    pub list: Vec<Comment>,
}
