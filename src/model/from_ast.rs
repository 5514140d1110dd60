//! Lowering from the syntax tree to the domain model.
//!
//! The pass is pure and total: absent blocks simply leave their model slot
//! empty, and no token combination the parser accepts can fail to lower.

use crate::dsl::ast::{self, File};
use crate::dsl::TokenType;

use super::types::{
    Automaton, Event, EventType, Identifier, IdentifierKind, Model, ResultEntry, Transition,
    TransitionEvent,
};

type Translator = fn(&mut Model, &File);

/// The block translators, run in fixed order.
const TRANSLATORS: [Translator; 5] = [
    translate_identifiers,
    translate_events,
    translate_reachability,
    translate_network,
    translate_results,
];

impl Model {
    /// Build a model from a parsed syntax tree.
    pub fn from_ast(file: &File) -> Self {
        let mut model = Model::new();
        for translate in TRANSLATORS {
            translate(&mut model, file);
        }
        model
    }
}

fn translate_identifiers(model: &mut Model, file: &File) {
    let Some(definition) = &file.identifiers else {
        return;
    };

    for assignment in &definition.assignments {
        let kind = if assignment.expression.is_constant() {
            IdentifierKind::Constant
        } else {
            IdentifierKind::Expression
        };
        model.add_identifier(Identifier {
            name: assignment.identifier.text.clone(),
            kind,
            value: assignment.expression.value(),
        });
    }
}

fn translate_events(model: &mut Model, file: &File) {
    let Some(definition) = &file.events else {
        return;
    };

    for description in &definition.descriptions {
        let event_type = if description.event_type.token_type == TokenType::Syn {
            EventType::Synchronizing
        } else {
            EventType::Local
        };
        model.add_event(Event {
            name: description.name.text.clone(),
            event_type,
            rate: description.rate.text.clone(),
        });
    }
}

fn translate_reachability(model: &mut Model, file: &File) {
    let Some(definition) = &file.reachability else {
        return;
    };

    model.reachability.partial = definition.tokens[0].token_type == TokenType::Partial;
    model.reachability.expression = definition.expression.text();
}

fn translate_network(model: &mut Model, file: &File) {
    let Some(definition) = &file.network else {
        return;
    };

    model.network.name = definition.name.text.clone();
    model.network.network_type = definition.network_type.text.clone();

    for automaton in &definition.automata {
        model.network.add_automaton(translate_automaton(automaton));
    }
}

fn translate_automaton(description: &ast::AutomatonDescription) -> Automaton {
    let mut automaton = Automaton {
        name: description.name.text.clone(),
        transitions: Vec::new(),
    };
    for transition in &description.transitions {
        automaton.add_transition(translate_transition(transition));
    }
    automaton
}

fn translate_transition(transition: &ast::AutomatonTransition) -> Transition {
    let events = transition
        .events
        .iter()
        .map(|event| TransitionEvent {
            name: event.name.text.clone(),
            probability: event
                .probability
                .as_ref()
                .map(|tok| tok.text.clone())
                .unwrap_or_default(),
        })
        .collect();

    Transition {
        from: transition.from.text.clone(),
        to: transition.to.text.clone(),
        events,
    }
}

fn translate_results(model: &mut Model, file: &File) {
    let Some(definition) = &file.results else {
        return;
    };

    for description in &definition.descriptions {
        model.add_result(ResultEntry {
            label: description.label.text.clone(),
            expression: description.expression.text(),
        });
    }
}
