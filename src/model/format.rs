//! Canonical SAN text output for a domain model.
//!
//! The formatter is deterministic: automaton states are re-emitted in
//! ascending lexicographic order, transitions keep their insertion order
//! within a state, and whitespace is fully normalized. Comments from the
//! source never survive a round trip.

use std::collections::BTreeSet;

use crate::dsl::Value;
use crate::error::{Result, SanError};

use super::types::{IdentifierKind, Model, Transition};

type Formatter = fn(&Model, &mut String) -> Result<()>;

/// The section formatters, run in fixed order. Every section is emitted
/// unconditionally, even when empty.
const FORMATTERS: [Formatter; 5] = [
    format_identifiers,
    format_events,
    format_reachability,
    format_network,
    format_results,
];

/// Render a model as canonical SAN text.
pub fn to_san(model: &Model) -> Result<Vec<u8>> {
    let mut buf = String::new();
    for format in FORMATTERS {
        format(model, &mut buf)?;
    }
    Ok(buf.into_bytes())
}

fn format_identifiers(model: &Model, buf: &mut String) -> Result<()> {
    buf.push_str("identifiers\n");
    for ident in &model.identifiers {
        match ident.kind {
            IdentifierKind::Expression => {
                buf.push_str(&format!("  {} = {};\n", ident.name, ident.value));
            }
            IdentifierKind::Constant => match &ident.value {
                Value::Integer(value) => {
                    buf.push_str(&format!("  {} = {};\n", ident.name, value));
                }
                Value::Float(value) => {
                    buf.push_str(&format!("  {} = {:.6};\n", ident.name, value));
                }
                other => return Err(SanError::format(&ident.name, other.category())),
            },
        }
    }
    Ok(())
}

fn format_events(model: &Model, buf: &mut String) -> Result<()> {
    buf.push_str("events\n");
    for event in &model.events {
        buf.push_str(&format!(
            "  {} {} ({});\n",
            event.event_type.keyword(),
            event.name,
            event.rate
        ));
    }
    Ok(())
}

fn format_reachability(model: &Model, buf: &mut String) -> Result<()> {
    if model.reachability.partial {
        buf.push_str("partial ");
    }
    buf.push_str(&format!(
        "reachability = {};\n",
        model.reachability.expression
    ));
    Ok(())
}

fn format_network(model: &Model, buf: &mut String) -> Result<()> {
    let network = &model.network;

    buf.push_str(&format!(
        "network {} ({})\n",
        network.name, network.network_type
    ));
    for automaton in &network.automata {
        buf.push_str(&format!("  aut {}\n", automaton.name));

        for state in extract_states(&automaton.transitions) {
            buf.push_str(&format!("    stt {state}\n"));

            for transition in automaton.transitions.iter().filter(|t| t.from == state) {
                let events: Vec<String> = transition
                    .events
                    .iter()
                    .map(|event| {
                        if event.probability.is_empty() {
                            event.name.clone()
                        } else {
                            format!("{}({})", event.name, event.probability)
                        }
                    })
                    .collect();
                buf.push_str(&format!(
                    "      to ({}) {}\n",
                    transition.to,
                    events.join(" ")
                ));
            }
        }
    }
    Ok(())
}

/// Collect both endpoints of every transition, sorted lexicographically so
/// the output is deterministic.
fn extract_states(transitions: &[Transition]) -> Vec<&str> {
    let mut states = BTreeSet::new();
    for transition in transitions {
        states.insert(transition.from.as_str());
        states.insert(transition.to.as_str());
    }
    states.into_iter().collect()
}

fn format_results(model: &Model, buf: &mut String) -> Result<()> {
    buf.push_str("results\n");
    for result in &model.results {
        buf.push_str(&format!("  {} = {};\n", result.label, result.expression));
    }
    Ok(())
}
