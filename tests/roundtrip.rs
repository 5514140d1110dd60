//! End-to-end tests for the public façade: parsing SAN text into a model,
//! compiling it back, and the round-trip guarantees between the two.

use san_core::dsl::Value;
use san_core::model::{
    Automaton, Event, EventType, Identifier, IdentifierKind, Network, Reachability, ResultEntry,
    Transition, TransitionEvent,
};
use san_core::{compile, parse, Model, SanError};

const CLIENT_SERVER: &str = "\
// This is based on the basic client server example
identifiers
  r_proc    = 6;
  mean      = 0.5;
  F1 = (st Client == Working) * 1;

events
  loc l_proc    (r_proc);
  syn s_resp    (r_resp);

partial reachability = ((st Client == Idle) && (st Server == Idle));

network ClientServer (continuous)
  aut Client
    stt Idle         to (Transmitting) s_resp(p_1)
    stt Transmitting to (Idle)         l_proc
  aut Server
    stt Idle         to (Receiving)    s_resp
    stt Receiving    to (Idle)         l_proc

results
  Client_processing = (st Client == Working);
";

fn client_server_model() -> Model {
    parse(CLIENT_SERVER.as_bytes()).unwrap()
}

#[test]
fn test_parse_client_server_example() {
    let model = client_server_model();

    assert_eq!(
        model.identifiers,
        vec![
            Identifier {
                name: "r_proc".to_string(),
                kind: IdentifierKind::Constant,
                value: Value::Integer(6),
            },
            Identifier {
                name: "mean".to_string(),
                kind: IdentifierKind::Constant,
                value: Value::Float(0.5),
            },
            Identifier {
                name: "F1".to_string(),
                kind: IdentifierKind::Expression,
                value: Value::Text("( st Client == Working ) * 1".to_string()),
            },
        ]
    );
    assert_eq!(
        model.events,
        vec![
            Event {
                name: "l_proc".to_string(),
                event_type: EventType::Local,
                rate: "r_proc".to_string(),
            },
            Event {
                name: "s_resp".to_string(),
                event_type: EventType::Synchronizing,
                rate: "r_resp".to_string(),
            },
        ]
    );
    assert_eq!(
        model.reachability,
        Reachability {
            partial: true,
            expression: "( ( st Client == Idle ) && ( st Server == Idle ) )".to_string(),
        }
    );
    assert_eq!(model.network.name, "ClientServer");
    assert_eq!(model.network.network_type, "continuous");
    assert_eq!(model.network.automata.len(), 2);
    assert_eq!(
        model.network.automata[0].transitions[0],
        Transition {
            from: "Idle".to_string(),
            to: "Transmitting".to_string(),
            events: vec![TransitionEvent {
                name: "s_resp".to_string(),
                probability: "p_1".to_string(),
            }],
        }
    );
    assert_eq!(
        model.results,
        vec![ResultEntry {
            label: "Client_processing".to_string(),
            expression: "( st Client == Working )".to_string(),
        }]
    );
}

#[test]
fn test_compile_client_server_example() {
    let expected = "\
identifiers
  r_proc = 6;
  mean = 0.500000;
  F1 = ( st Client == Working ) * 1;
events
  loc l_proc (r_proc);
  syn s_resp (r_resp);
partial reachability = ( ( st Client == Idle ) && ( st Server == Idle ) );
network ClientServer (continuous)
  aut Client
    stt Idle
      to (Transmitting) s_resp(p_1)
    stt Transmitting
      to (Idle) l_proc
  aut Server
    stt Idle
      to (Receiving) s_resp
    stt Receiving
      to (Idle) l_proc
results
  Client_processing = ( st Client == Working );
";

    let text = compile(&client_server_model()).unwrap();
    assert_eq!(String::from_utf8(text).unwrap(), expected);
}

#[test]
fn test_round_trip_is_semantically_idempotent() {
    let model = client_server_model();
    let compiled = compile(&model).unwrap();
    let reparsed = parse(&compiled).unwrap();
    assert_eq!(reparsed, model);

    // compiling the reparsed model again is byte-identical
    assert_eq!(compile(&reparsed).unwrap(), compiled);
}

#[test]
fn test_round_trip_normalizes_constant_encoding() {
    // hex and octal constants re-emit as decimal but keep their value
    let model = parse(
        b"identifiers
  a = 0x2a;
  b = 052;
  c = -42;
events
  loc e (a);
reachability = 1;
network N (continuous)
  aut A stt x to (y) e
      stt y to (x) e
results
  r = a * 2;
",
    )
    .unwrap();

    assert_eq!(model.identifiers[0].value, Value::Integer(42));
    assert_eq!(model.identifiers[1].value, Value::Integer(42));
    assert_eq!(model.identifiers[2].value, Value::Integer(-42));

    let reparsed = parse(&compile(&model).unwrap()).unwrap();
    assert_eq!(reparsed, model);
}

#[test]
fn test_compile_is_deterministic() {
    let model = client_server_model();
    let first = compile(&model).unwrap();
    let second = compile(&model).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_hand_built_model_compiles() {
    let mut model = Model::new();
    model.add_identifier(Identifier {
        name: "rate".to_string(),
        kind: IdentifierKind::Constant,
        value: Value::Integer(3),
    });
    model.add_event(Event {
        name: "go".to_string(),
        event_type: EventType::Local,
        rate: "rate".to_string(),
    });
    model.reachability = Reachability {
        partial: false,
        expression: "1".to_string(),
    };
    model.network = Network {
        name: "Loop".to_string(),
        network_type: "continuous".to_string(),
        automata: vec![Automaton {
            name: "A".to_string(),
            transitions: vec![
                Transition {
                    from: "a".to_string(),
                    to: "b".to_string(),
                    events: vec![TransitionEvent {
                        name: "go".to_string(),
                        probability: String::new(),
                    }],
                },
                Transition {
                    from: "b".to_string(),
                    to: "a".to_string(),
                    events: vec![TransitionEvent {
                        name: "go".to_string(),
                        probability: "p".to_string(),
                    }],
                },
            ],
        }],
    };
    model.add_result(ResultEntry {
        label: "in_a".to_string(),
        expression: "st A == a".to_string(),
    });

    let reparsed = parse(&compile(&model).unwrap()).unwrap();
    assert_eq!(reparsed, model);
}

#[test]
fn test_malformed_sources_fail() {
    let sources: &[&str] = &[
        "identifiers f1",
        "identifiers f1 = ;",
        "events loc foo ();",
        "partial reachability = ;",
        "results a = (st a & 2;",
        "network Foo (continous) aut",
        "/*/",
        "&",
        "01238",
    ];

    for src in sources {
        let err = parse(src.as_bytes()).unwrap_err();
        assert!(
            err.to_string().starts_with("At "),
            "unexpected message for {src:?}: {err}"
        );
    }
}

#[test]
fn test_error_position_shape() {
    let err = parse(b"identifiers\nf1 = ;").unwrap_err();
    assert_eq!(err.to_string(), "At 2:6: Invalid expression");

    let err = parse(b"&").unwrap_err();
    assert_eq!(err.to_string(), "At 1:1: illegal char &");
    assert!(matches!(err, SanError::Scan { .. }));
}

#[test]
fn test_model_serde_round_trip() {
    let model = client_server_model();
    let json = serde_json::to_string(&model).unwrap();
    let back: Model = serde_json::from_str(&json).unwrap();
    assert_eq!(back, model);
}
