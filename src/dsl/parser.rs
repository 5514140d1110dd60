//! Recursive-descent parser for SAN sources.
//!
//! The parser drives the scanner with a one-token unread buffer, dispatches
//! on the top-level block keyword, and produces a [`File`]. Comments are
//! collected into groups and classified as lead or line comments, but are
//! never delivered to the block parsers.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Result, SanError};

use super::ast::{
    AutomatonDescription, AutomatonTransition, Comment, CommentGroup, EventDescription,
    EventsDefinition, Expression, File, IdentifierAssignment, IdentifiersDefinition,
    NetworkDefinition, ReachabilityDefinition, ResultDescription, ResultsDefinition,
    TransitionEvent,
};
use super::scanner::Scanner;
use super::token::{Token, TokenType};

/// A syntactic parser for SAN sources.
pub struct Parser<'a> {
    scanner: Scanner<'a>,

    /// Last read token
    tok: Token,
    /// True when `tok` has been unread
    buffered: bool,

    /// All comment groups encountered so far
    comments: Vec<CommentGroup>,
    /// Last lead comment
    lead_comment: Option<CommentGroup>,
    /// Last line comment
    line_comment: Option<CommentGroup>,

    /// First lexical error reported by the scanner, if any
    scan_error: Rc<RefCell<Option<SanError>>>,
}

impl<'a> Parser<'a> {
    /// Create a parser for the provided source.
    pub fn new(src: &'a [u8]) -> Self {
        let mut scanner = Scanner::new(src);

        let scan_error: Rc<RefCell<Option<SanError>>> = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&scan_error);
        scanner.set_error_handler(Box::new(move |pos, msg| {
            let mut slot = slot.borrow_mut();
            if slot.is_none() {
                *slot = Some(SanError::scan(pos, msg));
            }
        }));

        Self {
            scanner,
            tok: Token::default(),
            buffered: false,
            comments: Vec::new(),
            lead_comment: None,
            line_comment: None,
            scan_error,
        }
    }

    /// Parse the source into a syntax tree.
    pub fn parse(&mut self) -> Result<File> {
        let result = self.file();

        // lexical errors take precedence over whatever the parser made of
        // the damaged token stream
        if let Some(err) = self.scan_error.borrow_mut().take() {
            return Err(err);
        }
        result
    }

    /// The comment groups collected while parsing.
    pub fn comments(&self) -> &[CommentGroup] {
        &self.comments
    }

    /// The last comment group on the line immediately before a token.
    pub fn lead_comment(&self) -> Option<&CommentGroup> {
        self.lead_comment.as_ref()
    }

    /// The last comment group trailing a token on its line.
    pub fn line_comment(&self) -> Option<&CommentGroup> {
        self.line_comment.as_ref()
    }

    fn file(&mut self) -> Result<File> {
        let mut file = File::default();

        loop {
            let tok = self.scan();
            match tok.token_type {
                TokenType::Eof => return Ok(file),
                TokenType::Identifiers => {
                    file.identifiers = Some(self.parse_identifiers(tok)?);
                }
                TokenType::Events => {
                    file.events = Some(self.parse_events(tok)?);
                }
                TokenType::Partial | TokenType::Reachability => {
                    file.reachability = Some(self.parse_reachability(tok)?);
                }
                TokenType::Network => {
                    file.network = Some(self.parse_network(tok)?);
                }
                TokenType::Results => {
                    file.results = Some(self.parse_results(tok)?);
                }
                _ => {
                    return Err(SanError::parse(
                        tok.pos,
                        format!("Unexpected token {} found", describe(&tok)),
                    ));
                }
            }
        }
    }

    fn parse_identifiers(&mut self, identifiers_token: Token) -> Result<IdentifiersDefinition> {
        log::trace!("parsing identifiers block at {}", identifiers_token.pos);

        let mut definition = IdentifiersDefinition {
            token: identifiers_token,
            assignments: Vec::new(),
        };

        loop {
            let tok = self.scan();
            if tok.token_type == TokenType::Eof {
                break;
            }
            if tok.token_type.is_keyword() {
                self.unscan();
                break;
            }
            if tok.token_type != TokenType::Identifier {
                return Err(SanError::parse(
                    tok.pos,
                    format!("Unexpected {}. Expected an identifier", describe(&tok)),
                ));
            }

            self.expect(TokenType::Assign, "an =")?;
            let expression = self.scan_expression()?;

            definition.assignments.push(IdentifierAssignment {
                identifier: tok,
                expression,
            });
        }

        Ok(definition)
    }

    fn parse_events(&mut self, events_token: Token) -> Result<EventsDefinition> {
        log::trace!("parsing events block at {}", events_token.pos);

        let mut definition = EventsDefinition {
            token: events_token,
            descriptions: Vec::new(),
        };

        loop {
            let tok = self.scan();
            if tok.token_type == TokenType::Eof {
                break;
            }
            if !tok.token_type.is_event_type() {
                if definition.descriptions.is_empty() {
                    return Err(SanError::parse(
                        tok.pos,
                        format!(
                            "Unexpected {}. Expected an event type ('loc' or 'syn')",
                            describe(&tok)
                        ),
                    ));
                }
                self.unscan();
                break;
            }

            let name = self.expect(TokenType::Identifier, "an identifier")?;
            self.expect(TokenType::LParen, "a (")?;
            let rate = self.expect(TokenType::Identifier, "an identifier")?;
            self.expect(TokenType::RParen, "a )")?;
            self.expect(TokenType::Semicolon, "a ;")?;

            definition.descriptions.push(EventDescription {
                event_type: tok,
                name,
                rate,
            });
        }

        Ok(definition)
    }

    fn parse_reachability(&mut self, first_token: Token) -> Result<ReachabilityDefinition> {
        log::trace!("parsing reachability block at {}", first_token.pos);

        let partial = first_token.token_type == TokenType::Partial;
        let mut tokens = vec![first_token];

        let tok = self.scan();
        if partial {
            if tok.token_type != TokenType::Reachability {
                return Err(SanError::parse(
                    tok.pos,
                    format!("Unexpected {}. Expected to find 'reachability'", describe(&tok)),
                ));
            }
            tokens.push(tok);
        } else {
            self.unscan();
        }

        self.expect(TokenType::Assign, "an =")?;
        let expression = self.scan_expression()?;

        Ok(ReachabilityDefinition { tokens, expression })
    }

    fn parse_network(&mut self, network_token: Token) -> Result<NetworkDefinition> {
        log::trace!("parsing network block at {}", network_token.pos);

        let name = self.expect(TokenType::Identifier, "an identifier")?;
        self.expect(TokenType::LParen, "a (")?;
        let network_type = self.expect(TokenType::Continuous, "to find the 'continuous' keyword")?;
        self.expect(TokenType::RParen, "a )")?;

        let mut definition = NetworkDefinition {
            token: network_token,
            name,
            network_type,
            automata: Vec::new(),
        };

        loop {
            let tok = self.scan();
            if tok.token_type != TokenType::Aut {
                if definition.automata.is_empty() {
                    return Err(SanError::parse(
                        tok.pos,
                        format!(
                            "Unexpected {}. Expected to find the 'aut' keyword",
                            describe(&tok)
                        ),
                    ));
                }
                if tok.token_type != TokenType::Eof {
                    self.unscan();
                }
                break;
            }

            definition.automata.push(self.parse_automaton(tok)?);
        }

        Ok(definition)
    }

    fn parse_automaton(&mut self, aut_token: Token) -> Result<AutomatonDescription> {
        let name = self.expect(TokenType::Identifier, "to find an identifier")?;

        let mut automaton = AutomatonDescription {
            token: aut_token,
            name,
            transitions: Vec::new(),
        };

        loop {
            let tok = self.scan();
            if tok.token_type != TokenType::Stt {
                if automaton.transitions.is_empty() {
                    return Err(SanError::parse(
                        tok.pos,
                        "Unexpected EOF. Expected to find the 'stt' keyword",
                    ));
                }
                self.unscan();
                break;
            }

            let transitions = self.parse_state_transitions()?;
            automaton.transitions.extend(transitions);
        }

        Ok(automaton)
    }

    /// Parse the transitions sharing a single `from` state, introduced by
    /// the `stt` keyword.
    fn parse_state_transitions(&mut self) -> Result<Vec<AutomatonTransition>> {
        let from = self.expect(TokenType::Identifier, "to find an identifier")?;

        let mut transitions = Vec::new();

        loop {
            let tok = self.scan();
            if tok.token_type != TokenType::To {
                self.unscan();
                break;
            }

            self.expect(TokenType::LParen, "a (")?;
            let to = self.expect(TokenType::Identifier, "an identifier")?;
            self.expect(TokenType::RParen, "a )")?;
            let events = self.parse_transition_events(&from)?;

            transitions.push(AutomatonTransition {
                from: from.clone(),
                to,
                events,
            });
        }

        Ok(transitions)
    }

    /// Parse the non-empty event list of a transition. Each event may carry
    /// a parenthesized probability identifier.
    fn parse_transition_events(&mut self, from: &Token) -> Result<Vec<TransitionEvent>> {
        let mut events = Vec::new();

        loop {
            let tok = self.scan();
            if tok.token_type != TokenType::Identifier {
                let pos = tok.pos;
                self.unscan();
                if events.is_empty() {
                    return Err(SanError::parse(
                        pos,
                        format!("No events found for transition {}", from.text),
                    ));
                }
                break;
            }

            let next = self.scan();
            let probability = if next.token_type == TokenType::LParen {
                let prob = self.expect(TokenType::Identifier, "an identifier")?;
                self.expect(TokenType::RParen, "a )")?;
                Some(prob)
            } else {
                self.unscan();
                None
            };

            events.push(TransitionEvent {
                name: tok,
                probability,
            });
        }

        Ok(events)
    }

    fn parse_results(&mut self, results_token: Token) -> Result<ResultsDefinition> {
        log::trace!("parsing results block at {}", results_token.pos);

        let mut definition = ResultsDefinition {
            token: results_token,
            descriptions: Vec::new(),
        };

        loop {
            let tok = self.scan();
            if tok.token_type == TokenType::Eof {
                if definition.descriptions.is_empty() {
                    return Err(SanError::parse(tok.pos, "Expected to find a list of results"));
                }
                break;
            }
            if tok.token_type.is_keyword() {
                self.unscan();
                break;
            }
            if tok.token_type != TokenType::Identifier {
                return Err(SanError::parse(
                    tok.pos,
                    format!("Unexpected {}. Expected an identifier", describe(&tok)),
                ));
            }

            self.expect(TokenType::Assign, "an =")?;
            let expression = self.scan_expression()?;

            definition.descriptions.push(ResultDescription {
                label: tok,
                expression,
            });
        }

        Ok(definition)
    }

    /// Collect expression tokens until a semicolon (consumed) or a keyword
    /// other than `st` (unread). `st` stays allowed because SAN expressions
    /// contain `st <Automaton> == <State>` predicates.
    fn scan_expression(&mut self) -> Result<Expression> {
        let mut tokens = Vec::new();
        let end;

        loop {
            let tok = self.scan();
            if tok.token_type == TokenType::Eof {
                return Err(SanError::parse(
                    tok.pos,
                    format!("Unexpected {}. Expected a ;", describe(&tok)),
                ));
            }
            if tok.token_type == TokenType::Semicolon {
                end = tok.pos;
                break;
            }
            if tok.token_type.is_keyword() && tok.token_type != TokenType::St {
                end = tok.pos;
                self.unscan();
                break;
            }
            tokens.push(tok);
        }

        if tokens.is_empty() {
            return Err(SanError::parse(end, "Invalid expression"));
        }
        Ok(Expression { tokens })
    }

    /// Scan the next token, requiring the given type.
    fn expect(&mut self, token_type: TokenType, what: &str) -> Result<Token> {
        let tok = self.scan();
        if tok.token_type != token_type {
            return Err(SanError::parse(
                tok.pos,
                format!("Unexpected {}. Expected {what}", describe(&tok)),
            ));
        }
        Ok(tok)
    }

    /// Return the next token from the scanner, or the unread one. Comment
    /// groups are consumed here and classified as lead or line comments, so
    /// block parsers never see them.
    fn scan(&mut self) -> Token {
        if self.buffered {
            self.buffered = false;
            return self.tok.clone();
        }

        let prev_line = self.tok.pos.line;
        self.tok = self.scanner.scan();

        if self.tok.token_type == TokenType::Comment {
            if self.tok.pos.line == prev_line {
                // the comment is on the same line as the previous token; it
                // cannot be a lead comment but may be a line comment
                let (group, endline) = self.consume_comment_group(0);
                if self.tok.pos.line != endline {
                    // the next token is on a different line, so the group
                    // trails its line
                    self.line_comment = Some(group);
                }
            }

            // consume successor comments, if any
            let mut last = None;
            while self.tok.token_type == TokenType::Comment {
                last = Some(self.consume_comment_group(1));
            }
            if let Some((group, endline)) = last {
                if endline + 1 == self.tok.pos.line {
                    // the next token follows on the line immediately after
                    // the group: a lead comment
                    self.lead_comment = Some(group);
                }
            }
        }

        self.tok.clone()
    }

    /// Push the previously read token back onto the buffer.
    fn unscan(&mut self) {
        self.buffered = true;
    }

    fn consume_comment(&mut self) -> (Comment, usize) {
        let mut endline = self.tok.pos.line;

        // count the end line of multiline /*-style comments
        if self.tok.text.starts_with("/*") {
            endline += self.tok.text.matches('\n').count();
        }

        let comment = Comment {
            start: self.tok.pos,
            text: self.tok.text.clone(),
        };
        self.tok = self.scanner.scan();

        (comment, endline)
    }

    fn consume_comment_group(&mut self, n: usize) -> (CommentGroup, usize) {
        let mut list = Vec::new();
        let mut endline = self.tok.pos.line;

        while self.tok.token_type == TokenType::Comment && self.tok.pos.line <= endline + n {
            let (comment, line) = self.consume_comment();
            endline = line;
            list.push(comment);
        }

        let group = CommentGroup { list };
        self.comments.push(group.clone());

        (group, endline)
    }
}

/// Render a token for an error message.
fn describe(tok: &Token) -> &str {
    if tok.token_type == TokenType::Eof {
        "EOF"
    } else {
        &tok.text
    }
}

#[cfg(test)]
mod tests {
    use super::super::token::Value;
    use super::*;

    fn parse(src: &str) -> Result<File> {
        Parser::new(src.as_bytes()).parse()
    }

    fn assert_all_fail(sources: &[&str]) {
        for src in sources {
            assert!(parse(src).is_err(), "expected {src:?} to fail");
        }
    }

    // ------------------------------------------------------------------
    // Identifiers block

    #[test]
    fn test_parse_identifiers() {
        let file = parse("identifiers\nrate   = 3;\n  r_2=4;").unwrap();
        let definition = file.identifiers.unwrap();
        assert_eq!(definition.token.pos.line, 1);

        let parsed: Vec<_> = definition
            .assignments
            .iter()
            .map(|a| {
                (
                    a.identifier.pos.line,
                    a.identifier.pos.column,
                    a.identifier.text.clone(),
                    a.expression.is_constant(),
                    a.expression.value(),
                )
            })
            .collect();
        assert_eq!(
            parsed,
            vec![
                (2, 1, "rate".to_string(), true, Value::Integer(3)),
                (3, 3, "r_2".to_string(), true, Value::Integer(4)),
            ]
        );
    }

    #[test]
    fn test_parse_identifiers_with_expressions_and_comments() {
        let file = parse("// Foo \nidentifiers\nF1 = (st Client == Working) * 1; r_2= 4/* */;")
            .unwrap();
        let definition = file.identifiers.unwrap();
        assert_eq!(definition.token.pos.line, 2);

        let parsed: Vec<_> = definition
            .assignments
            .iter()
            .map(|a| {
                (
                    a.identifier.pos.line,
                    a.identifier.pos.column,
                    a.identifier.text.clone(),
                    a.expression.is_constant(),
                    a.expression.value(),
                )
            })
            .collect();
        assert_eq!(
            parsed,
            vec![
                (
                    3,
                    1,
                    "F1".to_string(),
                    false,
                    Value::Text("( st Client == Working ) * 1".to_string()),
                ),
                (3, 34, "r_2".to_string(), true, Value::Integer(4)),
            ]
        );
    }

    #[test]
    fn test_parse_identifiers_preserves_reassignments() {
        let file = parse("identifiers\nr = 1;\nr = 2;").unwrap();
        let definition = file.identifiers.unwrap();
        assert_eq!(definition.assignments.len(), 2);
        assert_eq!(definition.assignments[0].expression.value(), Value::Integer(1));
        assert_eq!(definition.assignments[1].expression.value(), Value::Integer(2));
    }

    #[test]
    fn test_parse_identifiers_errors() {
        assert_all_fail(&[
            "identifiers f1",
            "identifiers f1 = ",
            "identifiers f1 = ;",
            "identifiers f1 = 1",
            "identifiers\nf1 = 1; a=; t = 3;",
        ]);
    }

    #[test]
    fn test_parse_identifiers_error_position() {
        let err = parse("identifiers\nf1 = ;").unwrap_err();
        assert_eq!(err, SanError::parse(crate::dsl::Pos::new(17, 2, 6), "Invalid expression"));
        assert_eq!(err.to_string(), "At 2:6: Invalid expression");
    }

    // ------------------------------------------------------------------
    // Events block

    #[test]
    fn test_parse_events() {
        let file = parse("events\nloc foo (bar);\n syn john (doe);").unwrap();
        let definition = file.events.unwrap();
        assert_eq!(definition.token.pos.line, 1);

        let parsed: Vec<_> = definition
            .descriptions
            .iter()
            .map(|d| {
                (
                    d.event_type.pos.line,
                    d.event_type.pos.column,
                    d.event_type.text.clone(),
                    d.name.text.clone(),
                    d.rate.text.clone(),
                )
            })
            .collect();
        assert_eq!(
            parsed,
            vec![
                (2, 1, "loc".to_string(), "foo".to_string(), "bar".to_string()),
                (3, 2, "syn".to_string(), "john".to_string(), "doe".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_events_skips_comments() {
        let file =
            parse("/* */events\n // loc bla; \nloc foo (bar); loc l_req (r_req); syn john (doe);")
                .unwrap();
        let definition = file.events.unwrap();
        assert_eq!(definition.token.pos.line, 1);

        let parsed: Vec<_> = definition
            .descriptions
            .iter()
            .map(|d| {
                (
                    d.event_type.pos.line,
                    d.event_type.pos.column,
                    d.event_type.text.clone(),
                    d.name.text.clone(),
                    d.rate.text.clone(),
                )
            })
            .collect();
        assert_eq!(
            parsed,
            vec![
                (3, 1, "loc".to_string(), "foo".to_string(), "bar".to_string()),
                (
                    3,
                    16,
                    "loc".to_string(),
                    "l_req".to_string(),
                    "r_req".to_string(),
                ),
                (
                    3,
                    35,
                    "syn".to_string(),
                    "john".to_string(),
                    "doe".to_string(),
                ),
            ]
        );
    }

    #[test]
    fn test_parse_events_errors() {
        assert_all_fail(&[
            "events f1",
            "events f1;",
            "events loc ",
            "events loc ;",
            "events loc foo ;",
            "events loc foo ();",
            "events syn ",
            "events syn ;",
            "events syn foo ;",
            "events syn foo ();",
        ]);
    }

    // ------------------------------------------------------------------
    // Reachability block

    #[test]
    fn test_parse_reachability() {
        let cases: &[(&str, bool, Value)] = &[
            (
                "partial reachability = ((st Client == Idle) && (st Server == Idle));",
                true,
                Value::Text("( ( st Client == Idle ) && ( st Server == Idle ) )".to_string()),
            ),
            (
                "reachability = (( st Client == Idle) && (st Server == Idle));",
                false,
                Value::Text("( ( st Client == Idle ) && ( st Server == Idle ) )".to_string()),
            ),
            ("reachability = 1;", false, Value::Integer(1)),
        ];

        for (src, partial, value) in cases {
            let file = parse(src).unwrap();
            let definition = file.reachability.unwrap();
            assert_eq!(
                definition.tokens[0].token_type == TokenType::Partial,
                *partial,
                "{src}"
            );
            assert_eq!(definition.expression.value(), *value, "{src}");
        }
    }

    #[test]
    fn test_parse_reachability_errors() {
        assert_all_fail(&[
            "partial ;",
            "partial reachability;",
            "partial reachability = ;",
            "reachability ;",
            "reachability = ;",
            "reachability events ;",
        ]);
    }

    // ------------------------------------------------------------------
    // Network block

    #[test]
    fn test_parse_network() {
        let src = "network ClientServer (continuous)
aut Client
  stt A to (B) s_1
  stt B to (C) s_2
  stt C to (B) s_3(p_1)
        to (A) s_4(p_2) s_5(p_3)
aut Server stt D to (e) s_6";

        let file = parse(src).unwrap();
        let definition = file.network.unwrap();
        assert_eq!(definition.token.pos.line, 1);
        assert_eq!(definition.name.text, "ClientServer");
        assert_eq!(definition.network_type.text, "continuous");

        let automata: Vec<_> = definition
            .automata
            .iter()
            .map(|automaton| {
                let transitions: Vec<_> = automaton
                    .transitions
                    .iter()
                    .map(|t| {
                        let events: Vec<String> = t
                            .events
                            .iter()
                            .map(|e| {
                                let prob = e
                                    .probability
                                    .as_ref()
                                    .map(|p| p.text.as_str())
                                    .unwrap_or("");
                                format!("{}|{}", e.name.text, prob)
                            })
                            .collect();
                        (t.from.text.clone(), t.to.text.clone(), events)
                    })
                    .collect();
                (
                    automaton.token.pos.line,
                    automaton.token.pos.column,
                    automaton.name.text.clone(),
                    transitions,
                )
            })
            .collect();

        assert_eq!(
            automata,
            vec![
                (
                    2,
                    1,
                    "Client".to_string(),
                    vec![
                        ("A".to_string(), "B".to_string(), vec!["s_1|".to_string()]),
                        ("B".to_string(), "C".to_string(), vec!["s_2|".to_string()]),
                        (
                            "C".to_string(),
                            "B".to_string(),
                            vec!["s_3|p_1".to_string()],
                        ),
                        (
                            "C".to_string(),
                            "A".to_string(),
                            vec!["s_4|p_2".to_string(), "s_5|p_3".to_string()],
                        ),
                    ],
                ),
                (
                    7,
                    1,
                    "Server".to_string(),
                    vec![("D".to_string(), "e".to_string(), vec!["s_6|".to_string()])],
                ),
            ]
        );
    }

    #[test]
    fn test_parse_network_errors() {
        assert_all_fail(&[
            "network",
            "network Foo",
            "network Foo\naut",
            "network Foo (continous) aut",
            "network Foo (continuous)",
            "network Foo (continuous) aut A",
            "network Foo (continuous) aut A stt",
            "network Foo (continuous) aut A stt B to (C)",
        ]);
    }

    // ------------------------------------------------------------------
    // Results block

    #[test]
    fn test_parse_results() {
        let file =
            parse("results\nA_b = (st Foo == bar)\n && (st bla == foo); a = st Bla == state;")
                .unwrap();
        let definition = file.results.unwrap();
        assert_eq!(definition.token.pos.line, 1);

        let parsed: Vec<_> = definition
            .descriptions
            .iter()
            .map(|d| {
                (
                    d.label.pos.line,
                    d.label.pos.column,
                    d.label.text.clone(),
                    d.expression.text(),
                )
            })
            .collect();
        assert_eq!(
            parsed,
            vec![
                (
                    2,
                    1,
                    "A_b".to_string(),
                    "( st Foo == bar ) && ( st bla == foo )".to_string(),
                ),
                (3, 22, "a".to_string(), "st Bla == state".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_results_with_commented_out_lines() {
        let file =
            parse("results//A_b = (st Foo == bar)\n //&& (st bla == foo);\n a = st Bla == state\n;")
                .unwrap();
        let definition = file.results.unwrap();
        assert_eq!(definition.token.pos.line, 1);

        let parsed: Vec<_> = definition
            .descriptions
            .iter()
            .map(|d| {
                (
                    d.label.pos.line,
                    d.label.pos.column,
                    d.label.text.clone(),
                    d.expression.text(),
                )
            })
            .collect();
        assert_eq!(
            parsed,
            vec![(3, 2, "a".to_string(), "st Bla == state".to_string())]
        );
    }

    #[test]
    fn test_parse_results_errors() {
        assert_all_fail(&["results", "results ;", "results a ;", "results a = ;"]);
    }

    // ------------------------------------------------------------------
    // Scanner error precedence

    #[test]
    fn test_scanner_error_takes_precedence() {
        let err = parse("results a = (st a & 2;").unwrap_err();
        match err {
            SanError::Scan { pos, message } => {
                assert_eq!(pos.to_string(), "1:19");
                assert_eq!(message, "illegal char &");
            }
            other => panic!("expected a scan error, got {other:?}"),
        }
    }

    #[test]
    fn test_scanner_error_reported_even_when_parse_succeeds() {
        // the damaged identifier still parses, but the encoding error must
        // surface
        let err = Parser::new(b"identifiers\nx\x80 = 3;").parse().unwrap_err();
        assert!(matches!(err, SanError::Scan { .. }), "{err:?}");
    }

    // ------------------------------------------------------------------
    // Bad top level

    #[test]
    fn test_unexpected_token_at_root() {
        assert_all_fail(&["ident\n", "// Foo\naa", "3", ";"]);

        let err = parse("ident\n").unwrap_err();
        assert_eq!(err.to_string(), "At 1:1: Unexpected token ident found");
    }

    // ------------------------------------------------------------------
    // Comment collection

    #[test]
    fn test_lead_comment_classification() {
        let mut parser = Parser::new(b"// Foo\nidentifiers\nf = 1;");
        parser.parse().unwrap();
        assert_eq!(parser.comments().len(), 1);
        let lead = parser.lead_comment().unwrap();
        assert_eq!(lead.list[0].text, "// Foo");
        assert_eq!(lead.list[0].start.line, 1);
    }

    #[test]
    fn test_line_comment_classification() {
        let mut parser = Parser::new(b"identifiers // trailing\nf = 1;");
        parser.parse().unwrap();
        let line = parser.line_comment().unwrap();
        assert_eq!(line.list[0].text, "// trailing");
    }

    #[test]
    fn test_comment_groups_collected() {
        let mut parser = Parser::new(b"identifiers\n// one\n// two\nf = 1;\nresults r = 1;");
        parser.parse().unwrap();
        assert_eq!(parser.comments().len(), 1);
        assert_eq!(parser.comments()[0].list.len(), 2);
    }
}
