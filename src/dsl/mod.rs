//! Front end for the SAN (Stochastic Automata Network) textual format.
//!
//! A SAN file describes a composite model as a set of finite automata
//! synchronized by named events with firing rates. Sources are organized
//! into five ordered blocks.
//!
//! # Grammar Overview
//!
//! ```text
//! File         = { Block }
//! Block        = Identifiers | Events | Reachability | Network | Results
//! Identifiers  = "identifiers" { ident "=" Expression ";" }
//! Events       = "events" { ("loc" | "syn") ident "(" ident ")" ";" }
//! Reachability = ["partial"] "reachability" "=" Expression ";"
//! Network      = "network" ident "(" "continuous" ")" Automaton+
//! Automaton    = "aut" ident Statepack+
//! Statepack    = "stt" ident Transition+
//! Transition   = "to" "(" ident ")" Event+
//! Event        = ident [ "(" ident ")" ]
//! Results      = "results" { ident "=" Expression ";" }
//! Expression   = token+        ; stops at ";" or at any keyword except "st"
//!
//! ident        = (letter | "_") { letter | digit | "_" | "-" | "." }
//! number       = ["-"] (decimal | hexadecimal | octal | float)
//! ```
//!
//! Whitespace is insignificant between tokens; `//` and `/* */` comments
//! are allowed anywhere whitespace is.
//!
//! # Example
//!
//! ```text
//! identifiers
//!   r_proc = 6;
//!
//! events
//!   loc l_proc (r_proc);
//!
//! partial reachability = (st Client == Idle);
//!
//! network ClientServer (continuous)
//!   aut Client
//!     stt Idle to (Working) l_proc
//!     stt Working to (Idle) l_proc
//!
//! results
//!   busy = (st Client == Working);
//! ```

pub mod ast;
pub mod parser;
pub mod scanner;
pub mod token;

pub use ast::{Expression, File};
pub use parser::Parser;
pub use scanner::Scanner;
pub use token::{Pos, Token, TokenType, Value};

use crate::error::Result;

/// Parse a SAN source into a syntax tree.
pub fn parse(src: &[u8]) -> Result<File> {
    let mut parser = Parser::new(src);
    parser.parse()
}
