//! Token and source-position types for the SAN language.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A source position. A position is valid if the line number is > 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pos {
    /// Byte offset, starting at 0
    pub offset: usize,
    /// Line number, starting at 1
    pub line: usize,
    /// Column number, starting at 1 (character count, not bytes)
    pub column: usize,
}

impl Pos {
    /// Create a position from its parts.
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Returns true if the position is valid.
    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for Pos {
    /// Renders as `line:column` for valid positions and `-` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "-")
        }
    }
}

/// The set of lexical tokens of the SAN language.
///
/// `Sum`, `Sub`, `Div`, and `NEqual` are reserved for future grammar
/// extension and are currently never produced by the scanner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenType {
    /// An invalid token
    #[default]
    Illegal,
    /// End of the source
    Eof,
    /// A comment block
    Comment,
    /// `;`
    Semicolon,

    /// An identifier
    Identifier,
    /// An integer number
    Number,
    /// A floating point number
    Float,

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `=` used on assignments
    Assign,
    /// `+`
    Sum,
    /// `-`
    Sub,
    /// `*`
    Mult,
    /// `/`
    Div,
    /// `&&`
    And,
    /// `==`
    Equal,
    /// `!=`
    NEqual,

    /// The `identifiers` keyword
    Identifiers,
    /// The `events` keyword
    Events,
    /// The `partial` keyword
    Partial,
    /// The `reachability` keyword
    Reachability,
    /// The `network` keyword
    Network,
    /// The `continuous` keyword
    Continuous,
    /// The `loc` keyword
    Loc,
    /// The `syn` keyword
    Syn,
    /// The `aut` keyword
    Aut,
    /// The `stt` keyword
    Stt,
    /// The `st` keyword
    St,
    /// The `to` keyword
    To,
    /// The `results` keyword
    Results,
}

impl TokenType {
    /// Returns true for tokens corresponding to basic type literals.
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Identifier | Self::Number | Self::Float)
    }

    /// Returns true for tokens corresponding to keywords.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::Identifiers
                | Self::Events
                | Self::Partial
                | Self::Reachability
                | Self::Network
                | Self::Continuous
                | Self::Loc
                | Self::Syn
                | Self::Aut
                | Self::Stt
                | Self::St
                | Self::To
                | Self::Results
        )
    }

    /// Returns true for tokens corresponding to event types (`loc` or `syn`).
    pub fn is_event_type(&self) -> bool {
        matches!(self, Self::Loc | Self::Syn)
    }

    /// Looks up the token type for a reserved keyword, if the literal is one.
    pub fn keyword(lit: &str) -> Option<Self> {
        match lit {
            "identifiers" => Some(Self::Identifiers),
            "events" => Some(Self::Events),
            "partial" => Some(Self::Partial),
            "reachability" => Some(Self::Reachability),
            "network" => Some(Self::Network),
            "continuous" => Some(Self::Continuous),
            "loc" => Some(Self::Loc),
            "syn" => Some(Self::Syn),
            "aut" => Some(Self::Aut),
            "stt" => Some(Self::Stt),
            "st" => Some(Self::St),
            "to" => Some(Self::To),
            "results" => Some(Self::Results),
            _ => None,
        }
    }

    /// The token type's display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Illegal => "ILLEGAL",
            Self::Eof => "EOF",
            Self::Comment => "COMMENT",
            Self::Semicolon => "SEMICOLON",
            Self::Identifier => "IDENTIFIER",
            Self::Number => "NUMBER",
            Self::Float => "FLOAT",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::Assign => "ASSIGN",
            Self::Sum => "SUM",
            Self::Sub => "SUB",
            Self::Mult => "MULT",
            Self::Div => "DIV",
            Self::And => "AND",
            Self::Equal => "EQUAL",
            Self::NEqual => "NEQUAL",
            Self::Identifiers => "IDENTIFIERS",
            Self::Events => "EVENTS",
            Self::Partial => "PARTIAL",
            Self::Reachability => "REACHABILITY",
            Self::Network => "NETWORK",
            Self::Continuous => "CONTINUOUS",
            Self::Loc => "LOC",
            Self::Syn => "SYN",
            Self::Aut => "AUT",
            Self::Stt => "STT",
            Self::St => "ST",
            Self::To => "TO",
            Self::Results => "RESULTS",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token produced by the scanner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Token {
    /// The kind of token
    pub token_type: TokenType,
    /// Position of the token's first character
    pub pos: Pos,
    /// The exact source text of the token
    pub text: String,
}

impl Token {
    /// The properly typed value for this token.
    ///
    /// `Number` tokens accept decimal, `0x`/`0X` hexadecimal, and
    /// leading-zero octal notation, with an optional leading `-`.
    ///
    /// # Panics
    ///
    /// Calling this for any non-literal token type is a programming error
    /// and panics, as does literal text the scanner should not have
    /// produced for the type.
    pub fn value(&self) -> Value {
        match self.token_type {
            TokenType::Float => match self.text.parse::<f64>() {
                Ok(v) => Value::Float(v),
                Err(err) => panic!("malformed float literal {:?}: {}", self.text, err),
            },
            TokenType::Number => match parse_int(&self.text) {
                Some(v) => Value::Integer(v),
                None => panic!("malformed number literal {:?}", self.text),
            },
            TokenType::Identifier => Value::Text(self.text.clone()),
            other => panic!("value is not defined for token type {other}"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.pos, self.token_type, self.text)
    }
}

/// A typed literal value carried by a token or a constant expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A signed 64-bit integer
    Integer(i64),
    /// A 64-bit float
    Float(f64),
    /// Raw text (an identifier literal or a multi-token expression)
    Text(String),
}

impl Value {
    /// The value's category name, used in formatting errors.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// Parse a signed integer accepting decimal, hexadecimal and octal bases.
fn parse_int(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };

    Some(if negative { -magnitude } else { magnitude })
}
