//! Lexical scanner for SAN sources.
//!
//! The scanner consumes a byte slice interpreted as UTF-8 and produces one
//! token per [`Scanner::scan`] call. Lexical errors are reported through a
//! settable error handler and never abort scanning.

use super::token::{Pos, Token, TokenType};

/// Marker for the end of the source.
const EOF_CHAR: char = '\0';

/// Callback invoked for each lexical error.
pub type ErrorHandler<'a> = Box<dyn FnMut(Pos, &str) + 'a>;

/// A lexical scanner over a SAN source buffer.
pub struct Scanner<'a> {
    /// Source buffer
    src: &'a [u8],

    /// Current position; its offset doubles as the read cursor
    pos: Pos,
    /// Previous position, used by `unread`
    prev_pos: Pos,

    /// Length in bytes of the most recently read character
    last_char_len: usize,
    /// Length in characters of the last finished line, for positioning
    /// tokens that follow a newline
    last_line_len: usize,

    /// Start position of the most recently scanned token
    tok_pos: Pos,

    /// Called for each error encountered; defaults to writing to stderr
    error_handler: Option<ErrorHandler<'a>>,
    /// Incremented by one for each error encountered
    error_count: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner reading from `src`.
    pub fn new(src: &'a [u8]) -> Self {
        Self {
            src,
            pos: Pos {
                offset: 0,
                line: 1,
                column: 0,
            },
            prev_pos: Pos::default(),
            last_char_len: 0,
            last_line_len: 0,
            tok_pos: Pos::default(),
            error_handler: None,
            error_count: 0,
        }
    }

    /// Install an error handler replacing the stderr default.
    pub fn set_error_handler(&mut self, handler: ErrorHandler<'a>) {
        self.error_handler = Some(handler);
    }

    /// Number of errors reported so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Scan the next token.
    pub fn scan(&mut self) -> Token {
        let mut ch = self.next();

        // skip white space
        while is_whitespace(ch) {
            ch = self.next();
        }

        // token text and position both start at the first character; the
        // initial next() already moved past it
        let tok_start = self.pos.offset - self.last_char_len;
        self.tok_pos.offset = tok_start;
        if self.pos.column > 0 {
            // common case: the last character was not a newline
            self.tok_pos.line = self.pos.line;
            self.tok_pos.column = self.pos.column;
        } else {
            // the last character was a newline (we cannot be at the
            // beginning of the source, next() ran at least once)
            self.tok_pos.line = self.pos.line - 1;
            self.tok_pos.column = self.last_line_len;
        }

        let token_type = if is_letter(ch) {
            let lit = self.scan_identifier();
            TokenType::keyword(&lit).unwrap_or(TokenType::Identifier)
        } else if is_decimal(ch) {
            self.scan_number(ch)
        } else {
            match ch {
                EOF_CHAR => TokenType::Eof,
                '/' => {
                    self.scan_comment(ch);
                    TokenType::Comment
                }
                '(' => TokenType::LParen,
                ')' => TokenType::RParen,
                ';' => TokenType::Semicolon,
                '=' => {
                    if self.peek() == '=' {
                        self.next();
                        TokenType::Equal
                    } else {
                        TokenType::Assign
                    }
                }
                '&' => {
                    if self.peek() == '&' {
                        self.next();
                        TokenType::And
                    } else {
                        self.error("illegal char &");
                        TokenType::Illegal
                    }
                }
                '*' => TokenType::Mult,
                '-' => {
                    if is_decimal(self.peek()) {
                        let ch = self.next();
                        self.scan_number(ch)
                    } else {
                        self.error("illegal char -");
                        TokenType::Illegal
                    }
                }
                other => {
                    self.error(&format!("illegal {other}"));
                    TokenType::Illegal
                }
            }
        };

        let tok_end = self.pos.offset;
        Token {
            token_type,
            pos: self.tok_pos,
            text: String::from_utf8_lossy(&self.src[tok_start..tok_end]).into_owned(),
        }
    }

    /// Read the next character, updating position counters.
    ///
    /// Invalid UTF-8 yields the replacement character plus an error report,
    /// and scanning continues. At the end of the source the column keeps
    /// advancing so error positions stay meaningful.
    fn next(&mut self) -> char {
        let rest = match self.src.get(self.pos.offset..) {
            Some(rest) if !rest.is_empty() => rest,
            _ => {
                self.last_char_len = 0;
                self.pos.column += 1;
                return EOF_CHAR;
            }
        };

        let (ch, size) = decode_char(rest);
        self.prev_pos = self.pos;
        self.pos.column += 1;
        self.last_char_len = size;
        self.pos.offset += size;

        if ch == char::REPLACEMENT_CHARACTER && size == 1 {
            self.error("illegal UTF-8 encoding");
            return ch;
        }

        if ch == '\n' {
            self.pos.line += 1;
            self.last_line_len = self.pos.column;
            self.pos.column = 0;
        }

        ch
    }

    /// Unread the previously read character.
    fn unread(&mut self) {
        self.pos = self.prev_pos;
    }

    /// Return the next character without advancing.
    fn peek(&self) -> char {
        match self.src.get(self.pos.offset..) {
            Some(rest) if !rest.is_empty() => decode_char(rest).0,
            _ => EOF_CHAR,
        }
    }

    fn scan_comment(&mut self, ch: char) {
        // single line comments run to the end of the line; the newline
        // itself stays unread
        if ch == '/' && self.peek() != '*' {
            let mut ch = self.next();
            while ch != '\n' && ch != EOF_CHAR {
                ch = self.next();
            }
            if ch != EOF_CHAR {
                self.unread();
            }
            return;
        }

        // consume the '*' and the character after it, so an unterminated
        // "/*" is caught below
        self.next();
        let mut ch = self.next();

        loop {
            if ch == EOF_CHAR {
                self.error("comment not terminated");
                break;
            }

            let ch0 = ch;
            ch = self.next();
            if ch0 == '*' && ch == '/' {
                break;
            }
        }
    }

    /// Scan a SAN number starting with the given character.
    fn scan_number(&mut self, ch: char) -> TokenType {
        if ch == '0' {
            // hexadecimal, octal or float
            let mut ch = self.next();
            if ch == 'x' || ch == 'X' {
                ch = self.next();
                let mut found = false;
                while is_hexadecimal(ch) {
                    ch = self.next();
                    found = true;
                }

                if !found {
                    self.error("illegal hexadecimal number");
                }

                if ch != EOF_CHAR {
                    self.unread();
                }
                return TokenType::Number;
            }

            // now it's either something like 0421 (octal) or 0.1231
            // (float); 0159 is illegal but 0159.23 is valid, so the digits
            // 8 and 9 only become an error once the number turns out to be
            // an integer
            let mut illegal_octal = false;
            while is_decimal(ch) {
                if ch == '8' || ch == '9' {
                    illegal_octal = true;
                }
                ch = self.next();
            }

            if ch == 'e' || ch == 'E' {
                self.scan_exponent(ch);
                return TokenType::Float;
            }

            if ch == '.' {
                let ch = self.scan_fraction(ch);
                if ch == 'e' || ch == 'E' {
                    let ch = self.next();
                    self.scan_exponent(ch);
                }
                return TokenType::Float;
            }

            if illegal_octal {
                self.error("illegal octal number");
            }

            if ch != EOF_CHAR {
                self.unread();
            }
            return TokenType::Number;
        }

        self.scan_mantissa(ch);
        let ch = self.next(); // seek forward
        if ch == 'e' || ch == 'E' {
            self.scan_exponent(ch);
            return TokenType::Float;
        }

        if ch == '.' {
            let ch = self.scan_fraction(ch);
            if ch == 'e' || ch == 'E' {
                let ch = self.next();
                self.scan_exponent(ch);
            }
            return TokenType::Float;
        }

        if ch != EOF_CHAR {
            self.unread();
        }
        TokenType::Number
    }

    /// Scan a run of decimal digits beginning at the given character and
    /// return the first character past it, which is left unread.
    fn scan_mantissa(&mut self, ch: char) -> char {
        let mut ch = ch;
        let mut scanned = false;
        while is_decimal(ch) {
            ch = self.next();
            scanned = true;
        }

        if scanned && ch != EOF_CHAR {
            self.unread();
        }
        ch
    }

    /// Scan the fraction after the '.' character.
    fn scan_fraction(&mut self, ch: char) -> char {
        let mut ch = ch;
        if ch == '.' {
            ch = self.peek(); // peek to see if we can move forward
            ch = self.scan_mantissa(ch);
        }
        ch
    }

    /// Scan the remainder of an exponent after the 'e' or 'E' character.
    fn scan_exponent(&mut self, ch: char) -> char {
        let mut ch = ch;
        if ch == 'e' || ch == 'E' {
            ch = self.next();
            if ch == '-' || ch == '+' {
                ch = self.next();
            }
            ch = self.scan_mantissa(ch);
        }
        ch
    }

    /// Scan an identifier and return its literal text.
    fn scan_identifier(&mut self) -> String {
        let start = self.pos.offset - self.last_char_len;
        let mut ch = self.next();
        while is_letter(ch) || is_digit(ch) || ch == '-' || ch == '.' {
            ch = self.next();
        }

        if ch != EOF_CHAR {
            self.unread(); // put back the first character past the identifier
        }

        String::from_utf8_lossy(&self.src[start..self.pos.offset]).into_owned()
    }

    /// Position of the character immediately after the most recently read
    /// one, used for error reporting.
    fn recent_position(&self) -> Pos {
        let offset = self.pos.offset - self.last_char_len;
        if self.pos.column > 0 {
            // common case: the last character was not a newline
            Pos {
                offset,
                line: self.pos.line,
                column: self.pos.column,
            }
        } else if self.last_line_len > 0 {
            // the last character was a newline
            Pos {
                offset,
                line: self.pos.line - 1,
                column: self.last_line_len,
            }
        } else {
            // at the beginning of the source
            Pos {
                offset,
                line: 1,
                column: 1,
            }
        }
    }

    /// Report an error through the handler, or to stderr if none is set.
    fn error(&mut self, msg: &str) {
        self.error_count += 1;
        let pos = self.recent_position();

        match self.error_handler.as_mut() {
            Some(handler) => handler(pos, msg),
            None => eprintln!("{pos}: {msg}"),
        }
    }
}

/// Decode one character from the head of `bytes`. Malformed sequences
/// decode to the replacement character with a reported size of one byte.
fn decode_char(bytes: &[u8]) -> (char, usize) {
    let first = bytes[0];
    if first < 0x80 {
        return (first as char, 1);
    }

    let len = match first {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return (char::REPLACEMENT_CHARACTER, 1),
    };
    if bytes.len() < len {
        return (char::REPLACEMENT_CHARACTER, 1);
    }

    match std::str::from_utf8(&bytes[..len]) {
        Ok(s) => s
            .chars()
            .next()
            .map_or((char::REPLACEMENT_CHARACTER, 1), |ch| (ch, len)),
        Err(_) => (char::REPLACEMENT_CHARACTER, 1),
    }
}

fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || (ch as u32 >= 0x80 && ch.is_alphabetic())
}

fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit() || (ch as u32 >= 0x80 && ch.is_numeric())
}

fn is_decimal(ch: char) -> bool {
    ch.is_ascii_digit()
}

fn is_hexadecimal(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

fn is_whitespace(ch: char) -> bool {
    ch == ' ' || ch == '\t' || ch == '\n' || ch == '\r'
}
