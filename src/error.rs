//! Error types for the SAN front-end.
//!
//! This module provides a unified error type [`SanError`] that covers all
//! error conditions that can occur while scanning, parsing, and formatting
//! SAN models.

use thiserror::Error;

use crate::dsl::Pos;

/// Result type alias using [`SanError`].
pub type Result<T> = std::result::Result<T, SanError>;

/// Unified error type for all SAN operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SanError {
    /// Error during lexical analysis, reported through the scanner's
    /// error hook
    #[error("At {pos}: {message}")]
    Scan { pos: Pos, message: String },

    /// Error during parsing
    #[error("At {pos}: {message}")]
    Parse { pos: Pos, message: String },

    /// A constant identifier whose value cannot be rendered as SAN text
    #[error("Cannot format constant identifier '{name}': unsupported {category} value")]
    Format { name: String, category: &'static str },
}

impl SanError {
    /// Create a scan error
    pub fn scan(pos: Pos, message: impl Into<String>) -> Self {
        Self::Scan {
            pos,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(pos: Pos, message: impl Into<String>) -> Self {
        Self::Parse {
            pos,
            message: message.into(),
        }
    }

    /// Create a formatting error for a constant identifier
    pub fn format(name: impl Into<String>, category: &'static str) -> Self {
        Self::Format {
            name: name.into(),
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positioned_display() {
        let err = SanError::parse(Pos::new(12, 2, 5), "Invalid expression");
        assert_eq!(err.to_string(), "At 2:5: Invalid expression");
    }

    #[test]
    fn test_invalid_position_display() {
        let err = SanError::scan(Pos::default(), "illegal char &");
        assert_eq!(err.to_string(), "At -: illegal char &");
    }
}
