//! Error handling types for the Marl front end.
//!
//! This module provides the single fault type shared by the lexer, the
//! parser, and the driver. Every layer returns [`Result`] and propagates
//! faults unchanged with `?`; no layer catches and retries. The first fault
//! aborts the whole lex or parse, so callers either receive a complete
//! [`Module`](crate::ast::Module) or exactly one [`Error`].
//!
//! # Error Philosophy
//!
//! - **Structured**: syntax faults carry the offending token and the set of
//!   acceptable kinds, so diagnostics can be rendered without re-parsing.
//! - **Located**: every fault that originates in source text knows its
//!   line and column.
//! - **Fatal**: no error recovery or resynchronization is attempted.
//!
//! # Examples
//!
//! ```rust
//! use marl_syntax::error::{Error, Result};
//! use marl_syntax::token::{SourceLocation, Token, TokenKind};
//!
//! fn reject(found: Token) -> Result<()> {
//!     Err(Error::UnexpectedToken {
//!         found,
//!         expected: vec![TokenKind::Semicolon],
//!     })
//! }
//!
//! let tok = Token::new(TokenKind::Comma, ",", 3, 7);
//! let err = reject(tok).unwrap_err();
//! assert_eq!(err.location(), Some(SourceLocation { line: 3, col: 7 }));
//! ```

use std::fmt;

use crate::token::{SourceLocation, Token, TokenKind};

/// A fault raised while lexing or parsing Marl source.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The current lookahead's kind is not among the kinds the active
    /// production accepts. Always fatal to the parse.
    UnexpectedToken {
        /// The offending token, with kind, spelling, and location.
        found: Token,
        /// The kinds that would have been acceptable, for diagnostics only.
        expected: Vec<TokenKind>,
    },

    /// The token source ran dry where a production required more input, or
    /// it yielded an error-kind token from the scanner.
    MalformedTokenStream {
        /// Position of the last token seen before the stream broke down.
        location: SourceLocation,
    },

    /// A numeric literal's spelling could not be converted to a value
    /// (overflow or malformed text). Conversion fails fast rather than
    /// silently truncating.
    InvalidLiteral {
        spelling: String,
        location: SourceLocation,
    },

    /// A scanner-side fault: unexpected character, unterminated string, and
    /// the like.
    Lexical {
        message: String,
        location: SourceLocation,
    },
}

impl Error {
    /// The source position this fault points at, if it has one.
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Error::UnexpectedToken { found, .. } => Some(found.location),
            Error::MalformedTokenStream { location } => Some(*location),
            Error::InvalidLiteral { location, .. } => Some(*location),
            Error::Lexical { location, .. } => Some(*location),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedToken { found, expected } => {
                write!(f, "unexpected {}", found.kind)?;
                if !found.spelling.is_empty() && found.kind == TokenKind::Ident {
                    write!(f, " '{}'", found.spelling)?;
                }
                write!(f, " at {}, expected ", found.location)?;
                for (i, kind) in expected.iter().enumerate() {
                    if i > 0 {
                        f.write_str(if i + 1 == expected.len() { " or " } else { ", " })?;
                    }
                    write!(f, "{}", kind)?;
                }
                Ok(())
            }
            Error::MalformedTokenStream { location } => {
                write!(f, "malformed token stream at {}", location)
            }
            Error::InvalidLiteral { spelling, location } => {
                write!(f, "invalid numeric literal '{}' at {}", spelling, location)
            }
            Error::Lexical { message, location } => {
                write!(f, "{} at {}", message, location)
            }
        }
    }
}

impl std::error::Error for Error {}

/// A specialized `Result` type for Marl front-end operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to create a lexical error result with a location.
///
/// # Examples
///
/// ```rust
/// use marl_syntax::error::{lexical_error, Result};
///
/// fn scan_char(c: char) -> Result<()> {
///     lexical_error(1, 4, format!("Unexpected character '{}'", c))
/// }
/// ```
pub fn lexical_error<T>(line: usize, col: usize, message: impl Into<String>) -> Result<T> {
    Err(Error::Lexical {
        message: message.into(),
        location: SourceLocation { line, col },
    })
}
