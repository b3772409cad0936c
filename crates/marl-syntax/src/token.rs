//! Token definitions and lexical analysis types for the Marl language.
//!
//! This module defines all the token types that can be produced by the Marl
//! lexer. Tokens represent the smallest meaningful units of Marl source code,
//! such as keywords, identifiers, operators, and literals.
//!
//! # Token Categories
//!
//! The lexer recognizes several categories of tokens:
//!
//! - **Identifiers**: Variable, function, and record names (`foo`, `my_var`)
//! - **Literals**: Numbers, booleans, and strings (`42`, `1.5`, `true`, `"hi"`)
//! - **Keywords**: Language reserved words (`function`, `record`, `foreach`)
//! - **Operators**: Arithmetic, matrix, and comparison operators (`+`, `#`, `==`)
//! - **Punctuation**: Structural elements (`(`, `{`, `;`)
//! - **Special**: End-of-input and error markers
//!
//! Every token carries its raw source spelling alongside its kind. The
//! parser uses the spelling for literal conversion and name capture, so the
//! lexer never interprets literal values itself.
//!
//! # Examples
//!
//! ```rust
//! use marl_syntax::{SourceLocation, Token, TokenKind};
//!
//! // A keyword token
//! let keyword = Token {
//!     kind: TokenKind::Function,
//!     spelling: "function".to_string(),
//!     location: SourceLocation { line: 1, col: 1 },
//! };
//!
//! // An integer literal keeps its raw text for later conversion
//! let number = Token {
//!     kind: TokenKind::IntLit,
//!     spelling: "42".to_string(),
//!     location: SourceLocation { line: 2, col: 9 },
//! };
//! ```

use std::fmt;

/// A position in the source file, 1-based in both coordinates.
///
/// Locations are captured at the start of every token and every AST node's
/// production. They exist solely for diagnostics and never influence
/// parsing decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number in the source file (1-based)
    pub line: usize,

    /// Column number in the source file (1-based)
    pub col: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Token kinds that can be produced by the Marl lexer.
///
/// Kinds are deliberately fieldless: the textual content of a token lives in
/// [`Token::spelling`], which lets the parser compare and report kinds as
/// plain values and keeps expected-kind sets cheap to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // === Literals and names ===
    /// An identifier (variable, function, or record name)
    Ident,
    /// An integer literal, e.g. `42`
    IntLit,
    /// A floating-point literal, e.g. `3.14`
    FloatLit,
    /// A boolean literal, `true` or `false`
    BoolLit,
    /// A double-quoted string literal
    StringLit,

    // === Declaration keywords ===
    /// The `function` keyword
    Function,
    /// The `record` keyword
    Record,
    /// The `val` keyword - immutable binding
    Val,
    /// The `var` keyword - mutable binding
    Var,

    // === Statement keywords ===
    /// The `return` keyword
    Return,
    /// The `for` keyword
    For,
    /// The `foreach` keyword
    ForEach,
    /// The `if` keyword
    If,
    /// The `else` keyword
    Else,
    /// The `switch` keyword
    Switch,
    /// The `case` keyword
    Case,
    /// The `default` keyword
    Default,

    // === Type keywords ===
    /// The `int` type keyword
    Int,
    /// The `float` type keyword
    Float,
    /// The `bool` type keyword
    Bool,
    /// The `void` type keyword
    Void,
    /// The `string` type keyword
    String,
    /// The `vector` type keyword
    Vector,
    /// The `matrix` type keyword
    Matrix,

    // === Dimension suffixes ===
    /// The `.rows` suffix
    Rows,
    /// The `.cols` suffix
    Cols,
    /// The `.dim` suffix
    Dim,

    // === Punctuation ===
    /// Left parenthesis `(`
    LParen,
    /// Right parenthesis `)`
    RParen,
    /// Left square bracket `[`
    LBracket,
    /// Right square bracket `]`
    RBracket,
    /// Left brace `{`
    LBrace,
    /// Right brace `}`
    RBrace,
    /// Comma separator `,`
    Comma,
    /// Semicolon `;`
    Semicolon,
    /// Colon `:` - case labels, foreach, ternary, subranges
    Colon,
    /// Question mark `?` - ternary selection
    QMark,
    /// At sign `@` - record field access and record initializers
    At,

    // === Operators ===
    /// Assignment operator `=`
    Assign,
    /// Addition operator `+`
    Plus,
    /// Subtraction / unary minus operator `-`
    Minus,
    /// Multiplication operator `*`
    Star,
    /// Division operator `/`
    Slash,
    /// Exponentiation operator `^`
    Caret,
    /// Matrix multiplication operator `#`
    MatMul,
    /// Dot product operator `·`
    DotProd,
    /// Transpose operator `'`
    Transpose,
    /// Left angle bracket `<` - comparison and type arguments
    LAngle,
    /// Right angle bracket `>` - comparison and type arguments
    RAngle,
    /// Less-than-or-equal comparison operator `<=`
    LessEq,
    /// Greater-than-or-equal comparison operator `>=`
    GreaterEq,
    /// Equality comparison operator `==`
    EqEq,
    /// Inequality comparison operator `!=`
    NotEq,
    /// Logical AND operator `&&`
    AndAnd,
    /// Logical OR operator `||`
    OrOr,
    /// Logical NOT operator `!`
    Bang,

    // === Special ===
    /// A token the scanner could not form; surfaced by the parser as a
    /// malformed token stream
    Error,
    /// End-of-input marker - terminates every token sequence
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Ident => "identifier",
            TokenKind::IntLit => "integer literal",
            TokenKind::FloatLit => "float literal",
            TokenKind::BoolLit => "boolean literal",
            TokenKind::StringLit => "string literal",
            TokenKind::Function => "'function'",
            TokenKind::Record => "'record'",
            TokenKind::Val => "'val'",
            TokenKind::Var => "'var'",
            TokenKind::Return => "'return'",
            TokenKind::For => "'for'",
            TokenKind::ForEach => "'foreach'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::Switch => "'switch'",
            TokenKind::Case => "'case'",
            TokenKind::Default => "'default'",
            TokenKind::Int => "'int'",
            TokenKind::Float => "'float'",
            TokenKind::Bool => "'bool'",
            TokenKind::Void => "'void'",
            TokenKind::String => "'string'",
            TokenKind::Vector => "'vector'",
            TokenKind::Matrix => "'matrix'",
            TokenKind::Rows => "'.rows'",
            TokenKind::Cols => "'.cols'",
            TokenKind::Dim => "'.dim'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::QMark => "'?'",
            TokenKind::At => "'@'",
            TokenKind::Assign => "'='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Caret => "'^'",
            TokenKind::MatMul => "'#'",
            TokenKind::DotProd => "'·'",
            TokenKind::Transpose => "'''",
            TokenKind::LAngle => "'<'",
            TokenKind::RAngle => "'>'",
            TokenKind::LessEq => "'<='",
            TokenKind::GreaterEq => "'>='",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::Bang => "'!'",
            TokenKind::Error => "malformed token",
            TokenKind::Eof => "end of input",
        };
        f.write_str(s)
    }
}

/// A token with its raw spelling and source location.
///
/// The parser consumes a sequence of these, terminated by an [`Eof`]
/// token. Position information enables precise error locations in
/// diagnostics:
///
/// ```text
/// Parse error: unexpected '}' at 3:15, expected 'val' or 'var'
/// ```
///
/// [`Eof`]: TokenKind::Eof
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The syntactic category of this token
    pub kind: TokenKind,

    /// The raw source text of this token
    pub spelling: String,

    /// Position of the token's first character
    pub location: SourceLocation,
}

impl Token {
    /// Convenience constructor, mainly useful when building token streams
    /// by hand in tests.
    pub fn new(kind: TokenKind, spelling: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            spelling: spelling.into(),
            location: SourceLocation { line, col },
        }
    }
}
