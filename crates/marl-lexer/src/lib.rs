//! Marl lexer: converts source text into tokens.
//!
//! Every token keeps its raw spelling; the lexer never converts numeric
//! literals to values. That is the parser's job, so overflow and format
//! faults are reported where the literal is actually consumed.

use marl_syntax::error::{lexical_error, Result};
use marl_syntax::token::{SourceLocation, Token, TokenKind};

/// Streaming character scanner that produces tokens with positions.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn token_at(&self, kind: TokenKind, spelling: impl Into<String>, line: usize, col: usize) -> Token {
        Token {
            kind,
            spelling: spelling.into(),
            location: SourceLocation { line, col },
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    while let Some(c) = self.peek() {
                        self.advance();
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek_next() == Some('*') => {
                    let line = self.line;
                    let col = self.col;
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            Some('*') if self.peek_next() == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => {
                                self.advance();
                            }
                            None => return lexical_error(line, col, "Unterminated block comment"),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_number(&mut self) -> Token {
        let start_line = self.line;
        let start_col = self.col;
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        // a dot starts a fraction only when a digit follows; otherwise it
        // belongs to a '.rows'/'.cols'/'.dim' suffix
        let mut kind = TokenKind::IntLit;
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            kind = TokenKind::FloatLit;
            s.push('.');
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    s.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.token_at(kind, s, start_line, start_col)
    }

    fn read_ident_or_keyword(&mut self) -> Token {
        let start_line = self.line;
        let start_col = self.col;
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = match s.as_str() {
            "function" => TokenKind::Function,
            "record" => TokenKind::Record,
            "val" => TokenKind::Val,
            "var" => TokenKind::Var,
            "return" => TokenKind::Return,
            "for" => TokenKind::For,
            "foreach" => TokenKind::ForEach,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "default" => TokenKind::Default,
            "int" => TokenKind::Int,
            "float" => TokenKind::Float,
            "bool" => TokenKind::Bool,
            "void" => TokenKind::Void,
            "string" => TokenKind::String,
            "vector" => TokenKind::Vector,
            "matrix" => TokenKind::Matrix,
            "true" | "false" => TokenKind::BoolLit,
            _ => TokenKind::Ident,
        };
        self.token_at(kind, s, start_line, start_col)
    }

    fn read_string(&mut self) -> Result<Token> {
        let start_line = self.line;
        let start_col = self.col;
        let mut s = String::new();
        while let Some(c) = self.advance() {
            match c {
                '"' => {
                    return Ok(self.token_at(TokenKind::StringLit, s, start_line, start_col));
                }
                '\\' => {
                    if let Some(n) = self.advance() {
                        let esc = match n {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            '\\' => '\\',
                            '"' => '"',
                            other => other,
                        };
                        s.push(esc);
                    } else {
                        return lexical_error(start_line, start_col, "Unterminated string");
                    }
                }
                other => s.push(other),
            }
        }
        lexical_error(start_line, start_col, "Unterminated string")
    }

    fn read_dim_suffix(&mut self) -> Result<Token> {
        let start_line = self.line;
        let start_col = self.col;
        self.advance(); // the dot
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphabetic() {
                word.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = match word.as_str() {
            "rows" => TokenKind::Rows,
            "cols" => TokenKind::Cols,
            "dim" => TokenKind::Dim,
            _ => {
                return lexical_error(
                    start_line,
                    start_col,
                    format!("Unknown suffix '.{}' (expected '.rows', '.cols' or '.dim')", word),
                );
            }
        };
        Ok(self.token_at(kind, format!(".{}", word), start_line, start_col))
    }

    /// Tokenize the entire input into a vector of tokens ending with Eof.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments()?;
            let line = self.line;
            let col = self.col;
            let tk = match self.peek() {
                None => {
                    tokens.push(self.token_at(TokenKind::Eof, "", line, col));
                    break;
                }
                Some('(') => {
                    self.advance();
                    self.token_at(TokenKind::LParen, "(", line, col)
                }
                Some(')') => {
                    self.advance();
                    self.token_at(TokenKind::RParen, ")", line, col)
                }
                Some('[') => {
                    self.advance();
                    self.token_at(TokenKind::LBracket, "[", line, col)
                }
                Some(']') => {
                    self.advance();
                    self.token_at(TokenKind::RBracket, "]", line, col)
                }
                Some('{') => {
                    self.advance();
                    self.token_at(TokenKind::LBrace, "{", line, col)
                }
                Some('}') => {
                    self.advance();
                    self.token_at(TokenKind::RBrace, "}", line, col)
                }
                Some(',') => {
                    self.advance();
                    self.token_at(TokenKind::Comma, ",", line, col)
                }
                Some(';') => {
                    self.advance();
                    self.token_at(TokenKind::Semicolon, ";", line, col)
                }
                Some(':') => {
                    self.advance();
                    self.token_at(TokenKind::Colon, ":", line, col)
                }
                Some('?') => {
                    self.advance();
                    self.token_at(TokenKind::QMark, "?", line, col)
                }
                Some('@') => {
                    self.advance();
                    self.token_at(TokenKind::At, "@", line, col)
                }
                Some('+') => {
                    self.advance();
                    self.token_at(TokenKind::Plus, "+", line, col)
                }
                Some('-') => {
                    self.advance();
                    self.token_at(TokenKind::Minus, "-", line, col)
                }
                Some('*') => {
                    self.advance();
                    self.token_at(TokenKind::Star, "*", line, col)
                }
                Some('/') => {
                    self.advance();
                    self.token_at(TokenKind::Slash, "/", line, col)
                }
                Some('^') => {
                    self.advance();
                    self.token_at(TokenKind::Caret, "^", line, col)
                }
                Some('#') => {
                    self.advance();
                    self.token_at(TokenKind::MatMul, "#", line, col)
                }
                Some('·') => {
                    self.advance();
                    self.token_at(TokenKind::DotProd, "·", line, col)
                }
                Some('\'') => {
                    self.advance();
                    self.token_at(TokenKind::Transpose, "'", line, col)
                }
                Some('=') => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        self.token_at(TokenKind::EqEq, "==", line, col)
                    } else {
                        self.token_at(TokenKind::Assign, "=", line, col)
                    }
                }
                Some('!') => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        self.token_at(TokenKind::NotEq, "!=", line, col)
                    } else {
                        self.token_at(TokenKind::Bang, "!", line, col)
                    }
                }
                Some('<') => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        self.token_at(TokenKind::LessEq, "<=", line, col)
                    } else {
                        self.token_at(TokenKind::LAngle, "<", line, col)
                    }
                }
                Some('>') => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        self.token_at(TokenKind::GreaterEq, ">=", line, col)
                    } else {
                        self.token_at(TokenKind::RAngle, ">", line, col)
                    }
                }
                Some('&') => {
                    if self.peek_next() == Some('&') {
                        self.advance();
                        self.advance();
                        self.token_at(TokenKind::AndAnd, "&&", line, col)
                    } else {
                        return lexical_error(line, col, "Unexpected '&' (did you mean '&&'?)");
                    }
                }
                Some('|') => {
                    if self.peek_next() == Some('|') {
                        self.advance();
                        self.advance();
                        self.token_at(TokenKind::OrOr, "||", line, col)
                    } else {
                        return lexical_error(line, col, "Unexpected '|' (did you mean '||'?)");
                    }
                }
                Some('.') => self.read_dim_suffix()?,
                Some('"') => {
                    self.advance();
                    self.read_string()?
                }
                Some(c) if c.is_ascii_digit() => self.read_number(),
                Some(c) if c.is_ascii_alphabetic() || c == '_' => self.read_ident_or_keyword(),
                Some(other) => {
                    return lexical_error(line, col, format!("Unexpected character '{}'", other));
                }
            };
            tokens.push(tk);
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .expect("lexing should succeed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("function record foo foreach forx"),
            vec![
                TokenKind::Function,
                TokenKind::Record,
                TokenKind::Ident,
                TokenKind::ForEach,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numeric_literals_keep_spelling() {
        let tokens = Lexer::new("42 3.14").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::IntLit);
        assert_eq!(tokens[0].spelling, "42");
        assert_eq!(tokens[1].kind, TokenKind::FloatLit);
        assert_eq!(tokens[1].spelling, "3.14");
    }

    #[test]
    fn dim_suffix_vs_float_fraction() {
        assert_eq!(
            kinds("m.rows v.dim 2.5"),
            vec![
                TokenKind::Ident,
                TokenKind::Rows,
                TokenKind::Ident,
                TokenKind::Dim,
                TokenKind::FloatLit,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn matrix_operators() {
        assert_eq!(
            kinds("a # b · c'"),
            vec![
                TokenKind::Ident,
                TokenKind::MatMul,
                TokenKind::Ident,
                TokenKind::DotProd,
                TokenKind::Ident,
                TokenKind::Transpose,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn two_char_operators() {
        assert_eq!(
            kinds("<= >= == != && || < > = !"),
            vec![
                TokenKind::LessEq,
                TokenKind::GreaterEq,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::LAngle,
                TokenKind::RAngle,
                TokenKind::Assign,
                TokenKind::Bang,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("a // rest of line\n/* block\nstill block */ b"),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn string_escapes() {
        let tokens = Lexer::new("\"a\\nb\"").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringLit);
        assert_eq!(tokens[0].spelling, "a\nb");
    }

    #[test]
    fn locations_are_one_based() {
        let tokens = Lexer::new("val\n  x").tokenize().unwrap();
        assert_eq!(tokens[0].location, SourceLocation { line: 1, col: 1 });
        assert_eq!(tokens[1].location, SourceLocation { line: 2, col: 3 });
    }

    #[test]
    fn bad_character_is_rejected() {
        assert!(Lexer::new("a $ b").tokenize().is_err());
        assert!(Lexer::new("\"open").tokenize().is_err());
        assert!(Lexer::new("/* open").tokenize().is_err());
        assert!(Lexer::new("x.size").tokenize().is_err());
    }
}
