//! Recursive-descent parser for Marl.
//!
//! One parsing function per grammar production, layered in one dependency
//! direction: module and declaration productions call statement productions,
//! statements call expressions, expressions descend through the operator
//! precedence cascade down to atoms. All layers share a single token cursor
//! with exactly one buffered lookahead token and no backtracking: the
//! grammar is arranged so one token of lookahead always determines the next
//! production.
//!
//! The parser performs no semantic validation. Type compatibility, scoping,
//! and arity checks belong to later phases; this layer does purely syntactic
//! recognition and tree construction. The first fault aborts the whole
//! parse, so callers receive either a complete [`Module`] or one [`Error`].

use marl_syntax::ast::*;
use marl_syntax::error::{Error, Result};
use marl_syntax::token::{SourceLocation, Token, TokenKind};

/// The kinds that can begin an atom, for fallthrough diagnostics.
const ATOM_STARTERS: [TokenKind; 8] = [
    TokenKind::IntLit,
    TokenKind::FloatLit,
    TokenKind::BoolLit,
    TokenKind::StringLit,
    TokenKind::Ident,
    TokenKind::LParen,
    TokenKind::LBracket,
    TokenKind::At,
];

/// The kinds that can begin a statement, for fallthrough diagnostics.
const STATEMENT_STARTERS: [TokenKind; 9] = [
    TokenKind::Val,
    TokenKind::Var,
    TokenKind::Return,
    TokenKind::Ident,
    TokenKind::For,
    TokenKind::ForEach,
    TokenKind::If,
    TokenKind::Switch,
    TokenKind::LBrace,
];

/// Recursive-descent parser over a token sequence produced by the lexer.
///
/// Holds the not-yet-consumed remainder of the stream plus the single
/// lookahead token every production inspects. One parser instance performs
/// one parse; cursors are never shared.
pub struct Parser {
    tokens: std::vec::IntoIter<Token>,
    current: Token,
}

impl Parser {
    /// Create a parser over a token sequence. The sequence is expected to
    /// end with an [`Eof`](TokenKind::Eof) token.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens.into_iter();
        let current = tokens
            .next()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, "", 0, 0));
        Self { tokens, current }
    }

    /// Parses the grammar's start symbol, Module.
    ///
    /// Returns the root of the AST representing the tokenized input
    /// program, or the first fault encountered. No partial trees are
    /// produced on failure.
    pub fn parse(&mut self) -> Result<Module> {
        let location = self.current.location;

        let mut functions = Vec::new();
        let mut records = Vec::new();
        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Function => functions.push(self.parse_function()?),
                TokenKind::Record => records.push(self.parse_record_type_declaration()?),
                _ => return Err(self.unexpected(&[TokenKind::Function, TokenKind::Record])),
            }
        }
        Ok(Module {
            location,
            functions,
            records,
        })
    }

    // === Token cursor ===

    /// Discards the lookahead and pulls the next token. An exhausted source
    /// or a scanner-reported error token is a malformed stream, never
    /// silently recovered.
    fn advance(&mut self) -> Result<()> {
        match self.tokens.next() {
            Some(t) if t.kind == TokenKind::Error => {
                Err(Error::MalformedTokenStream { location: t.location })
            }
            Some(t) => {
                self.current = t;
                Ok(())
            }
            None => Err(Error::MalformedTokenStream {
                location: self.current.location,
            }),
        }
    }

    /// Consumes the lookahead if it has the given kind and returns its
    /// spelling; fails otherwise. The expected set in the fault is the
    /// single kind passed here.
    fn expect(&mut self, kind: TokenKind) -> Result<String> {
        if self.current.kind != kind {
            return Err(self.unexpected(&[kind]));
        }
        let spelling = std::mem::take(&mut self.current.spelling);
        self.advance()?;
        Ok(spelling)
    }

    fn unexpected(&self, expected: &[TokenKind]) -> Error {
        Error::UnexpectedToken {
            found: self.current.clone(),
            expected: expected.to_vec(),
        }
    }

    // === Declarations ===

    fn parse_function(&mut self) -> Result<Function> {
        let location = self.current.location;

        self.expect(TokenKind::Function)?;
        let return_type = self.parse_type_specifier()?;
        let name = self.expect(TokenKind::Ident)?;

        let mut parameters = Vec::new();
        self.expect(TokenKind::LParen)?;
        if self.current.kind != TokenKind::RParen {
            parameters.push(self.parse_formal_parameter()?);
            while self.current.kind != TokenKind::RParen {
                self.expect(TokenKind::Comma)?;
                parameters.push(self.parse_formal_parameter()?);
            }
        }
        self.expect(TokenKind::RParen)?;

        let mut body = Vec::new();
        self.expect(TokenKind::LBrace)?;
        while self.current.kind != TokenKind::RBrace {
            body.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;

        Ok(Function {
            location,
            name,
            return_type,
            parameters,
            body,
        })
    }

    fn parse_formal_parameter(&mut self) -> Result<FormalParameter> {
        let location = self.current.location;

        let type_specifier = self.parse_type_specifier()?;
        let name = self.expect(TokenKind::Ident)?;

        Ok(FormalParameter {
            location,
            name,
            type_specifier,
        })
    }

    fn parse_record_type_declaration(&mut self) -> Result<RecordTypeDeclaration> {
        let location = self.current.location;

        self.expect(TokenKind::Record)?;
        let name = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::LBrace)?;
        let mut elements = Vec::new();
        // empty records are a syntax error, so the first element is parsed
        // unconditionally
        elements.push(self.parse_record_element_declaration()?);
        while self.current.kind != TokenKind::RBrace {
            elements.push(self.parse_record_element_declaration()?);
        }
        self.expect(TokenKind::RBrace)?;

        Ok(RecordTypeDeclaration {
            location,
            name,
            elements,
        })
    }

    fn parse_record_element_declaration(&mut self) -> Result<RecordElementDeclaration> {
        let location = self.current.location;

        let is_mutable = match self.current.kind {
            TokenKind::Val => {
                self.advance()?;
                false
            }
            TokenKind::Var => {
                self.advance()?;
                true
            }
            _ => return Err(self.unexpected(&[TokenKind::Val, TokenKind::Var])),
        };

        let type_specifier = self.parse_type_specifier()?;
        let name = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Semicolon)?;

        Ok(RecordElementDeclaration {
            location,
            is_mutable,
            type_specifier,
            name,
        })
    }

    fn parse_iterator_declaration(&mut self) -> Result<IteratorDeclaration> {
        let location = self.current.location;

        let is_mutable = match self.current.kind {
            TokenKind::Val => {
                self.advance()?;
                false
            }
            TokenKind::Var => {
                self.advance()?;
                true
            }
            _ => return Err(self.unexpected(&[TokenKind::Val, TokenKind::Var])),
        };
        let type_specifier = self.parse_type_specifier()?;
        let name = self.expect(TokenKind::Ident)?;

        Ok(IteratorDeclaration {
            location,
            name,
            type_specifier,
            is_mutable,
        })
    }

    fn parse_type_specifier(&mut self) -> Result<TypeSpecifier> {
        let location = self.current.location;

        let scalar = |kind| TypeSpecifier { location, kind };
        let vector = match self.current.kind {
            TokenKind::Int => {
                self.advance()?;
                return Ok(scalar(TypeKind::Int));
            }
            TokenKind::Float => {
                self.advance()?;
                return Ok(scalar(TypeKind::Float));
            }
            TokenKind::Bool => {
                self.advance()?;
                return Ok(scalar(TypeKind::Bool));
            }
            TokenKind::Void => {
                self.advance()?;
                return Ok(scalar(TypeKind::Void));
            }
            TokenKind::String => {
                self.advance()?;
                return Ok(scalar(TypeKind::String));
            }
            TokenKind::Ident => {
                let name = self.expect(TokenKind::Ident)?;
                return Ok(TypeSpecifier {
                    location,
                    kind: TypeKind::Record(name),
                });
            }
            TokenKind::Vector => {
                self.advance()?;
                true
            }
            TokenKind::Matrix => {
                self.advance()?;
                false
            }
            _ => {
                return Err(self.unexpected(&[
                    TokenKind::Int,
                    TokenKind::Float,
                    TokenKind::Bool,
                    TokenKind::Void,
                    TokenKind::String,
                    TokenKind::Vector,
                    TokenKind::Matrix,
                    TokenKind::Ident,
                ]));
            }
        };

        self.expect(TokenKind::LAngle)?;
        let element = match self.current.kind {
            TokenKind::Int => ElementType::Int,
            TokenKind::Float => ElementType::Float,
            _ => return Err(self.unexpected(&[TokenKind::Int, TokenKind::Float])),
        };
        self.advance()?;
        self.expect(TokenKind::RAngle)?;
        self.expect(TokenKind::LBracket)?;
        let size = self.parse_expr()?;
        self.expect(TokenKind::RBracket)?;

        if vector {
            return Ok(TypeSpecifier {
                location,
                kind: TypeKind::Vector {
                    element,
                    size: Box::new(size),
                },
            });
        }

        self.expect(TokenKind::LBracket)?;
        let cols = self.parse_expr()?;
        self.expect(TokenKind::RBracket)?;

        Ok(TypeSpecifier {
            location,
            kind: TypeKind::Matrix {
                element,
                rows: Box::new(size),
                cols: Box::new(cols),
            },
        })
    }

    // === Statements ===

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.current.kind {
            TokenKind::Val => self.parse_value_def(),
            TokenKind::Var => self.parse_var_decl(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Ident => self.parse_assign_or_call(),
            TokenKind::For => self.parse_for(),
            TokenKind::ForEach => self.parse_foreach(),
            TokenKind::If => self.parse_if(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::LBrace => self.parse_compound(),
            _ => Err(self.unexpected(&STATEMENT_STARTERS)),
        }
    }

    fn parse_value_def(&mut self) -> Result<Statement> {
        let location = self.current.location;

        self.expect(TokenKind::Val)?;
        let type_specifier = self.parse_type_specifier()?;
        let name = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Statement {
            location,
            kind: StmtKind::ValueDefinition {
                type_specifier,
                name,
                value,
            },
        })
    }

    fn parse_var_decl(&mut self) -> Result<Statement> {
        let location = self.current.location;

        self.expect(TokenKind::Var)?;
        let type_specifier = self.parse_type_specifier()?;
        let name = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Statement {
            location,
            kind: StmtKind::VariableDeclaration {
                type_specifier,
                name,
            },
        })
    }

    fn parse_return(&mut self) -> Result<Statement> {
        let location = self.current.location;

        self.expect(TokenKind::Return)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(Statement {
            location,
            kind: StmtKind::Return(value),
        })
    }

    fn parse_assign_or_call(&mut self) -> Result<Statement> {
        let location = self.current.location;

        let name = self.expect(TokenKind::Ident)?;

        let stmt = if self.current.kind == TokenKind::LParen {
            let call = self.parse_call(name, location)?;
            Statement {
                location,
                kind: StmtKind::Call(call),
            }
        } else {
            self.parse_assign(name, location)?
        };

        self.expect(TokenKind::Semicolon)?;

        Ok(stmt)
    }

    /// Parses an assignment after its leading identifier. The target allows
    /// at most one index pair or one field selector, never both and never
    /// chained; this is a narrower shape than expression postfix chains.
    fn parse_assign(&mut self, name: String, location: SourceLocation) -> Result<Statement> {
        let kind = match self.current.kind {
            TokenKind::LBracket => {
                self.advance()?;
                let row = self.parse_expr()?;
                self.expect(TokenKind::RBracket)?;
                let col = if self.current.kind == TokenKind::LBracket {
                    self.advance()?;
                    let col = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    Some(Box::new(col))
                } else {
                    None
                };
                LhsKind::Indexed {
                    name,
                    row: Box::new(row),
                    col,
                }
            }
            TokenKind::At => {
                self.advance()?;
                let element = self.expect(TokenKind::Ident)?;
                LhsKind::FieldSelect { name, element }
            }
            _ => LhsKind::Plain(name),
        };
        let target = LeftHandSide { location, kind };

        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;

        Ok(Statement {
            location,
            kind: StmtKind::VariableAssignment { target, value },
        })
    }

    fn parse_call(&mut self, name: String, location: SourceLocation) -> Result<Expression> {
        self.expect(TokenKind::LParen)?;

        let mut args = Vec::new();
        if self.current.kind != TokenKind::RParen {
            args.push(self.parse_expr()?);
            while self.current.kind != TokenKind::RParen {
                self.expect(TokenKind::Comma)?;
                args.push(self.parse_expr()?);
            }
        }
        self.expect(TokenKind::RParen)?;

        Ok(Expression {
            location,
            kind: ExprKind::Call { name, args },
        })
    }

    fn parse_for(&mut self) -> Result<Statement> {
        let location = self.current.location;

        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;
        let init_name = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Assign)?;
        let init_value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        let update_name = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Assign)?;
        let update_value = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_statement()?;

        Ok(Statement {
            location,
            kind: StmtKind::ForLoop {
                init_name,
                init_value: Box::new(init_value),
                condition: Box::new(condition),
                update_name,
                update_value: Box::new(update_value),
                body: Box::new(body),
            },
        })
    }

    fn parse_foreach(&mut self) -> Result<Statement> {
        let location = self.current.location;

        self.expect(TokenKind::ForEach)?;
        self.expect(TokenKind::LParen)?;
        let iterator = self.parse_iterator_declaration()?;
        self.expect(TokenKind::Colon)?;
        let source = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_statement()?;

        Ok(Statement {
            location,
            kind: StmtKind::ForEachLoop {
                iterator,
                source: Box::new(source),
                body: Box::new(body),
            },
        })
    }

    /// A dangling `else` binds to the nearest unmatched `if`: the branch is
    /// consumed right after the then-statement, so the innermost call sees
    /// it first.
    fn parse_if(&mut self) -> Result<Statement> {
        let location = self.current.location;

        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let then_branch = self.parse_statement()?;
        let else_branch = if self.current.kind == TokenKind::Else {
            self.advance()?;
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Statement {
            location,
            kind: StmtKind::If {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch,
            },
        })
    }

    /// The grammar places no bound on the number or order of case and
    /// default branches; a later phase validates counts and uniqueness.
    fn parse_switch(&mut self) -> Result<Statement> {
        let location = self.current.location;

        self.expect(TokenKind::Switch)?;
        self.expect(TokenKind::LParen)?;
        let subject = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;

        let mut cases = Vec::new();
        let mut defaults = Vec::new();
        self.expect(TokenKind::LBrace)?;
        while self.current.kind != TokenKind::RBrace {
            match self.current.kind {
                TokenKind::Case => cases.push(self.parse_case()?),
                TokenKind::Default => defaults.push(self.parse_default()?),
                _ => {
                    return Err(self.unexpected(&[
                        TokenKind::Case,
                        TokenKind::Default,
                        TokenKind::RBrace,
                    ]));
                }
            }
        }
        self.expect(TokenKind::RBrace)?;

        Ok(Statement {
            location,
            kind: StmtKind::Switch {
                subject: Box::new(subject),
                cases,
                defaults,
            },
        })
    }

    fn parse_case(&mut self) -> Result<Case> {
        let location = self.current.location;

        self.expect(TokenKind::Case)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Colon)?;
        let body = self.parse_statement()?;

        Ok(Case {
            location,
            condition,
            body,
        })
    }

    fn parse_default(&mut self) -> Result<Default> {
        let location = self.current.location;

        self.expect(TokenKind::Default)?;
        self.expect(TokenKind::Colon)?;
        let body = self.parse_statement()?;

        Ok(Default { location, body })
    }

    fn parse_compound(&mut self) -> Result<Statement> {
        let location = self.current.location;

        self.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while self.current.kind != TokenKind::RBrace {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;

        Ok(Statement {
            location,
            kind: StmtKind::Compound(statements),
        })
    }

    // === Expressions, loosest binding first ===

    /// Parses a full expression, entering the cascade at its loosest level.
    pub fn parse_expr(&mut self) -> Result<Expression> {
        self.parse_select()
    }

    /// Ternary branches descend into the or-level, not back into select, so
    /// ternaries do not nest without parentheses.
    fn parse_select(&mut self) -> Result<Expression> {
        let location = self.current.location;

        let condition = self.parse_or()?;
        if self.current.kind == TokenKind::QMark {
            self.advance()?;
            let true_case = self.parse_or()?;
            self.expect(TokenKind::Colon)?;
            let false_case = self.parse_or()?;
            return Ok(Expression {
                location,
                kind: ExprKind::Select {
                    condition: Box::new(condition),
                    true_case: Box::new(true_case),
                    false_case: Box::new(false_case),
                },
            });
        }

        Ok(condition)
    }

    fn parse_or(&mut self) -> Result<Expression> {
        let location = self.current.location;

        let mut x = self.parse_and()?;
        while self.current.kind == TokenKind::OrOr {
            self.advance()?;
            let rhs = self.parse_and()?;
            x = Expression {
                location,
                kind: ExprKind::Or(Box::new(x), Box::new(rhs)),
            };
        }
        Ok(x)
    }

    fn parse_and(&mut self) -> Result<Expression> {
        let location = self.current.location;

        let mut x = self.parse_not()?;
        while self.current.kind == TokenKind::AndAnd {
            self.advance()?;
            let rhs = self.parse_not()?;
            x = Expression {
                location,
                kind: ExprKind::And(Box::new(x), Box::new(rhs)),
            };
        }
        Ok(x)
    }

    fn parse_not(&mut self) -> Result<Expression> {
        let location = self.current.location;

        if self.current.kind == TokenKind::Bang {
            self.advance()?;
            let operand = self.parse_compare()?;
            return Ok(Expression {
                location,
                kind: ExprKind::Not(Box::new(operand)),
            });
        }
        self.parse_compare()
    }

    /// Comparisons re-descend into the addsub level, so `a < b < c` parses
    /// as `(a < b) < c`; rejecting that shape is the semantic phase's job.
    fn parse_compare(&mut self) -> Result<Expression> {
        let location = self.current.location;

        let mut x = self.parse_add_sub()?;
        loop {
            let op = match self.current.kind {
                TokenKind::LAngle => Comparison::Less,
                TokenKind::RAngle => Comparison::Greater,
                TokenKind::LessEq => Comparison::LessEqual,
                TokenKind::GreaterEq => Comparison::GreaterEqual,
                TokenKind::EqEq => Comparison::Equal,
                TokenKind::NotEq => Comparison::NotEqual,
                _ => return Ok(x),
            };
            self.advance()?;
            let rhs = self.parse_add_sub()?;
            x = Expression {
                location,
                kind: ExprKind::Compare(op, Box::new(x), Box::new(rhs)),
            };
        }
    }

    fn parse_add_sub(&mut self) -> Result<Expression> {
        let location = self.current.location;

        let mut x = self.parse_mul_div()?;
        loop {
            let add = match self.current.kind {
                TokenKind::Plus => true,
                TokenKind::Minus => false,
                _ => return Ok(x),
            };
            self.advance()?;
            let rhs = self.parse_mul_div()?;
            let kind = if add {
                ExprKind::Addition(Box::new(x), Box::new(rhs))
            } else {
                ExprKind::Subtraction(Box::new(x), Box::new(rhs))
            };
            x = Expression { location, kind };
        }
    }

    fn parse_mul_div(&mut self) -> Result<Expression> {
        let location = self.current.location;

        let mut x = self.parse_unary_minus()?;
        loop {
            let mul = match self.current.kind {
                TokenKind::Star => true,
                TokenKind::Slash => false,
                _ => return Ok(x),
            };
            self.advance()?;
            let rhs = self.parse_unary_minus()?;
            let kind = if mul {
                ExprKind::Multiplication(Box::new(x), Box::new(rhs))
            } else {
                ExprKind::Division(Box::new(x), Box::new(rhs))
            };
            x = Expression { location, kind };
        }
    }

    fn parse_unary_minus(&mut self) -> Result<Expression> {
        let location = self.current.location;

        if self.current.kind == TokenKind::Minus {
            self.advance()?;
            let operand = self.parse_exponentiation()?;
            return Ok(Expression {
                location,
                kind: ExprKind::UnaryMinus(Box::new(operand)),
            });
        }
        self.parse_exponentiation()
    }

    /// Right-associative: the right operand recurses into this level, not
    /// the one below it.
    fn parse_exponentiation(&mut self) -> Result<Expression> {
        let location = self.current.location;

        let left = self.parse_dot_prod()?;
        if self.current.kind == TokenKind::Caret {
            self.advance()?;
            let right = self.parse_exponentiation()?;
            return Ok(Expression {
                location,
                kind: ExprKind::Exponentiation(Box::new(left), Box::new(right)),
            });
        }
        Ok(left)
    }

    fn parse_dot_prod(&mut self) -> Result<Expression> {
        let location = self.current.location;

        let mut x = self.parse_matrix_mul()?;
        while self.current.kind == TokenKind::DotProd {
            self.advance()?;
            let rhs = self.parse_matrix_mul()?;
            x = Expression {
                location,
                kind: ExprKind::DotProduct(Box::new(x), Box::new(rhs)),
            };
        }
        Ok(x)
    }

    fn parse_matrix_mul(&mut self) -> Result<Expression> {
        let location = self.current.location;

        let mut x = self.parse_transpose()?;
        while self.current.kind == TokenKind::MatMul {
            self.advance()?;
            let rhs = self.parse_transpose()?;
            x = Expression {
                location,
                kind: ExprKind::MatrixMultiplication(Box::new(x), Box::new(rhs)),
            };
        }
        Ok(x)
    }

    fn parse_transpose(&mut self) -> Result<Expression> {
        let location = self.current.location;

        if self.current.kind == TokenKind::Transpose {
            self.advance()?;
            let operand = self.parse_dim()?;
            return Ok(Expression {
                location,
                kind: ExprKind::MatrixTranspose(Box::new(operand)),
            });
        }
        self.parse_dim()
    }

    fn parse_dim(&mut self) -> Result<Expression> {
        let location = self.current.location;

        let x = self.parse_sub_range()?;
        let kind = match self.current.kind {
            TokenKind::Rows => ExprKind::MatrixRows(Box::new(x)),
            TokenKind::Cols => ExprKind::MatrixCols(Box::new(x)),
            TokenKind::Dim => ExprKind::VectorDimension(Box::new(x)),
            _ => return Ok(x),
        };
        self.advance()?;
        Ok(Expression { location, kind })
    }

    /// One `{start:step:end}` group selects a sub-vector; a second group
    /// directly after it turns the selection into a sub-matrix.
    fn parse_sub_range(&mut self) -> Result<Expression> {
        let location = self.current.location;

        let x = self.parse_element_select()?;
        if self.current.kind != TokenKind::LBrace {
            return Ok(x);
        }

        self.advance()?;
        let start = self.parse_expr()?;
        self.expect(TokenKind::Colon)?;
        let step = self.parse_expr()?;
        self.expect(TokenKind::Colon)?;
        let end = self.parse_expr()?;
        self.expect(TokenKind::RBrace)?;

        if self.current.kind != TokenKind::LBrace {
            return Ok(Expression {
                location,
                kind: ExprKind::SubVector {
                    target: Box::new(x),
                    start: Box::new(start),
                    step: Box::new(step),
                    end: Box::new(end),
                },
            });
        }

        self.advance()?;
        let col_start = self.parse_expr()?;
        self.expect(TokenKind::Colon)?;
        let col_step = self.parse_expr()?;
        self.expect(TokenKind::Colon)?;
        let col_end = self.parse_expr()?;
        self.expect(TokenKind::RBrace)?;

        Ok(Expression {
            location,
            kind: ExprKind::SubMatrix {
                target: Box::new(x),
                row_start: Box::new(start),
                row_step: Box::new(step),
                row_end: Box::new(end),
                col_start: Box::new(col_start),
                col_step: Box::new(col_step),
                col_end: Box::new(col_end),
            },
        })
    }

    fn parse_element_select(&mut self) -> Result<Expression> {
        let location = self.current.location;

        let mut x = self.parse_record_element_select()?;
        while self.current.kind == TokenKind::LBracket {
            self.advance()?;
            let index = self.parse_expr()?;
            self.expect(TokenKind::RBracket)?;
            x = Expression {
                location,
                kind: ExprKind::ElementSelect {
                    target: Box::new(x),
                    index: Box::new(index),
                },
            };
        }
        Ok(x)
    }

    fn parse_record_element_select(&mut self) -> Result<Expression> {
        let location = self.current.location;

        let x = self.parse_atom()?;
        if self.current.kind == TokenKind::At {
            self.advance()?;
            let element = self.expect(TokenKind::Ident)?;
            return Ok(Expression {
                location,
                kind: ExprKind::RecordElementSelect {
                    target: Box::new(x),
                    element,
                },
            });
        }
        Ok(x)
    }

    // === Atoms and initializers ===

    fn parse_atom(&mut self) -> Result<Expression> {
        let location = self.current.location;

        let kind = match self.current.kind {
            TokenKind::IntLit => ExprKind::IntLiteral(self.parse_int_lit()?),
            TokenKind::FloatLit => ExprKind::FloatLiteral(self.parse_float_lit()?),
            TokenKind::BoolLit => ExprKind::BoolLiteral(self.parse_bool_lit()?),
            TokenKind::StringLit => ExprKind::StringLiteral(self.expect(TokenKind::StringLit)?),
            TokenKind::Ident => {
                let name = self.expect(TokenKind::Ident)?;
                if self.current.kind == TokenKind::LParen {
                    return self.parse_call(name, location);
                }
                ExprKind::Identifier(name)
            }
            TokenKind::LParen => {
                self.advance()?;
                let x = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                return Ok(x);
            }
            TokenKind::At => {
                self.advance()?;
                let name = self.expect(TokenKind::Ident)?;
                ExprKind::RecordInit {
                    name,
                    elements: self.parse_initializer_list()?,
                }
            }
            TokenKind::LBracket => ExprKind::StructureInit(self.parse_initializer_list()?),
            _ => return Err(self.unexpected(&ATOM_STARTERS)),
        };

        Ok(Expression { location, kind })
    }

    fn parse_initializer_list(&mut self) -> Result<Vec<Expression>> {
        let mut elements = Vec::new();

        self.expect(TokenKind::LBracket)?;
        elements.push(self.parse_expr()?);
        while self.current.kind == TokenKind::Comma {
            self.advance()?;
            elements.push(self.parse_expr()?);
        }
        self.expect(TokenKind::RBracket)?;

        Ok(elements)
    }

    fn parse_int_lit(&mut self) -> Result<i64> {
        let location = self.current.location;
        let spelling = self.expect(TokenKind::IntLit)?;
        spelling
            .parse()
            .map_err(|_| Error::InvalidLiteral { spelling, location })
    }

    fn parse_float_lit(&mut self) -> Result<f64> {
        let location = self.current.location;
        let spelling = self.expect(TokenKind::FloatLit)?;
        spelling
            .parse()
            .map_err(|_| Error::InvalidLiteral { spelling, location })
    }

    fn parse_bool_lit(&mut self) -> Result<bool> {
        let location = self.current.location;
        let spelling = self.expect(TokenKind::BoolLit)?;
        spelling
            .parse()
            .map_err(|_| Error::InvalidLiteral { spelling, location })
    }
}
