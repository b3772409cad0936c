//! AST (abstract syntax tree) types for the Marl language.
//!
//! Every node pairs its payload with the [`SourceLocation`] captured at the
//! start of its production. Locations feed diagnostics only; no later phase
//! may base semantics on them.

use crate::token::SourceLocation;

/// Element type of vector and matrix types; restricted to numeric scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Int,
    Float,
}

/// A type expression as written in source.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpecifier {
    pub location: SourceLocation,
    pub kind: TypeKind,
}

/// The shape of a type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Int,
    Float,
    Bool,
    Void,
    String,
    /// Reference to a user-declared record type by name.
    Record(String),
    /// `vector<elem>[size]`
    Vector {
        element: ElementType,
        size: Box<Expression>,
    },
    /// `matrix<elem>[rows][cols]`
    Matrix {
        element: ElementType,
        rows: Box<Expression>,
        cols: Box<Expression>,
    },
}

/// Comparison operators; a single node kind covers all six.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub location: SourceLocation,
    pub kind: ExprKind,
}

/// Expression shapes. Binary kinds always hold exactly two operands;
/// associativity is baked into the tree, never carried as a flag.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // literals
    IntLiteral(i64),
    FloatLiteral(f64),
    BoolLiteral(bool),
    StringLiteral(String),
    /// A bare name referring to a value or parameter.
    Identifier(String),
    // arithmetic
    Addition(Box<Expression>, Box<Expression>),
    Subtraction(Box<Expression>, Box<Expression>),
    Multiplication(Box<Expression>, Box<Expression>),
    Division(Box<Expression>, Box<Expression>),
    Exponentiation(Box<Expression>, Box<Expression>),
    UnaryMinus(Box<Expression>),
    // logical
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
    Compare(Comparison, Box<Expression>, Box<Expression>),
    /// Ternary selection `cond ? true_case : false_case`.
    Select {
        condition: Box<Expression>,
        true_case: Box<Expression>,
        false_case: Box<Expression>,
    },
    Call {
        name: String,
        args: Vec<Expression>,
    },
    // matrix and vector operators
    DotProduct(Box<Expression>, Box<Expression>),
    MatrixMultiplication(Box<Expression>, Box<Expression>),
    MatrixTranspose(Box<Expression>),
    MatrixRows(Box<Expression>),
    MatrixCols(Box<Expression>),
    VectorDimension(Box<Expression>),
    /// `target[index]`
    ElementSelect {
        target: Box<Expression>,
        index: Box<Expression>,
    },
    /// `target@field`
    RecordElementSelect {
        target: Box<Expression>,
        element: String,
    },
    /// `target{start:step:end}`
    SubVector {
        target: Box<Expression>,
        start: Box<Expression>,
        step: Box<Expression>,
        end: Box<Expression>,
    },
    /// `target{rs:rt:re}{cs:ct:ce}`
    SubMatrix {
        target: Box<Expression>,
        row_start: Box<Expression>,
        row_step: Box<Expression>,
        row_end: Box<Expression>,
        col_start: Box<Expression>,
        col_step: Box<Expression>,
        col_end: Box<Expression>,
    },
    /// Anonymous vector/matrix initializer `[e, ...]`.
    StructureInit(Vec<Expression>),
    /// Record initializer `@Name[e, ...]`.
    RecordInit {
        name: String,
        elements: Vec<Expression>,
    },
}

/// Assignment target. Deliberately a small closed shape rather than the
/// recursive postfix chain used by expressions: the grammar allows at most
/// one index pair or one field selector on the left of `=`.
#[derive(Debug, Clone, PartialEq)]
pub struct LeftHandSide {
    pub location: SourceLocation,
    pub kind: LhsKind,
}

/// The three permitted assignment-target shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum LhsKind {
    /// `name = ...`
    Plain(String),
    /// `name[row] = ...` or `name[row][col] = ...`
    Indexed {
        name: String,
        row: Box<Expression>,
        col: Option<Box<Expression>>,
    },
    /// `name@field = ...`
    FieldSelect { name: String, element: String },
}

/// Loop variable of a foreach loop.
#[derive(Debug, Clone, PartialEq)]
pub struct IteratorDeclaration {
    pub location: SourceLocation,
    pub name: String,
    pub type_specifier: TypeSpecifier,
    pub is_mutable: bool,
}

/// One `case` branch of a switch statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub location: SourceLocation,
    pub condition: Expression,
    pub body: Statement,
}

/// One `default` branch of a switch statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Default {
    pub location: SourceLocation,
    pub body: Statement,
}

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub location: SourceLocation,
    pub kind: StmtKind,
}

/// Statement shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `val type name = expr;` - immutable, must be initialized.
    ValueDefinition {
        type_specifier: TypeSpecifier,
        name: String,
        value: Expression,
    },
    /// `var type name;` - mutable, uninitialized.
    VariableDeclaration {
        type_specifier: TypeSpecifier,
        name: String,
    },
    VariableAssignment {
        target: LeftHandSide,
        value: Expression,
    },
    /// A bare call in statement position; the expression is always a
    /// [`ExprKind::Call`].
    Call(Expression),
    Return(Expression),
    /// C-style `for (id = init; condition; id = update) body`.
    ForLoop {
        init_name: String,
        init_value: Box<Expression>,
        condition: Box<Expression>,
        update_name: String,
        update_value: Box<Expression>,
        body: Box<Statement>,
    },
    ForEachLoop {
        iterator: IteratorDeclaration,
        source: Box<Expression>,
        body: Box<Statement>,
    },
    If {
        condition: Box<Expression>,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    /// Branch counts and default uniqueness are checked by a later phase,
    /// not the grammar.
    Switch {
        subject: Box<Expression>,
        cases: Vec<Case>,
        defaults: Vec<Default>,
    },
    Compound(Vec<Statement>),
}

/// Function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct FormalParameter {
    pub location: SourceLocation,
    pub name: String,
    pub type_specifier: TypeSpecifier,
}

/// Top-level function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub location: SourceLocation,
    pub name: String,
    pub return_type: TypeSpecifier,
    pub parameters: Vec<FormalParameter>,
    pub body: Vec<Statement>,
}

/// One field of a record type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordElementDeclaration {
    pub location: SourceLocation,
    pub is_mutable: bool,
    pub type_specifier: TypeSpecifier,
    pub name: String,
}

/// A user-declared record type. The grammar guarantees at least one element.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTypeDeclaration {
    pub location: SourceLocation,
    pub name: String,
    pub elements: Vec<RecordElementDeclaration>,
}

/// Root of the AST: everything one parse produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub location: SourceLocation,
    pub functions: Vec<Function>,
    pub records: Vec<RecordTypeDeclaration>,
}
