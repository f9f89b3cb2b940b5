// Statement and expression trees for KPL subprogram bodies

use crate::symtab::ObjectId;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.line, self.column)
    }
}

/// Additive and multiplicative operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Unary operators (leading sign of an expression)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus, // +x
    Neg,  // -x
}

/// Relational operators; a condition holds exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLiteral(i32, SourceLocation),
    CharLiteral(char, SourceLocation),
    /// An identifier, optionally called with arguments and/or indexed.
    ///
    /// `binding` is the object the name resolved to at the point of use, or
    /// `None` when no declaration was visible.
    Name {
        name: String,
        binding: Option<ObjectId>,
        args: Option<Vec<Expr>>,
        indexes: Vec<Expr>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
}

/// `expr relop expr`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub left: Expr,
    pub op: RelOp,
    pub right: Expr,
}

/// Assignment target: a variable with zero or more indexes
#[derive(Debug, Clone, PartialEq)]
pub struct LValue {
    pub name: String,
    pub binding: Option<ObjectId>,
    pub indexes: Vec<Expr>,
    pub location: SourceLocation,
}

/// Statement nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign {
        target: LValue,
        value: Expr,
        location: SourceLocation,
    },
    Call {
        name: String,
        binding: Option<ObjectId>,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    Group {
        statements: Vec<Stmt>,
        location: SourceLocation,
    },
    If {
        condition: Condition,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        location: SourceLocation,
    },
    While {
        condition: Condition,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    For {
        var: String,
        binding: Option<ObjectId>,
        from: Expr,
        to: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    Empty {
        location: SourceLocation,
    },
}

impl Stmt {
    pub fn is_empty(&self) -> bool {
        matches!(self, Stmt::Empty { .. })
    }
}
