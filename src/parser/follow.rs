//! Continuation sets
//!
//! Each optional tail in the grammar (the trailing `+`/`-` loop of an
//! expression, the trailing `*`/`/` loop of a term, an omitted argument list,
//! an empty statement) ends only when lookahead is one of the terminals that
//! may legally follow that construct. Anything else is a defect of that
//! construct. The sets differ per position and must not be merged: a token
//! that may follow a term (`+`) is a stray token after a whole expression.

use super::lexer::TokenKind;
use TokenKind::*;

/// May follow a complete expression
pub const EXPRESSION_FOLLOW: &[TokenKind] = &[
    KwTo, KwDo, RPar, Comma, Eq, Neq, Le, Lt, Ge, Gt, RSel, Semicolon, KwEnd, KwElse, KwThen,
];

/// May follow a term: an additive operator, or whatever follows an expression
pub const TERM_FOLLOW: &[TokenKind] = &[
    Plus, Minus, KwTo, KwDo, RPar, Comma, Eq, Neq, Le, Lt, Ge, Gt, RSel, Semicolon, KwEnd, KwElse,
    KwThen,
];

/// May follow a call written without an argument list
pub const ARGUMENTS_FOLLOW: &[TokenKind] = &[
    Times, Slash, Plus, Minus, KwTo, KwDo, RPar, Comma, Eq, Neq, Le, Lt, Ge, Gt, RSel, Semicolon,
    KwEnd, KwElse, KwThen,
];

/// Lookahead that makes a statement empty
pub const STATEMENT_FOLLOW: &[TokenKind] = &[Semicolon, KwEnd, KwElse];
