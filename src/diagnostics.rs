//! Compile-time diagnostics
//!
//! This module defines [`Diagnostic`], the single defect a failing compilation
//! produces, and [`CompileError`], which adds the I/O failure mode of
//! [`compile_file`](crate::compile_file).
//!
//! All diagnostics are fatal: the parser returns the first one it meets and
//! never resynchronizes. [`Reporter`] renders a diagnostic for a terminal.

use crate::parser::ast::SourceLocation;
use crate::parser::lexer::TokenKind;
use crossterm::style::Stylize;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// What went wrong. Messages follow the KPL toolchain's wording.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    // Lexical
    #[error("End of comment expected!")]
    EndOfComment,
    #[error("Identification too long!")]
    IdentTooLong,
    #[error("Invalid const char!")]
    InvalidCharConstant,
    #[error("Invalid symbol!")]
    InvalidSymbol,
    #[error("Number too large!")]
    NumberTooLarge,

    // Token mismatch
    #[error("Missing {expected}")]
    MissingToken { expected: TokenKind, found: TokenKind },

    // Declarations
    #[error("Duplicate identifier '{name}'.")]
    Redeclared { name: String },
    #[error("Undeclared type '{name}'.")]
    UndeclaredType { name: String },
    #[error("'{name}' is not a type.")]
    NotAType { name: String },
    #[error("Array size must be positive.")]
    InvalidArraySize,

    // Grammar positions with no legal continuation
    #[error("A constant expected.")]
    InvalidConstant,
    #[error("A type expected.")]
    InvalidType,
    #[error("A basic type expected.")]
    InvalidBasicType,
    #[error("A parameter expected.")]
    InvalidParameter,
    #[error("Invalid statement.")]
    InvalidStatement,
    #[error("Wrong arguments.")]
    InvalidArguments,
    #[error("A comparator expected.")]
    InvalidComparator,
    #[error("Invalid expression.")]
    InvalidExpression,
    #[error("Invalid term.")]
    InvalidTerm,
    #[error("Invalid factor.")]
    InvalidFactor,
}

/// A defect at a source position
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}:{kind}")]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub location: SourceLocation,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }

    pub fn missing_token(expected: TokenKind, found: TokenKind, location: SourceLocation) -> Self {
        Self::new(ErrorKind::MissingToken { expected, found }, location)
    }
}

/// Failure of a whole compile call
#[derive(Debug, Error)]
pub enum CompileError {
    /// The input could not be opened or read
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Diagnostic(#[from] Diagnostic),
}

impl CompileError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            CompileError::Io { .. } => None,
            CompileError::Diagnostic(diag) => Some(&diag.location),
        }
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            CompileError::Io { .. } => None,
            CompileError::Diagnostic(diag) => Some(diag),
        }
    }
}

/// Writes diagnostics for a human reader.
///
/// With `color` set the `error:` tag and the caret are styled through
/// crossterm; otherwise output is plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Render `err`, followed by the offending source line and a caret when
    /// `source` is available and the error has a position.
    pub fn report<W: Write>(
        &self,
        out: &mut W,
        err: &CompileError,
        source: Option<&str>,
    ) -> io::Result<()> {
        if self.color {
            writeln!(out, "{} {}", "error:".red().bold(), err)?;
        } else {
            writeln!(out, "error: {}", err)?;
        }

        let (Some(source), Some(location)) = (source, err.location()) else {
            return Ok(());
        };
        let Some(line) = location
            .line
            .checked_sub(1)
            .and_then(|idx| source.lines().nth(idx))
        else {
            return Ok(());
        };

        let gutter = format!("{:>4} | ", location.line);
        // Tabs in the line's prefix are kept so the caret lines up under them
        let mut pad = " ".repeat(gutter.len());
        pad.extend(
            line.chars()
                .take(location.column.saturating_sub(1))
                .map(|ch| if ch == '\t' { '\t' } else { ' ' }),
        );
        writeln!(out, "{}{}", gutter, line)?;
        if self.color {
            writeln!(out, "{}{}", pad, "^".red().bold())
        } else {
            writeln!(out, "{}^", pad)
        }
    }
}
