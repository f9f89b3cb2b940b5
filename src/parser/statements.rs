//! Statement parsing implementation
//!
//! This module handles parsing of all KPL statement types:
//!
//! - Assignment: `x(.i.) := e`
//! - Procedure call: `call p(a, b)`
//! - Compound statements: `begin ... end`
//! - Control flow: `if`, `while`, `for`
//! - The empty statement
//!
//! # Grammar
//!
//! ```text
//! stmts     ::= stmt (";" stmt)*
//! stmt      ::= assign | call | group | if | while | for | ε
//! assign    ::= ident indexes ":=" expr
//! call      ::= "call" ident args
//! group     ::= "begin" stmts "end"
//! if        ::= "if" condition "then" stmt ["else" stmt]
//! while     ::= "while" condition "do" stmt
//! for       ::= "for" ident ":=" expr "to" expr "do" stmt
//! ```
//!
//! A statement is empty only when lookahead is `;`, `end` or `else`.
//! Empty statements are dropped from statement lists but kept where a
//! single statement is required (a `then`, `else` or `do` body).
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::diagnostics::{Diagnostic, ErrorKind};
use crate::parser::ast::{LValue, Stmt};
use crate::parser::follow::STATEMENT_FOLLOW;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;

impl Parser {
    pub(crate) fn compile_statements(&mut self) -> Result<Vec<Stmt>, Diagnostic> {
        let mut statements = Vec::new();

        let statement = self.compile_statement()?;
        if !statement.is_empty() {
            statements.push(statement);
        }
        while self.check(TokenKind::Semicolon) {
            self.advance()?;
            let statement = self.compile_statement()?;
            if !statement.is_empty() {
                statements.push(statement);
            }
        }

        Ok(statements)
    }

    pub(crate) fn compile_statement(&mut self) -> Result<Stmt, Diagnostic> {
        match self.peek() {
            TokenKind::Ident => self.compile_assign_st(),
            TokenKind::KwCall => self.compile_call_st(),
            TokenKind::KwBegin => self.compile_group_st(),
            TokenKind::KwIf => self.compile_if_st(),
            TokenKind::KwWhile => self.compile_while_st(),
            TokenKind::KwFor => self.compile_for_st(),
            kind if STATEMENT_FOLLOW.contains(&kind) => Ok(Stmt::Empty {
                location: self.lookahead_location(),
            }),
            _ => self.error(ErrorKind::InvalidStatement),
        }
    }

    pub(crate) fn compile_lvalue(&mut self) -> Result<LValue, Diagnostic> {
        let (name, location) = self.expect_ident()?;
        let binding = self.table.lookup(&name);
        let indexes = self.compile_indexes()?;

        Ok(LValue {
            name,
            binding,
            indexes,
            location,
        })
    }

    pub(crate) fn compile_assign_st(&mut self) -> Result<Stmt, Diagnostic> {
        let target = self.compile_lvalue()?;
        let location = self.lookahead_location();
        self.cursor.expect(TokenKind::Assign)?;
        let value = self.compile_expression()?;

        Ok(Stmt::Assign {
            target,
            value,
            location,
        })
    }

    pub(crate) fn compile_call_st(&mut self) -> Result<Stmt, Diagnostic> {
        let location = self.lookahead_location();
        self.cursor.expect(TokenKind::KwCall)?;
        let (name, _) = self.expect_ident()?;
        let binding = self.table.lookup(&name);
        let args = self.compile_arguments()?.unwrap_or_default();

        Ok(Stmt::Call {
            name,
            binding,
            args,
            location,
        })
    }

    pub(crate) fn compile_group_st(&mut self) -> Result<Stmt, Diagnostic> {
        let location = self.lookahead_location();
        self.cursor.expect(TokenKind::KwBegin)?;
        let statements = self.compile_statements()?;
        self.cursor.expect(TokenKind::KwEnd)?;

        Ok(Stmt::Group {
            statements,
            location,
        })
    }

    pub(crate) fn compile_if_st(&mut self) -> Result<Stmt, Diagnostic> {
        let location = self.lookahead_location();
        self.cursor.expect(TokenKind::KwIf)?;
        let condition = self.compile_condition()?;
        self.cursor.expect(TokenKind::KwThen)?;
        let then_branch = Box::new(self.compile_statement()?);

        let else_branch = if self.check(TokenKind::KwElse) {
            Some(Box::new(self.compile_else_st()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location,
        })
    }

    pub(crate) fn compile_else_st(&mut self) -> Result<Stmt, Diagnostic> {
        self.cursor.expect(TokenKind::KwElse)?;
        self.compile_statement()
    }

    pub(crate) fn compile_while_st(&mut self) -> Result<Stmt, Diagnostic> {
        let location = self.lookahead_location();
        self.cursor.expect(TokenKind::KwWhile)?;
        let condition = self.compile_condition()?;
        self.cursor.expect(TokenKind::KwDo)?;
        let body = Box::new(self.compile_statement()?);

        Ok(Stmt::While {
            condition,
            body,
            location,
        })
    }

    pub(crate) fn compile_for_st(&mut self) -> Result<Stmt, Diagnostic> {
        let location = self.lookahead_location();
        self.cursor.expect(TokenKind::KwFor)?;
        let (var, _) = self.expect_ident()?;
        let binding = self.table.lookup(&var);
        self.cursor.expect(TokenKind::Assign)?;
        let from = self.compile_expression()?;
        self.cursor.expect(TokenKind::KwTo)?;
        let to = self.compile_expression()?;
        self.cursor.expect(TokenKind::KwDo)?;
        let body = Box::new(self.compile_statement()?);

        Ok(Stmt::For {
            var,
            binding,
            from,
            to,
            body,
            location,
        })
    }
}
