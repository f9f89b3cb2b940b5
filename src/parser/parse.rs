//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct: the token cursor and symbol
//! table of one compilation, the program/block rules, and helper methods.
//!
//! # Parser Architecture
//!
//! The Parser is predictive recursive descent with one token of lookahead:
//! - This module: Parser struct, `program`, `block`, helpers
//! - `declarations`: constants, types, variables, subprograms, parameters
//! - `statements`: assignment, call, group, if, while, for, empty
//! - `expressions`: expression/term/factor, conditions, arguments, indexes
//!
//! Semantic actions run inline as constructs are recognized: objects are
//! created and declared into the [`SymbolTable`], scopes are pushed and
//! popped around subprogram bodies, and constants and types are resolved.
//! The first defect is returned as a [`Diagnostic`] and ends the parse.
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::diagnostics::{Diagnostic, ErrorKind};
use crate::parser::ast::{SourceLocation, Stmt};
use crate::parser::cursor::{TokenCursor, TokenStream};
use crate::parser::lexer::{Lexer, Token, TokenKind, TokenSource};
use crate::symtab::{ObjectId, ScopeId, SymbolTable};
use log::debug;

/// Recursive descent parser for KPL
pub struct Parser {
    pub(crate) cursor: TokenCursor,
    pub(crate) table: SymbolTable,
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, Diagnostic> {
        Self::from_source(Box::new(Lexer::new(source)))
    }

    /// Parser over a prepared token sequence
    pub fn from_tokens(tokens: Vec<Token>) -> Result<Self, Diagnostic> {
        Self::from_source(Box::new(TokenStream::new(tokens)))
    }

    pub fn from_source(source: Box<dyn TokenSource>) -> Result<Self, Diagnostic> {
        Ok(Self {
            cursor: TokenCursor::new(source)?,
            table: SymbolTable::new(),
        })
    }

    /// `program := "program" ident ";" block "."`
    ///
    /// Returns the program object; its scope holds every top-level
    /// declaration.
    pub fn compile_program(&mut self) -> Result<ObjectId, Diagnostic> {
        self.cursor.expect(TokenKind::KwProgram)?;
        let (name, location) = self.expect_ident()?;

        let program = self.table.create_program(&name, location);
        debug!("program '{}' at {}", name, location);

        let scope = self.scope_of(program);
        self.within_scope(scope, |p| {
            p.cursor.expect(TokenKind::Semicolon)?;
            let body = p.compile_block()?;
            p.set_body(program, body);
            p.cursor.expect(TokenKind::Period)?;
            Ok(())
        })?;

        Ok(program)
    }

    /// `block := [constPart] [typePart] [varPart] {subDecl} "begin" stmts "end"`
    ///
    /// Each optional part is entered only when lookahead is its keyword.
    pub(crate) fn compile_block(&mut self) -> Result<Vec<Stmt>, Diagnostic> {
        if self.check(TokenKind::KwConst) {
            self.compile_const_decls()?;
        }
        if self.check(TokenKind::KwType) {
            self.compile_type_decls()?;
        }
        if self.check(TokenKind::KwVar) {
            self.compile_var_decls()?;
        }
        self.compile_sub_decls()?;

        self.cursor.expect(TokenKind::KwBegin)?;
        let statements = self.compile_statements()?;
        self.cursor.expect(TokenKind::KwEnd)?;
        Ok(statements)
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn into_table(self) -> SymbolTable {
        self.table
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> TokenKind {
        self.cursor.peek_kind()
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.cursor.check(kind)
    }

    pub(crate) fn advance(&mut self) -> Result<&Token, Diagnostic> {
        self.cursor.advance()
    }

    pub(crate) fn lookahead_location(&self) -> SourceLocation {
        self.cursor.lookahead_location()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.cursor.current_location()
    }

    pub(crate) fn expect_ident(&mut self) -> Result<(String, SourceLocation), Diagnostic> {
        let token = self.cursor.expect(TokenKind::Ident)?;
        Ok((token.text.clone(), token.location))
    }

    /// Defect positioned at the lookahead token
    pub(crate) fn error<T>(&self, kind: ErrorKind) -> Result<T, Diagnostic> {
        Err(Diagnostic::new(kind, self.lookahead_location()))
    }

    /// Defect positioned at the token just consumed
    pub(crate) fn error_at_current<T>(&self, kind: ErrorKind) -> Result<T, Diagnostic> {
        Err(Diagnostic::new(kind, self.current_location()))
    }

    /// Run `f` with `scope` pushed; the scope is popped whether `f`
    /// succeeds or fails.
    pub(crate) fn within_scope<T>(
        &mut self,
        scope: ScopeId,
        f: impl FnOnce(&mut Self) -> Result<T, Diagnostic>,
    ) -> Result<T, Diagnostic> {
        self.table.enter_block(scope);
        let result = f(self);
        self.table.exit_block();
        result
    }

    pub(crate) fn scope_of(&self, owner: ObjectId) -> ScopeId {
        self.table
            .object(owner)
            .scope()
            .unwrap_or(crate::symtab::GLOBAL_SCOPE)
    }

    pub(crate) fn set_body(&mut self, owner: ObjectId, statements: Vec<Stmt>) {
        if let Some(body) = self.table.object_mut(owner).body_mut() {
            *body = statements;
        }
    }
}

/// Integer value of a number token
pub(crate) fn number_value(token: &Token) -> Result<i32, Diagnostic> {
    token
        .text
        .parse()
        .map_err(|_| Diagnostic::new(ErrorKind::NumberTooLarge, token.location))
}

/// Character of a char-literal token
pub(crate) fn char_value(token: &Token) -> char {
    token.text.chars().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symtab::ObjectKind;

    fn tok(kind: TokenKind, column: usize) -> Token {
        Token::symbol(kind, SourceLocation::new(1, column))
    }

    #[test]
    fn test_minimal_program_from_tokens() {
        let tokens = vec![
            tok(TokenKind::KwProgram, 1),
            Token::new(TokenKind::Ident, "P", SourceLocation::new(1, 9)),
            tok(TokenKind::Semicolon, 10),
            tok(TokenKind::KwBegin, 12),
            tok(TokenKind::KwEnd, 18),
            tok(TokenKind::Period, 21),
        ];
        let mut parser = Parser::from_tokens(tokens).unwrap();
        let program = parser.compile_program().unwrap();

        let object = parser.table().object(program);
        assert_eq!(object.name, "P");
        assert!(matches!(&object.kind, ObjectKind::Program { body, .. } if body.is_empty()));
        assert_eq!(parser.table().depth(), 0);
    }

    #[test]
    fn test_missing_period() {
        let mut parser = Parser::new("program P;\nbegin end").unwrap();
        let err = parser.compile_program().unwrap_err();

        assert_eq!(
            err.kind,
            ErrorKind::MissingToken {
                expected: TokenKind::Period,
                found: TokenKind::Eof,
            }
        );
        assert_eq!(err.location, SourceLocation::new(2, 10));
    }

    #[test]
    fn test_scope_stack_unwinds_on_error() {
        let source = "program P;\n\
                      procedure Q;\n\
                      begin x := end;\n\
                      begin end.";
        let mut parser = Parser::new(source).unwrap();

        assert!(parser.compile_program().is_err());
        assert_eq!(parser.table().depth(), 0);
    }

    #[test]
    fn test_block_parts_must_keep_order() {
        let mut parser = Parser::new("program P; var x : integer; const c = 1; begin end.").unwrap();
        let err = parser.compile_program().unwrap_err();

        assert_eq!(
            err.kind,
            ErrorKind::MissingToken {
                expected: TokenKind::KwBegin,
                found: TokenKind::KwConst,
            }
        );
    }
}
