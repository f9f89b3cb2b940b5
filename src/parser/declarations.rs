//! Declaration parsing implementation
//!
//! This module handles the declaration parts of a block and the semantic
//! actions attached to them:
//!
//! - Constant, type and variable declaration lists
//! - Function and procedure declarations with their parameters
//! - Constant folding (`-5`, `+c`) and constant-name resolution
//! - Type construction, including arrays and named types
//!
//! # Grammar
//!
//! ```text
//! constPart ::= "const" (ident "=" constant ";")+
//! typePart  ::= "type" (ident "=" type ";")+
//! varPart   ::= "var" (ident ":" type ";")+
//! funcDecl  ::= "function" ident params ":" basicType ";" block ";"
//! procDecl  ::= "procedure" ident params ";" block ";"
//! params    ::= "(" param (";" param)* ")" | ε
//! param     ::= ident ":" basicType | "var" ident ":" basicType
//! type      ::= "integer" | "char" | "array" "(." number ".)" "of" type | ident
//! ```
//!
//! A declaration list repeats while lookahead is an identifier, so the part
//! ends at the first non-identifier token.

use crate::diagnostics::{Diagnostic, ErrorKind};
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{char_value, number_value, Parser};
use crate::symtab::{ConstantValue, ObjectId, ObjectKind, ParamMode, Type};
use log::debug;

impl Parser {
    pub(crate) fn compile_const_decls(&mut self) -> Result<(), Diagnostic> {
        self.cursor.expect(TokenKind::KwConst)?;
        loop {
            let (name, location) = self.expect_ident()?;
            self.cursor.expect(TokenKind::Eq)?;
            let value = self.compile_constant()?;

            let id = self.table.create_constant(&name, location, value);
            self.table.declare(id)?;

            self.cursor.expect(TokenKind::Semicolon)?;
            if !self.check(TokenKind::Ident) {
                return Ok(());
            }
        }
    }

    pub(crate) fn compile_type_decls(&mut self) -> Result<(), Diagnostic> {
        self.cursor.expect(TokenKind::KwType)?;
        loop {
            let (name, location) = self.expect_ident()?;
            self.cursor.expect(TokenKind::Eq)?;
            let actual = self.compile_type()?;

            let id = self.table.create_type(&name, location, actual);
            self.table.declare(id)?;

            self.cursor.expect(TokenKind::Semicolon)?;
            if !self.check(TokenKind::Ident) {
                return Ok(());
            }
        }
    }

    pub(crate) fn compile_var_decls(&mut self) -> Result<(), Diagnostic> {
        self.cursor.expect(TokenKind::KwVar)?;
        loop {
            let (name, location) = self.expect_ident()?;
            self.cursor.expect(TokenKind::Colon)?;
            let ty = self.compile_type()?;

            let id = self.table.create_variable(&name, location, ty);
            self.table.declare(id)?;

            self.cursor.expect(TokenKind::Semicolon)?;
            if !self.check(TokenKind::Ident) {
                return Ok(());
            }
        }
    }

    pub(crate) fn compile_sub_decls(&mut self) -> Result<(), Diagnostic> {
        loop {
            match self.peek() {
                TokenKind::KwFunction => self.compile_func_decl()?,
                TokenKind::KwProcedure => self.compile_proc_decl()?,
                _ => return Ok(()),
            }
        }
    }

    /// The function is declared before its parameters are parsed, so its body
    /// can call it.
    pub(crate) fn compile_func_decl(&mut self) -> Result<(), Diagnostic> {
        self.cursor.expect(TokenKind::KwFunction)?;
        let (name, location) = self.expect_ident()?;

        let func = self.table.create_function(&name, location);
        self.table.declare(func)?;
        debug!("function '{}' at {}", name, location);

        let scope = self.scope_of(func);
        self.within_scope(scope, |p| {
            p.compile_params(func)?;
            p.cursor.expect(TokenKind::Colon)?;
            let return_type = p.compile_basic_type()?;
            p.table.set_return_type(func, return_type);
            p.cursor.expect(TokenKind::Semicolon)?;

            let body = p.compile_block()?;
            p.set_body(func, body);
            Ok(())
        })?;

        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    pub(crate) fn compile_proc_decl(&mut self) -> Result<(), Diagnostic> {
        self.cursor.expect(TokenKind::KwProcedure)?;
        let (name, location) = self.expect_ident()?;

        let proc = self.table.create_procedure(&name, location);
        self.table.declare(proc)?;
        debug!("procedure '{}' at {}", name, location);

        let scope = self.scope_of(proc);
        self.within_scope(scope, |p| {
            p.compile_params(proc)?;
            p.cursor.expect(TokenKind::Semicolon)?;

            let body = p.compile_block()?;
            p.set_body(proc, body);
            Ok(())
        })?;

        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    /// `constant ::= ("+" | "-") constant2 | char | constant2`
    pub(crate) fn compile_constant(&mut self) -> Result<ConstantValue, Diagnostic> {
        match self.peek() {
            TokenKind::Plus => {
                self.advance()?;
                self.compile_constant2()
            }
            TokenKind::Minus => {
                self.advance()?;
                let value = self.compile_constant2()?;
                match value.negated() {
                    Some(negated) => Ok(negated),
                    None => self.error_at_current(ErrorKind::InvalidConstant),
                }
            }
            TokenKind::Char => {
                let token = self.advance()?;
                Ok(ConstantValue::Char(char_value(token)))
            }
            _ => self.compile_constant2(),
        }
    }

    /// `constant2 ::= number | ident`
    ///
    /// The identifier must name a constant; its value is copied so the
    /// caller may negate it freely.
    pub(crate) fn compile_constant2(&mut self) -> Result<ConstantValue, Diagnostic> {
        match self.peek() {
            TokenKind::Number => {
                let token = self.advance()?;
                Ok(ConstantValue::Int(number_value(token)?))
            }
            TokenKind::Ident => {
                let (name, location) = self.expect_ident()?;
                let resolved = self.table.lookup(&name).map(|id| &self.table.object(id).kind);
                match resolved {
                    Some(ObjectKind::Constant { value }) => Ok(*value),
                    _ => Err(Diagnostic::new(ErrorKind::InvalidConstant, location)),
                }
            }
            _ => self.error(ErrorKind::InvalidConstant),
        }
    }

    pub(crate) fn compile_type(&mut self) -> Result<Type, Diagnostic> {
        match self.peek() {
            TokenKind::KwInteger => {
                self.advance()?;
                Ok(Type::Int)
            }
            TokenKind::KwChar => {
                self.advance()?;
                Ok(Type::Char)
            }
            TokenKind::KwArray => {
                self.advance()?;
                self.cursor.expect(TokenKind::LSel)?;
                let token = self.cursor.expect(TokenKind::Number)?;
                let location = token.location;
                let size = number_value(token)?;
                let size = match u32::try_from(size) {
                    Ok(size) if size > 0 => size,
                    _ => return Err(Diagnostic::new(ErrorKind::InvalidArraySize, location)),
                };
                self.cursor.expect(TokenKind::RSel)?;
                self.cursor.expect(TokenKind::KwOf)?;

                let element = self.compile_type()?;
                Ok(Type::array(size, element))
            }
            TokenKind::Ident => {
                let (name, location) = self.expect_ident()?;
                let Some(id) = self.table.lookup(&name) else {
                    return Err(Diagnostic::new(ErrorKind::UndeclaredType { name }, location));
                };
                match &self.table.object(id).kind {
                    ObjectKind::TypeDef { actual } => Ok(Type::alias(name, actual.clone())),
                    _ => Err(Diagnostic::new(ErrorKind::NotAType { name }, location)),
                }
            }
            _ => self.error(ErrorKind::InvalidType),
        }
    }

    pub(crate) fn compile_basic_type(&mut self) -> Result<Type, Diagnostic> {
        match self.peek() {
            TokenKind::KwInteger => {
                self.advance()?;
                Ok(Type::Int)
            }
            TokenKind::KwChar => {
                self.advance()?;
                Ok(Type::Char)
            }
            _ => self.error(ErrorKind::InvalidBasicType),
        }
    }

    pub(crate) fn compile_params(&mut self, owner: ObjectId) -> Result<(), Diagnostic> {
        if !self.check(TokenKind::LPar) {
            return Ok(());
        }

        self.advance()?;
        self.compile_param(owner)?;
        while self.check(TokenKind::Semicolon) {
            self.advance()?;
            self.compile_param(owner)?;
        }
        self.cursor.expect(TokenKind::RPar)?;
        Ok(())
    }

    pub(crate) fn compile_param(&mut self, owner: ObjectId) -> Result<(), Diagnostic> {
        let mode = match self.peek() {
            TokenKind::Ident => ParamMode::Value,
            TokenKind::KwVar => {
                self.advance()?;
                ParamMode::Reference
            }
            _ => return self.error(ErrorKind::InvalidParameter),
        };

        let (name, location) = self.expect_ident()?;
        self.cursor.expect(TokenKind::Colon)?;
        let ty = self.compile_basic_type()?;

        let param = self.table.create_parameter(&name, location, mode, ty, owner);
        self.table.declare(param)
    }
}
