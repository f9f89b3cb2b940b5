//! Declared objects
//!
//! Every declaration the parser recognizes becomes one [`Object`] stored in
//! the [`SymbolTable`](super::SymbolTable) arena and addressed by
//! [`ObjectId`]. Program, function and procedure objects own a scope and the
//! statements of their body.

use super::types::{ConstantValue, Type};
use crate::parser::ast::{SourceLocation, Stmt};

/// Handle of an object in the symbol table arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) usize);

/// Handle of a scope in the symbol table arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) usize);

/// How an argument is passed to a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMode {
    /// `x : integer`
    Value,
    /// `var x : integer`
    Reference,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Program {
        scope: ScopeId,
        body: Vec<Stmt>,
    },
    Constant {
        value: ConstantValue,
    },
    TypeDef {
        actual: Type,
    },
    Variable {
        ty: Type,
        scope: ScopeId,
    },
    Function {
        /// Set once the `: basicType` after the parameter list is parsed
        return_type: Option<Type>,
        params: Vec<ObjectId>,
        scope: ScopeId,
        body: Vec<Stmt>,
    },
    Procedure {
        params: Vec<ObjectId>,
        scope: ScopeId,
        body: Vec<Stmt>,
    },
    Parameter {
        mode: ParamMode,
        ty: Type,
        owner: ObjectId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub name: String,
    pub location: SourceLocation,
    pub kind: ObjectKind,
}

impl Object {
    pub fn new(name: impl Into<String>, location: SourceLocation, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            location,
            kind,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ObjectKind::Program { .. } => "program",
            ObjectKind::Constant { .. } => "constant",
            ObjectKind::TypeDef { .. } => "type",
            ObjectKind::Variable { .. } => "variable",
            ObjectKind::Function { .. } => "function",
            ObjectKind::Procedure { .. } => "procedure",
            ObjectKind::Parameter { .. } => "parameter",
        }
    }

    /// Scope opened by this object's body, if it has one
    pub fn scope(&self) -> Option<ScopeId> {
        match &self.kind {
            ObjectKind::Program { scope, .. }
            | ObjectKind::Function { scope, .. }
            | ObjectKind::Procedure { scope, .. } => Some(*scope),
            ObjectKind::Constant { .. }
            | ObjectKind::TypeDef { .. }
            | ObjectKind::Variable { .. }
            | ObjectKind::Parameter { .. } => None,
        }
    }

    /// Type of a value-carrying object: variable, parameter, or function result
    pub fn value_type(&self) -> Option<&Type> {
        match &self.kind {
            ObjectKind::Variable { ty, .. } | ObjectKind::Parameter { ty, .. } => Some(ty),
            ObjectKind::Function { return_type, .. } => return_type.as_ref(),
            ObjectKind::Program { .. }
            | ObjectKind::Constant { .. }
            | ObjectKind::TypeDef { .. }
            | ObjectKind::Procedure { .. } => None,
        }
    }

    pub fn params(&self) -> &[ObjectId] {
        match &self.kind {
            ObjectKind::Function { params, .. } | ObjectKind::Procedure { params, .. } => params,
            _ => &[],
        }
    }

    pub fn body(&self) -> Option<&[Stmt]> {
        match &self.kind {
            ObjectKind::Program { body, .. }
            | ObjectKind::Function { body, .. }
            | ObjectKind::Procedure { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn body_mut(&mut self) -> Option<&mut Vec<Stmt>> {
        match &mut self.kind {
            ObjectKind::Program { body, .. }
            | ObjectKind::Function { body, .. }
            | ObjectKind::Procedure { body, .. } => Some(body),
            _ => None,
        }
    }
}
