//! Declarations and scopes
//!
//! This module provides the symbol table the parser declares into:
//! - [`object`]: declared objects and their handles
//! - [`types`]: [`Type`] and [`ConstantValue`]
//! - [`print`]: the declaration-tree dump
//!
//! # Scopes
//!
//! Objects and scopes live in arenas owned by [`SymbolTable`]. The table also
//! owns the scope stack: [`SymbolTable::enter_block`] pushes a scope when a
//! program, function or procedure body starts and
//! [`SymbolTable::exit_block`] pops it. Lookup walks from the current scope
//! through its lexically enclosing scopes and finally the global scope that
//! holds the built-in subprograms.
//!
//! A name may be declared once per scope; an inner declaration shadows an
//! outer one only while the inner scope is open.

pub mod object;
pub mod print;
pub mod types;

pub use object::{Object, ObjectId, ObjectKind, ParamMode, ScopeId};
pub use types::{ConstantValue, Type};

use crate::diagnostics::{Diagnostic, ErrorKind};
use crate::parser::ast::SourceLocation;
use log::debug;
use rustc_hash::FxHashMap;

/// Scope holding the built-in subprograms
pub const GLOBAL_SCOPE: ScopeId = ScopeId(0);

/// One declaration region
#[derive(Debug, Clone)]
pub struct Scope {
    /// Lexically enclosing scope; `None` for the program and global scopes
    pub outer: Option<ScopeId>,
    objects: Vec<ObjectId>,
    names: FxHashMap<String, ObjectId>,
}

impl Scope {
    fn new(outer: Option<ScopeId>) -> Self {
        Scope {
            outer,
            objects: Vec::new(),
            names: FxHashMap::default(),
        }
    }

    /// Objects in declaration order
    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    pub fn get(&self, name: &str) -> Option<ObjectId> {
        self.names.get(name).copied()
    }
}

/// Arena of objects and scopes plus the scope stack
#[derive(Debug, Clone)]
pub struct SymbolTable {
    objects: Vec<Object>,
    scopes: Vec<Scope>,
    stack: Vec<ScopeId>,
    program: Option<ObjectId>,
}

impl SymbolTable {
    /// Empty table with the built-ins `READC`, `READI`, `WRITEI`, `WRITEC`
    /// and `WRITELN` declared globally.
    pub fn new() -> Self {
        let mut table = SymbolTable {
            objects: Vec::new(),
            scopes: vec![Scope::new(None)],
            stack: Vec::new(),
            program: None,
        };
        table.install_builtins();
        table
    }

    fn install_builtins(&mut self) {
        let builtin = SourceLocation::default();

        let readc = self.create_function("READC", builtin);
        self.set_return_type(readc, Type::Char);
        let readi = self.create_function("READI", builtin);
        self.set_return_type(readi, Type::Int);

        let writei = self.create_procedure("WRITEI", builtin);
        let writec = self.create_procedure("WRITEC", builtin);
        let writeln = self.create_procedure("WRITELN", builtin);

        for (proc, param, ty) in [(writei, "i", Type::Int), (writec, "ch", Type::Char)] {
            let scope = self.objects[proc.0].scope().unwrap_or(GLOBAL_SCOPE);
            let param = self.create_parameter(param, builtin, ParamMode::Value, ty, proc);
            self.enter_block(scope);
            self.declare(param).ok();
            self.exit_block();
        }

        for id in [readc, readi, writei, writec, writeln] {
            self.declare(id).ok();
        }
    }

    fn alloc(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(object);
        id
    }

    /// New scope nested in the current one
    fn alloc_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(self.current_scope()));
        id
    }

    // ===== Object creation (unregistered) =====

    /// Create the program object and its top-level scope.
    pub fn create_program(&mut self, name: &str, location: SourceLocation) -> ObjectId {
        let scope = ScopeId(self.scopes.len());
        let id = self.alloc(Object::new(
            name,
            location,
            ObjectKind::Program {
                scope,
                body: Vec::new(),
            },
        ));
        self.scopes.push(Scope::new(None));
        self.program = Some(id);
        id
    }

    pub fn create_constant(&mut self, name: &str, location: SourceLocation, value: ConstantValue) -> ObjectId {
        self.alloc(Object::new(name, location, ObjectKind::Constant { value }))
    }

    pub fn create_type(&mut self, name: &str, location: SourceLocation, actual: Type) -> ObjectId {
        self.alloc(Object::new(name, location, ObjectKind::TypeDef { actual }))
    }

    pub fn create_variable(&mut self, name: &str, location: SourceLocation, ty: Type) -> ObjectId {
        let scope = self.current_scope().unwrap_or(GLOBAL_SCOPE);
        self.alloc(Object::new(name, location, ObjectKind::Variable { ty, scope }))
    }

    /// Create a function object; its scope nests in the current scope.
    pub fn create_function(&mut self, name: &str, location: SourceLocation) -> ObjectId {
        let scope = self.alloc_scope();
        self.alloc(Object::new(
            name,
            location,
            ObjectKind::Function {
                return_type: None,
                params: Vec::new(),
                scope,
                body: Vec::new(),
            },
        ))
    }

    /// Create a procedure object; its scope nests in the current scope.
    pub fn create_procedure(&mut self, name: &str, location: SourceLocation) -> ObjectId {
        let scope = self.alloc_scope();
        self.alloc(Object::new(
            name,
            location,
            ObjectKind::Procedure {
                params: Vec::new(),
                scope,
                body: Vec::new(),
            },
        ))
    }

    pub fn create_parameter(
        &mut self,
        name: &str,
        location: SourceLocation,
        mode: ParamMode,
        ty: Type,
        owner: ObjectId,
    ) -> ObjectId {
        self.alloc(Object::new(name, location, ObjectKind::Parameter { mode, ty, owner }))
    }

    pub fn set_return_type(&mut self, function: ObjectId, ty: Type) {
        if let ObjectKind::Function { return_type, .. } = &mut self.objects[function.0].kind {
            *return_type = Some(ty);
        }
    }

    // ===== Registration and scopes =====

    /// Register `id` in the current scope (the global scope when none is
    /// open). Parameters are also appended to their owner's parameter list.
    pub fn declare(&mut self, id: ObjectId) -> Result<(), Diagnostic> {
        let scope_id = self.current_scope().unwrap_or(GLOBAL_SCOPE);
        let object = &self.objects[id.0];

        if self.scopes[scope_id.0].names.contains_key(&object.name) {
            return Err(Diagnostic::new(
                ErrorKind::Redeclared {
                    name: object.name.clone(),
                },
                object.location,
            ));
        }

        debug!(
            "declare {} '{}' in scope {} (depth {})",
            object.kind_name(),
            object.name,
            scope_id.0,
            self.stack.len()
        );

        let scope = &mut self.scopes[scope_id.0];
        scope.names.insert(object.name.clone(), id);
        scope.objects.push(id);

        if let ObjectKind::Parameter { owner, .. } = object.kind {
            match &mut self.objects[owner.0].kind {
                ObjectKind::Function { params, .. } | ObjectKind::Procedure { params, .. } => {
                    params.push(id)
                }
                _ => {}
            }
        }

        Ok(())
    }

    pub fn enter_block(&mut self, scope: ScopeId) {
        debug!("enter scope {} (depth {})", scope.0, self.stack.len() + 1);
        self.stack.push(scope);
    }

    pub fn exit_block(&mut self) -> Option<ScopeId> {
        let scope = self.stack.pop();
        if let Some(scope) = scope {
            debug!("exit scope {} (depth {})", scope.0, self.stack.len());
        }
        scope
    }

    pub fn current_scope(&self) -> Option<ScopeId> {
        self.stack.last().copied()
    }

    /// Number of open scopes
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    // ===== Lookup =====

    /// Resolve `name` from the current scope outward.
    pub fn lookup(&self, name: &str) -> Option<ObjectId> {
        match self.current_scope() {
            Some(scope) => self.lookup_in(scope, name),
            None => self.scopes[GLOBAL_SCOPE.0].get(name),
        }
    }

    /// Resolve `name` as if `scope` were the innermost open scope.
    pub fn lookup_in(&self, scope: ScopeId, name: &str) -> Option<ObjectId> {
        let mut next = Some(scope);
        while let Some(id) = next {
            let scope = &self.scopes[id.0];
            if let Some(found) = scope.get(name) {
                return Some(found);
            }
            next = scope.outer;
        }
        self.scopes[GLOBAL_SCOPE.0].get(name)
    }

    // ===== Accessors =====

    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.0]
    }

    pub fn object_mut(&mut self, id: ObjectId) -> &mut Object {
        &mut self.objects[id.0]
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn program(&self) -> Option<ObjectId> {
        self.program
    }

    /// Number of objects, built-ins included
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Built-in objects, in declaration order
    pub fn globals(&self) -> &[ObjectId] {
        self.scopes[GLOBAL_SCOPE.0].objects()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
