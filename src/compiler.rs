//! Compile entry points
//!
//! [`compile`] runs the parser over one source text and hands back the
//! populated symbol table wrapped in a [`Compilation`]. [`compile_file`] adds
//! reading the input, and [`tokens`] exposes the raw token stream.

use std::fs;
use std::path::Path;

use log::info;

use crate::diagnostics::{CompileError, Diagnostic};
use crate::parser::ast::Stmt;
use crate::parser::lexer::{Lexer, Token, TokenKind};
use crate::parser::Parser;
use crate::symtab::print::render_object;
use crate::symtab::{Object, ObjectId, SymbolTable};

/// Result of a successful compile
#[derive(Debug, Clone)]
pub struct Compilation {
    table: SymbolTable,
    program: ObjectId,
}

impl Compilation {
    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    /// Mutable access to the declarations, for tools that annotate them
    pub fn table_mut(&mut self) -> &mut SymbolTable {
        &mut self.table
    }

    /// The root program object
    pub fn program(&self) -> &Object {
        self.table.object(self.program)
    }

    /// Statements of the main block
    pub fn body(&self) -> &[Stmt] {
        self.program().body().unwrap_or_default()
    }

    /// Resolve `name` among the program's top-level declarations.
    pub fn lookup(&self, name: &str) -> Option<ObjectId> {
        let scope = self.program().scope()?;
        self.table.lookup_in(scope, name)
    }

    /// Indented dump of every declaration under the program.
    pub fn render_tree(&self) -> String {
        render_object(&self.table, self.program)
    }
}

/// Parse and scope-check one KPL program.
pub fn compile(source: &str) -> Result<Compilation, Diagnostic> {
    let mut parser = Parser::new(source)?;
    let program = parser.compile_program()?;
    let table = parser.into_table();

    info!(
        "compiled program '{}' ({} objects)",
        table.object(program).name,
        table.len()
    );
    Ok(Compilation { table, program })
}

/// Read `path` and compile it.
pub fn compile_file(path: impl AsRef<Path>) -> Result<Compilation, CompileError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("read {} ({} bytes)", path.display(), source.len());

    Ok(compile(&source)?)
}

/// Scan `source` lazily. The stream ends after the end-of-file token or
/// after the first lexical defect.
pub fn tokens(source: &str) -> Tokens {
    Tokens {
        lexer: Lexer::new(source),
        finished: false,
    }
}

/// Iterator returned by [`tokens`]
pub struct Tokens {
    lexer: Lexer,
    finished: bool,
}

impl Iterator for Tokens {
    type Item = Result<Token, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.lexer.next_token();
        self.finished = !matches!(&result, Ok(token) if token.kind != TokenKind::Eof);
        Some(result)
    }
}
