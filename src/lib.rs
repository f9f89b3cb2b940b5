//! # Introduction
//!
//! kplc is the front end of a compiler for KPL, a small Pascal-like teaching
//! language. It checks that a program conforms to the grammar, builds the
//! nested declaration scopes, and records the statement bodies of the
//! program and each subprogram. The first defect stops compilation with a
//! single positioned diagnostic.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → TokenCursor → Parser → SymbolTable (+ statement trees)
//! ```
//!
//! 1. [`parser`] tokenizes the source and runs the recursive descent rules.
//! 2. [`symtab`] owns the declared objects, their types and the scope stack.
//! 3. [`diagnostics`] defines the error kinds and renders them for humans.
//! 4. [`compiler`] ties the stages together behind [`compile`] and
//!    [`compile_file`].
//!
//! ## Example
//!
//! ```
//! let compilation = kplc::compile("program P; var x : integer; begin x := 1 end.").unwrap();
//! assert_eq!(compilation.program().name, "P");
//! assert!(compilation.lookup("x").is_some());
//!
//! let err = kplc::compile("program P begin end.").unwrap_err();
//! assert_eq!(err.to_string(), "1-11:Missing ';'");
//! ```

pub mod compiler;
pub mod diagnostics;
pub mod parser;
pub mod symtab;

pub use compiler::{compile, compile_file, Compilation};
pub use diagnostics::{CompileError, Diagnostic, ErrorKind};
