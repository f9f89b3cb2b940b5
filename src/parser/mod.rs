//! KPL source code parser
//!
//! This module turns KPL source text into declarations and statement trees:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`cursor`]: One-token lookahead over any [`lexer::TokenSource`]
//! - [`parse`]: The [`Parser`] and the program/block rules
//! - [`declarations`], [`statements`], [`expressions`]: the remaining rules
//! - [`follow`]: Continuation sets that end optional tails
//! - [`ast`]: Statement and expression node definitions
//!
//! # Parser Implementation
//!
//! Hand-written predictive recursive descent with one token of lookahead.
//! Declarations go straight into the [`crate::symtab::SymbolTable`] as they
//! are recognized; statement bodies are attached to their owning program,
//! function or procedure. Parsing stops at the first defect.

pub mod ast;
pub mod cursor;
pub mod declarations;
pub mod expressions;
pub mod follow;
pub mod lexer;
pub mod parse;
pub mod statements;

pub use parse::Parser;
