//! # wiremark
//!
//! Compiler front end for the Wiremark UI markup language.
//!
//! Wiremark describes screens, modals, drawers and reusable components with an
//! indentation-sensitive syntax. This crate turns source text into a normalized
//! AST for a downstream renderer:
//!
//! text → [lexer](wiremark::lexing) → [parser](wiremark::parsing) →
//! [builder](wiremark::building) → [id assigner](wiremark::identity) → AST
//!
//! Every stage reports problems as [diagnostics](wiremark::diagnostics) instead of
//! failing, so callers always get a best-effort AST plus the complete list of
//! problems. See [`compile`].

pub mod wiremark;

pub use wiremark::ast::{AstForest, AstNode, NodeType};
pub use wiremark::diagnostics::{Diagnostic, Severity, Stage};
pub use wiremark::pipeline::{compile, compile_with_options, CompileOptions, CompileResult};
