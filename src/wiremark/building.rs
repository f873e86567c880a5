//! AST building
//!
//!     The builder walks the CST produced by the parser and emits the AST. During this
//!     step compound tokens are decomposed into fields, every field is validated, and
//!     documented defaults stand in for missing or invalid values.
//!
//! Layers
//!
//!     The building process follows the same layering as the rest of the compiler:
//!
//!         1. Data Extraction - split token images into primitive fields
//!            ([extraction], and [attributes] for input declarations)
//!         2. Validation - name, modifier and property rules ([validation])
//!         3. AST Creation - one function per CST construct ([builders])
//!
//!     All diagnostics go to the [context::BuildContext] owned by one call to [build].
//!
//! Failure Containment
//!
//!     Validation problems are diagnostics, never failures. A block nested deeper
//!     than [context::MAX_NESTING] levels is left out with a `builder/nesting-too-deep`
//!     error while everything around it still builds. A panic while visiting is
//!     caught once in [build]; the caller then receives an empty forest and a single
//!     fatal `builder/internal-error` diagnostic instead of the partial results.

pub mod attributes;
pub mod context;
pub mod validation;

pub(super) mod builders;
pub(super) mod extraction;

pub use context::{BuildContext, BuildFailure, MAX_NESTING};

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::wiremark::ast::AstForest;
use crate::wiremark::diagnostics::{codes, Diagnostic, Severity, Stage};
use crate::wiremark::parsing::Program;

/// AST and builder diagnostics for one CST.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOutput {
    pub ast: AstForest,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the AST for a parsed program. Node ids are left empty.
pub fn build(program: &Program) -> BuildOutput {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let mut ctx = BuildContext::new();
        let nodes = builders::build_program(program, &mut ctx);
        (nodes, ctx.into_diagnostics())
    }));

    let failure = match outcome {
        Ok((nodes, diagnostics)) => {
            let ast = AstForest::new(nodes);
            log::debug!(
                "built {} node(s), {} diagnostic(s)",
                ast.node_count(),
                diagnostics.len()
            );
            return BuildOutput { ast, diagnostics };
        }
        Err(payload) => BuildFailure(panic_message(payload.as_ref())),
    };

    log::debug!("build aborted: {}", failure);
    BuildOutput {
        ast: AstForest::default(),
        diagnostics: vec![internal_error(&failure)],
    }
}

fn internal_error(failure: &BuildFailure) -> Diagnostic {
    Diagnostic::new(
        Stage::Builder,
        Severity::Fatal,
        codes::BUILDER_INTERNAL_ERROR,
        failure.to_string(),
    )
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
