//! Per-build state threaded through every builder function.

use crate::wiremark::ast::NodeType;
use crate::wiremark::diagnostics::{codes, Diagnostic, Severity, Stage};
use crate::wiremark::lexing::Token;

/// Deepest block nesting the builder will follow. Deeper blocks are left out.
pub const MAX_NESTING: usize = 256;

/// A panic caught while building. Everything else is a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal builder failure: {0}")]
pub struct BuildFailure(pub String);

/// Diagnostic accumulator and counters for exactly one build.
#[derive(Debug, Default)]
pub struct BuildContext {
    diagnostics: Vec<Diagnostic>,
    radio_groups: usize,
    depth: usize,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder diagnostic pointing at `at`.
    pub fn problem(
        severity: Severity,
        code: &str,
        node_type: NodeType,
        at: &Token,
        message: impl Into<String>,
    ) -> Diagnostic {
        let diagnostic = Diagnostic::new(Stage::Builder, severity, code, message)
            .at(at.line, at.column)
            .with_node_type(node_type);
        match at.width() {
            0 => diagnostic,
            width => diagnostic.with_length(width),
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::trace!("builder: {}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, code: &str, node_type: NodeType, at: &Token, message: impl Into<String>) {
        self.report(Self::problem(Severity::Error, code, node_type, at, message));
    }

    pub fn warn(&mut self, code: &str, node_type: NodeType, at: &Token, message: impl Into<String>) {
        self.report(Self::problem(Severity::Warning, code, node_type, at, message));
    }

    /// Name of the next radio group, `radio-1` first.
    pub fn next_radio_group(&mut self) -> String {
        self.radio_groups += 1;
        format!("radio-{}", self.radio_groups)
    }

    /// Run `f` for the block starting at `start`, one nesting level deeper.
    ///
    /// Past [MAX_NESTING] the block is not visited: an error is reported at `start`
    /// and the block contributes `T::default()`.
    pub fn nested<T: Default>(&mut self, start: &Token, f: impl FnOnce(&mut Self) -> T) -> T {
        if self.depth >= MAX_NESTING {
            let diagnostic = Diagnostic::new(
                Stage::Builder,
                Severity::Error,
                codes::BUILDER_NESTING_TOO_DEEP,
                format!("blocks are nested deeper than {} levels; this block is left out", MAX_NESTING),
            )
            .at(start.line, start.column)
            .with_hint("flatten the block or move it into a component");
            self.report(diagnostic);
            return T::default();
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
