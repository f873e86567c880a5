//! Diagnostics shared by every compiler stage
//!
//! Lexer, parser and builder never fail outright. They report what went wrong
//! as [`Diagnostic`] values and keep going. The [`Diagnostics`] aggregator
//! collects them stage by stage so that the final list is ordered lexer →
//! parser → builder, each stage in the order it produced them.

use crate::wiremark::ast::NodeType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Lexer,
    Parser,
    Builder,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lexer => write!(f, "lexer"),
            Stage::Parser => write!(f, "parser"),
            Stage::Builder => write!(f, "builder"),
        }
    }
}

/// Severity levels, totally ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

/// Stable machine-readable diagnostic codes, grouped by stage.
pub mod codes {
    pub const LEXER_INVALID_TOKEN: &str = "lexer/invalid-token";
    pub const LEXER_TAB_INDENTATION: &str = "lexer/tab-indentation";
    pub const LEXER_INCONSISTENT_DEDENT: &str = "lexer/inconsistent-dedent";

    pub const PARSER_UNEXPECTED_TOKEN: &str = "parser/unexpected-token";
    pub const PARSER_UNEXPECTED_END: &str = "parser/unexpected-end";

    pub const BUILDER_MISSING_REQUIRED: &str = "builder/missing-required";
    pub const BUILDER_INVALID_NAME: &str = "builder/invalid-name";
    pub const BUILDER_INVALID_PROPS: &str = "builder/invalid-props";
    pub const BUILDER_INVALID_MODIFIERS: &str = "builder/invalid-modifiers";
    pub const BUILDER_NESTING_TOO_DEEP: &str = "builder/nesting-too-deep";
    pub const BUILDER_INTERNAL_ERROR: &str = "builder/internal-error";
}

/// A structured problem report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub stage: Stage,
    pub severity: Severity,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
}

impl Diagnostic {
    pub fn new(
        stage: Stage,
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            severity,
            code: code.into(),
            message: message.into(),
            hint: None,
            line: None,
            column: None,
            length: None,
            node_type: None,
        }
    }

    /// Attach a 1-based source position.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_node_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    /// Error or fatal.
    pub fn is_error(&self) -> bool {
        self.severity >= Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, "{}:{} ", line, column)?,
            (Some(line), None) => write!(f, "{} ", line)?,
            _ => {}
        }
        write!(f, "{}[{}] {}", self.severity, self.code, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " ({})", hint)?;
        }
        Ok(())
    }
}

/// Worst severity among `diagnostics`, `None` when there are none.
pub fn worst_severity<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> Option<Severity> {
    diagnostics.into_iter().map(|d| d.severity).max()
}

/// Ordered collection of diagnostics from all stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append everything one stage reported. Stages must be added in
    /// pipeline order.
    pub fn extend_stage(&mut self, stage: Stage, diagnostics: Vec<Diagnostic>) {
        debug_assert!(
            diagnostics.iter().all(|d| d.stage == stage),
            "diagnostics handed to the {} stage slot came from another stage",
            stage
        );
        debug_assert!(
            self.items.last().map_or(true, |last| last.stage <= stage),
            "stage {} added after a later stage",
            stage
        );
        log::debug!("{} stage reported {} diagnostic(s)", stage, diagnostics.len());
        self.items.extend(diagnostics);
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn worst(&self) -> Option<Severity> {
        worst_severity(&self.items)
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn by_stage(&self, stage: Stage) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.stage == stage)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_total_order() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_worst_severity() {
        let diags = vec![
            Diagnostic::new(Stage::Lexer, Severity::Warning, "a", "a"),
            Diagnostic::new(Stage::Parser, Severity::Error, "b", "b"),
            Diagnostic::new(Stage::Builder, Severity::Info, "c", "c"),
        ];
        assert_eq!(worst_severity(&diags), Some(Severity::Error));
        assert_eq!(worst_severity(&Vec::<Diagnostic>::new()), None);
    }

    #[test]
    fn test_aggregator_keeps_stage_order() {
        let mut all = Diagnostics::new();
        all.extend_stage(
            Stage::Lexer,
            vec![Diagnostic::new(Stage::Lexer, Severity::Error, codes::LEXER_INVALID_TOKEN, "x")],
        );
        all.extend_stage(Stage::Parser, vec![]);
        all.extend_stage(
            Stage::Builder,
            vec![Diagnostic::new(
                Stage::Builder,
                Severity::Warning,
                codes::BUILDER_INVALID_PROPS,
                "y",
            )],
        );
        let stages: Vec<Stage> = all.iter().map(|d| d.stage).collect();
        assert_eq!(stages, vec![Stage::Lexer, Stage::Builder]);
        assert!(all.has_errors());
        assert_eq!(all.by_stage(Stage::Builder).count(), 1);
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic::new(
            Stage::Builder,
            Severity::Error,
            codes::BUILDER_INVALID_NAME,
            "bad name",
        )
        .at(3, 7)
        .with_hint("use PascalCase");
        assert_eq!(
            diag.to_string(),
            "3:7 error[builder/invalid-name] bad name (use PascalCase)"
        );
    }

    #[test]
    fn test_wire_shape_omits_absent_fields() {
        let diag = Diagnostic::new(Stage::Lexer, Severity::Fatal, "lexer/x", "m")
            .with_node_type(NodeType::Screen);
        let value = serde_json::to_value(&diag).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "stage": "lexer",
                "severity": "fatal",
                "code": "lexer/x",
                "message": "m",
                "nodeType": "Screen"
            })
        );
    }
}
