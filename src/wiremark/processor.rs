//! Processing API
//!
//! Turns a source document into one textual rendering chosen by a format string of the
//! form `<stage>-<format>`, for example `token-simple` or `ast-treeviz`. The stage
//! decides how far the pipeline runs; the format decides how its output is printed.
//!
//! ```rust,ignore
//! use wiremark::wiremark::processor::{process, ProcessingSpec};
//!
//! let spec = ProcessingSpec::from_string("ast-treeviz")?;
//! println!("{}", process(source, &spec, None)?);
//! ```

use std::fs;
use std::path::Path;

use crate::wiremark::ast::AstForest;
use crate::wiremark::error::ProcessingError;
use crate::wiremark::formats::{cst_debug, diagnostics, tokens, treeviz};
use crate::wiremark::lexing::lex_with_options;
use crate::wiremark::parsing::parse;
use crate::wiremark::pipeline::{compile_with_options, CompileOptions};

/// How far the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Token,
    Cst,
    Ast,
    Diagnostics,
}

/// How the stage output is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
    Yaml,
    Treeviz,
    Debug,
}

/// A complete processing specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

const SPECS: &[(&str, ProcessingStage, OutputFormat)] = &[
    ("token-simple", ProcessingStage::Token, OutputFormat::Simple),
    ("token-json", ProcessingStage::Token, OutputFormat::Json),
    ("cst-debug", ProcessingStage::Cst, OutputFormat::Debug),
    ("ast-json", ProcessingStage::Ast, OutputFormat::Json),
    ("ast-yaml", ProcessingStage::Ast, OutputFormat::Yaml),
    ("ast-treeviz", ProcessingStage::Ast, OutputFormat::Treeviz),
    ("diagnostics-simple", ProcessingStage::Diagnostics, OutputFormat::Simple),
    ("diagnostics-json", ProcessingStage::Diagnostics, OutputFormat::Json),
];

impl ProcessingSpec {
    /// Parse a format string like `token-simple` or `ast-treeviz`.
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        SPECS
            .iter()
            .find(|(name, _, _)| *name == format_str)
            .map(|(_, stage, format)| ProcessingSpec {
                stage: *stage,
                format: *format,
            })
            .ok_or_else(|| ProcessingError::UnknownFormat(format_str.to_string()))
    }

    pub fn name(&self) -> &'static str {
        SPECS
            .iter()
            .find(|(_, stage, format)| *stage == self.stage && *format == self.format)
            .map(|(name, _, _)| *name)
            .unwrap_or("unknown")
    }
}

/// Every accepted format string, in display order.
pub fn available_formats() -> Vec<&'static str> {
    SPECS.iter().map(|(name, _, _)| *name).collect()
}

/// Rendering settings that are not part of the format string.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    pub compile: CompileOptions,
    pub pretty: bool,
    /// Shown in front of each diagnostic line.
    pub path: Option<String>,
}

/// Render `source` according to `spec`.
pub fn process(
    source: &str,
    spec: &ProcessingSpec,
    previous: Option<&AstForest>,
) -> Result<String, ProcessingError> {
    let options = ProcessOptions {
        pretty: true,
        ..ProcessOptions::default()
    };
    process_with_options(source, spec, previous, &options)
}

pub fn process_with_options(
    source: &str,
    spec: &ProcessingSpec,
    previous: Option<&AstForest>,
    options: &ProcessOptions,
) -> Result<String, ProcessingError> {
    log::debug!("processing as {}", spec.name());
    match spec.stage {
        ProcessingStage::Token => {
            let lexed = lex_with_options(source, &options.compile.lex);
            match spec.format {
                OutputFormat::Json => Ok(tokens::to_json_str(&lexed.tokens, options.pretty)?),
                _ => Ok(tokens::to_simple_str(&lexed.tokens)),
            }
        }
        ProcessingStage::Cst => {
            let lexed = lex_with_options(source, &options.compile.lex);
            Ok(cst_debug::to_cst_debug_str(&parse(&lexed.tokens).cst))
        }
        ProcessingStage::Ast => {
            let result = compile_with_options(source, previous, &options.compile);
            match spec.format {
                OutputFormat::Yaml => Ok(serde_yaml::to_string(&result.ast)?),
                OutputFormat::Treeviz => Ok(treeviz::to_treeviz_str(&result.ast)),
                _ if options.pretty => Ok(serde_json::to_string_pretty(&result.ast)?),
                _ => Ok(serde_json::to_string(&result.ast)?),
            }
        }
        ProcessingStage::Diagnostics => {
            let result = compile_with_options(source, previous, &options.compile);
            match spec.format {
                OutputFormat::Json => Ok(diagnostics::to_json_str(&result.errors, options.pretty)?),
                _ => Ok(diagnostics::to_simple_str(
                    &result.errors,
                    options.path.as_deref(),
                )),
            }
        }
    }
}

/// Read a source document.
pub fn read_source(path: impl AsRef<Path>) -> Result<String, ProcessingError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ProcessingError::FileNotFound(path.display().to_string()));
    }
    Ok(fs::read_to_string(path)?)
}

/// Read a previously emitted `ast-json` document for id reuse.
pub fn read_previous(path: impl AsRef<Path>) -> Result<AstForest, ProcessingError> {
    let text = read_source(path)?;
    serde_json::from_str(&text).map_err(|e| ProcessingError::InvalidPrevious(e.to_string()))
}
