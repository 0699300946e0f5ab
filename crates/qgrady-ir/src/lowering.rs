//! AST to `DistributionTable` conversion and source-span diagnostics.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::table::DistributionTable;
use crate::validation::ValidationError;
use qgrady_dsl::ast;

/// Lower a parsed box into a table. No checks are made here; the validator
/// owns every semantic rule.
pub fn lower(program: &ast::Program) -> DistributionTable {
    let decl = &program.decl.node;
    DistributionTable::new(
        decl.input_names(),
        decl.output_names(),
        decl.ranges.node.input,
        decl.ranges.node.output,
        decl.matrix(),
    )
}

/// A validation error enriched with source span information for pretty-printed diagnostics.
#[derive(Debug, Error, Diagnostic)]
#[error("{inner}")]
#[diagnostic(code(qgrady::validate))]
pub struct SpannedValidationError {
    #[source_code]
    pub src: NamedSource<String>,
    pub inner: ValidationError,
    #[label("here")]
    pub span: Option<SourceSpan>,
}

impl SpannedValidationError {
    pub fn new(
        err: ValidationError,
        program: &ast::Program,
        source: &str,
        filename: &str,
    ) -> Self {
        let span = find_span_for_error(&err, program);
        Self {
            src: NamedSource::new(filename, source.to_string()),
            inner: err,
            span: span.map(|s| SourceSpan::new(s.start.into(), s.len())),
        }
    }
}

/// Best-effort source location for a validation failure.
pub fn find_span_for_error(err: &ValidationError, program: &ast::Program) -> Option<ast::Span> {
    let decl = &program.decl.node;
    match err {
        ValidationError::InvalidValue { row, .. }
        | ValidationError::InvalidRowLength { row, .. }
        | ValidationError::InvalidRowSum { row, .. } => decl.row_span(*row),
        ValidationError::InvalidRowCount { expected, actual } if actual > expected => {
            // Point at the first surplus row.
            decl.row_span(*expected)
        }
        ValidationError::InvalidRowCount { .. }
        | ValidationError::InvalidRange { .. }
        | ValidationError::DimensionOverflow { .. } => Some(decl.ranges.span),
        ValidationError::UnequalParties { .. } | ValidationError::NoParties => {
            decl.outputs.last().map(|n| n.span).or(Some(program.decl.span))
        }
        ValidationError::InvalidVariable { name, .. } => decl.last_name_span(name),
        ValidationError::Signalling { party, .. } => decl.inputs.get(*party).map(|n| n.span),
        ValidationError::Index(_) | ValidationError::InvalidTolerance { .. } => None,
    }
}
