use miette::Diagnostic;
use thiserror::Error;

use crate::ast::Span;

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("Syntax error: {message}")]
    #[diagnostic(code(qgrady::parse::syntax))]
    Syntax {
        message: String,
        #[label("here")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Missing required section: {section}")]
    #[diagnostic(
        code(qgrady::parse::missing_section),
        help("a box needs `input = [...]`, `output = [...]` and `range = <in> -> <out>` before its rows")
    )]
    MissingSection { section: String },

    #[error("Duplicate definition: {name}")]
    #[diagnostic(code(qgrady::parse::duplicate))]
    Duplicate {
        name: String,
        #[label("duplicate")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Invalid number '{literal}': {reason}")]
    #[diagnostic(code(qgrady::parse::number))]
    InvalidNumber {
        literal: String,
        reason: String,
        #[label("not a usable number")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },
}

fn source_span(span: Span) -> miette::SourceSpan {
    (span.start, span.len()).into()
}

fn named_source(source: &str, filename: &str) -> miette::NamedSource<String> {
    miette::NamedSource::new(filename, source.to_owned())
}

impl ParseError {
    pub fn syntax(message: impl Into<String>, span: Span, source: &str, filename: &str) -> Self {
        ParseError::Syntax {
            message: message.into(),
            span: source_span(span),
            src: named_source(source, filename),
        }
    }

    pub fn duplicate(name: impl Into<String>, span: Span, source: &str, filename: &str) -> Self {
        ParseError::Duplicate {
            name: name.into(),
            span: source_span(span),
            src: named_source(source, filename),
        }
    }

    pub fn invalid_number(
        literal: impl Into<String>,
        reason: impl Into<String>,
        span: Span,
        source: &str,
        filename: &str,
    ) -> Self {
        ParseError::InvalidNumber {
            literal: literal.into(),
            reason: reason.into(),
            span: source_span(span),
            src: named_source(source, filename),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_syntax_error() {
        let err = ParseError::syntax("unexpected EOF", Span::new(0, 5), "hello", "test.qgrady");
        assert_eq!(err.to_string(), "Syntax error: unexpected EOF");
    }

    #[test]
    fn display_missing_section_error() {
        let err = ParseError::MissingSection {
            section: "range".into(),
        };
        assert_eq!(err.to_string(), "Missing required section: range");
    }

    #[test]
    fn display_duplicate_error() {
        let err = ParseError::duplicate("input", Span::new(0, 5), "input", "test.qgrady");
        assert_eq!(err.to_string(), "Duplicate definition: input");
    }

    #[test]
    fn display_invalid_number_error() {
        let err = ParseError::invalid_number(
            "1/0",
            "zero denominator",
            Span::new(0, 3),
            "1/0",
            "test.qgrady",
        );
        assert_eq!(err.to_string(), "Invalid number '1/0': zero denominator");
    }

    #[test]
    fn syntax_constructor_converts_span_to_offset_and_length() {
        let err = ParseError::syntax("bad token", Span::new(5, 10), "some source code", "f.qgrady");
        match &err {
            ParseError::Syntax { message, span, src } => {
                assert_eq!(message, "bad token");
                assert_eq!(span.offset(), 5);
                assert_eq!(span.len(), 5);
                assert_eq!(src.name(), "f.qgrady");
            }
            _ => panic!("expected Syntax variant"),
        }
    }
}
