#![allow(clippy::result_large_err)]

use pest::Parser;
use pest_derive::Parser;

use crate::ast::*;
use crate::errors::ParseError;

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct BoxParser;

type Pair<'a> = pest::iterators::Pair<'a, Rule>;

fn span_from(pair: &Pair<'_>) -> Span {
    let s = pair.as_span();
    Span::new(s.start(), s.end())
}

/// Source text and file name threaded through AST building for diagnostics.
#[derive(Clone, Copy)]
struct Ctx<'s> {
    source: &'s str,
    filename: &'s str,
}

impl Ctx<'_> {
    fn syntax(&self, span: Span, message: impl Into<String>) -> ParseError {
        ParseError::syntax(message, span, self.source, self.filename)
    }

    /// Next child of a grammar-guaranteed sequence.
    fn child<'a>(
        &self,
        inner: &mut pest::iterators::Pairs<'a, Rule>,
        parent: Span,
        what: &str,
    ) -> Result<Pair<'a>, ParseError> {
        inner
            .next()
            .ok_or_else(|| self.syntax(parent, format!("expected {what}")))
    }
}

/// Parse a .qgrady source file into an AST Program.
pub fn parse(source: &str, filename: &str) -> Result<Program, ParseError> {
    let ctx = Ctx { source, filename };
    let mut pairs = BoxParser::parse(Rule::program, source).map_err(|e| {
        let (start, end) = match e.location {
            pest::error::InputLocation::Pos(p) => (p, p + 1),
            pest::error::InputLocation::Span((s, e)) => (s, e),
        };
        ParseError::syntax(
            format!("{e}"),
            Span::new(start, end.min(source.len())),
            source,
            filename,
        )
    })?;

    let program_pair = pairs
        .next()
        .ok_or_else(|| ctx.syntax(Span::new(0, 0), "empty parse tree"))?;
    let span = span_from(&program_pair);

    let mut inputs: Option<Vec<Spanned<String>>> = None;
    let mut outputs: Option<Vec<Spanned<String>>> = None;
    let mut ranges: Option<Spanned<RangeDecl>> = None;
    let mut rows = Vec::new();

    for item in program_pair.into_inner() {
        let item_span = span_from(&item);
        match item.as_rule() {
            Rule::input_decl => {
                if inputs.is_some() {
                    return Err(ParseError::duplicate("input", item_span, source, filename));
                }
                inputs = Some(parse_name_decl(item, ctx)?);
            }
            Rule::output_decl => {
                if outputs.is_some() {
                    return Err(ParseError::duplicate("output", item_span, source, filename));
                }
                outputs = Some(parse_name_decl(item, ctx)?);
            }
            Rule::range_decl => {
                if ranges.is_some() {
                    return Err(ParseError::duplicate("range", item_span, source, filename));
                }
                ranges = Some(parse_range_decl(item, ctx)?);
            }
            Rule::row => rows.push(parse_row(item, ctx)?),
            _ => {}
        }
    }

    let missing = |section: &str| ParseError::MissingSection {
        section: section.to_string(),
    };
    let decl = BoxDecl {
        inputs: inputs.ok_or_else(|| missing("input"))?,
        outputs: outputs.ok_or_else(|| missing("output"))?,
        ranges: ranges.ok_or_else(|| missing("range"))?,
        rows,
    };

    Ok(Program {
        decl: Spanned::new(decl, span),
    })
}

fn parse_name_decl(pair: Pair<'_>, ctx: Ctx<'_>) -> Result<Vec<Spanned<String>>, ParseError> {
    let span = span_from(&pair);
    let list = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::name_list)
        .ok_or_else(|| ctx.syntax(span, "expected a name list"))?;
    Ok(list
        .into_inner()
        .filter(|p| p.as_rule() == Rule::ident)
        .map(|p| Spanned::new(p.as_str().to_string(), span_from(&p)))
        .collect())
}

fn parse_range_decl(pair: Pair<'_>, ctx: Ctx<'_>) -> Result<Spanned<RangeDecl>, ParseError> {
    let span = span_from(&pair);
    let mut inner = pair.into_inner().filter(|p| p.as_rule() == Rule::integer);
    let input = inner
        .next()
        .ok_or_else(|| ctx.syntax(span, "expected an input range"))?;
    let output = inner
        .next()
        .ok_or_else(|| ctx.syntax(span, "expected an output range"))?;
    Ok(Spanned::new(
        RangeDecl {
            input: parse_integer(&input, ctx)?,
            output: parse_integer(&output, ctx)?,
        },
        span,
    ))
}

fn parse_row(pair: Pair<'_>, ctx: Ctx<'_>) -> Result<Spanned<Vec<f64>>, ParseError> {
    let span = span_from(&pair);
    let values = pair
        .into_inner()
        .filter(|p| p.as_rule() == Rule::probability)
        .map(|p| parse_probability(p, ctx))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Spanned::new(values, span))
}

fn parse_probability(pair: Pair<'_>, ctx: Ctx<'_>) -> Result<f64, ParseError> {
    let span = span_from(&pair);
    let mut inner = pair.into_inner();
    let value = ctx.child(&mut inner, span, "a probability")?;
    match value.as_rule() {
        Rule::number => value.as_str().parse::<f64>().map_err(|e| {
            ParseError::invalid_number(value.as_str(), e.to_string(), span, ctx.source, ctx.filename)
        }),
        Rule::fraction => {
            let mut parts = value.into_inner();
            let numerator = ctx.child(&mut parts, span, "a numerator")?;
            let denominator = ctx.child(&mut parts, span, "a denominator")?;
            let n = parse_integer(&numerator, ctx)? as f64;
            let d = parse_integer(&denominator, ctx)? as f64;
            if d == 0.0 {
                let literal = &ctx.source[span.start..span.end];
                return Err(ParseError::invalid_number(
                    literal,
                    "zero denominator",
                    span,
                    ctx.source,
                    ctx.filename,
                ));
            }
            Ok(n / d)
        }
        other => Err(ctx.syntax(span, format!("unexpected {other:?} in probability"))),
    }
}

fn parse_integer(pair: &Pair<'_>, ctx: Ctx<'_>) -> Result<usize, ParseError> {
    pair.as_str().parse::<usize>().map_err(|e| {
        ParseError::invalid_number(
            pair.as_str(),
            e.to_string(),
            span_from(pair),
            ctx.source,
            ctx.filename,
        )
    })
}
