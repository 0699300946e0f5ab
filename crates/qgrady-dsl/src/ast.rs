/// Source span for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A spanned AST node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Top-level program = a single box declaration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Program {
    pub decl: Spanned<BoxDecl>,
}

/// A non-local box: party variables, value ranges and the probability rows.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct BoxDecl {
    /// Input variable of each party, in party order.
    pub inputs: Vec<Spanned<String>>,
    /// Output variable of each party, in party order.
    pub outputs: Vec<Spanned<String>>,
    pub ranges: Spanned<RangeDecl>,
    /// One row per mixed-radix encoded input tuple.
    pub rows: Vec<Spanned<Vec<f64>>>,
}

/// `range = <input range> -> <output range>;`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct RangeDecl {
    pub input: usize,
    pub output: usize,
}

impl BoxDecl {
    pub fn input_names(&self) -> Vec<String> {
        self.inputs.iter().map(|n| n.node.clone()).collect()
    }

    pub fn output_names(&self) -> Vec<String> {
        self.outputs.iter().map(|n| n.node.clone()).collect()
    }

    pub fn matrix(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|r| r.node.clone()).collect()
    }

    /// Span of the first declaration of `name` among inputs, then outputs.
    pub fn name_span(&self, name: &str) -> Option<Span> {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .find(|n| n.node == name)
            .map(|n| n.span)
    }

    /// Span of the last declaration of `name`; points at the repeat for duplicates.
    pub fn last_name_span(&self, name: &str) -> Option<Span> {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .rev()
            .find(|n| n.node == name)
            .map(|n| n.span)
    }

    pub fn row_span(&self, row: usize) -> Option<Span> {
        self.rows.get(row).map(|r| r.span)
    }
}
