//! Text-free records of a generated PRISM model.
//!
//! The generator produces an [`Automaton`]; `prism::render` turns it into
//! source text. Everything here is plain data so that tests can inspect the
//! model without parsing PRISM.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModelType {
    Dtmc,
}

impl ModelType {
    pub fn keyword(self) -> &'static str {
        match self {
            ModelType::Dtmc => "dtmc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Value {
    Int(i64),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Domain {
    Range { low: i64, high: i64 },
    Bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: String,
    pub domain: Domain,
    pub init: Value,
}

/// Guard conjunct `(variable = value)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Atom {
    pub variable: String,
    pub value: Value,
}

/// Update `(variable' = value)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub variable: String,
    pub value: Value,
}

/// Branch weight. Uniform choices keep their exact ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Weight {
    Ratio { numerator: usize, denominator: usize },
    Decimal(f64),
}

impl Weight {
    pub fn is_certain(self) -> bool {
        match self {
            Weight::Ratio {
                numerator,
                denominator,
            } => numerator == denominator,
            Weight::Decimal(p) => p == 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branch {
    pub weight: Weight,
    pub updates: Vec<Assignment>,
}

/// Kinds of command, in the order they appear within their module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CommandFamily {
    /// Input module draws a fresh input value.
    CoinToss,
    /// Input module hands its value to the output module.
    Consume,
    /// Output module records a consumed input.
    InputSync,
    /// First disclosure of a round, from the single-party marginal.
    Reduced,
    /// Later disclosures, conditioned on what has been revealed.
    Normalised,
}

/// Total order of commands within a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CommandKey {
    pub family: CommandFamily,
    pub subset_size: usize,
    pub subset_mask: u64,
    pub party: usize,
    pub input_value: usize,
    pub input_tuple: usize,
    pub output_tuple: usize,
}

impl CommandKey {
    pub fn new(family: CommandFamily, party: usize, input_value: usize) -> Self {
        Self {
            family,
            subset_size: 0,
            subset_mask: 0,
            party,
            input_value,
            input_tuple: 0,
            output_tuple: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Command {
    pub key: CommandKey,
    /// Synchronisation label; `None` renders as `[]`.
    pub label: Option<String>,
    pub guard: Vec<Atom>,
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub name: String,
    pub variables: Vec<Variable>,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Automaton {
    pub model_type: ModelType,
    pub modules: Vec<Module>,
}

impl Automaton {
    pub fn command_count(&self) -> usize {
        self.modules.iter().map(|m| m.commands.len()).sum()
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }
}

pub(crate) fn atom(variable: impl Into<String>, value: Value) -> Atom {
    Atom {
        variable: variable.into(),
        value,
    }
}

pub(crate) fn assign(variable: impl Into<String>, value: Value) -> Assignment {
    Assignment {
        variable: variable.into(),
        value,
    }
}

/// `usize` values always fit PRISM's `int` for the ranges the validator accepts.
pub(crate) fn int(value: usize) -> Value {
    Value::Int(i64::try_from(value).unwrap_or(i64::MAX))
}

pub(crate) const UNSET: Value = Value::Int(-1);
