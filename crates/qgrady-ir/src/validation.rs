//! Semantic validation of a `DistributionTable`.
//!
//! Checks run in a fixed order and stop at the first failure. Later checks
//! rely on the shape guarantees of earlier ones, so `run_check` on a single
//! check is only meaningful once every preceding check has passed.

use indexmap::IndexSet;
use miette::Diagnostic;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::naming;
use crate::radix;
use crate::table::{DistributionTable, IndexError, TupleKind};

/// Absolute tolerance for row sums and marginal comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationConfig {
    pub tolerance: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ValidationConfig {
    /// Refuses NaN, infinite and negative tolerances.
    pub fn ensure_usable(&self) -> Result<(), ValidationError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ValidationError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }
        Ok(())
    }
}

/// The validation stages, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    ValueRange,
    RowCount,
    RowLength,
    RowSum,
    PartyBalance,
    VariableNaming,
    NonSignalling,
}

impl Check {
    pub const ALL: [Check; 7] = [
        Check::ValueRange,
        Check::RowCount,
        Check::RowLength,
        Check::RowSum,
        Check::PartyBalance,
        Check::VariableNaming,
        Check::NonSignalling,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Check::ValueRange => "value range",
            Check::RowCount => "row count",
            Check::RowLength => "row length",
            Check::RowSum => "row sum",
            Check::PartyBalance => "party balance",
            Check::VariableNaming => "variable naming",
            Check::NonSignalling => "non-signalling",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a declared name cannot be used as a PRISM variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingIssue {
    NotAnIdentifier,
    ReservedKeyword,
    Duplicate,
    /// Collides with an identifier the generator introduces.
    GeneratedName,
}

impl fmt::Display for NamingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingIssue::NotAnIdentifier => write!(f, "not a valid identifier"),
            NamingIssue::ReservedKeyword => write!(f, "reserved PRISM keyword"),
            NamingIssue::Duplicate => write!(f, "declared more than once"),
            NamingIssue::GeneratedName => {
                write!(f, "clashes with a variable of the generated model")
            }
        }
    }
}

/// Where a non-signalling violation was observed.
///
/// `other_inputs` and `other_outputs` hold the values of every party except
/// the offending one, in party order.
#[derive(Debug, Clone, PartialEq)]
pub struct SignallingContext {
    pub other_inputs: Vec<usize>,
    pub other_outputs: Vec<usize>,
    pub baseline_input: usize,
    pub baseline_marginal: f64,
    pub input: usize,
    pub marginal: f64,
}

impl fmt::Display for SignallingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "with other inputs {:?} and other outputs {:?}, input {} gives marginal {} but input {} gives {}",
            self.other_inputs,
            self.other_outputs,
            self.baseline_input,
            self.baseline_marginal,
            self.input,
            self.marginal
        )
    }
}

#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ValidationError {
    #[error("Invalid probability {value} at row {row}, column {column}")]
    #[diagnostic(
        code(qgrady::validate::value),
        help("every probability must lie in [0, 1]")
    )]
    InvalidValue {
        row: usize,
        column: usize,
        value: f64,
    },

    #[error("Invalid {kind} range {range}: at least one value is required")]
    #[diagnostic(code(qgrady::validate::range))]
    InvalidRange { kind: TupleKind, range: usize },

    #[error("Too many {kind} tuples: {range}^{parties} does not fit the index space")]
    #[diagnostic(code(qgrady::validate::dimension))]
    DimensionOverflow {
        kind: TupleKind,
        range: usize,
        parties: usize,
    },

    #[error("Expected {expected} rows, got {actual}")]
    #[diagnostic(
        code(qgrady::validate::row_count),
        help("a box needs one row per input tuple, i.e. input_range^parties rows")
    )]
    InvalidRowCount { expected: usize, actual: usize },

    #[error("Error in row {row}: Expected {expected} values, got {actual}")]
    #[diagnostic(code(qgrady::validate::row_length))]
    InvalidRowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Error in row {row}: Expected sum of 1.0, got {sum}")]
    #[diagnostic(code(qgrady::validate::row_sum))]
    InvalidRowSum { row: usize, sum: f64 },

    #[error("Box declares no parties")]
    #[diagnostic(code(qgrady::validate::no_parties))]
    NoParties,

    #[error("Unequal parties: {inputs} inputs but {outputs} outputs")]
    #[diagnostic(
        code(qgrady::validate::parties),
        help("every party has exactly one input and one output variable")
    )]
    UnequalParties { inputs: usize, outputs: usize },

    #[error("Invalid variable '{name}': {reason}")]
    #[diagnostic(code(qgrady::validate::variable))]
    InvalidVariable { name: String, reason: NamingIssue },

    #[error("Signalling found: party {party} can signal through its input ({context})")]
    #[diagnostic(
        code(qgrady::validate::signalling),
        help("the other parties' joint marginal must not depend on this party's input")
    )]
    Signalling {
        party: usize,
        context: SignallingContext,
    },

    #[error("Invalid tolerance {tolerance}: must be a finite, non-negative number")]
    #[diagnostic(code(qgrady::validate::tolerance))]
    InvalidTolerance { tolerance: f64 },

    #[error(transparent)]
    #[diagnostic(code(qgrady::validate::index))]
    Index(#[from] IndexError),
}

/// Run every check with the default configuration.
pub fn validate(table: &DistributionTable) -> Result<(), ValidationError> {
    validate_with(table, &ValidationConfig::default())
}

pub fn validate_with(
    table: &DistributionTable,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    for check in Check::ALL {
        run_check(check, table, config)?;
        debug!(check = %check, "validation check passed");
    }
    Ok(())
}

pub fn run_check(
    check: Check,
    table: &DistributionTable,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    config.ensure_usable()?;
    match check {
        Check::ValueRange => check_value_range(table),
        Check::RowCount => check_row_count(table),
        Check::RowLength => check_row_length(table),
        Check::RowSum => check_row_sum(table, config.tolerance),
        Check::PartyBalance => check_party_balance(table),
        Check::VariableNaming => check_variable_naming(table),
        Check::NonSignalling => check_non_signalling(table, config.tolerance),
    }
}

pub fn check_value_range(table: &DistributionTable) -> Result<(), ValidationError> {
    for (row, cells) in table.matrix().iter().enumerate() {
        for (column, &value) in cells.iter().enumerate() {
            // NaN fails `contains`.
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::InvalidValue { row, column, value });
            }
        }
    }
    Ok(())
}

fn dimension(
    kind: TupleKind,
    range: usize,
    parties: usize,
) -> Result<usize, ValidationError> {
    if range == 0 {
        return Err(ValidationError::InvalidRange { kind, range });
    }
    radix::tuple_count(range, parties).ok_or(ValidationError::DimensionOverflow {
        kind,
        range,
        parties,
    })
}

pub fn check_row_count(table: &DistributionTable) -> Result<(), ValidationError> {
    // Both ranges are checked here, before any row is interpreted.
    dimension(TupleKind::Output, table.output_range(), 0)?;
    let expected = dimension(TupleKind::Input, table.input_range(), table.inputs().len())?;
    let actual = table.matrix().len();
    if actual != expected {
        return Err(ValidationError::InvalidRowCount { expected, actual });
    }
    Ok(())
}

pub fn check_row_length(table: &DistributionTable) -> Result<(), ValidationError> {
    let expected = dimension(TupleKind::Output, table.output_range(), table.outputs().len())?;
    for (row, cells) in table.matrix().iter().enumerate() {
        if cells.len() != expected {
            return Err(ValidationError::InvalidRowLength {
                row,
                expected,
                actual: cells.len(),
            });
        }
    }
    Ok(())
}

pub fn check_row_sum(table: &DistributionTable, tolerance: f64) -> Result<(), ValidationError> {
    for (row, cells) in table.matrix().iter().enumerate() {
        let sum: f64 = cells.iter().sum();
        if (sum - 1.0).abs() > tolerance {
            return Err(ValidationError::InvalidRowSum { row, sum });
        }
    }
    Ok(())
}

pub fn check_party_balance(table: &DistributionTable) -> Result<(), ValidationError> {
    let inputs = table.inputs().len();
    let outputs = table.outputs().len();
    if inputs != outputs {
        return Err(ValidationError::UnequalParties { inputs, outputs });
    }
    if inputs == 0 {
        return Err(ValidationError::NoParties);
    }
    Ok(())
}

pub fn check_variable_naming(table: &DistributionTable) -> Result<(), ValidationError> {
    fn invalid(name: &str, reason: NamingIssue) -> ValidationError {
        ValidationError::InvalidVariable {
            name: name.to_string(),
            reason,
        }
    }

    let mut declared: IndexSet<&str> = IndexSet::new();
    for name in table.inputs().iter().chain(table.outputs()) {
        if !naming::is_identifier(name) {
            return Err(invalid(name, NamingIssue::NotAnIdentifier));
        }
        if naming::is_reserved_keyword(name) {
            return Err(invalid(name, NamingIssue::ReservedKeyword));
        }
        if !declared.insert(name.as_str()) {
            return Err(invalid(name, NamingIssue::Duplicate));
        }
    }

    if let Some(name) = declared
        .iter()
        .copied()
        .find(|name| naming::is_generated(name, table.inputs(), table.input_range()))
    {
        return Err(invalid(name, NamingIssue::GeneratedName));
    }
    Ok(())
}

/// For each party `i`, the joint marginal of the other parties' outputs must
/// not depend on `i`'s input. The first input value is the baseline every
/// other value is compared against.
pub fn check_non_signalling(
    table: &DistributionTable,
    tolerance: f64,
) -> Result<(), ValidationError> {
    let parties = table.party_count();
    for party in 0..parties {
        for other_inputs in radix::tuples(table.input_range(), parties - 1) {
            for other_outputs in radix::tuples(table.output_range(), parties - 1) {
                let marginal = |input: usize| -> Result<f64, ValidationError> {
                    let full_input = radix::insert_digit(&other_inputs, party, input);
                    let mut sum = 0.0;
                    for output in 0..table.output_range() {
                        let full_output = radix::insert_digit(&other_outputs, party, output);
                        sum += table.prob(&full_input, &full_output)?;
                    }
                    Ok(sum)
                };

                let baseline_marginal = marginal(0)?;
                for input in 1..table.input_range() {
                    let value = marginal(input)?;
                    if (value - baseline_marginal).abs() > tolerance {
                        return Err(ValidationError::Signalling {
                            party,
                            context: SignallingContext {
                                other_inputs: other_inputs.clone(),
                                other_outputs: other_outputs.clone(),
                                baseline_input: 0,
                                baseline_marginal,
                                input,
                                marginal: value,
                            },
                        });
                    }
                }
            }
        }
    }
    Ok(())
}
