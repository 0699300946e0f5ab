use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::radix;

/// Which side of the table a tuple addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleKind {
    Input,
    Output,
}

impl fmt::Display for TupleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TupleKind::Input => write!(f, "input"),
            TupleKind::Output => write!(f, "output"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("{kind} tuple has {actual} digits, expected one per party ({expected})")]
    Length {
        kind: TupleKind,
        expected: usize,
        actual: usize,
    },
    #[error("{kind} value {value} of party {party} is outside range 0..{range}")]
    Digit {
        kind: TupleKind,
        party: usize,
        value: usize,
        range: usize,
    },
    #[error("no cell at row {row}, column {column}")]
    MissingCell { row: usize, column: usize },
}

/// A non-local box: `P(outputs | inputs)` for N parties.
///
/// Row `r` holds the distribution for the input tuple whose mixed-radix
/// encoding (base `input_range`) is `r`; column `c` is the output tuple
/// encoded in base `output_range`. Construction performs no checks, so a
/// malformed table can still be handed to the validator for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionTable {
    inputs: Vec<String>,
    outputs: Vec<String>,
    input_range: usize,
    output_range: usize,
    #[serde(rename = "probabilities")]
    matrix: Vec<Vec<f64>>,
}

impl DistributionTable {
    pub fn new(
        inputs: Vec<String>,
        outputs: Vec<String>,
        input_range: usize,
        output_range: usize,
        matrix: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            inputs,
            outputs,
            input_range,
            output_range,
            matrix,
        }
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn input_range(&self) -> usize {
        self.input_range
    }

    pub fn output_range(&self) -> usize {
        self.output_range
    }

    pub fn matrix(&self) -> &[Vec<f64>] {
        &self.matrix
    }

    /// Number of parties, taken from the input list.
    pub fn party_count(&self) -> usize {
        self.inputs.len()
    }

    /// `P(output | input)` for full N-party tuples.
    pub fn prob(&self, input: &[usize], output: &[usize]) -> Result<f64, IndexError> {
        let row = self.tuple_index(TupleKind::Input, input)?;
        let column = self.tuple_index(TupleKind::Output, output)?;
        self.matrix
            .get(row)
            .and_then(|cells| cells.get(column))
            .copied()
            .ok_or(IndexError::MissingCell { row, column })
    }

    fn tuple_index(&self, kind: TupleKind, tuple: &[usize]) -> Result<usize, IndexError> {
        let (expected, range) = match kind {
            TupleKind::Input => (self.inputs.len(), self.input_range),
            TupleKind::Output => (self.outputs.len(), self.output_range),
        };
        if tuple.len() != expected {
            return Err(IndexError::Length {
                kind,
                expected,
                actual: tuple.len(),
            });
        }
        radix::encode(tuple, range).map_err(|err| match err {
            radix::RadixError::DigitOutOfRange {
                position, digit, ..
            } => IndexError::Digit {
                kind,
                party: position,
                value: digit,
                range,
            },
            // A tuple that overflows cannot address any stored row.
            radix::RadixError::Overflow { .. } => IndexError::MissingCell {
                row: usize::MAX,
                column: usize::MAX,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr_box() -> DistributionTable {
        DistributionTable::new(
            vec!["x".into(), "y".into()],
            vec!["a".into(), "b".into()],
            2,
            2,
            vec![
                vec![0.5, 0.0, 0.0, 0.5],
                vec![0.5, 0.0, 0.0, 0.5],
                vec![0.5, 0.0, 0.0, 0.5],
                vec![0.0, 0.5, 0.5, 0.0],
            ],
        )
    }

    #[test]
    fn prob_reads_encoded_cell() {
        let table = pr_box();
        assert_eq!(table.prob(&[1, 1], &[0, 1]), Ok(0.5));
        assert_eq!(table.prob(&[1, 1], &[1, 1]), Ok(0.0));
        assert_eq!(table.prob(&[0, 1], &[1, 1]), Ok(0.5));
    }

    #[test]
    fn prob_rejects_wrong_arity() {
        let err = pr_box().prob(&[0], &[0, 0]).unwrap_err();
        assert_eq!(
            err,
            IndexError::Length {
                kind: TupleKind::Input,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn prob_rejects_out_of_range_digit() {
        let err = pr_box().prob(&[0, 0], &[0, 2]).unwrap_err();
        assert_eq!(
            err,
            IndexError::Digit {
                kind: TupleKind::Output,
                party: 1,
                value: 2,
                range: 2
            }
        );
        assert_eq!(
            err.to_string(),
            "output value 2 of party 1 is outside range 0..2"
        );
    }

    #[test]
    fn prob_reports_missing_cell_in_ragged_table() {
        let table = DistributionTable::new(
            vec!["x".into()],
            vec!["a".into()],
            2,
            2,
            vec![vec![0.5, 0.5], vec![1.0]],
        );
        assert_eq!(
            table.prob(&[1], &[1]),
            Err(IndexError::MissingCell { row: 1, column: 1 })
        );
    }

    #[test]
    fn json_boundary_uses_snake_case_and_probabilities() {
        let json = serde_json::to_value(pr_box()).unwrap();
        assert_eq!(json["input_range"], 2);
        assert_eq!(json["outputs"][1], "b");
        assert_eq!(json["probabilities"][3][1], 0.5);

        let back: DistributionTable = serde_json::from_value(json).unwrap();
        assert_eq!(back, pr_box());
    }
}
