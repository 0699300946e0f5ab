use qgrady_ir::radix;
use qgrady_ir::{DistributionTable, TupleKind};

use crate::ProbError;

/// Single-party marginal `P(a_i = output | x_i = input)`.
///
/// Sums the joint distribution over every joint input/output tuple whose
/// coordinate `party` is `(input, output)`, then divides by the number of
/// assignments to the other parties' inputs.
///
/// # Parameters
/// - `party`: Index of the party, in declaration order.
/// - `input`: Value of the party's input, in `0..input_range`.
/// - `output`: Value of the party's output, in `0..output_range`.
///
/// # Returns
/// The marginal probability, or a [`ProbError`] for an unknown party or an
/// out-of-range value.
pub fn reduced_prob(
    table: &DistributionTable,
    party: usize,
    input: usize,
    output: usize,
) -> Result<f64, ProbError> {
    let parties = table.party_count();
    if party >= parties {
        return Err(ProbError::UnknownParty { party, parties });
    }
    check_value(TupleKind::Input, input, table.input_range())?;
    check_value(TupleKind::Output, output, table.output_range())?;

    let mut sum = 0.0;
    let mut assignments = 0usize;
    for other_inputs in radix::tuples(table.input_range(), parties - 1) {
        assignments += 1;
        let full_input = radix::insert_digit(&other_inputs, party, input);
        for other_outputs in radix::tuples(table.output_range(), parties - 1) {
            let full_output = radix::insert_digit(&other_outputs, party, output);
            sum += table.prob(&full_input, &full_output)?;
        }
    }
    Ok(sum / assignments as f64)
}

fn check_value(kind: TupleKind, value: usize, range: usize) -> Result<(), ProbError> {
    if value >= range {
        return Err(ProbError::ValueOutOfRange { kind, value, range });
    }
    Ok(())
}
