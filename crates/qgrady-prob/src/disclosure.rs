use qgrady_ir::radix;
use qgrady_ir::DistributionTable;

use crate::ProbError;

/// Conditional probability of the candidate's output during progressive
/// disclosure.
///
/// `pending[0]` is the candidate party; the remaining pending parties are
/// summed out. Parties not in `pending` have already revealed their outputs,
/// which are taken from `output`. The value is
///
/// ```text
/// sum_rest P(output with rest summed | input)
/// -------------------------------------------------------------
/// sum_v sum_rest P(output with candidate := v, rest summed | input)
/// ```
///
/// # Parameters
/// - `input`: Full input tuple, one value per party.
/// - `output`: Full output tuple; entries at non-candidate pending positions
///   are ignored.
/// - `pending`: Parties that have not disclosed yet, candidate first.
///
/// # Returns
/// The conditional probability, `0.0` when the revealed outputs are
/// impossible under `input` (zero denominator).
pub fn normalised_prob(
    table: &DistributionTable,
    input: &[usize],
    output: &[usize],
    pending: &[usize],
) -> Result<f64, ProbError> {
    let (&candidate, rest) = pending.split_first().ok_or(ProbError::NoPendingIndex)?;
    let parties = table.party_count();
    for (position, &index) in pending.iter().enumerate() {
        if index >= parties || pending[..position].contains(&index) {
            return Err(ProbError::InvalidPendingIndex { index });
        }
    }

    let numerator = summed_out(table, input, output, rest)?;
    let mut denominator = 0.0;
    let mut varied = output.to_vec();
    for value in 0..table.output_range() {
        if let Some(slot) = varied.get_mut(candidate) {
            *slot = value;
        }
        denominator += summed_out(table, input, &varied, rest)?;
    }

    if denominator == 0.0 {
        return Ok(0.0);
    }
    Ok(numerator / denominator)
}

/// `sum P(output' | input)` over every `output'` that agrees with `output`
/// outside `positions`.
fn summed_out(
    table: &DistributionTable,
    input: &[usize],
    output: &[usize],
    positions: &[usize],
) -> Result<f64, ProbError> {
    let mut assignment = output.to_vec();
    let mut sum = 0.0;
    for values in radix::tuples(table.output_range(), positions.len()) {
        for (&position, &value) in positions.iter().zip(&values) {
            if let Some(slot) = assignment.get_mut(position) {
                *slot = value;
            }
        }
        sum += table.prob(input, &assignment)?;
    }
    Ok(sum)
}
