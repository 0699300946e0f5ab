//! Proptest strategies for generating valid `DistributionTable` instances.

use proptest::prelude::*;

use crate::radix;
use crate::table::DistributionTable;

/// Build a local (product) box from integer weights.
///
/// `weights[party][input][output]` is the unnormalised chance that `party`
/// answers `output` on `input`. Each party answers independently, so the
/// resulting table is non-signalling by construction. Every weight list must
/// have `output_range` entries and a positive sum.
pub fn local_table(
    weights: &[Vec<Vec<u32>>],
    input_range: usize,
    output_range: usize,
) -> DistributionTable {
    let parties = weights.len();
    let conditional = |party: usize, input: usize, output: usize| -> f64 {
        let row = &weights[party][input];
        let total: u32 = row.iter().sum();
        f64::from(row[output]) / f64::from(total)
    };

    let matrix = radix::tuples(input_range, parties)
        .map(|input| {
            radix::tuples(output_range, parties)
                .map(|output| {
                    (0..parties)
                        .map(|party| conditional(party, input[party], output[party]))
                        .product::<f64>()
                })
                .collect::<Vec<f64>>()
        })
        .collect();

    DistributionTable::new(
        (0..parties).map(|i| format!("x{i}")).collect(),
        (0..parties).map(|i| format!("a{i}")).collect(),
        input_range,
        output_range,
        matrix,
    )
}

/// Strategy for a valid local box.
///
/// Generated tables have:
/// - 1–3 parties named `x<i>` / `a<i>`
/// - input and output ranges of 1–3
/// - positive integer weights, so every row sums to one up to rounding
pub fn arb_local_table() -> impl Strategy<Value = DistributionTable> {
    (1..=3usize, 1..=3usize, 1..=3usize)
        .prop_flat_map(|(parties, input_range, output_range)| {
            let per_input = proptest::collection::vec(1..=10u32, output_range..=output_range);
            let per_party = proptest::collection::vec(per_input, input_range..=input_range);
            let weights = proptest::collection::vec(per_party, parties..=parties);
            (Just(input_range), Just(output_range), weights)
        })
        .prop_map(|(input_range, output_range, weights)| {
            local_table(&weights, input_range, output_range)
        })
}
