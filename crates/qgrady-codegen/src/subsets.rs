//! Bitmask enumeration of party subsets.

/// Bitmasks of every subset of `0..parties` with at least one and fewer than
/// `parties` members, ordered by size then by mask value.
///
/// `parties` must be at most 63.
pub fn proper_subsets(parties: usize) -> Vec<u64> {
    let mut masks = Vec::new();
    if parties == 0 || parties > 63 {
        return masks;
    }
    let limit = 1u64 << parties;
    for size in 1..parties {
        let mut mask = (1u64 << size) - 1;
        while mask < limit {
            masks.push(mask);
            mask = next_same_size(mask);
        }
    }
    masks
}

/// Gosper's hack: the next larger integer with the same number of set bits.
fn next_same_size(mask: u64) -> u64 {
    let lowest = mask & mask.wrapping_neg();
    let ripple = mask + lowest;
    (((ripple ^ mask) >> 2) / lowest) | ripple
}

/// Party indices in `mask`, ascending.
pub fn members(mask: u64, parties: usize) -> Vec<usize> {
    (0..parties).filter(|&i| mask & (1u64 << i) != 0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_parties_by_size_then_mask() {
        assert_eq!(proper_subsets(3), vec![0b001, 0b010, 0b100, 0b011, 0b101, 0b110]);
    }

    #[test]
    fn single_party_has_no_proper_subset() {
        assert!(proper_subsets(1).is_empty());
        assert!(proper_subsets(0).is_empty());
    }

    #[test]
    fn counts_match_binomials() {
        // 2^5 minus the empty and the full set.
        assert_eq!(proper_subsets(5).len(), 30);
        let masks = proper_subsets(5);
        let mut deduped = masks.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), masks.len());
    }

    #[test]
    fn members_are_ascending() {
        assert_eq!(members(0b1010, 4), vec![1, 3]);
        assert_eq!(members(0, 4), Vec::<usize>::new());
    }
}
