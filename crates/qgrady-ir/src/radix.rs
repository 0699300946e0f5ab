//! Mixed-radix tuple codec.
//!
//! A tuple `(d_0, .., d_{n-1})` with every digit in `[0, r)` is encoded as
//! `d_0 * r^(n-1) + .. + d_{n-1}`, most-significant digit first. Row and
//! column indices of a `DistributionTable` are encodings of input and output
//! tuples under this scheme.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RadixError {
    #[error("digit {digit} at position {position} is outside radix {radix}")]
    DigitOutOfRange {
        position: usize,
        digit: usize,
        radix: usize,
    },
    #[error("{radix}^{length} does not fit the index space")]
    Overflow { radix: usize, length: usize },
}

/// Number of tuples of `length` digits in base `radix`, i.e. `radix^length`.
///
/// Returns `None` on overflow.
pub fn tuple_count(radix: usize, length: usize) -> Option<usize> {
    let exponent = u32::try_from(length).ok()?;
    radix.checked_pow(exponent)
}

/// Encode a digit tuple as a single index.
pub fn encode(tuple: &[usize], radix: usize) -> Result<usize, RadixError> {
    tuple
        .iter()
        .enumerate()
        .try_fold(0usize, |acc, (position, &digit)| {
            if digit >= radix {
                return Err(RadixError::DigitOutOfRange {
                    position,
                    digit,
                    radix,
                });
            }
            acc.checked_mul(radix)
                .and_then(|v| v.checked_add(digit))
                .ok_or(RadixError::Overflow {
                    radix,
                    length: tuple.len(),
                })
        })
}

/// Decode `index` into a tuple of `length` digits in base `radix`.
///
/// Digits above the tuple's capacity are dropped, so `index` is effectively
/// taken modulo `radix^length`.
pub fn decode(index: usize, length: usize, radix: usize) -> Vec<usize> {
    let mut digits = vec![0; length];
    if radix <= 1 {
        return digits;
    }
    let mut rest = index;
    for slot in digits.iter_mut().rev() {
        *slot = rest % radix;
        rest /= radix;
    }
    digits
}

/// Copy of `partial` with `value` inserted at `position`.
pub fn insert_digit(partial: &[usize], position: usize, value: usize) -> Vec<usize> {
    let mut full = Vec::with_capacity(partial.len() + 1);
    full.extend_from_slice(&partial[..position]);
    full.push(value);
    full.extend_from_slice(&partial[position..]);
    full
}

/// Every tuple of `length` digits in base `radix`, in ascending encoded order.
pub fn tuples(radix: usize, length: usize) -> Tuples {
    let current = if radix == 0 && length > 0 {
        None
    } else {
        Some(vec![0; length])
    };
    Tuples { radix, current }
}

/// Odometer over digit tuples; see [`tuples`].
#[derive(Debug, Clone)]
pub struct Tuples {
    radix: usize,
    current: Option<Vec<usize>>,
}

impl Iterator for Tuples {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.current.take()?;
        let mut successor = current.clone();
        let mut advanced = false;
        for digit in successor.iter_mut().rev() {
            if *digit + 1 < self.radix {
                *digit += 1;
                advanced = true;
                break;
            }
            *digit = 0;
        }
        if advanced {
            self.current = Some(successor);
        }
        Some(current)
    }
}
