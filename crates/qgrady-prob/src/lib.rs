//! Probability queries over a validated `DistributionTable`.
//!
//! `reduced_prob` is the single-party marginal used for the first disclosure
//! of a round; `normalised_prob` conditions a candidate party's output on the
//! outputs already revealed while summing out the parties still pending.

pub mod disclosure;
pub mod marginal;

pub use disclosure::normalised_prob;
pub use marginal::reduced_prob;

use qgrady_ir::{IndexError, TupleKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbError {
    #[error("Unknown party {party}: the box has {parties} parties")]
    UnknownParty { party: usize, parties: usize },
    #[error("{kind} value {value} is outside range 0..{range}")]
    ValueOutOfRange {
        kind: TupleKind,
        value: usize,
        range: usize,
    },
    #[error("At least one pending party is required")]
    NoPendingIndex,
    #[error("Pending party {index} is out of range or listed twice")]
    InvalidPendingIndex { index: usize },
    #[error("Table lookup failed: {0}")]
    Index(#[from] IndexError),
}
