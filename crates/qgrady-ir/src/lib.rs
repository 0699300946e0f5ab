#![doc = include_str!("../README.md")]

//! Qgrady intermediate representation.
//!
//! This crate holds the distribution table a `.qgrady` box lowers to, the
//! mixed-radix codec used to address it, the identifiers the PRISM generator
//! reserves, and the validator that must accept a table before any model is
//! generated from it.

pub mod lowering;
pub mod naming;
#[cfg(any(test, feature = "proptest"))]
pub mod proptest_generators;
pub mod radix;
pub mod table;
pub mod validation;

pub use table::{DistributionTable, IndexError, TupleKind};
pub use validation::{validate, validate_with, Check, ValidationConfig, ValidationError};
