#![doc = include_str!("../README.md")]

//! PRISM model generation for non-local boxes.
//!
//! Generation is split in two stages: `generate` builds an ordered record of
//! modules and guarded commands, and `prism::render` turns that record into
//! text. Both stages are deterministic.

pub mod automaton;
pub mod generator;
pub mod prism;
pub mod provenance;
pub mod subsets;

pub use automaton::Automaton;
pub use provenance::ProvenanceInfo;

use qgrady_ir::DistributionTable;
use qgrady_prob::ProbError;
use tracing::info;

/// Errors returned by code generation entry points.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// The table has not passed validation.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),
    /// A probability query failed on a table that looked well-formed.
    #[error("probability query failed: {0}")]
    Probability(#[from] ProbError),
}

/// Build the automaton for a validated table.
///
/// # Parameters
/// - `table`: A table that passed `qgrady_ir::validate`.
///
/// # Returns
/// The ordered module and command records, or a codegen error.
pub fn generate(table: &DistributionTable) -> Result<Automaton, CodegenError> {
    let automaton = generator::generate_automaton(table)?;
    info!(
        modules = automaton.modules.len(),
        commands = automaton.command_count(),
        "automaton generated"
    );
    Ok(automaton)
}

/// Generate PRISM source text for a validated table.
pub fn generate_prism(table: &DistributionTable) -> Result<String, CodegenError> {
    let automaton = generate(table)?;
    Ok(prism::render_to_string(&automaton))
}

/// Generate PRISM source text with a provenance header.
///
/// # Parameters
/// - `table`: A table that passed `qgrady_ir::validate`.
/// - `provenance`: Provenance metadata emitted as header annotations.
///
/// # Returns
/// Generated model including provenance header lines, or a codegen error.
pub fn generate_with_provenance(
    table: &DistributionTable,
    provenance: &ProvenanceInfo,
) -> Result<String, CodegenError> {
    let text = generate_prism(table)?;
    Ok(format!("{}{text}", provenance.header()))
}
