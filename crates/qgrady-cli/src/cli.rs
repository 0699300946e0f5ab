//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

use qgrady_ir::validation::DEFAULT_TOLERANCE;

pub(crate) const CLI_LONG_ABOUT: &str =
    "Compile a non-local box (a joint conditional probability table over N parties) \
    into a PRISM DTMC of guarded commands.\n\n\
    The box is validated first: probabilities in [0, 1], table shape, row sums, \
    one input and one output per party, PRISM-safe variable names and the \
    non-signalling condition.";

/// Default cap on the input file size (1 MiB).
pub(crate) const DEFAULT_MAX_INPUT_BYTES: u64 = 1 << 20;

#[derive(Parser, Debug)]
#[command(name = "qgrady")]
#[command(about = "Compile non-local boxes into PRISM DTMC models")]
#[command(long_about = CLI_LONG_ABOUT)]
#[command(version)]
pub(crate) struct Cli {
    /// Input box: a .qgrady source or a .json record
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub(crate) file: PathBuf,

    /// Output .prism file (default: the input path with a .prism extension)
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub(crate) output: Option<PathBuf>,

    /// Validate the box without writing a model
    #[arg(long, default_value_t = false)]
    pub(crate) check: bool,

    /// Omit the `// @qgrady-provenance` header lines
    #[arg(long, default_value_t = false)]
    pub(crate) no_provenance: bool,

    /// Absolute tolerance for row sums and non-signalling marginals
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub(crate) tolerance: f64,

    /// Maximum input file size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_INPUT_BYTES)]
    pub(crate) max_input_bytes: u64,
}
