// Command handler for compiling a box into a PRISM model.
//
// Loads the box, runs every validation check in order (logging each stage),
// then renders the whole model before a single write to the output path.

use std::fs;
use std::path::PathBuf;

use miette::{IntoDiagnostic, WrapErr};
use tracing::info;

use qgrady_codegen::ProvenanceInfo;
use qgrady_ir::lowering::SpannedValidationError;
use qgrady_ir::validation::{run_check, Check, ValidationConfig};

use super::helpers::{input_format, load_box, read_source, resolve_output_path, LoadedBox};
use crate::cli::Cli;

#[derive(Debug, Clone)]
pub(crate) struct CompileArgs {
    pub(crate) file: PathBuf,
    pub(crate) output: Option<PathBuf>,
    pub(crate) check_only: bool,
    pub(crate) provenance: bool,
    pub(crate) config: ValidationConfig,
    pub(crate) max_input_bytes: u64,
}

impl From<Cli> for CompileArgs {
    fn from(cli: Cli) -> Self {
        Self {
            file: cli.file,
            output: cli.output,
            check_only: cli.check,
            provenance: !cli.no_provenance,
            config: ValidationConfig {
                tolerance: cli.tolerance,
            },
            max_input_bytes: cli.max_input_bytes,
        }
    }
}

/// Run the compile command.
///
/// Fails without touching the output path if the box does not parse, does not
/// validate or cannot be generated.
pub(crate) fn run_compile_command(args: CompileArgs) -> miette::Result<()> {
    let format = input_format(&args.file)?;
    let out_file = if args.check_only {
        None
    } else {
        Some(resolve_output_path(&args.file, args.output.as_deref())?)
    };

    let source = read_source(&args.file, args.max_input_bytes)?;
    let filename = args.file.display().to_string();
    let loaded = load_box(&source, &filename, format)?;
    info!(file = %filename, parties = loaded.table.party_count(), "box loaded");

    validate_box(&loaded, &source, &filename, &args.config)?;

    let Some(out_file) = out_file else {
        println!("{filename}: box is valid");
        return Ok(());
    };

    let text = if args.provenance {
        let provenance = ProvenanceInfo::for_source(source.as_bytes());
        qgrady_codegen::generate_with_provenance(&loaded.table, &provenance)
    } else {
        qgrady_codegen::generate_prism(&loaded.table)
    }
    .into_diagnostic()
    .wrap_err("Model generation failed")?;

    fs::write(&out_file, &text)
        .into_diagnostic()
        .wrap_err_with(|| format!("Cannot write {}", out_file.display()))?;
    println!("PRISM model written to {}", out_file.display());
    Ok(())
}

fn validate_box(
    loaded: &LoadedBox,
    source: &str,
    filename: &str,
    config: &ValidationConfig,
) -> miette::Result<()> {
    for check in Check::ALL {
        if let Err(err) = run_check(check, &loaded.table, config) {
            return Err(match &loaded.program {
                Some(program) => miette::Report::new(SpannedValidationError::new(
                    err, program, source, filename,
                )),
                None => miette::Report::new(err),
            });
        }
        info!("{check} check passed");
    }
    Ok(())
}
