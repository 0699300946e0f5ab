// Shared helpers for the compile command: bounded input reading, input
// format detection, output path resolution and box loading.

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, WrapErr};

use qgrady_dsl::ast;
use qgrady_ir::DistributionTable;

pub(crate) const BOX_EXTENSION: &str = "qgrady";
pub(crate) const JSON_EXTENSION: &str = "json";
pub(crate) const PRISM_EXTENSION: &str = "prism";

/// How the input file encodes its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputFormat {
    Box,
    Json,
}

/// A loaded box; `program` is kept for `.qgrady` sources so that validation
/// errors can point into the file.
pub(crate) struct LoadedBox {
    pub(crate) table: DistributionTable,
    pub(crate) program: Option<ast::Program>,
}

pub(crate) fn input_format(path: &Path) -> miette::Result<InputFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(BOX_EXTENSION) => Ok(InputFormat::Box),
        Some(JSON_EXTENSION) => Ok(InputFormat::Json),
        _ => miette::bail!(
            "Input file {} must have a .{BOX_EXTENSION} or .{JSON_EXTENSION} extension",
            path.display()
        ),
    }
}

/// Read the source file, refusing anything larger than `max_bytes`.
pub(crate) fn read_source(path: &Path, max_bytes: u64) -> miette::Result<String> {
    let metadata = std::fs::metadata(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Cannot read input file {}", path.display()))?;
    if metadata.len() > max_bytes {
        miette::bail!(
            "Input file {} is {} bytes, exceeding the limit of {} bytes",
            path.display(),
            metadata.len(),
            max_bytes
        );
    }
    std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Cannot read input file {}", path.display()))
}

/// Output path: the explicit one if given, else the input with a `.prism`
/// extension. Directories and other extensions are rejected.
pub(crate) fn resolve_output_path(input: &Path, output: Option<&Path>) -> miette::Result<PathBuf> {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension(PRISM_EXTENSION),
    };
    if path.is_dir() {
        miette::bail!("Output path {} is a directory", path.display());
    }
    if path.extension().and_then(|e| e.to_str()) != Some(PRISM_EXTENSION) {
        miette::bail!(
            "Output file {} must have a .{PRISM_EXTENSION} extension",
            path.display()
        );
    }
    Ok(path)
}

pub(crate) fn load_box(
    source: &str,
    filename: &str,
    format: InputFormat,
) -> miette::Result<LoadedBox> {
    match format {
        InputFormat::Box => {
            let program = qgrady_dsl::parse(source, filename).map_err(miette::Report::new)?;
            Ok(LoadedBox {
                table: qgrady_ir::lowering::lower(&program),
                program: Some(program),
            })
        }
        InputFormat::Json => {
            let table: DistributionTable = serde_json::from_str(source)
                .into_diagnostic()
                .wrap_err_with(|| format!("Invalid box record in {filename}"))?;
            Ok(LoadedBox {
                table,
                program: None,
            })
        }
    }
}
