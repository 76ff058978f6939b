//! Batch subsetting across the static font table.

use std::{fs, io, path::Path};

use log::{error, warn};

use crate::{
    config::{FontSpec, FONT_SPECS},
    engine::{SubsetEngine, SubsetOptions},
    errors::FontError,
    report::{format_size, FontReport},
};

/// Outcome of a batch run over the static font table.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Per-font reports for the fonts that were successfully subsetted,
    /// in processing order.
    pub reports: Vec<FontReport>,
    /// Number of fonts that were found but failed to process.
    pub failures: usize,
}

/// Subsets every known font found in `fonts_dir`, writing the results under the
/// same file names in `output_dir`.
///
/// The output directory (including missing parents) is created first. Fonts
/// absent from `fonts_dir` are skipped with a warning; per-font failures are
/// logged and do not abort the rest of the batch.
///
/// # Errors
///
/// Propagates the I/O error if the output directory cannot be created.
pub fn run(
    fonts_dir: &Path,
    output_dir: &Path,
    engine: &impl SubsetEngine,
) -> io::Result<RunSummary> {
    fs::create_dir_all(output_dir)?;

    let options = SubsetOptions::default();
    let mut summary = RunSummary::default();
    for spec in FONT_SPECS {
        let input = fonts_dir.join(spec.file_name);
        if !input.exists() {
            warn!("{} not found, skipping...", input.display());
            continue;
        }

        println!("Subsetting {}...", spec.file_name);
        match subset_file(&input, &output_dir.join(spec.file_name), spec, engine, &options) {
            Ok(report) => {
                println!(
                    "  {} -> {} ({:.1}% reduction)",
                    format_size(report.original_size),
                    format_size(report.subset_size),
                    report.reduction_percent()
                );
                println!("  Glyphs: {}", spec.description);
                println!();
                summary.reports.push(report);
            }
            Err(err) => {
                error!("Failed to subset {}: {err}", spec.file_name);
                summary.failures += 1;
            }
        }
    }
    Ok(summary)
}

fn subset_file(
    input: &Path,
    output: &Path,
    spec: &FontSpec,
    engine: &impl SubsetEngine,
    options: &SubsetOptions,
) -> Result<FontReport, FontError> {
    let data = fs::read(input)?;
    let subset = engine.subset(&data, &spec.code_points(), options)?;
    fs::write(output, &subset)?;
    Ok(FontReport {
        name: spec.file_name,
        original_size: data.len() as u64,
        subset_size: subset.len() as u64,
    })
}
