//! CLI entry point for `subset-fonts`.

use std::{
    path::{self, Path, PathBuf},
    process,
};

use clap::Parser;
use log::error;
use subset_fonts::{render_summary, run, TrueTypeEngine};

/// Reduces known watchface fonts to the glyph sets they actually need.
#[derive(Debug, Parser)]
#[command(name = "subset-fonts")]
struct Cli {
    /// Directory containing the input fonts.
    #[arg(value_name = "FONTS_DIR", default_value = ".")]
    fonts_dir: PathBuf,
    /// Directory the subsetted fonts are written to.
    #[arg(value_name = "OUTPUT_DIR", default_value = "./subsetted")]
    output_dir: PathBuf,
}

fn display_absolute(path: &Path) -> String {
    path::absolute(path)
        .map_or_else(|_| path.to_path_buf(), |abs| abs)
        .display()
        .to_string()
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    println!("Input directory:  {}", display_absolute(&cli.fonts_dir));
    println!("Output directory: {}", display_absolute(&cli.output_dir));
    println!();

    let summary = match run(&cli.fonts_dir, &cli.output_dir, &TrueTypeEngine) {
        Ok(summary) => summary,
        Err(err) => {
            error!("Failed to create output directory: {err}");
            process::exit(1);
        }
    };
    if summary.reports.is_empty() {
        error!("No font files were processed.");
        process::exit(1);
    }

    print!("{}", render_summary(&summary.reports));
    println!();
    println!("Subsetted fonts saved to: {}", display_absolute(&cli.output_dir));
}
