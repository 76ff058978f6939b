//! CLI entry point for `pad-images`.

use std::{path::PathBuf, process};

use clap::Parser;
use log::error;
use pad_images::{collect_png_files, pad_all};

/// Pads PNG images to 16-pixel boundaries (right and down).
#[derive(Debug, Parser)]
#[command(name = "pad-images")]
struct Cli {
    /// PNG files and/or directories containing PNG files.
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    if cli.paths.is_empty() {
        eprintln!("Usage: pad-images <path> [<path> ...]");
        eprintln!("Pads images to 16-pixel boundaries (right and down).");
        process::exit(1);
    }

    let png_files = match collect_png_files(&cli.paths) {
        Ok(files) => files,
        Err(err) => {
            error!("Failed to enumerate input files: {err}");
            process::exit(1);
        }
    };
    if png_files.is_empty() {
        error!("No PNG files found.");
        process::exit(1);
    }

    println!("Padding {} image(s) to 16-pixel boundaries...", png_files.len());
    println!();
    for (file, result) in pad_all(&png_files) {
        let name = file
            .file_name()
            .map_or_else(|| file.display().to_string(), |name| name.to_string_lossy().into_owned());
        match result {
            Ok(outcome) if outcome.is_aligned() => {
                let (width, height) = outcome.original;
                println!("- {name}: Already aligned ({width}x{height})");
            }
            Ok(outcome) => {
                let (width, height) = outcome.original;
                let (new_width, new_height) = outcome.padded;
                println!(
                    "+ {name}: {width}x{height} -> {new_width}x{new_height} \
                     (added {}px right, {}px bottom)",
                    outcome.added_right(),
                    outcome.added_bottom()
                );
            }
            // Per-file errors are reported and do not abort the remaining batch.
            Err(err) => println!("! {name}: Error - {err}"),
        }
    }
    println!();
    println!("Done!");
}
