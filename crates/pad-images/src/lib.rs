//! Padding PNG images to 16-pixel dimension boundaries.
//!
//! Watchface build tools implicitly resize images whose dimensions are not multiples
//! of 16. Padding an image up front (transparent pixels added to the right and bottom,
//! original content anchored at the top-left corner) keeps the pixels under the
//! designer's control instead.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use image::{GenericImage, GenericImageView, ImageError, ImageFormat, RgbaImage};
use log::warn;
use thiserror::Error;

/// Dimension alignment required by the downstream build tools, in pixels.
pub const ALIGNMENT: u32 = 16;

/// Errors that can occur when padding a single image.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PadError {
    /// The input file is not a valid image.
    #[error("failed to decode image: {0}")]
    Decode(#[source] ImageError),
    /// The input could not be read, or the output could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<ImageError> for PadError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::IoError(err) => Self::Io(err),
            other => Self::Decode(other),
        }
    }
}

/// Outcome of padding a single image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadOutcome {
    /// Original image dimensions.
    pub original: (u32, u32),
    /// Dimensions after padding. Both components are multiples of [`ALIGNMENT`].
    pub padded: (u32, u32),
}

impl PadOutcome {
    /// Checks whether the image was already aligned, in which case no file was written.
    pub fn is_aligned(&self) -> bool {
        self.original == self.padded
    }

    /// Returns the number of pixels added on the right.
    pub fn added_right(&self) -> u32 {
        self.padded.0 - self.original.0
    }

    /// Returns the number of pixels added at the bottom.
    pub fn added_bottom(&self) -> u32 {
        self.padded.1 - self.original.1
    }
}

/// Pads the image at `input` to the next 16-pixel boundary in both dimensions.
///
/// The original pixels are copied verbatim into the top-left corner of a fully
/// transparent canvas; padding is added to the right and bottom only. If the image
/// is already aligned, nothing is written and the returned outcome has equal
/// `original` and `padded` dimensions.
///
/// When `output` is `None`, the input file is overwritten in place.
///
/// # Errors
///
/// Returns [`PadError::Decode`] if `input` is not a valid image, and [`PadError::Io`]
/// on read / write failures.
pub fn pad_to_16(input: &Path, output: Option<&Path>) -> Result<PadOutcome, PadError> {
    let img = image::open(input)?;
    let (orig_w, orig_h) = img.dimensions();
    let outcome = PadOutcome {
        original: (orig_w, orig_h),
        padded: (orig_w.next_multiple_of(ALIGNMENT), orig_h.next_multiple_of(ALIGNMENT)),
    };
    if outcome.is_aligned() {
        return Ok(outcome);
    }

    // `RgbaImage::new` zero-initializes the buffer, so every added pixel is (0, 0, 0, 0).
    let mut canvas = RgbaImage::new(outcome.padded.0, outcome.padded.1);
    // `copy_from` replaces pixels rather than alpha-blending them.
    canvas.copy_from(&img.to_rgba8(), 0, 0)?;
    canvas.save_with_format(output.unwrap_or(input), ImageFormat::Png)?;
    Ok(outcome)
}

/// Collects PNG files from the provided file and/or directory paths.
///
/// Directories are enumerated non-recursively; their immediate children with a
/// case-insensitive `.png` extension are taken in sorted order. File arguments must
/// carry a `.png` extension themselves, otherwise they are skipped with a warning.
///
/// # Errors
///
/// Propagates I/O errors from directory enumeration.
pub fn collect_png_files(paths: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut png_files = vec![];
    for path in paths {
        if path.is_dir() {
            let mut children = vec![];
            for entry in fs::read_dir(path)? {
                let child = entry?.path();
                if child.is_file() && has_png_extension(&child) {
                    children.push(child);
                }
            }
            children.sort_unstable();
            png_files.extend(children);
        } else if has_png_extension(path) {
            png_files.push(path.clone());
        } else {
            warn!("Skipping non-PNG file: {}", path.display());
        }
    }
    Ok(png_files)
}

/// Pads every file in `files` in place, in order.
///
/// Each file is processed independently: a failure is recorded in the returned
/// list and does not abort the remaining batch.
pub fn pad_all(files: &[PathBuf]) -> Vec<(PathBuf, Result<PadOutcome, PadError>)> {
    files
        .iter()
        .map(|file| (file.clone(), pad_to_16(file, None)))
        .collect()
}

fn has_png_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}
