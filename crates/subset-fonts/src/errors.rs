//! Error types for font subsetting.

use std::io;

use thiserror::Error;

/// Errors produced by the subsetting transform itself.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubsetError {
    /// The font container could not be parsed at all.
    #[error("failed to parse font: {0}")]
    Parse(#[from] ttf_parser::FaceParsingError),
    /// The font container was parsed, but uses outlines or structures the engine
    /// does not support (e.g., CFF charstrings).
    #[error("unsupported font: {0}")]
    Unsupported(&'static str),
    /// A font table is structurally invalid.
    #[error("malformed `{table}` table: {reason}")]
    Malformed {
        /// Tag of the offending table.
        table: &'static str,
        /// What exactly is wrong with the table data.
        reason: &'static str,
    },
}

impl SubsetError {
    pub(crate) fn malformed(table: &'static str, reason: &'static str) -> Self {
        Self::Malformed { table, reason }
    }
}

/// Errors produced when processing a single font file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FontError {
    /// The input could not be read, or the output could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The subsetting transform failed.
    #[error(transparent)]
    Subset(#[from] SubsetError),
}
