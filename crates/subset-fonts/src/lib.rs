//! Subsetting watchface fonts to their required glyph sets.
//!
//! Watch faces render a handful of fixed strings, so shipping complete fonts
//! wastes most of their size on glyphs that can never appear. This crate
//! reduces each known font (see [`FONT_SPECS`]) to a statically configured set
//! of code points: glyph outlines outside the set (and everything they alone
//! required, such as hinting instructions and glyph names) are removed, while
//! the glyphs backing the retained code points, including composite
//! components, survive untouched.

mod config;
mod engine;
mod errors;
mod report;
mod run;
#[cfg(test)]
mod tests;

pub use crate::{
    config::{FontSpec, FONT_SPECS},
    engine::{SubsetEngine, SubsetOptions, TrueTypeEngine},
    errors::{FontError, SubsetError},
    report::{format_size, render_summary, FontReport},
    run::{run, RunSummary},
};
