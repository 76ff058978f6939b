//! Static per-font configuration.
//!
//! The retained code points for each known font are enumerated here rather than
//! derived from content inspection; downstream consumers rely on this exact
//! glyph coverage.

use std::{collections::BTreeSet, ops::RangeInclusive};

/// Subsetting requirements for one known font file.
#[derive(Debug, Clone, Copy)]
pub struct FontSpec {
    /// Exact file name matched against files in the input directory.
    pub file_name: &'static str,
    /// Retained code points, as inclusive ranges of Unicode scalar values.
    ranges: &'static [RangeInclusive<char>],
    /// Human-readable description of the retained coverage.
    pub description: &'static str,
}

impl FontSpec {
    /// Expands the configured ranges into the full set of retained code points.
    pub fn code_points(&self) -> BTreeSet<char> {
        self.ranges.iter().flat_map(Clone::clone).collect()
    }
}

/// Fonts known to the tool, in processing order.
pub const FONT_SPECS: &[FontSpec] = &[
    FontSpec {
        file_name: "Optima-Bold.ttf",
        ranges: &['a'..='z'],
        description: "a-z (26 glyphs)",
    },
    FontSpec {
        file_name: "Optima-Regular.ttf",
        ranges: &[' '..=' ', '\''..='\'', ','..=',', '0'..='9', 'a'..='z'],
        description: "a-z, 0-9, space, comma, apostrophe (39 glyphs)",
    },
];
