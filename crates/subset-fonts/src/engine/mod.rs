//! The font subsetting engine.
//!
//! The batch runner only depends on the [`SubsetEngine`] trait, so the table
//! lookup, reporting and batch iteration logic is testable without real fonts.
//! [`TrueTypeEngine`] is the production implementation for fonts with `glyf`
//! outlines, built on `ttf-parser` for container parsing and `cmap` lookups.

use std::collections::BTreeSet;

use ttf_parser::{Face, Tag};

use self::{
    glyf::{write_loca, GlyfTable, LocaFormat},
    writer::FontWriter,
};
use crate::errors::SubsetError;

pub(crate) mod cmap;
pub(crate) mod glyf;
pub(crate) mod writer;

/// Fixed transform options applied to every subset font.
#[derive(Debug, Clone)]
pub struct SubsetOptions {
    /// Retain all OpenType layout features instead of pruning them. When unset,
    /// the layout tables are dropped from the output entirely.
    pub layout_features_wildcard: bool,
    /// Strip hinting instructions from glyphs and drop the hinting-only tables
    /// (`cvt `, `fpgm`, `prep`).
    pub strip_hinting: bool,
    /// Expand CFF charstring subroutines inline. A no-op for `glyf` outlines,
    /// which are the only kind [`TrueTypeEngine`] accepts.
    pub desubroutinize: bool,
    /// Tables dropped from the output regardless of the other settings.
    pub drop_tables: &'static [&'static str],
}

impl Default for SubsetOptions {
    fn default() -> Self {
        Self {
            layout_features_wildcard: true,
            strip_hinting: true,
            desubroutinize: true,
            // A digital signature is invalidated by subsetting and cannot be regenerated.
            drop_tables: &["DSIG"],
        }
    }
}

/// Font subsetting capability used by the batch runner.
pub trait SubsetEngine {
    /// Subsets the font in `data` so that only `chars` (and the glyphs they
    /// transitively require) remain reachable, returning the transformed font
    /// in the same container format.
    ///
    /// The transform is pure: file placement stays with the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the font cannot be parsed or transformed; see
    /// [`SubsetError`].
    fn subset(
        &self,
        data: &[u8],
        chars: &BTreeSet<char>,
        options: &SubsetOptions,
    ) -> Result<Vec<u8>, SubsetError>;
}

/// [`SubsetEngine`] for TrueType fonts.
///
/// Glyph IDs keep their original values; pruned glyphs merely lose their
/// outlines. This keeps every table that references glyphs by ID valid
/// verbatim, which is what makes the layout-feature wildcard possible without
/// rewriting `GSUB` / `GPOS`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrueTypeEngine;

const HEAD_MIN_LEN: usize = 54;
const HEAD_CHECKSUM_RANGE: std::ops::Range<usize> = 8..12;
const HEAD_LOCA_FORMAT_OFFSET: usize = 50;

impl SubsetEngine for TrueTypeEngine {
    fn subset(
        &self,
        data: &[u8],
        chars: &BTreeSet<char>,
        options: &SubsetOptions,
    ) -> Result<Vec<u8>, SubsetError> {
        let face = Face::parse(data, 0)?;
        let raw = face.raw_face();
        let table = |tag: &[u8; 4]| raw.table(Tag::from_bytes(tag));

        let Some(glyf_data) = table(b"glyf") else {
            return Err(if table(b"CFF ").is_some() || table(b"CFF2").is_some() {
                SubsetError::Unsupported("CFF outlines")
            } else {
                SubsetError::Unsupported("no `glyf` outlines")
            });
        };
        let loca_data =
            table(b"loca").ok_or_else(|| SubsetError::malformed("loca", "table is missing"))?;
        // `head` is guaranteed present after a successful `Face::parse`.
        let head = table(b"head")
            .filter(|head| head.len() >= HEAD_MIN_LEN)
            .ok_or_else(|| SubsetError::malformed("head", "table is missing or too short"))?;
        let loca_format = match &head[HEAD_LOCA_FORMAT_OFFSET..][..2] {
            [0, 0] => LocaFormat::Short,
            [0, 1] => LocaFormat::Long,
            _ => return Err(SubsetError::malformed("head", "unknown `indexToLocFormat`")),
        };
        let glyf = GlyfTable::parse(glyf_data, loca_data, face.number_of_glyphs(), loca_format)?;

        let mut char_map = Vec::with_capacity(chars.len());
        // Glyph 0 (the missing glyph) must always be retained.
        let mut retained = BTreeSet::from([0_u16]);
        for &ch in chars {
            // A code point absent from the source `cmap` is simply not covered
            // by the output.
            let Some(glyph_id) = face.glyph_index(ch) else {
                continue;
            };
            if glyph_id.0 == 0 {
                continue;
            }
            char_map.push((ch, glyph_id.0));
            retained.insert(glyph_id.0);
        }
        glyf.close_over_components(&mut retained)?;

        let (mut new_glyf, locations) = glyf.retain(&retained, options.strip_hinting)?;
        if new_glyf.is_empty() {
            // Every retained glyph is empty. `loca` still references the table,
            // so keep it present rather than letting the writer drop it.
            new_glyf.resize(4, 0);
        }
        let (new_loca, new_loca_format) = write_loca(&locations);

        let mut writer = FontWriter::default();
        writer.insert(*b"cmap", cmap::build(&char_map));
        writer.insert(*b"glyf", new_glyf);
        writer.insert(*b"loca", new_loca);
        writer.insert(*b"head", patched_head(head, new_loca_format));
        if let Some(post) = table(b"post") {
            writer.insert(*b"post", truncated_post(post));
        }
        for tag in copied_tables(options) {
            if options.drop_tables.iter().any(|drop| drop.as_bytes() == tag) {
                continue;
            }
            if let Some(data) = table(&tag) {
                writer.insert(tag, data.to_vec());
            }
        }
        Ok(writer.finish())
    }
}

/// Tables copied into the output verbatim when present in the source font.
/// Safe because glyph IDs are not renumbered.
fn copied_tables(options: &SubsetOptions) -> Vec<[u8; 4]> {
    let mut tags = vec![*b"OS/2", *b"gasp", *b"hhea", *b"hmtx", *b"maxp", *b"name"];
    if options.layout_features_wildcard {
        tags.extend([*b"BASE", *b"GDEF", *b"GPOS", *b"GSUB", *b"kern", *b"morx"]);
    }
    if !options.strip_hinting {
        tags.extend([*b"cvt ", *b"fpgm", *b"prep"]);
    }
    tags
}

/// Copies `head` with the checksum adjustment zeroed (it is recomputed during
/// container assembly) and `indexToLocFormat` matching the rebuilt `loca`.
fn patched_head(head: &[u8], loca_format: LocaFormat) -> Vec<u8> {
    let mut head = head.to_vec();
    head[HEAD_CHECKSUM_RANGE].fill(0);
    let format: u16 = match loca_format {
        LocaFormat::Short => 0,
        LocaFormat::Long => 1,
    };
    head[HEAD_LOCA_FORMAT_OFFSET..][..2].copy_from_slice(&format.to_be_bytes());
    head
}

/// Truncates `post` to a version-3.0 header, dropping glyph names.
fn truncated_post(post: &[u8]) -> Vec<u8> {
    const POST_V3_LEN: usize = 32;
    const POST_V3_VERSION: u32 = 0x0003_0000;

    if post.len() < POST_V3_LEN {
        return post.to_vec();
    }
    let mut out = Vec::with_capacity(POST_V3_LEN);
    out.extend_from_slice(&POST_V3_VERSION.to_be_bytes());
    out.extend_from_slice(&post[4..POST_V3_LEN]);
    out
}
