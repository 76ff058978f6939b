//! Engine tests against a synthetic TrueType font.
//!
//! The fixture font has five glyphs: the missing glyph, simple glyphs for
//! `a` (hinted), `b` and `d`, and a composite glyph for `c` built from the
//! `b` glyph with composite-level instructions.

use std::collections::BTreeSet;

use ttf_parser::{Face, GlyphId, Tag};

use crate::engine::{
    glyf::{GlyfTable, LocaFormat},
    writer::{checksum, FontWriter, CHECKSUM_MAGIC},
    SubsetEngine, SubsetOptions, TrueTypeEngine,
};

const GLYPH_COUNT: u16 = 5;

fn u16s(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|value| value.to_be_bytes()).collect()
}

fn head_table() -> Vec<u8> {
    let mut head = 0x0001_0000_u32.to_be_bytes().to_vec(); // version
    head.extend_from_slice(&[0; 4]); // fontRevision
    head.extend_from_slice(&[0; 4]); // checkSumAdjustment, patched at assembly
    head.extend_from_slice(&0x5f0f_3cf5_u32.to_be_bytes()); // magicNumber
    head.extend_from_slice(&u16s(&[0, 1000])); // flags, unitsPerEm
    head.extend_from_slice(&[0; 16]); // created, modified
    head.extend_from_slice(&u16s(&[0, 0, 100, 100])); // font bounding box
    head.extend_from_slice(&u16s(&[0, 8])); // macStyle, lowestRecPPEM
    head.extend_from_slice(&u16s(&[2, 0, 0])); // directionHint, indexToLocFormat, glyphDataFormat
    assert_eq!(head.len(), 54);
    head
}

fn hhea_table() -> Vec<u8> {
    let mut hhea = 0x0001_0000_u32.to_be_bytes().to_vec();
    hhea.extend_from_slice(&u16s(&[
        800,                    // ascender
        200_u16.wrapping_neg(), // descender
        0,                      // lineGap
        500,                    // advanceWidthMax
        0,                      // minLeftSideBearing
        0,                      // minRightSideBearing
        100,                    // xMaxExtent
        1,                      // caretSlopeRise
        0,                      // caretSlopeRun
        0,                      // caretOffset
        0, 0, 0, 0,             // reserved
        0,                      // metricDataFormat
        GLYPH_COUNT,            // numberOfHMetrics
    ]));
    assert_eq!(hhea.len(), 36);
    hhea
}

fn maxp_table() -> Vec<u8> {
    let mut maxp = 0x0001_0000_u32.to_be_bytes().to_vec();
    maxp.extend_from_slice(&u16s(&[
        GLYPH_COUNT,
        4, // maxPoints
        1, // maxContours
        4, // maxCompositePoints
        1, // maxCompositeContours
        2, // maxZones
        0, 0, 0, 0, // twilight points, storage, function defs, instruction defs
        0, // maxStackElements
        2, // maxSizeOfInstructions
        1, // maxComponentElements
        1, // maxComponentDepth
    ]));
    assert_eq!(maxp.len(), 32);
    maxp
}

fn simple_glyph(instructions: &[u8]) -> Vec<u8> {
    let mut glyph = u16s(&[1, 0, 0, 100, 100, 3]); // 1 contour, bbox, endPts = [3]
    glyph.extend_from_slice(&u16s(&[u16::try_from(instructions.len()).unwrap()]));
    glyph.extend_from_slice(instructions);
    glyph.extend_from_slice(&[1, 1, 1, 1]); // on-curve flags, 16-bit deltas
    glyph.extend_from_slice(&u16s(&[0, 100, 0, 100_u16.wrapping_neg()])); // x deltas
    glyph.extend_from_slice(&u16s(&[0, 0, 100, 0])); // y deltas
    glyph
}

fn composite_glyph(component: u16, instructions: &[u8]) -> Vec<u8> {
    let mut flags = 0x0003; // ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES
    if !instructions.is_empty() {
        flags |= 0x0100; // WE_HAVE_INSTRUCTIONS
    }
    let mut glyph = u16s(&[1_u16.wrapping_neg(), 0, 0, 100, 100]);
    glyph.extend_from_slice(&u16s(&[flags, component, 0, 0]));
    if !instructions.is_empty() {
        glyph.extend_from_slice(&u16s(&[u16::try_from(instructions.len()).unwrap()]));
        glyph.extend_from_slice(instructions);
    }
    glyph
}

fn test_font() -> Vec<u8> {
    test_font_with_tables(&[])
}

fn test_font_with_tables(extra: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let glyphs = [
        vec![],                               // glyph 0: missing glyph
        simple_glyph(&[0xb0, 0x01]),          // 'a', hinted
        simple_glyph(&[]),                    // 'b'
        composite_glyph(2, &[0xb0, 0x01]),    // 'c', built from 'b'
        simple_glyph(&[]),                    // 'd'
    ];
    let mut glyf = vec![];
    let mut locations = vec![0_u16];
    for glyph in &glyphs {
        glyf.extend_from_slice(glyph);
        assert_eq!(glyf.len() % 2, 0, "short `loca` needs even glyph offsets");
        locations.push(u16::try_from(glyf.len() / 2).unwrap());
    }

    let mut writer = FontWriter::default();
    writer.insert(*b"head", head_table());
    writer.insert(*b"hhea", hhea_table());
    writer.insert(*b"maxp", maxp_table());
    writer.insert(*b"hmtx", u16s(&[500, 0].repeat(usize::from(GLYPH_COUNT))));
    writer.insert(
        *b"cmap",
        crate::engine::cmap::build(&[('a', 1), ('b', 2), ('c', 3), ('d', 4)]),
    );
    writer.insert(*b"loca", u16s(&locations));
    writer.insert(*b"glyf", glyf);
    for (tag, data) in extra {
        writer.insert(*tag, data.clone());
    }
    writer.finish()
}

fn subset_to(chars: &str, data: &[u8]) -> Vec<u8> {
    let chars: BTreeSet<_> = chars.chars().collect();
    TrueTypeEngine
        .subset(data, &chars, &SubsetOptions::default())
        .unwrap()
}

#[test]
fn fixture_font_is_parseable() {
    let font = test_font();
    let face = Face::parse(&font, 0).unwrap();
    assert_eq!(face.number_of_glyphs(), GLYPH_COUNT);
    assert_eq!(face.glyph_index('a'), Some(GlyphId(1)));
    assert_eq!(face.glyph_index('d'), Some(GlyphId(4)));
    assert_eq!(face.glyph_index('e'), None);
    assert!(face.glyph_bounding_box(GlyphId(3)).is_some());
}

#[test]
fn retained_chars_stay_mapped_to_their_glyphs() {
    let subset = subset_to("ac", &test_font());
    let face = Face::parse(&subset, 0).unwrap();
    assert_eq!(face.number_of_glyphs(), GLYPH_COUNT);
    assert_eq!(face.glyph_index('a'), Some(GlyphId(1)));
    assert_eq!(face.glyph_index('c'), Some(GlyphId(3)));
    // Pruned code points disappear from the character map entirely.
    assert_eq!(face.glyph_index('b'), None);
    assert_eq!(face.glyph_index('d'), None);
}

#[test]
fn composite_components_keep_their_outlines() {
    let subset = subset_to("c", &test_font());
    let face = Face::parse(&subset, 0).unwrap();
    // Glyph 2 backs the composite glyph 3, so its outline must survive even
    // though 'b' is no longer mapped.
    assert!(face.glyph_bounding_box(GlyphId(2)).is_some());
    assert!(face.glyph_bounding_box(GlyphId(3)).is_some());
    // Unreferenced glyphs lose their outlines but keep their IDs.
    assert!(face.glyph_bounding_box(GlyphId(1)).is_none());
    assert!(face.glyph_bounding_box(GlyphId(4)).is_none());
}

#[test]
fn unmapped_code_points_are_ignored() {
    let subset = subset_to("az", &test_font());
    let face = Face::parse(&subset, 0).unwrap();
    assert_eq!(face.glyph_index('a'), Some(GlyphId(1)));
    assert_eq!(face.glyph_index('z'), None);
}

#[test]
fn fully_unmapped_char_set_still_yields_a_consistent_container() {
    // Only glyph 0 survives, and it has no outline, so the rebuilt `glyf`
    // has no glyph data at all. The table must still exist for `loca` to
    // point into.
    let subset = subset_to("xyz", &test_font());
    let face = Face::parse(&subset, 0).unwrap();
    let raw = face.raw_face();
    assert!(raw.table(Tag::from_bytes(b"glyf")).is_some());
    assert!(raw.table(Tag::from_bytes(b"loca")).is_some());
    assert_eq!(face.number_of_glyphs(), GLYPH_COUNT);
    for ch in ['a', 'x'] {
        assert_eq!(face.glyph_index(ch), None);
    }
    assert_eq!(checksum(&subset), CHECKSUM_MAGIC);
}

#[test]
fn subset_is_smaller_than_the_input() {
    let font = test_font();
    let subset = subset_to("a", &font);
    assert!(
        subset.len() < font.len(),
        "{} >= {}",
        subset.len(),
        font.len()
    );
}

#[test]
fn glyph_instructions_are_stripped() {
    let subset = subset_to("ac", &test_font());
    let face = Face::parse(&subset, 0).unwrap();
    let raw = face.raw_face();
    let glyf = raw.table(Tag::from_bytes(b"glyf")).unwrap();
    let loca = raw.table(Tag::from_bytes(b"loca")).unwrap();
    let table = GlyfTable::parse(glyf, loca, GLYPH_COUNT, LocaFormat::Short).unwrap();

    // Simple glyph 1: the instruction length right after the endpoint array is 0.
    let glyph = table.glyph_data(1);
    assert_eq!(&glyph[12..14], [0, 0]);
    // Composite glyph 3: WE_HAVE_INSTRUCTIONS is cleared and the record ends
    // with the last component descriptor.
    let glyph = table.glyph_data(3);
    let flags = u16::from_be_bytes(glyph[10..12].try_into().unwrap());
    assert_eq!(flags & 0x0100, 0);
    // 18 bytes of composite data (no instruction block), padded to 20.
    assert_eq!(glyph.len(), 20);
    assert_eq!(&glyph[18..], [0, 0]);
}

#[test]
fn dsig_and_hinting_tables_are_dropped() {
    let font = test_font_with_tables(&[
        (*b"DSIG", vec![0; 8]),
        (*b"cvt ", u16s(&[10, 20])),
        (*b"fpgm", vec![0xb0, 0x01]),
        (*b"prep", vec![0xb0, 0x01]),
    ]);
    let subset = subset_to("a", &font);
    let face = Face::parse(&subset, 0).unwrap();
    let raw = face.raw_face();
    for tag in [b"DSIG", b"cvt ", b"fpgm", b"prep"] {
        assert!(raw.table(Tag::from_bytes(tag)).is_none(), "kept {tag:?}");
    }
}

#[test]
fn layout_tables_are_copied_verbatim() {
    // A GSUB header with no scripts / features / lookups; the engine copies
    // layout tables as opaque bytes.
    let gsub = u16s(&[1, 0, 0, 0, 0]);
    let font = test_font_with_tables(&[(*b"GSUB", gsub.clone())]);
    let subset = subset_to("a", &font);
    let face = Face::parse(&subset, 0).unwrap();
    let copied = face.raw_face().table(Tag::from_bytes(b"GSUB")).unwrap();
    assert_eq!(copied, gsub);
}

#[test]
fn output_checksum_matches_the_sfnt_magic() {
    let subset = subset_to("abcd", &test_font());
    assert_eq!(checksum(&subset), CHECKSUM_MAGIC);
}

#[test]
fn subsetting_is_stable_under_repetition() {
    let once = subset_to("ab", &test_font());
    let twice = subset_to("ab", &once);
    let face = Face::parse(&twice, 0).unwrap();
    assert_eq!(face.glyph_index('a'), Some(GlyphId(1)));
    assert_eq!(face.glyph_index('b'), Some(GlyphId(2)));
}

#[test]
fn garbage_input_is_rejected() {
    let chars: BTreeSet<_> = "a".chars().collect();
    let err = TrueTypeEngine
        .subset(b"definitely not a font", &chars, &SubsetOptions::default())
        .unwrap_err();
    assert!(matches!(err, crate::SubsetError::Parse(_)), "{err:?}");
}
