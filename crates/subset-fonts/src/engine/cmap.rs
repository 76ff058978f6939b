//! `cmap` table construction covering exactly the retained code points.

/// Run of consecutive characters mapped to consecutive glyph IDs.
#[derive(Debug, Clone, Copy)]
struct Group {
    start_char: u32,
    end_char: u32,
    start_glyph: u32,
}

impl Group {
    fn extends(&self, ch: u32, glyph: u32) -> bool {
        ch == self.end_char + 1 && glyph == ch - self.start_char + self.start_glyph
    }
}

fn groups(char_map: &[(char, u16)]) -> Vec<Group> {
    let mut groups: Vec<Group> = vec![];
    for &(ch, glyph) in char_map {
        let (ch, glyph) = (u32::from(ch), u32::from(glyph));
        match groups.last_mut() {
            Some(group) if group.extends(ch, glyph) => group.end_char = ch,
            _ => groups.push(Group {
                start_char: ch,
                end_char: ch,
                start_glyph: glyph,
            }),
        }
    }
    groups
}

/// Builds a complete `cmap` table for `char_map`, which must be sorted by character
/// and free of duplicates.
///
/// A single Windows Unicode subtable is emitted: segment mapping to delta values
/// (format 4) when every character fits into the basic multilingual plane,
/// segmented coverage (format 12) otherwise.
pub(crate) fn build(char_map: &[(char, u16)]) -> Vec<u8> {
    debug_assert!(char_map.windows(2).all(|pair| pair[0].0 < pair[1].0));

    const WINDOWS_PLATFORM: u16 = 3;
    let groups = groups(char_map);
    let fits_bmp = char_map
        .last()
        .is_none_or(|&(ch, _)| u32::from(ch) < u32::from(u16::MAX));

    let mut buffer = vec![];
    write_u16(&mut buffer, 0); // table version
    write_u16(&mut buffer, 1); // numTables
    write_u16(&mut buffer, WINDOWS_PLATFORM);
    write_u16(&mut buffer, if fits_bmp { 1 } else { 10 }); // encoding ID
    write_u32(&mut buffer, 12); // subtable offset
    if fits_bmp {
        write_format4(&groups, &mut buffer);
    } else {
        write_format12(&groups, &mut buffer);
    }
    buffer
}

#[allow(clippy::cast_possible_truncation)] // the caller checked that all chars fit in a `u16`
fn write_format4(groups: &[Group], buffer: &mut Vec<u8>) {
    // One segment per group, plus the required 0xFFFF sentinel segment.
    let segment_count = u16::try_from(groups.len() + 1).expect("too many cmap segments");
    let subtable_len = 16 + 8 * segment_count;

    write_u16(buffer, 4); // subtable format
    write_u16(buffer, subtable_len);
    write_u16(buffer, 0); // language
    write_u16(buffer, 2 * segment_count);
    let entry_selector = u16::try_from(segment_count.ilog2()).unwrap();
    let search_range = 1_u16 << (entry_selector + 1);
    write_u16(buffer, search_range);
    write_u16(buffer, entry_selector);
    write_u16(buffer, 2 * segment_count - search_range);

    for group in groups {
        write_u16(buffer, group.end_char as u16);
    }
    write_u16(buffer, u16::MAX); // sentinel end code
    write_u16(buffer, 0); // reserved padding
    for group in groups {
        write_u16(buffer, group.start_char as u16);
    }
    write_u16(buffer, u16::MAX); // sentinel start code
    for group in groups {
        write_u16(buffer, (group.start_glyph as u16).wrapping_sub(group.start_char as u16));
    }
    // Maps the sentinel to glyph 0 (the missing glyph) as recommended.
    write_u16(buffer, 1);
    // All mappings use deltas, so every idRangeOffset is 0 and glyphIdArray is empty.
    for _ in 0..segment_count {
        write_u16(buffer, 0);
    }
}

fn write_format12(groups: &[Group], buffer: &mut Vec<u8>) {
    write_u16(buffer, 12); // subtable format
    write_u16(buffer, 0); // reserved
    let subtable_len = 16 + 12 * groups.len();
    write_u32(buffer, u32::try_from(subtable_len).expect("subtable length overflow"));
    write_u32(buffer, 0); // language
    write_u32(buffer, u32::try_from(groups.len()).expect("too many cmap groups"));
    for group in groups {
        write_u32(buffer, group.start_char);
        write_u32(buffer, group.end_char);
        write_u32(buffer, group.start_glyph);
    }
}

fn write_u16(buffer: &mut Vec<u8>, value: u16) {
    buffer.extend_from_slice(&value.to_be_bytes());
}

fn write_u32(buffer: &mut Vec<u8>, value: u32) {
    buffer.extend_from_slice(&value.to_be_bytes());
}
