//! `glyf` / `loca` table processing: composite closure, instruction stripping
//! and rebuilding with pruned glyphs emptied.

use std::collections::BTreeSet;

use crate::errors::SubsetError;

const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
const WE_HAVE_INSTRUCTIONS: u16 = 0x0100;

const SIMPLE_GLYPH_HEADER_LEN: usize = 10;

/// Format of `loca` table offsets, recorded in `head.indexToLocFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LocaFormat {
    /// Offsets stored as `u16` halves of the byte offset.
    Short,
    /// Offsets stored as plain `u32` values.
    Long,
}

/// Serializes glyph byte `locations` as a `loca` table, using the short format
/// whenever the offsets permit it.
pub(crate) fn write_loca(locations: &[usize]) -> (Vec<u8>, LocaFormat) {
    let fits_short = locations
        .last()
        .is_none_or(|&loc| loc <= usize::from(u16::MAX) * 2);
    let mut buffer = vec![];
    if fits_short {
        for &loc in locations {
            // Glyph records are 4-byte aligned, so halving is exact.
            #[allow(clippy::cast_possible_truncation)]
            let half = (loc / 2) as u16;
            buffer.extend_from_slice(&half.to_be_bytes());
        }
        (buffer, LocaFormat::Short)
    } else {
        for &loc in locations {
            let loc = u32::try_from(loc).expect("glyph location overflow");
            buffer.extend_from_slice(&loc.to_be_bytes());
        }
        (buffer, LocaFormat::Long)
    }
}

/// Parsed `glyf` table together with per-glyph byte locations from `loca`.
#[derive(Debug)]
pub(crate) struct GlyfTable<'a> {
    data: &'a [u8],
    /// Byte offsets into `data`; holds one entry more than the glyph count.
    locations: Vec<usize>,
}

impl<'a> GlyfTable<'a> {
    pub(crate) fn parse(
        glyf: &'a [u8],
        loca: &[u8],
        glyph_count: u16,
        format: LocaFormat,
    ) -> Result<Self, SubsetError> {
        let count = usize::from(glyph_count) + 1;
        let entry_len = match format {
            LocaFormat::Short => 2,
            LocaFormat::Long => 4,
        };
        let expected_len = count * entry_len;
        if loca.len() < expected_len {
            return Err(SubsetError::malformed("loca", "table is too short"));
        }

        let locations: Vec<_> = loca[..expected_len]
            .chunks_exact(entry_len)
            .map(|chunk| match format {
                LocaFormat::Short => {
                    usize::from(u16::from_be_bytes(chunk.try_into().unwrap())) * 2
                }
                LocaFormat::Long => {
                    u32::from_be_bytes(chunk.try_into().unwrap()) as usize
                }
            })
            .collect();
        let mut prev = 0;
        for &loc in &locations {
            if loc < prev || loc > glyf.len() {
                return Err(SubsetError::malformed("loca", "offsets are not increasing or out of bounds"));
            }
            prev = loc;
        }
        Ok(Self { data: glyf, locations })
    }

    pub(crate) fn glyph_count(&self) -> u16 {
        u16::try_from(self.locations.len() - 1).expect("glyph count overflow")
    }

    /// Returns the raw record of a glyph; empty for glyphs without an outline.
    pub(crate) fn glyph_data(&self, glyph_id: u16) -> &'a [u8] {
        let idx = usize::from(glyph_id);
        &self.data[self.locations[idx]..self.locations[idx + 1]]
    }

    /// Expands `retained` with all glyphs referenced, transitively, by retained
    /// composite glyphs.
    pub(crate) fn close_over_components(
        &self,
        retained: &mut BTreeSet<u16>,
    ) -> Result<(), SubsetError> {
        let mut queue: Vec<_> = retained.iter().copied().collect();
        while let Some(glyph_id) = queue.pop() {
            for component in self.component_glyphs(glyph_id)? {
                if retained.insert(component) {
                    queue.push(component);
                }
            }
        }
        Ok(())
    }

    fn component_glyphs(&self, glyph_id: u16) -> Result<Vec<u16>, SubsetError> {
        if glyph_id >= self.glyph_count() {
            return Err(SubsetError::malformed("glyf", "reference to a nonexistent glyph"));
        }
        let data = self.glyph_data(glyph_id);
        if data.is_empty() || contour_count(data)? >= 0 {
            return Ok(vec![]);
        }

        let mut components = vec![];
        let mut cursor = Cursor::new(
            data.get(SIMPLE_GLYPH_HEADER_LEN..)
                .ok_or_else(|| SubsetError::malformed("glyf", "truncated composite glyph"))?,
        );
        loop {
            let flags = cursor.read_u16()?;
            components.push(cursor.read_u16()?);
            cursor.skip(component_extra_len(flags))?;
            if flags & MORE_COMPONENTS == 0 {
                break;
            }
        }
        Ok(components)
    }

    /// Rebuilds `glyf`, keeping only glyphs in `retained` (others become empty)
    /// and optionally stripping hinting instructions. Glyph IDs are not
    /// renumbered. Returns the new table and per-glyph byte locations.
    pub(crate) fn retain(
        &self,
        retained: &BTreeSet<u16>,
        strip_instructions: bool,
    ) -> Result<(Vec<u8>, Vec<usize>), SubsetError> {
        let mut buffer = vec![];
        let mut locations = Vec::with_capacity(self.locations.len());
        locations.push(0);
        for glyph_id in 0..self.glyph_count() {
            if retained.contains(&glyph_id) {
                let data = self.glyph_data(glyph_id);
                if strip_instructions {
                    write_stripped_glyph(data, &mut buffer)?;
                } else {
                    buffer.extend_from_slice(data);
                }
                buffer.resize(buffer.len().next_multiple_of(4), 0);
            }
            locations.push(buffer.len());
        }
        Ok((buffer, locations))
    }
}

fn contour_count(glyph: &[u8]) -> Result<i16, SubsetError> {
    let header: [u8; 2] = glyph
        .get(..2)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| SubsetError::malformed("glyf", "truncated glyph header"))?;
    Ok(i16::from_be_bytes(header))
}

fn component_extra_len(flags: u16) -> usize {
    let args_len = if flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
    let transform_len = if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
        8
    } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
        4
    } else if flags & WE_HAVE_A_SCALE != 0 {
        2
    } else {
        0
    };
    args_len + transform_len
}

/// Copies a glyph record with hinting instructions removed: simple glyphs get a
/// zero instruction length, composite glyphs lose the trailing instruction block
/// and the `WE_HAVE_INSTRUCTIONS` flag.
fn write_stripped_glyph(glyph: &[u8], buffer: &mut Vec<u8>) -> Result<(), SubsetError> {
    if glyph.is_empty() {
        return Ok(());
    }
    let truncated = || SubsetError::malformed("glyf", "truncated glyph record");

    if contour_count(glyph)? >= 0 {
        let contours = usize::try_from(contour_count(glyph)?).unwrap();
        let instr_len_at = SIMPLE_GLYPH_HEADER_LEN + 2 * contours;
        let instr_bytes: [u8; 2] = glyph
            .get(instr_len_at..instr_len_at + 2)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(truncated)?;
        let instr_len = usize::from(u16::from_be_bytes(instr_bytes));

        buffer.extend_from_slice(&glyph[..instr_len_at]);
        buffer.extend_from_slice(&0_u16.to_be_bytes());
        buffer.extend_from_slice(glyph.get(instr_len_at + 2 + instr_len..).ok_or_else(truncated)?);
    } else {
        buffer.extend_from_slice(glyph.get(..SIMPLE_GLYPH_HEADER_LEN).ok_or_else(truncated)?);
        let mut cursor = Cursor::new(&glyph[SIMPLE_GLYPH_HEADER_LEN..]);
        loop {
            let flags = cursor.read_u16()?;
            let glyph_idx = cursor.read_u16()?;
            buffer.extend_from_slice(&(flags & !WE_HAVE_INSTRUCTIONS).to_be_bytes());
            buffer.extend_from_slice(&glyph_idx.to_be_bytes());
            let extra = component_extra_len(flags);
            buffer.extend_from_slice(cursor.read_bytes(extra)?);
            if flags & MORE_COMPONENTS == 0 {
                break;
            }
        }
        // Anything after the last component descriptor is the instruction block.
    }
    Ok(())
}

struct Cursor<'a> {
    bytes: &'a [u8],
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], SubsetError> {
        if self.bytes.len() < len {
            return Err(SubsetError::malformed("glyf", "unexpected end of glyph data"));
        }
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        Ok(head)
    }

    fn read_u16(&mut self) -> Result<u16, SubsetError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes(bytes.try_into().unwrap()))
    }

    fn skip(&mut self, len: usize) -> Result<(), SubsetError> {
        self.read_bytes(len).map(drop)
    }
}
