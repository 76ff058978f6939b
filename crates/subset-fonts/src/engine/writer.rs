//! Assembly of the sfnt container: table directory, padding and checksums.

use std::collections::BTreeMap;

pub(crate) const SFNT_VERSION: u32 = 0x0001_0000;
/// Value the whole-file checksum must equal after the `head` adjustment is applied.
pub(crate) const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;

const SFNT_HEADER_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;
const HEAD_CHECKSUM_OFFSET: usize = 8;

/// Computes the OpenType checksum of `data`: the wrapping sum of its big-endian
/// `u32` words, with the tail zero-padded.
pub(crate) fn checksum(data: &[u8]) -> u32 {
    let mut sum = 0_u32;
    for chunk in data.chunks(4) {
        let mut word = [0_u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum = sum.wrapping_add(u32::from_be_bytes(word));
    }
    sum
}

/// Collects font tables and serializes them into a TrueType container.
///
/// Tables are stored keyed by tag, which also yields the tag-sorted directory
/// order the format requires. The inserted `head` table must have its
/// `checkSumAdjustment` field zeroed; the correct value is patched in during
/// [`Self::finish`].
#[derive(Debug, Default)]
pub(crate) struct FontWriter {
    tables: BTreeMap<[u8; 4], Vec<u8>>,
}

impl FontWriter {
    pub(crate) fn insert(&mut self, tag: [u8; 4], data: Vec<u8>) {
        if !data.is_empty() {
            self.tables.insert(tag, data);
        }
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        assert!(!self.tables.is_empty(), "no tables written");
        let table_count = u16::try_from(self.tables.len()).expect("too many tables");

        let mut buffer = Vec::with_capacity(
            SFNT_HEADER_LEN
                + self.tables.len() * TABLE_RECORD_LEN
                + self.tables.values().map(Vec::len).sum::<usize>(),
        );
        buffer.extend_from_slice(&SFNT_VERSION.to_be_bytes());
        buffer.extend_from_slice(&table_count.to_be_bytes());
        // `unwrap()` is safe: the table count fits in a `u16`.
        let entry_selector = u16::try_from(table_count.ilog2()).unwrap();
        let search_range = 1_u16 << (4 + entry_selector);
        buffer.extend_from_slice(&search_range.to_be_bytes());
        buffer.extend_from_slice(&entry_selector.to_be_bytes());
        buffer.extend_from_slice(&(16 * table_count - search_range).to_be_bytes());

        let mut offset = SFNT_HEADER_LEN + self.tables.len() * TABLE_RECORD_LEN;
        let mut head_offset = None;
        for (tag, data) in &self.tables {
            buffer.extend_from_slice(tag);
            buffer.extend_from_slice(&checksum(data).to_be_bytes());
            buffer.extend_from_slice(&u32::try_from(offset).expect("table offset overflow").to_be_bytes());
            buffer.extend_from_slice(&u32::try_from(data.len()).expect("table length overflow").to_be_bytes());
            if tag == b"head" {
                head_offset = Some(offset);
            }
            offset += data.len().next_multiple_of(4);
        }

        for data in self.tables.values() {
            buffer.extend_from_slice(data);
            // Pad the table heap to a 4-byte boundary.
            buffer.resize(buffer.len().next_multiple_of(4), 0);
        }

        if let Some(head_offset) = head_offset {
            let adjustment = CHECKSUM_MAGIC.wrapping_sub(checksum(&buffer));
            buffer[head_offset + HEAD_CHECKSUM_OFFSET..][..4]
                .copy_from_slice(&adjustment.to_be_bytes());
        }
        buffer
    }
}
