//! Raw SFNT (`.ttf`) serialization.

use super::RawTable;

pub(super) const SFNT_VERSION: u32 = 0x0001_0000;
const HEADER_LEN: usize = 12;
const RECORD_LEN: usize = 16;

/// The 12-byte offset table with binary-search parameters.
pub(super) fn header(num_tables: u16) -> Vec<u8> {
    let entry_selector = num_tables.ilog2() as u16;
    let search_range = 16 * (1_u16 << entry_selector);
    let range_shift = 16 * num_tables - search_range;

    let mut buffer = Vec::with_capacity(HEADER_LEN);
    buffer.extend_from_slice(&SFNT_VERSION.to_be_bytes());
    buffer.extend_from_slice(&num_tables.to_be_bytes());
    buffer.extend_from_slice(&search_range.to_be_bytes());
    buffer.extend_from_slice(&entry_selector.to_be_bytes());
    buffer.extend_from_slice(&range_shift.to_be_bytes());
    buffer
}

/// Offset of the first table byte: header plus directory.
pub(super) fn data_offset(num_tables: usize) -> usize {
    HEADER_LEN + num_tables * RECORD_LEN
}

/// Total size of the serialized font with every table padded.
pub(super) fn total_size(tables: &[RawTable]) -> usize {
    data_offset(tables.len()) + tables.iter().map(RawTable::padded_len).sum::<usize>()
}

pub(super) fn write(tables: &[RawTable]) -> Vec<u8> {
    let mut buffer = header(tables.len() as u16);

    let mut offset = data_offset(tables.len());
    for table in tables {
        buffer.extend_from_slice(&table.tag.to_be_bytes());
        buffer.extend_from_slice(&table.checksum.to_be_bytes());
        buffer.extend_from_slice(&(offset as u32).to_be_bytes());
        buffer.extend_from_slice(&(table.data.len() as u32).to_be_bytes());
        offset += table.padded_len();
    }

    for table in tables {
        buffer.extend_from_slice(&table.data);
        buffer.resize(buffer.len() + table.padded_len() - table.data.len(), 0);
    }

    debug_assert_eq!(buffer.len(), total_size(tables));
    buffer
}
