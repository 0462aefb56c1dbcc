//! WOFF 1.0 serialization: per-table zlib compression.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::{padded_len, sfnt, RawTable};

const SIGNATURE: u32 = 0x774F_4646; // "wOFF"
const HEADER_LEN: usize = 44;
const RECORD_LEN: usize = 20;

pub(super) fn write(tables: &[RawTable]) -> Vec<u8> {
    // A table is stored compressed only when zlib actually shrinks it.
    let compressed: Vec<Option<Vec<u8>>> = tables
        .iter()
        .map(|table| {
            let deflated = deflate(&table.data);
            (deflated.len() < table.data.len()).then_some(deflated)
        })
        .collect();

    let directory_end = HEADER_LEN + tables.len() * RECORD_LEN;
    let total_len = directory_end
        + tables
            .iter()
            .zip(&compressed)
            .map(|(table, deflated)| padded_len(stored_len(table, deflated)))
            .sum::<usize>();

    let mut buffer = Vec::with_capacity(total_len);
    buffer.extend_from_slice(&SIGNATURE.to_be_bytes());
    buffer.extend_from_slice(&sfnt::SFNT_VERSION.to_be_bytes());
    buffer.extend_from_slice(&(total_len as u32).to_be_bytes());
    buffer.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    buffer.extend_from_slice(&0_u16.to_be_bytes()); // reserved
    buffer.extend_from_slice(&(sfnt::total_size(tables) as u32).to_be_bytes());
    buffer.extend_from_slice(&0_u16.to_be_bytes()); // majorVersion
    buffer.extend_from_slice(&0_u16.to_be_bytes()); // minorVersion
    buffer.extend_from_slice(&[0; 20]); // no metadata or private block
    debug_assert_eq!(buffer.len(), HEADER_LEN);

    let mut offset = directory_end;
    for (table, deflated) in tables.iter().zip(&compressed) {
        buffer.extend_from_slice(&table.tag.to_be_bytes());
        buffer.extend_from_slice(&(offset as u32).to_be_bytes());
        buffer.extend_from_slice(&(stored_len(table, deflated) as u32).to_be_bytes());
        buffer.extend_from_slice(&(table.data.len() as u32).to_be_bytes());
        buffer.extend_from_slice(&table.checksum.to_be_bytes());
        offset += padded_len(stored_len(table, deflated));
    }

    for (table, deflated) in tables.iter().zip(&compressed) {
        let stored = deflated.as_deref().unwrap_or(&table.data);
        buffer.extend_from_slice(stored);
        buffer.resize(buffer.len() + padded_len(stored.len()) - stored.len(), 0);
    }

    debug_assert_eq!(buffer.len(), total_len);
    buffer
}

fn stored_len(table: &RawTable, deflated: &Option<Vec<u8>>) -> usize {
    deflated.as_ref().map_or(table.data.len(), Vec::len)
}

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data)
        .expect("writing to Vec cannot fail");
    encoder.finish().expect("writing to Vec cannot fail")
}
