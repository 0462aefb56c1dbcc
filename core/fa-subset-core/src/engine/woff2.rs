//! WOFF2 serialization: flag-encoded directory plus one Brotli stream.
//!
//! Only the null transform is used; glyf and loca go out untransformed,
//! which every conforming decoder accepts.

use std::io::Write;

use read_fonts::types::Tag;

use super::{sfnt, RawTable};

const SIGNATURE: u32 = 0x774F_4632; // "wOF2"
const HEADER_LEN: usize = 48;
const NULL_TRANSFORM: u8 = 0b1100_0000;

pub(super) fn write(tables: &[RawTable]) -> Vec<u8> {
    let ordered = directory_order(tables);
    let compressed = compress(&ordered);

    let directory_len = ordered.iter().map(|table| entry_len(table)).sum::<usize>();
    let mut total_len = HEADER_LEN + directory_len + compressed.len();
    total_len = total_len.div_ceil(4) * 4;

    let mut buffer = Vec::with_capacity(total_len);
    buffer.extend_from_slice(&SIGNATURE.to_be_bytes());
    buffer.extend_from_slice(&sfnt::SFNT_VERSION.to_be_bytes());
    buffer.extend_from_slice(&(total_len as u32).to_be_bytes());
    buffer.extend_from_slice(&(ordered.len() as u16).to_be_bytes());
    buffer.extend_from_slice(&0_u16.to_be_bytes()); // reserved
    buffer.extend_from_slice(&(sfnt::total_size(tables) as u32).to_be_bytes());
    buffer.extend_from_slice(&(compressed.len() as u32).to_be_bytes());
    buffer.extend_from_slice(&0_u16.to_be_bytes()); // majorVersion
    buffer.extend_from_slice(&0_u16.to_be_bytes()); // minorVersion
    buffer.extend_from_slice(&[0; 20]); // no metadata or private block
    debug_assert_eq!(buffer.len(), HEADER_LEN);

    for table in &ordered {
        buffer.push(table_flags(table.tag));
        write_uint_base128(&mut buffer, table.data.len() as u32);
    }
    debug_assert_eq!(buffer.len(), HEADER_LEN + directory_len);

    buffer.extend_from_slice(&compressed);
    buffer.resize(total_len, 0);
    buffer
}

/// Directory order doubles as data-stream order; loca must directly
/// follow glyf.
fn directory_order(tables: &[RawTable]) -> Vec<&RawTable> {
    let loca = Tag::new(b"loca");
    let glyf = Tag::new(b"glyf");

    let mut ordered = Vec::with_capacity(tables.len());
    for table in tables {
        if table.tag == loca {
            continue;
        }
        ordered.push(table);
        if table.tag == glyf {
            if let Some(loca_table) = tables.iter().find(|t| t.tag == loca) {
                ordered.push(loca_table);
            }
        }
    }
    ordered
}

fn compress(ordered: &[&RawTable]) -> Vec<u8> {
    let mut compressed = Vec::new();
    {
        let mut encoder = brotli::CompressorWriter::new(&mut compressed, 4096, 11, 22);
        for table in ordered {
            encoder
                .write_all(&table.data)
                .expect("writing to Vec cannot fail");
        }
        encoder.flush().expect("writing to Vec cannot fail");
    }
    compressed
}

fn entry_len(table: &RawTable) -> usize {
    1 + uint_base128_len(table.data.len() as u32)
}

/// Known-table index for the directory flag byte. Subsetting only emits
/// tables with an assigned index.
fn table_flags(tag: Tag) -> u8 {
    match &tag.to_be_bytes() {
        b"cmap" => 0,
        b"head" => 1,
        b"hhea" => 2,
        b"hmtx" => 3,
        b"maxp" => 4,
        b"name" => 5,
        b"OS/2" => 6,
        b"post" => 7,
        b"cvt " => 8,
        b"fpgm" => 9,
        b"glyf" => 10 | NULL_TRANSFORM,
        b"loca" => 11 | NULL_TRANSFORM,
        b"prep" => 12,
        other => unreachable!("no flag index for table {:?}", Tag::new(other)),
    }
}

fn uint_base128_len(value: u32) -> usize {
    if value == 0 {
        1
    } else {
        value.ilog2() as usize / 7 + 1
    }
}

fn write_uint_base128(buffer: &mut Vec<u8>, value: u32) {
    if value >= 1 << 28 {
        buffer.push(0x80 | (value >> 28) as u8);
    }
    if value >= 1 << 21 {
        buffer.push(0x80 | (value >> 21) as u8);
    }
    if value >= 1 << 14 {
        buffer.push(0x80 | (value >> 14) as u8);
    }
    if value >= 1 << 7 {
        buffer.push(0x80 | (value >> 7) as u8);
    }
    buffer.push((value & 0x7F) as u8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base128_encoding_matches_known_samples() {
        let samples: &[(u32, &[u8])] = &[
            (0, &[0]),
            (1, &[1]),
            (127, &[127]),
            (128, &[0x81, 0]),
            (129, &[0x81, 1]),
            (16_383, &[0xFF, 0x7F]),
            (16_384, &[0x81, 0x80, 0]),
        ];
        for &(value, expected) in samples {
            assert_eq!(uint_base128_len(value), expected.len(), "len of {value}");
            let mut buffer = Vec::new();
            write_uint_base128(&mut buffer, value);
            assert_eq!(buffer, expected, "encoding of {value}");
        }
    }

    #[test]
    fn loca_is_placed_directly_after_glyf() {
        let tables = vec![
            RawTable::new(b"cmap", vec![0; 4]),
            RawTable::new(b"glyf", vec![0; 4]),
            RawTable::new(b"head", vec![0; 4]),
            RawTable::new(b"loca", vec![0; 4]),
        ];
        let ordered: Vec<[u8; 4]> = directory_order(&tables)
            .iter()
            .map(|table| table.tag.to_be_bytes())
            .collect();
        assert_eq!(ordered, [*b"cmap", *b"glyf", *b"loca", *b"head"]);
    }

    #[test]
    fn glyf_and_loca_carry_the_null_transform() {
        assert_eq!(table_flags(Tag::new(b"glyf")), 10 | NULL_TRANSFORM);
        assert_eq!(table_flags(Tag::new(b"loca")), 11 | NULL_TRANSFORM);
        assert_eq!(table_flags(Tag::new(b"cmap")), 0);
    }
}
