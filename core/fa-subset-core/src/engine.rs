//! Glyph-level font subsetting.
//!
//! Takes a TrueType font plus a set of characters and produces a minimal
//! font keeping only the glyphs those characters reach (including composite
//! components), with glyph IDs renumbered contiguously. The rebuilt table
//! set can then be serialized as raw SFNT, WOFF or WOFF2.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexSet;
use read_fonts::types::Tag;
use read_fonts::FontRef;
use skrifa::{FontRef as SkrifaFontRef, MetadataProvider};
use thiserror::Error;

use crate::styles::TargetFormat;

mod sfnt;
mod woff;
mod woff2;

/// Target of `head.checkSumAdjustment`: the whole-file checksum must come
/// out to this value.
const SFNT_CHECKSUM: u32 = 0xB1B0_AFBA;
const HEAD_CHECKSUM_OFFSET: usize = 8;
const HEAD_LOCA_FORMAT_OFFSET: usize = 50;
const HHEA_NUM_H_METRICS_OFFSET: usize = 34;
const MAXP_NUM_GLYPHS_OFFSET: usize = 4;

#[derive(Debug, Error)]
pub enum SubsetError {
    #[error("unreadable font: {0}")]
    Parse(String),
    #[error("font has no {0} table")]
    MissingTable(&'static str),
    #[error("font uses CFF outlines, only glyf outlines can be subset")]
    CffOutlines,
    #[error("malformed {table} table: {reason}")]
    Malformed {
        table: &'static str,
        reason: String,
    },
}

/// One rebuilt table, checksummed over its zero-padded content.
#[derive(Debug, Clone)]
struct RawTable {
    tag: Tag,
    checksum: u32,
    data: Vec<u8>,
}

impl RawTable {
    fn new(tag: &[u8; 4], data: Vec<u8>) -> Self {
        Self {
            tag: Tag::new(tag),
            checksum: checksum(&data),
            data,
        }
    }

    fn padded_len(&self) -> usize {
        padded_len(self.data.len())
    }
}

/// A subset font, ready to serialize in any supported container.
///
/// Tables are held sorted by tag with `head.checkSumAdjustment` already
/// patched against the raw SFNT layout.
#[derive(Debug, Clone)]
pub struct SubsetFont {
    tables: Vec<RawTable>,
}

impl SubsetFont {
    /// Subset `data` down to the glyphs reachable from `chars`.
    ///
    /// Characters the font does not map are dropped silently; the missing
    /// glyph (GID 0) is always retained.
    pub fn build(data: &[u8], chars: &IndexSet<char>) -> Result<Self, SubsetError> {
        let font = FontRef::new(data).map_err(|err| SubsetError::Parse(err.to_string()))?;
        let glyf = required_table(&font, b"glyf")?;
        let raw_loca = required_table(&font, b"loca")?;
        let head = required_table(&font, b"head")?;
        let hhea = required_table(&font, b"hhea")?;
        let hmtx = required_table(&font, b"hmtx")?;
        let maxp = required_table(&font, b"maxp")?;

        if head.len() < 54 {
            return Err(SubsetError::Malformed {
                table: "head",
                reason: format!("{} bytes, expected at least 54", head.len()),
            });
        }
        if hhea.len() < 36 {
            return Err(SubsetError::Malformed {
                table: "hhea",
                reason: format!("{} bytes, expected at least 36", hhea.len()),
            });
        }
        if maxp.len() < 6 {
            return Err(SubsetError::Malformed {
                table: "maxp",
                reason: format!("{} bytes, expected at least 6", maxp.len()),
            });
        }

        let num_glyphs = read_u16(maxp, MAXP_NUM_GLYPHS_OFFSET);
        let loca_format = read_i16(head, HEAD_LOCA_FORMAT_OFFSET);
        let loca = parse_loca(raw_loca, loca_format, num_glyphs)?;

        // Map the requested characters through cmap, keeping the pairs
        // sorted by character for the rebuilt cmap.
        let charmap = SkrifaFontRef::new(data)
            .map_err(|err| SubsetError::Parse(err.to_string()))?
            .charmap();
        let mut char_to_old_gid: Vec<(char, u16)> = chars
            .iter()
            .filter_map(|&ch| {
                let gid = charmap.map(ch)?;
                let gid = u16::try_from(gid.to_u32()).ok()?;
                (gid != 0).then_some((ch, gid))
            })
            .collect();
        char_to_old_gid.sort_unstable_by_key(|&(ch, _)| ch);
        char_to_old_gid.dedup();

        let mut needed: BTreeSet<u16> = BTreeSet::from([0]);
        needed.extend(char_to_old_gid.iter().map(|&(_, gid)| gid));
        for gid in needed.clone() {
            collect_component_gids(glyf, &loca, gid, &mut needed);
        }

        let remap: HashMap<u16, u16> = needed
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new as u16))
            .collect();
        let new_num_glyphs = needed.len() as u16;

        let (new_glyf, glyph_offsets) = rebuild_glyf(glyf, &loca, &needed, &remap);
        let (new_loca, new_loca_format) = build_loca(&glyph_offsets);

        let char_map: Vec<(char, u16)> = char_to_old_gid
            .into_iter()
            .map(|(ch, old)| (ch, remap[&old]))
            .collect();

        let num_h_metrics = read_u16(hhea, HHEA_NUM_H_METRICS_OFFSET) as usize;

        let mut tables = vec![
            RawTable::new(b"cmap", build_cmap(&char_map)),
            RawTable::new(b"glyf", new_glyf),
            RawTable::new(b"head", rebuild_head(head, new_loca_format)),
            RawTable::new(b"hhea", rebuild_hhea(hhea, new_num_glyphs)),
            RawTable::new(b"hmtx", rebuild_hmtx(hmtx, &needed, num_h_metrics)),
            RawTable::new(b"loca", new_loca),
            RawTable::new(b"maxp", rebuild_maxp(maxp, new_num_glyphs)),
            RawTable::new(b"post", rebuild_post(optional_table(&font, b"post"))),
        ];
        for tag in [b"OS/2", b"cvt ", b"fpgm", b"name", b"prep"] {
            if let Some(content) = optional_table(&font, tag) {
                tables.push(RawTable::new(tag, content.to_vec()));
            }
        }
        tables.sort_unstable_by_key(|table| table.tag);

        let mut subset = Self { tables };
        subset.patch_head_adjustment();
        Ok(subset)
    }

    /// Serialize in the given container format.
    pub fn to_bytes(&self, format: TargetFormat) -> Vec<u8> {
        match format {
            TargetFormat::Sfnt => sfnt::write(&self.tables),
            TargetFormat::Woff => woff::write(&self.tables),
            TargetFormat::Woff2 => woff2::write(&self.tables),
        }
    }

    /// Compute `checkSumAdjustment` against the raw SFNT layout and write
    /// it into the stored `head` table.
    ///
    /// Directory checksums keep the value computed before patching, as the
    /// adjustment field is excluded from the file checksum.
    fn patch_head_adjustment(&mut self) {
        let mut file_checksum = checksum(&sfnt::header(self.tables.len() as u16));
        let mut offset = sfnt::data_offset(self.tables.len()) as u32;
        for table in &self.tables {
            let record_sum = u32::from_be_bytes(table.tag.to_be_bytes())
                .wrapping_add(table.checksum)
                .wrapping_add(offset)
                .wrapping_add(table.data.len() as u32);
            file_checksum = file_checksum
                .wrapping_add(record_sum)
                .wrapping_add(table.checksum);
            offset += table.padded_len() as u32;
        }

        let adjustment = SFNT_CHECKSUM.wrapping_sub(file_checksum);
        let head = self
            .tables
            .iter_mut()
            .find(|table| table.tag == Tag::new(b"head"))
            .expect("head table is always present");
        head.data[HEAD_CHECKSUM_OFFSET..HEAD_CHECKSUM_OFFSET + 4]
            .copy_from_slice(&adjustment.to_be_bytes());
    }
}

/// Convenience wrapper: build the subset and serialize it in one call.
pub fn subset_font(
    data: &[u8],
    chars: &IndexSet<char>,
    format: TargetFormat,
) -> Result<Vec<u8>, SubsetError> {
    Ok(SubsetFont::build(data, chars)?.to_bytes(format))
}

fn required_table<'a>(font: &FontRef<'a>, tag: &'static [u8; 4]) -> Result<&'a [u8], SubsetError> {
    match font.table_data(Tag::new(tag)) {
        Some(content) => Ok(content.as_bytes()),
        None if tag == b"glyf" && font.table_data(Tag::new(b"CFF ")).is_some() => {
            Err(SubsetError::CffOutlines)
        }
        None => Err(SubsetError::MissingTable(match tag {
            b"glyf" => "glyf",
            b"loca" => "loca",
            b"head" => "head",
            b"hhea" => "hhea",
            b"hmtx" => "hmtx",
            b"maxp" => "maxp",
            _ => "required",
        })),
    }
}

fn optional_table<'a>(font: &FontRef<'a>, tag: &[u8; 4]) -> Option<&'a [u8]> {
    font.table_data(Tag::new(tag))
        .map(|content| content.as_bytes())
}

fn parse_loca(data: &[u8], format: i16, num_glyphs: u16) -> Result<Vec<u32>, SubsetError> {
    let count = num_glyphs as usize + 1;
    let entry_size = if format == 0 { 2 } else { 4 };
    if data.len() < count * entry_size {
        return Err(SubsetError::Malformed {
            table: "loca",
            reason: format!("{} bytes for {count} entries", data.len()),
        });
    }

    let offsets = (0..count)
        .map(|i| {
            if format == 0 {
                u32::from(read_u16(data, i * 2)) * 2
            } else {
                read_u32(data, i * 4)
            }
        })
        .collect();
    Ok(offsets)
}

/// Walk a glyph's component records, adding every referenced GID to
/// `needed` (recursively, composites can nest).
fn collect_component_gids(glyf: &[u8], loca: &[u32], gid: u16, needed: &mut BTreeSet<u16>) {
    let idx = gid as usize;
    if idx + 1 >= loca.len() {
        return;
    }
    let start = loca[idx] as usize;
    let end = loca[idx + 1] as usize;
    if start >= end || start + 10 > glyf.len() {
        return;
    }
    if read_i16(glyf, start) >= 0 {
        return; // simple glyph
    }

    let mut pos = start + 10;
    loop {
        if pos + 4 > glyf.len() {
            break;
        }
        let flags = read_u16(glyf, pos);
        let component = read_u16(glyf, pos + 2);
        pos += 4;

        if needed.insert(component) {
            collect_component_gids(glyf, loca, component, needed);
        }

        pos += component_args_len(flags);
        if flags & flags::MORE_COMPONENTS == 0 {
            break;
        }
    }
}

mod flags {
    pub const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
    pub const WE_HAVE_A_SCALE: u16 = 0x0008;
    pub const MORE_COMPONENTS: u16 = 0x0020;
    pub const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
    pub const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
}

fn component_args_len(component_flags: u16) -> usize {
    let args = if component_flags & flags::ARG_1_AND_2_ARE_WORDS != 0 {
        4
    } else {
        2
    };
    let transform = if component_flags & flags::WE_HAVE_A_SCALE != 0 {
        2
    } else if component_flags & flags::WE_HAVE_AN_X_AND_Y_SCALE != 0 {
        4
    } else if component_flags & flags::WE_HAVE_A_TWO_BY_TWO != 0 {
        8
    } else {
        0
    };
    args + transform
}

/// Copy the kept glyphs in new-GID order, rewriting composite component
/// references through the remap. Returns the table and per-glyph offsets
/// (`needed.len() + 1` entries).
fn rebuild_glyf(
    glyf: &[u8],
    loca: &[u32],
    needed: &BTreeSet<u16>,
    remap: &HashMap<u16, u16>,
) -> (Vec<u8>, Vec<u32>) {
    let mut new_glyf = Vec::new();
    let mut offsets = Vec::with_capacity(needed.len() + 1);

    for &old_gid in needed {
        offsets.push(new_glyf.len() as u32);

        let idx = old_gid as usize;
        if idx + 1 >= loca.len() {
            continue;
        }
        let start = loca[idx] as usize;
        let end = (loca[idx + 1] as usize).min(glyf.len());
        if start >= end {
            continue; // empty glyph
        }

        let mut glyph = glyf[start..end].to_vec();
        if glyph.len() >= 2 && read_i16(&glyph, 0) < 0 {
            rewrite_component_gids(&mut glyph, remap);
        }
        new_glyf.extend_from_slice(&glyph);

        // Glyph offsets must stay even for the short loca format.
        while new_glyf.len() % 4 != 0 {
            new_glyf.push(0);
        }
    }

    offsets.push(new_glyf.len() as u32);
    (new_glyf, offsets)
}

fn rewrite_component_gids(glyph: &mut [u8], remap: &HashMap<u16, u16>) {
    let mut pos = 10;
    loop {
        if pos + 4 > glyph.len() {
            break;
        }
        let component_flags = read_u16(glyph, pos);
        let old_gid = read_u16(glyph, pos + 2);
        if let Some(&new_gid) = remap.get(&old_gid) {
            glyph[pos + 2..pos + 4].copy_from_slice(&new_gid.to_be_bytes());
        }
        pos += 4 + component_args_len(component_flags);
        if component_flags & flags::MORE_COMPONENTS == 0 {
            break;
        }
    }
}

/// Serialize glyph offsets, choosing the short format when every offset
/// is even and in range. Returns the table and the `indexToLocFormat`
/// value for `head`.
fn build_loca(offsets: &[u32]) -> (Vec<u8>, i16) {
    let short_ok = offsets.iter().all(|&off| off % 2 == 0)
        && offsets.last().is_none_or(|&off| off <= u32::from(u16::MAX) * 2);

    let mut data = Vec::new();
    if short_ok {
        for &off in offsets {
            data.extend_from_slice(&((off / 2) as u16).to_be_bytes());
        }
        (data, 0)
    } else {
        for &off in offsets {
            data.extend_from_slice(&off.to_be_bytes());
        }
        (data, 1)
    }
}

/// Every kept glyph gets a full metric pair; `hhea.numberOfHMetrics` is
/// set to the glyph count to match.
fn rebuild_hmtx(hmtx: &[u8], needed: &BTreeSet<u16>, num_h_metrics: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(needed.len() * 4);

    for &old_gid in needed {
        let idx = old_gid as usize;
        if idx < num_h_metrics {
            let offset = idx * 4;
            if offset + 4 <= hmtx.len() {
                data.extend_from_slice(&hmtx[offset..offset + 4]);
            } else {
                data.extend_from_slice(&[0; 4]);
            }
        } else if num_h_metrics > 0 {
            // Trailing glyphs share the last advance width and carry only
            // a left side bearing.
            let advance_offset = (num_h_metrics - 1) * 4;
            let lsb_offset = num_h_metrics * 4 + (idx - num_h_metrics) * 2;
            let advance = slice_or_zero(hmtx, advance_offset);
            let lsb = slice_or_zero(hmtx, lsb_offset);
            data.extend_from_slice(advance);
            data.extend_from_slice(lsb);
        } else {
            data.extend_from_slice(&[0; 4]);
        }
    }

    data
}

fn slice_or_zero(data: &[u8], offset: usize) -> &[u8] {
    if offset + 2 <= data.len() {
        &data[offset..offset + 2]
    } else {
        &[0, 0]
    }
}

fn rebuild_head(head: &[u8], loca_format: i16) -> Vec<u8> {
    let mut data = head.to_vec();
    // checkSumAdjustment is recomputed after the table set is final.
    data[HEAD_CHECKSUM_OFFSET..HEAD_CHECKSUM_OFFSET + 4].fill(0);
    data[HEAD_LOCA_FORMAT_OFFSET..HEAD_LOCA_FORMAT_OFFSET + 2]
        .copy_from_slice(&loca_format.to_be_bytes());
    data
}

fn rebuild_hhea(hhea: &[u8], num_glyphs: u16) -> Vec<u8> {
    let mut data = hhea.to_vec();
    data[HHEA_NUM_H_METRICS_OFFSET..HHEA_NUM_H_METRICS_OFFSET + 2]
        .copy_from_slice(&num_glyphs.to_be_bytes());
    data
}

fn rebuild_maxp(maxp: &[u8], num_glyphs: u16) -> Vec<u8> {
    let mut data = maxp.to_vec();
    data[MAXP_NUM_GLYPHS_OFFSET..MAXP_NUM_GLYPHS_OFFSET + 2]
        .copy_from_slice(&num_glyphs.to_be_bytes());
    data
}

/// Format 3: version plus the metric fields of the original, no glyph
/// names.
fn rebuild_post(original: Option<&[u8]>) -> Vec<u8> {
    let mut data = Vec::with_capacity(32);
    data.extend_from_slice(&0x0003_0000_u32.to_be_bytes());
    match original {
        Some(post) if post.len() >= 32 => data.extend_from_slice(&post[4..32]),
        _ => data.extend_from_slice(&[0; 28]),
    }
    data
}

/// Contiguous run of characters mapping to contiguous glyph IDs.
#[derive(Debug)]
struct MapGroup {
    start_char: u32,
    end_char: u32,
    start_gid: u16,
}

fn group_char_map(char_map: &[(char, u16)]) -> Vec<MapGroup> {
    let mut groups: Vec<MapGroup> = Vec::new();
    for &(ch, gid) in char_map {
        let code = u32::from(ch);
        if let Some(last) = groups.last_mut() {
            let run = code - last.start_char;
            if code == last.end_char + 1 && u32::from(gid) == u32::from(last.start_gid) + run {
                last.end_char = code;
                continue;
            }
        }
        groups.push(MapGroup {
            start_char: code,
            end_char: code,
            start_gid: gid,
        });
    }
    groups
}

/// Choose the subtable for the rebuilt cmap: format 4 covers the BMP,
/// format 12 is needed once any retained character lies beyond it (the
/// plane-16 secondary glyphs of two-layer icon styles do).
fn build_cmap(char_map: &[(char, u16)]) -> Vec<u8> {
    let groups = group_char_map(char_map);
    let beyond_bmp = char_map
        .last()
        .is_some_and(|&(ch, _)| u32::from(ch) >= u32::from(u16::MAX));

    let (encoding_id, subtable) = if beyond_bmp {
        (10_u16, build_cmap_format12(&groups))
    } else {
        (1_u16, build_cmap_format4(&groups))
    };

    let mut cmap = Vec::with_capacity(12 + subtable.len());
    cmap.extend_from_slice(&0_u16.to_be_bytes()); // version
    cmap.extend_from_slice(&1_u16.to_be_bytes()); // numTables
    cmap.extend_from_slice(&3_u16.to_be_bytes()); // platform: Windows
    cmap.extend_from_slice(&encoding_id.to_be_bytes());
    cmap.extend_from_slice(&12_u32.to_be_bytes()); // subtable offset
    cmap.extend_from_slice(&subtable);
    cmap
}

fn build_cmap_format4(groups: &[MapGroup]) -> Vec<u8> {
    // Every group becomes one segment encoded via idDelta; the sentinel
    // segment at 0xFFFF maps to the missing glyph.
    let seg_count = (groups.len() + 1) as u16;
    let entry_selector = seg_count.ilog2() as u16;
    let search_range = 1_u16 << (entry_selector + 1);
    let range_shift = 2 * seg_count - search_range;
    let length = 16 + 8 * seg_count as usize;

    let mut data = Vec::with_capacity(length);
    data.extend_from_slice(&4_u16.to_be_bytes());
    data.extend_from_slice(&(length as u16).to_be_bytes());
    data.extend_from_slice(&0_u16.to_be_bytes()); // language
    data.extend_from_slice(&(2 * seg_count).to_be_bytes());
    data.extend_from_slice(&search_range.to_be_bytes());
    data.extend_from_slice(&entry_selector.to_be_bytes());
    data.extend_from_slice(&range_shift.to_be_bytes());

    for group in groups {
        data.extend_from_slice(&(group.end_char as u16).to_be_bytes());
    }
    data.extend_from_slice(&0xFFFF_u16.to_be_bytes());
    data.extend_from_slice(&0_u16.to_be_bytes()); // reservedPad
    for group in groups {
        data.extend_from_slice(&(group.start_char as u16).to_be_bytes());
    }
    data.extend_from_slice(&0xFFFF_u16.to_be_bytes());
    for group in groups {
        let delta = group.start_gid.wrapping_sub(group.start_char as u16);
        data.extend_from_slice(&delta.to_be_bytes());
    }
    data.extend_from_slice(&1_u16.to_be_bytes()); // sentinel maps to GID 0
    for _ in 0..seg_count {
        data.extend_from_slice(&0_u16.to_be_bytes()); // idRangeOffset
    }
    data
}

fn build_cmap_format12(groups: &[MapGroup]) -> Vec<u8> {
    let length = 16 + 12 * groups.len();
    let mut data = Vec::with_capacity(length);
    data.extend_from_slice(&12_u16.to_be_bytes());
    data.extend_from_slice(&0_u16.to_be_bytes()); // reserved
    data.extend_from_slice(&(length as u32).to_be_bytes());
    data.extend_from_slice(&0_u32.to_be_bytes()); // language
    data.extend_from_slice(&(groups.len() as u32).to_be_bytes());
    for group in groups {
        data.extend_from_slice(&group.start_char.to_be_bytes());
        data.extend_from_slice(&group.end_char.to_be_bytes());
        data.extend_from_slice(&u32::from(group.start_gid).to_be_bytes());
    }
    data
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(4) * 4
}

/// Sum of big-endian u32 words, the trailing partial word zero-extended.
fn checksum(data: &[u8]) -> u32 {
    let mut sum = 0_u32;
    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        sum = sum.wrapping_add(u32::from_be_bytes(chunk.try_into().unwrap()));
    }
    let rest = chunks.remainder();
    if !rest.is_empty() {
        let mut last = [0_u8; 4];
        last[..rest.len()].copy_from_slice(rest);
        sum = sum.wrapping_add(u32::from_be_bytes(last));
    }
    sum
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

fn read_i16(data: &[u8], offset: usize) -> i16 {
    i16::from_be_bytes([data[offset], data[offset + 1]])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::sync::OnceLock;

    use super::*;

    fn fixture_font() -> &'static [u8] {
        static DATA: OnceLock<Vec<u8>> = OnceLock::new();
        DATA.get_or_init(|| {
            let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("tests/fixtures/DejaVuSansMono.ttf");
            fs::read(path).expect("fixture font available")
        })
    }

    fn chars(list: &[char]) -> IndexSet<char> {
        list.iter().copied().collect()
    }

    #[test]
    fn checksum_sums_be_words_and_pads_the_tail() {
        assert_eq!(checksum(b"ABCD"), 0x4142_4344);
        assert_eq!(checksum(b"AB"), 0x4142_0000);
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn loca_builder_prefers_the_short_format() {
        let (data, format) = build_loca(&[0, 100, 200]);
        assert_eq!(format, 0);
        assert_eq!(data.len(), 6);
        assert_eq!(read_u16(&data, 2), 50);

        let (data, format) = build_loca(&[0, 0x0002_0000]);
        assert_eq!(format, 1);
        assert_eq!(read_u32(&data, 4), 0x0002_0000);

        let (_, format) = build_loca(&[0, 3]);
        assert_eq!(format, 1, "odd offsets need the long format");
    }

    #[test]
    fn char_map_grouping_follows_parallel_runs() {
        let groups = group_char_map(&[('a', 1), ('b', 2), ('d', 3), ('e', 9)]);
        let spans: Vec<(u32, u32, u16)> = groups
            .iter()
            .map(|g| (g.start_char, g.end_char, g.start_gid))
            .collect();
        assert_eq!(
            spans,
            [(0x61, 0x62, 1), (0x64, 0x64, 3), (0x65, 0x65, 9)],
            "runs break when either sequence skips"
        );
    }

    #[test]
    fn bmp_maps_use_cmap_format_4() {
        let cmap = build_cmap(&[('+', 1), ('-', 2)]);
        assert_eq!(read_u16(&cmap, 4), 3, "Windows platform");
        assert_eq!(read_u16(&cmap, 6), 1, "BMP encoding");
        let subtable = read_u32(&cmap, 8) as usize;
        assert_eq!(read_u16(&cmap, subtable), 4);
    }

    #[test]
    fn supplementary_plane_maps_use_cmap_format_12() {
        let cmap = build_cmap(&[('\u{f030}', 1), ('\u{10f030}', 2)]);
        assert_eq!(read_u16(&cmap, 6), 10, "full-repertoire encoding");
        let subtable = read_u32(&cmap, 8) as usize;
        assert_eq!(read_u16(&cmap, subtable), 12);
        // One group per isolated character.
        assert_eq!(read_u32(&cmap, subtable + 12), 2);
    }

    #[test]
    fn garbage_input_is_a_parse_error() {
        let err = SubsetFont::build(b"not a font at all", &chars(&['+'])).unwrap_err();
        assert!(matches!(err, SubsetError::Parse(_)), "{err}");
    }

    #[test]
    fn subset_keeps_requested_characters_mapped() {
        let subset = SubsetFont::build(fixture_font(), &chars(&['+', '-'])).expect("subset");
        let out = subset.to_bytes(TargetFormat::Sfnt);

        let font = SkrifaFontRef::new(&out).expect("output parses");
        let charmap = font.charmap();
        let plus = charmap.map('+').expect("'+' still mapped");
        let minus = charmap.map('-').expect("'-' still mapped");
        assert_ne!(plus.to_u32(), 0);
        assert_ne!(minus.to_u32(), 0);
        assert!(charmap.map('Q').is_none(), "unrequested characters dropped");
    }

    #[test]
    fn subset_is_much_smaller_than_the_source() {
        let source = fixture_font();
        let subset = SubsetFont::build(source, &chars(&['+'])).expect("subset");
        let out = subset.to_bytes(TargetFormat::Sfnt);
        assert!(
            out.len() * 10 < source.len(),
            "{} bytes vs {} in the source",
            out.len(),
            source.len()
        );
    }

    #[test]
    fn unmapped_characters_are_dropped_silently() {
        let subset =
            SubsetFont::build(fixture_font(), &chars(&['+', '\u{10FFF0}'])).expect("subset");
        let out = subset.to_bytes(TargetFormat::Sfnt);
        let font = SkrifaFontRef::new(&out).expect("output parses");
        assert!(font.charmap().map('+').is_some());
        assert!(font.charmap().map('\u{10FFF0}').is_none());
    }

    #[test]
    fn subset_output_is_deterministic() {
        let first = subset_font(fixture_font(), &chars(&['+', '-']), TargetFormat::Sfnt)
            .expect("first run");
        let second = subset_font(fixture_font(), &chars(&['-', '+']), TargetFormat::Sfnt)
            .expect("second run");
        assert_eq!(first, second, "input order must not affect the output");
    }

    #[test]
    fn woff_output_carries_the_woff_signature() {
        let out = subset_font(fixture_font(), &chars(&['+']), TargetFormat::Woff).expect("woff");
        assert_eq!(&out[..4], b"wOFF");
        assert_eq!(read_u32(&out, 4), 0x0001_0000, "flavor is TrueType");
        assert_eq!(read_u32(&out, 8) as usize, out.len(), "length field");
    }

    #[test]
    fn woff2_output_carries_the_woff2_signature() {
        let out = subset_font(fixture_font(), &chars(&['+']), TargetFormat::Woff2).expect("woff2");
        assert_eq!(&out[..4], b"wOF2");
        assert_eq!(read_u32(&out, 4), 0x0001_0000, "flavor is TrueType");
        assert_eq!(out.len() % 4, 0, "padded to a word boundary");
    }
}
