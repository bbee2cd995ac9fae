//! TrueType-collection walker: iterates faces in native order and
//! re-serializes with shared-table deduplication (spec.md §5, §6, §9).

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use east_asian_spacing_core::Font;
use font_types::Tag;
use read_fonts::{FileRef, FontRef, TableProvider};

/// How many faces a font file contains, and whether it is a collection.
pub fn face_count(data: &[u8]) -> Result<u32> {
    match FileRef::new(data).context("failed to parse font file")? {
        FileRef::Font(_) => Ok(1),
        FileRef::Collection(collection) => Ok(collection.len()),
    }
}

/// Open face `index` of `data` as both a structured [`Font`] and a raw
/// [`read_fonts::FontRef`] for table enumeration.
pub fn open_face<'a>(data: &'a [u8], index: u32) -> Result<(Font<'a>, FontRef<'a>)> {
    let font = Font::new(data, index).context("failed to open face")?;
    let raw = FontRef::from_index(data, index).context("failed to open face")?;
    Ok((font, raw))
}

/// Rebuild one face's font data with `gpos` replacing (or adding) the
/// GPOS table; every other table is copied unchanged from the source. The
/// result is a standalone single-face sfnt; when several faces are
/// re-packed into a collection afterwards (see [`build_ttc`]), their
/// bit-equal table bytes are shared by offset rather than duplicated.
pub fn rewrite_with_gpos(raw: &FontRef, gpos: &write_fonts::tables::gpos::Gpos) -> Result<Vec<u8>> {
    use write_fonts::FontBuilder;

    let mut builder = FontBuilder::new();
    for record in raw.table_directory.table_records() {
        let tag = record.tag();
        if tag == Tag::new(b"GPOS") {
            continue;
        }
        if let Some(data) = raw.table_data(tag) {
            builder.add_raw(tag, data);
        }
    }
    builder.add_table(gpos).context("failed to serialize GPOS table")?;
    Ok(builder.build())
}

/// Re-pack several standalone single-face sfnt blobs (as produced by
/// [`rewrite_with_gpos`] or left untouched) into one TrueType Collection,
/// in the given (native) face order.
///
/// Each face's table bytes are reused verbatim: only the `TableRecord`
/// offset field is rewritten to point into a shared data pool, keyed by
/// exact byte content, so tables that are bit-identical across faces
/// (the common case for `glyf`/`CFF`/`cmap` in a Noto CJK-style family)
/// are written once (spec.md §9 "Shared tables in TTCs"). Table checksums
/// are copied from each source face's own directory: they depend only on
/// table content, which is unchanged, so they remain valid. `head`'s
/// `checkSumAdjustment` is likewise unaffected, since it is a function of
/// a face's own table checksums, not of where those tables land in the
/// file.
///
/// A single face is returned as-is (no collection wrapper is needed).
pub fn build_ttc(faces: &[Vec<u8>]) -> Result<Vec<u8>> {
    if faces.len() == 1 {
        return Ok(faces[0].clone());
    }
    if faces.is_empty() {
        bail!("cannot build a TTC from zero faces");
    }

    struct FaceLayout {
        sfnt_version: u32,
        records: Vec<(Tag, u32 /* checksum */, Vec<u8> /* table bytes */)>,
    }

    let mut layouts = Vec::with_capacity(faces.len());
    for face in faces {
        let font = FontRef::new(face).context("failed to parse built face for TTC packing")?;
        let sfnt_version = font.table_directory.sfnt_version();
        let mut records = Vec::new();
        for record in font.table_directory.table_records() {
            let tag = record.tag();
            let Some(data) = font.table_data(tag) else { continue };
            records.push((tag, record.check_sum(), data.as_bytes().to_vec()));
        }
        layouts.push(FaceLayout { sfnt_version, records });
    }

    // Header layout: ttcf header, then one sfnt offset-table + table
    // directory per face (no gaps), then the shared table-data pool.
    const TTC_HEADER_LEN: u32 = 12; // tag, version, numFonts
    const SFNT_HEADER_LEN: u32 = 12; // sfntVersion, numTables, searchRange, entrySelector, rangeShift
    const TABLE_RECORD_LEN: u32 = 16;

    let num_fonts = layouts.len() as u32;
    let mut offset = TTC_HEADER_LEN + num_fonts * 4;
    let mut face_table_directory_offsets = Vec::with_capacity(layouts.len());
    for layout in &layouts {
        face_table_directory_offsets.push(offset);
        offset += SFNT_HEADER_LEN + layout.records.len() as u32 * TABLE_RECORD_LEN;
    }

    // Shared pool: first writer of a given byte sequence wins the offset;
    // later faces whose table is bit-identical reuse it.
    let mut pool: Vec<u8> = Vec::new();
    let mut pool_offsets: HashMap<Vec<u8>, u32> = HashMap::new();
    let mut table_offsets: Vec<Vec<u32>> = Vec::with_capacity(layouts.len());

    for layout in &layouts {
        let mut offsets_for_face = Vec::with_capacity(layout.records.len());
        for (_, _, bytes) in &layout.records {
            let table_offset = *pool_offsets.entry(bytes.clone()).or_insert_with(|| {
                let start = offset + pool.len() as u32;
                pool.extend_from_slice(bytes);
                while pool.len() % 4 != 0 {
                    pool.push(0);
                }
                start
            });
            offsets_for_face.push(table_offset);
        }
        table_offsets.push(offsets_for_face);
    }

    let total_len = offset + pool.len() as u32;
    let mut out = Vec::with_capacity(total_len as usize);

    out.extend_from_slice(b"ttcf");
    out.extend_from_slice(&1u16.to_be_bytes()); // majorVersion = 1
    out.extend_from_slice(&0u16.to_be_bytes()); // minorVersion = 0 (no DSIG table)
    out.extend_from_slice(&num_fonts.to_be_bytes());
    for table_directory_offset in &face_table_directory_offsets {
        out.extend_from_slice(&table_directory_offset.to_be_bytes());
    }

    for (layout, face_offsets) in layouts.iter().zip(&table_offsets) {
        let num_tables = layout.records.len() as u16;
        let (search_range, entry_selector, range_shift) = sfnt_directory_sizing(num_tables);
        out.extend_from_slice(&layout.sfnt_version.to_be_bytes());
        out.extend_from_slice(&num_tables.to_be_bytes());
        out.extend_from_slice(&search_range.to_be_bytes());
        out.extend_from_slice(&entry_selector.to_be_bytes());
        out.extend_from_slice(&range_shift.to_be_bytes());

        let mut ordered: Vec<(usize, Tag)> =
            layout.records.iter().enumerate().map(|(i, (tag, _, _))| (i, *tag)).collect();
        ordered.sort_by_key(|(_, tag)| *tag);
        for (i, tag) in ordered {
            let (_, checksum, bytes) = &layout.records[i];
            out.extend_from_slice(tag.to_be_bytes().as_slice());
            out.extend_from_slice(&checksum.to_be_bytes());
            out.extend_from_slice(&face_offsets[i].to_be_bytes());
            out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
        }
    }

    out.extend_from_slice(&pool);
    debug_assert_eq!(out.len() as u32, total_len);
    Ok(out)
}

/// `searchRange`/`entrySelector`/`rangeShift` per the sfnt table-directory
/// rules: `searchRange` is the largest power of two <= `numTables`, times
/// 16 (the table-record size); `entrySelector` is its log2; `rangeShift`
/// is `numTables * 16 - searchRange`.
fn sfnt_directory_sizing(num_tables: u16) -> (u16, u16, u16) {
    let mut entry_selector = 0u16;
    while (1u32 << (entry_selector + 1)) <= num_tables as u32 {
        entry_selector += 1;
    }
    let search_range = (1u32 << entry_selector) * 16;
    let range_shift = (num_tables as u32) * 16 - search_range;
    (search_range as u16, entry_selector, range_shift as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_sizing_matches_power_of_two_rule() {
        // 9 tables: largest power of two <= 9 is 8, so searchRange = 128.
        assert_eq!(sfnt_directory_sizing(9), (128, 3, 16));
        // 16 tables: exact power of two, rangeShift is 0.
        assert_eq!(sfnt_directory_sizing(16), (256, 4, 0));
        assert_eq!(sfnt_directory_sizing(1), (16, 0, 0));
    }

    #[test]
    fn build_ttc_passes_a_single_face_through_unchanged() {
        let face = vec![1, 2, 3, 4, 5];
        let result = build_ttc(std::slice::from_ref(&face)).unwrap();
        assert_eq!(result, face);
    }

    #[test]
    fn build_ttc_rejects_zero_faces() {
        assert!(build_ttc(&[]).is_err());
    }
}
