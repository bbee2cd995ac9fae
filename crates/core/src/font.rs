//! A loaded font face, bundling structured table access with outline access.

use read_fonts::{FontRef as ReadFontRef, TableProvider, types::GlyphId};
use skrifa::{FontRef as SkrifaFontRef, MetadataProvider, instance::LocationRef};

use crate::error::{Error, Result};

/// One face of an (possibly collection) font file.
///
/// Bundles a [`read_fonts::FontRef`] (structured table reads, raw table
/// bytes for copy-through) and a [`skrifa::FontRef`] (outlines and
/// metadata) over the same byte slice, plus the TTC face index used when
/// the underlying file is a TrueType Collection.
pub struct Font<'a> {
    data: &'a [u8],
    read: ReadFontRef<'a>,
    skrifa: SkrifaFontRef<'a>,
    face_index: u32,
}

impl<'a> Font<'a> {
    /// Open the single face at `face_index` within `data` (0 for a
    /// non-collection font).
    pub fn new(data: &'a [u8], face_index: u32) -> Result<Self> {
        let read = ReadFontRef::from_index(data, face_index)?;
        let skrifa = SkrifaFontRef::from_index(data, face_index)?;
        Ok(Self { data, read, skrifa, face_index })
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    pub fn read_ref(&self) -> &ReadFontRef<'a> {
        &self.read
    }

    pub fn skrifa_ref(&self) -> &SkrifaFontRef<'a> {
        &self.skrifa
    }

    pub fn units_per_em(&self) -> Result<u16> {
        Ok(self.read.head()?.units_per_em())
    }

    pub fn glyph_count(&self) -> Result<u16> {
        Ok(self.read.maxp()?.num_glyphs())
    }

    /// Whether the face carries vertical metrics (`vhea`/`vmtx`).
    pub fn has_vertical_metrics(&self) -> bool {
        self.read.vhea().is_ok() && self.read.vmtx().is_ok()
    }

    pub fn horizontal_advance(&self, glyph_id: GlyphId) -> Result<u16> {
        let hmtx = self.read.hmtx()?;
        Ok(hmtx.advance(glyph_id).unwrap_or_default())
    }

    pub fn vertical_advance(&self, glyph_id: GlyphId) -> Option<u16> {
        let vmtx = self.read.vmtx().ok()?;
        vmtx.advance(glyph_id)
    }

    /// Map a Unicode code point to a glyph ID via `cmap`, if present.
    pub fn map_codepoint(&self, codepoint: u32) -> Result<Option<GlyphId>> {
        let cmap = self.read.cmap().map_err(|_| Error::NoCmap)?;
        Ok(cmap.map_codepoint(codepoint))
    }

    pub fn location(&self) -> LocationRef<'_> {
        LocationRef::default()
    }

    pub fn outline_glyphs(&self) -> skrifa::outline::OutlineGlyphCollection<'_> {
        self.skrifa.outline_glyphs()
    }

    /// Raw bytes of a named table, for copy-through during rewrite.
    pub fn raw_table(&self, tag: font_types::Tag) -> Option<&'a [u8]> {
        self.read.table_data(tag).map(|d| d.as_bytes())
    }

    /// All table tags present in this face, in directory order.
    pub fn table_tags(&self) -> impl Iterator<Item = font_types::Tag> + '_ {
        self.read.table_directory.table_records().iter().map(|r| r.tag())
    }
}
