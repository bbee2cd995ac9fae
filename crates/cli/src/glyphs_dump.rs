//! Writes the `-glyphs` sidecar file used by regression diffing
//! (spec.md §6 "Persisted state").

use std::path::Path;

use anyhow::{Context, Result};
use east_asian_spacing_core::pair_classifier::GlyphSet;

/// Write one line per glyph, `<class letter><glyph id>`, in ascending
/// glyph-ID order within each class, classes in L, R, M order.
pub fn write_sidecar(path: &Path, horizontal: &GlyphSet, vertical: Option<&GlyphSet>) -> Result<()> {
    let mut lines = Vec::new();
    append_class_lines(&mut lines, 'L', horizontal);
    append_class_lines(&mut lines, 'R', horizontal);
    append_class_lines(&mut lines, 'M', horizontal);
    if let Some(vertical) = vertical {
        append_class_lines(&mut lines, 'l', vertical);
        append_class_lines(&mut lines, 'r', vertical);
        append_class_lines(&mut lines, 'm', vertical);
    }

    std::fs::write(path, lines.join("\n"))
        .with_context(|| format!("failed to write glyph sidecar: {}", path.display()))
}

fn append_class_lines(lines: &mut Vec<String>, letter: char, set: &GlyphSet) {
    // fields are already kept in ascending glyph-ID order by PairClassifier.
    match letter.to_ascii_uppercase() {
        'L' => lines.extend(set.l.iter().map(|c| format!("{letter}{}", c.glyph_id.to_u16()))),
        'R' => lines.extend(set.r.iter().map(|c| format!("{letter}{}", c.glyph_id.to_u16()))),
        'M' => lines.extend(set.m.iter().map(|c| format!("{letter}{}", c.glyph_id.to_u16()))),
        _ => unreachable!(),
    }
}
