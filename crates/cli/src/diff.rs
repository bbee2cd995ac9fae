//! Dev-only diff tool for regression testing (spec.md §6, §8 S6).

use std::path::Path;

use anyhow::{Context, Result, bail};
use read_fonts::{FontRef, TableProvider};

/// Compare two files, reporting the first difference.
///
/// If both paths have a `.txt`-like sidecar extension they are compared
/// line-by-line; otherwise both are parsed as fonts and compared
/// table-by-table (first differing table tag and byte length reported).
pub fn run(left: &Path, right: &Path) -> Result<()> {
    let left_bytes = std::fs::read(left).with_context(|| format!("reading {}", left.display()))?;
    let right_bytes = std::fs::read(right).with_context(|| format!("reading {}", right.display()))?;

    if looks_like_sidecar(left) && looks_like_sidecar(right) {
        return diff_sidecars(&left_bytes, &right_bytes);
    }

    diff_fonts(&left_bytes, &right_bytes)
}

fn looks_like_sidecar(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).map(|e| e == "txt").unwrap_or(false)
        || path.to_string_lossy().ends_with("-glyphs")
}

fn diff_sidecars(left: &[u8], right: &[u8]) -> Result<()> {
    let left = String::from_utf8_lossy(left);
    let right = String::from_utf8_lossy(right);
    let mut left_lines = left.lines();
    let mut right_lines = right.lines();

    let mut line_no = 0usize;
    loop {
        line_no += 1;
        match (left_lines.next(), right_lines.next()) {
            (None, None) => {
                println!("identical ({} lines)", line_no - 1);
                return Ok(());
            }
            (Some(l), Some(r)) if l == r => continue,
            (l, r) => bail!("line {line_no} differs: {l:?} vs {r:?}"),
        }
    }
}

fn diff_fonts(left: &[u8], right: &[u8]) -> Result<()> {
    let left_font = FontRef::new(left).context("parsing left font")?;
    let right_font = FontRef::new(right).context("parsing right font")?;

    let mut left_tags: Vec<_> = left_font.table_directory.table_records().iter().map(|r| r.tag()).collect();
    let mut right_tags: Vec<_> = right_font.table_directory.table_records().iter().map(|r| r.tag()).collect();
    left_tags.sort();
    right_tags.sort();

    if left_tags != right_tags {
        bail!("table sets differ: {left_tags:?} vs {right_tags:?}");
    }

    for tag in left_tags {
        let l = left_font.table_data(tag);
        let r = right_font.table_data(tag);
        match (l, r) {
            (Some(l), Some(r)) if l.as_bytes() == r.as_bytes() => continue,
            (Some(l), Some(r)) => {
                bail!("table {tag} differs: {} bytes vs {} bytes", l.len(), r.len());
            }
            _ => bail!("table {tag} missing from one side"),
        }
    }

    println!("identical (modulo tables not compared bit-for-bit by this check)");
    Ok(())
}
