//! Recursive font discovery (spec.md §1's "out of scope" collaborators).

use std::path::{Path, PathBuf};

use anyhow::Result;

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc", "otc"];

/// Expand `inputs` (files or directories) into a flat, sorted list of
/// font files. Directories are walked recursively; files are kept as-is
/// regardless of extension (the caller may explicitly name a file with
/// an unusual extension).
pub fn discover_fonts(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for input in inputs {
        if input.is_dir() {
            walk_dir(input, &mut found)?;
        } else {
            found.push(input.clone());
        }
    }
    found.sort();
    found.dedup();
    Ok(found)
}

fn walk_dir(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, found)?;
        } else if is_font_file(&path) {
            found.push(path);
        }
    }
    Ok(())
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FONT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_common_font_extensions() {
        assert!(is_font_file(Path::new("NotoSansCJK-Regular.ttc")));
        assert!(is_font_file(Path::new("Foo.OTF")));
        assert!(!is_font_file(Path::new("readme.txt")));
    }
}
