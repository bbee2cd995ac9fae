//! Noto CJK filename convention: derives `--index`/`--language` and
//! skips monospace variants (spec.md §6's `--noto` subcommand).

use std::path::Path;

use east_asian_spacing_core::config::Language;

/// Noto CJK TTC face order, used by e.g. `NotoSansCJK-Regular.ttc`:
/// 0=JP, 1=KR, 2=SC, 3=TC, 4=HK, 5=Mono(not applicable here).
const NOTO_FACE_LANGUAGES: &[Language] =
    &[Language::Jan, Language::Kor, Language::Zhs, Language::Zht, Language::Zht];

/// Whether `path`'s file name marks it as a monospace variant to skip.
pub fn is_mono_variant(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.contains("Mono"))
        .unwrap_or(false)
}

/// Face indices and languages to process for a Noto CJK font, assuming
/// the standard face ordering. Returns `None` if `path`'s name does not
/// look like a Noto CJK font (the caller should fall back to explicit
/// `--index`/`--language`, or skip the file).
pub fn derive_index_and_language(path: &Path) -> Option<Vec<(u32, Language)>> {
    let name = path.file_name()?.to_str()?;
    if !name.starts_with("Noto") || !name.contains("CJK") {
        return None;
    }
    Some(NOTO_FACE_LANGUAGES.iter().enumerate().map(|(i, &lang)| (i as u32, lang)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_mono_variants() {
        assert!(is_mono_variant(Path::new("NotoSansMonoCJKjp-Regular.otf")));
        assert!(!is_mono_variant(Path::new("NotoSansCJKjp-Regular.otf")));
    }

    #[test]
    fn derives_faces_for_noto_cjk() {
        let faces = derive_index_and_language(Path::new("NotoSansCJK-Regular.ttc")).unwrap();
        assert_eq!(faces[0], (0, Language::Jan));
        assert_eq!(faces[1], (1, Language::Kor));
    }

    #[test]
    fn non_noto_names_return_none() {
        assert!(derive_index_and_language(Path::new("Arial.ttf")).is_none());
    }
}
