//! LanguageClassifier: resolves the OpenType language tag used to decide
//! punctuation glyph geometry (spec.md §4.1).

use crate::{
    config::Language,
    error::{Error, Result},
    font::Font,
};

/// Unicode block coverage used by the auto-detect heuristic.
#[derive(Debug, Default, Clone, Copy)]
struct BlockCoverage {
    japanese: bool,
    korean: bool,
    chinese: bool,
}

/// Resolves the [`Language`] to classify punctuation glyphs under.
///
/// If the caller supplied an explicit tag, it is returned unchanged. The
/// OS/2 codepage range is consulted as the primary heuristic signal; `name`
/// table family strings are a secondary tiebreak only (substring match on
/// "Jp"/"Japanese"). Coverage of two or more CJK code-page ranges that
/// can't be disambiguated raises [`Error::LanguageAmbiguous`]. Coverage of
/// *none* of them is not an ambiguity -- it is a font with nothing for this
/// engine to do, such as a Latin-only font (spec.md §8 scenario S3) -- so
/// it resolves to `Language::Auto` and lets `GlyphSetResolver`/
/// `PairClassifier` discover empty L/R/M candidate sets on their own,
/// which surfaces as the non-fatal `NoApplicableGlyphs` instead.
pub struct LanguageClassifier;

impl LanguageClassifier {
    /// Resolve the language to use. `user_tag` takes precedence over any
    /// auto-detection; pass `Language::Auto` to force detection.
    pub fn resolve(font: &Font, user_tag: Language) -> Result<Language> {
        if user_tag != Language::Auto {
            return Ok(user_tag);
        }

        let coverage = Self::detect_block_coverage(font)?;
        match Self::decide(coverage) {
            Decision::Resolved(language) => Ok(language),
            Decision::NeedsFamilyNameTiebreak => {
                if Self::family_name_suggests_japanese(font)? {
                    Ok(Language::Jan)
                } else {
                    Err(Error::LanguageAmbiguous)
                }
            }
            Decision::Ambiguous => Err(Error::LanguageAmbiguous),
        }
    }

    /// The pure part of the heuristic, pulled out of `resolve` so it's
    /// unit-testable without a real font fixture: given which codepage
    /// ranges are covered, decide whether a single language already
    /// follows, whether the family-name tiebreak should be consulted, or
    /// whether the coverage is genuinely ambiguous.
    fn decide(coverage: BlockCoverage) -> Decision {
        let covered_count =
            [coverage.japanese, coverage.korean, coverage.chinese].iter().filter(|b| **b).count();

        match covered_count {
            0 => Decision::Resolved(Language::Auto),
            1 if coverage.japanese => Decision::Resolved(Language::Jan),
            1 if coverage.korean => Decision::Resolved(Language::Kor),
            1 if coverage.chinese => Decision::Resolved(Language::Zhs),
            _ if coverage.japanese && coverage.chinese && !coverage.korean => {
                Decision::NeedsFamilyNameTiebreak
            }
            _ => Decision::Ambiguous,
        }
    }

    /// Inspect OS/2 `ulCodePageRange1` bits for CJK codepage coverage.
    ///
    /// Bit 17 = Japanese (Shift-JIS), bit 19 = Korean (Wansung), bit 21 =
    /// Simplified Chinese (GBK), bit 20 = Traditional Chinese (Big5).
    fn detect_block_coverage(font: &Font) -> Result<BlockCoverage> {
        let os2 = font.read_ref().os2().map_err(Error::Parse)?;
        let range1 = os2.ul_code_page_range_1().unwrap_or(0);
        Ok(BlockCoverage {
            japanese: range1 & (1 << 17) != 0,
            korean: range1 & (1 << 19) != 0,
            chinese: range1 & (1 << 21) != 0 || range1 & (1 << 20) != 0,
        })
    }

    fn family_name_suggests_japanese(font: &Font) -> Result<bool> {
        let name = font.read_ref().name().map_err(|_| Error::NoName)?;
        for record in name.name_record() {
            if record.name_id().to_u16() != 1 && record.name_id().to_u16() != 16 {
                continue;
            }
            if let Ok(s) = record.string(name.string_data()) {
                let s: String = s.chars().collect();
                if s.contains("Jp") || s.contains("Japanese") || s.contains("JP") {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

/// Outcome of [`LanguageClassifier::decide`]'s pure coverage heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Resolved(Language),
    NeedsFamilyNameTiebreak,
    Ambiguous,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(japanese: bool, korean: bool, chinese: bool) -> BlockCoverage {
        BlockCoverage { japanese, korean, chinese }
    }

    #[test]
    fn no_coverage_resolves_to_auto_not_ambiguous() {
        // spec.md §8 scenario S3: a Latin-only font has nothing in any
        // CJK code-page range, but that's not the same as ambiguous
        // coverage -- it's "no CJK content to classify at all", so
        // downstream empty L/R sets should be what surfaces the
        // non-fatal NoApplicableGlyphs, not a hard error here.
        assert_eq!(LanguageClassifier::decide(coverage(false, false, false)), Decision::Resolved(Language::Auto));
    }

    #[test]
    fn single_block_resolves_directly() {
        assert_eq!(LanguageClassifier::decide(coverage(true, false, false)), Decision::Resolved(Language::Jan));
        assert_eq!(LanguageClassifier::decide(coverage(false, true, false)), Decision::Resolved(Language::Kor));
        assert_eq!(LanguageClassifier::decide(coverage(false, false, true)), Decision::Resolved(Language::Zhs));
    }

    #[test]
    fn japanese_and_chinese_need_family_name_tiebreak() {
        assert_eq!(
            LanguageClassifier::decide(coverage(true, false, true)),
            Decision::NeedsFamilyNameTiebreak
        );
    }

    #[test]
    fn korean_combined_with_another_block_is_ambiguous() {
        assert_eq!(LanguageClassifier::decide(coverage(true, true, false)), Decision::Ambiguous);
        assert_eq!(LanguageClassifier::decide(coverage(false, true, true)), Decision::Ambiguous);
        assert_eq!(LanguageClassifier::decide(coverage(true, true, true)), Decision::Ambiguous);
    }
}
