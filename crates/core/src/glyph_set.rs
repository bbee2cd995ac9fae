//! GlyphSetResolver: maps Unicode pair-class candidates to glyph IDs via
//! the shaper, language-aware (spec.md §4.3).

use indexmap::IndexMap;
use read_fonts::types::GlyphId;

use crate::{
    config::{Config, Language},
    font::Font,
    shaper::{Direction, Shaper},
};

/// One resolved (code point, glyph ID) candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub codepoint: u32,
    pub glyph_id: GlyphId,
}

/// Candidate glyphs for each of the four classes, before ink-bounds
/// filtering. `vertical` is populated only when [`Config::is_vertical`].
#[derive(Debug, Default, Clone)]
pub struct CandidateSet {
    pub l: Vec<Candidate>,
    pub r: Vec<Candidate>,
    pub m: Vec<Candidate>,
    pub f: Vec<Candidate>,
    pub vertical_l: Vec<Candidate>,
    pub vertical_r: Vec<Candidate>,
    pub vertical_m: Vec<Candidate>,
}

pub struct GlyphSetResolver;

impl GlyphSetResolver {
    /// Resolve every class's candidates for `config`'s code-point sets,
    /// under `language`.
    pub fn resolve(
        font: &Font,
        config: &Config,
        language: Language,
        shaper: &mut dyn Shaper,
    ) -> CandidateSet {
        let script = match language {
            Language::Jan | Language::Zhs | Language::Zht => "hani",
            Language::Kor => "hani",
            Language::Auto => "hani",
        };
        let lang_tag = language.ot_tag().unwrap_or("dflt").trim();

        let mut set = CandidateSet::default();
        set.l = Self::resolve_class(font, config.l_set().iter(), Direction::Horizontal, script, lang_tag, shaper);
        set.r = Self::resolve_class(font, config.r_set().iter(), Direction::Horizontal, script, lang_tag, shaper);
        set.m = Self::resolve_class(font, config.m_set().iter(), Direction::Horizontal, script, lang_tag, shaper);
        set.f = Self::resolve_class(font, config.f_set().iter(), Direction::Horizontal, script, lang_tag, shaper);

        if config.is_vertical() {
            set.vertical_l =
                Self::resolve_class(font, config.l_set().iter(), Direction::Vertical, script, lang_tag, shaper);
            set.vertical_r =
                Self::resolve_class(font, config.r_set().iter(), Direction::Vertical, script, lang_tag, shaper);
            set.vertical_m =
                Self::resolve_class(font, config.m_set().iter(), Direction::Vertical, script, lang_tag, shaper);
        }

        set
    }

    /// Shape each code point in `codepoints` and keep the first glyph of
    /// single-glyph results. Code points mapping to `.notdef` (glyph 0)
    /// or yielding 2+ glyphs (ligation) are discarded.
    fn resolve_class(
        font: &Font,
        codepoints: impl Iterator<Item = u32>,
        direction: Direction,
        script: &str,
        language: &str,
        shaper: &mut dyn Shaper,
    ) -> Vec<Candidate> {
        // IndexMap preserves insertion (ascending codepoint iteration) order,
        // which downstream coverage-table construction depends on.
        let mut resolved: IndexMap<u32, GlyphId> = IndexMap::new();

        for codepoint in codepoints {
            let glyphs = match shaper.shape(font.data(), font.face_index(), codepoint, direction, script, language) {
                Ok(glyphs) => glyphs,
                Err(_) => continue,
            };
            if glyphs.len() != 1 {
                continue;
            }
            let glyph_id = glyphs[0];
            if glyph_id.to_u16() == 0 {
                continue;
            }
            resolved.insert(codepoint, glyph_id);
        }

        resolved
            .into_iter()
            .map(|(codepoint, glyph_id)| Candidate { codepoint, glyph_id })
            .collect()
    }
}
