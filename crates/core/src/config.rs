//! Per-face configuration: language selection, code-point sets, tolerances.

use indexmap::IndexSet;

/// OpenType language tag this engine knows how to classify punctuation for,
/// or the `Auto` sentinel asking [`crate::language`] to resolve one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Jan,
    Kor,
    Zhs,
    Zht,
    Auto,
}

impl Language {
    /// The four-letter OpenType language-system tag, or `None` for `Auto`.
    pub fn ot_tag(self) -> Option<&'static str> {
        match self {
            Language::Jan => Some("JAN "),
            Language::Kor => Some("KOR "),
            Language::Zhs => Some("ZHS "),
            Language::Zht => Some("ZHT "),
            Language::Auto => None,
        }
    }
}

/// Initial per-class candidate code points, before ink-bounds filtering.
///
/// Populated with the default JLREQ/CLREQ seed sets for a given
/// [`Language`] by [`Config::with_default_seeds`]; callers may also build
/// a set from scratch.
#[derive(Debug, Clone, Default)]
pub struct CodepointSet(IndexSet<u32>);

impl CodepointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        Self(chars.into_iter().map(|c| c as u32).collect())
    }

    pub fn insert(&mut self, codepoint: u32) -> bool {
        self.0.insert(codepoint)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An (L, R) glyph-pair, identified by code point, excluded from the
/// synthesized pair lookup (but not from single positioning).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkipPair {
    pub left: u32,
    pub right: u32,
}

/// The full set of recognized build options (spec.md §3).
///
/// Built with a chainable builder, matching this codebase's `Options`
/// convention: `Config::new(Language::Jan).vertical(true).test_level(2)`.
#[derive(Debug, Clone)]
pub struct Config {
    language: Language,
    vertical: bool,
    use_ink_bounds: bool,
    fullwidth_advance_ems: f64,
    fullwidth_tolerance: f64,
    l: CodepointSet,
    r: CodepointSet,
    m: CodepointSet,
    f: CodepointSet,
    skip_pairs: Vec<SkipPair>,
    test_level: u8,
}

impl Config {
    /// Start from the default JLREQ/CLREQ seed sets for `language`.
    pub fn new(language: Language) -> Self {
        let mut config = Self {
            language,
            vertical: false,
            use_ink_bounds: true,
            fullwidth_advance_ems: 1.0,
            fullwidth_tolerance: 0.05,
            l: CodepointSet::new(),
            r: CodepointSet::new(),
            m: CodepointSet::new(),
            f: CodepointSet::new(),
            skip_pairs: Vec::new(),
            test_level: 1,
        };
        config.seed_default_codepoints();
        config
    }

    /// Seed `l`/`r`/`m` from the default JLREQ/CLREQ tables for
    /// [`Self::language`]. U+3001/U+3002/U+FF0C/U+FF0E are
    /// language-conditional (spec.md §4.3): L in JAN/KOR, M in ZHS/ZHT.
    /// Under `Auto`, they are seeded into both plausible classes so
    /// [`crate::ink_bounds`] can decide, with a deterministic
    /// L > R > M tie-break applied later by the pair classifier.
    fn seed_default_codepoints(&mut self) {
        // Opening brackets: ink at the right of the advance box.
        const OPENING_BRACKETS: &[char] = &[
            '\u{3008}', '\u{300A}', '\u{300C}', '\u{300E}', '\u{3010}', '\u{3014}', '\u{FF08}',
            '\u{FF3B}', '\u{FF5B}',
        ];
        // Closing brackets: ink at the left of the advance box.
        const CLOSING_BRACKETS: &[char] = &[
            '\u{3009}', '\u{300B}', '\u{300D}', '\u{300F}', '\u{3011}', '\u{3015}', '\u{FF09}',
            '\u{FF3D}', '\u{FF5D}',
        ];
        // Middle dot and colon-like punctuation: ink centered.
        const MIDDLE: &[char] = &['\u{30FB}', '\u{FF1A}', '\u{FF1B}'];
        // Comma/ideographic-comma and full stop/ideographic full stop:
        // language-conditional (see doc comment above).
        const CONDITIONAL: &[char] = &['\u{3001}', '\u{3002}', '\u{FF0C}', '\u{FF0E}'];

        self.r = CodepointSet::from_chars(OPENING_BRACKETS.iter().copied());
        self.l = CodepointSet::from_chars(CLOSING_BRACKETS.iter().copied());
        self.m = CodepointSet::from_chars(MIDDLE.iter().copied());

        match self.language {
            Language::Jan | Language::Kor => {
                for &c in CONDITIONAL {
                    self.l.insert(c as u32);
                }
            }
            Language::Zhs | Language::Zht => {
                for &c in CONDITIONAL {
                    self.m.insert(c as u32);
                }
            }
            Language::Auto => {
                for &c in CONDITIONAL {
                    self.l.insert(c as u32);
                    self.m.insert(c as u32);
                }
            }
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn vertical(mut self, vertical: bool) -> Self {
        self.vertical = vertical;
        self
    }

    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    pub fn use_ink_bounds(mut self, use_ink_bounds: bool) -> Self {
        self.use_ink_bounds = use_ink_bounds;
        self
    }

    pub fn uses_ink_bounds(&self) -> bool {
        self.use_ink_bounds
    }

    pub fn fullwidth_advance_ems(mut self, ems: f64) -> Self {
        self.fullwidth_advance_ems = ems;
        self
    }

    pub fn get_fullwidth_advance_ems(&self) -> f64 {
        self.fullwidth_advance_ems
    }

    pub fn fullwidth_tolerance(mut self, tolerance: f64) -> Self {
        self.fullwidth_tolerance = tolerance;
        self
    }

    pub fn get_fullwidth_tolerance(&self) -> f64 {
        self.fullwidth_tolerance
    }

    pub fn l(mut self, set: CodepointSet) -> Self {
        self.l = set;
        self
    }

    pub fn r(mut self, set: CodepointSet) -> Self {
        self.r = set;
        self
    }

    pub fn m(mut self, set: CodepointSet) -> Self {
        self.m = set;
        self
    }

    pub fn f(mut self, set: CodepointSet) -> Self {
        self.f = set;
        self
    }

    pub fn l_set(&self) -> &CodepointSet {
        &self.l
    }

    pub fn r_set(&self) -> &CodepointSet {
        &self.r
    }

    pub fn m_set(&self) -> &CodepointSet {
        &self.m
    }

    pub fn f_set(&self) -> &CodepointSet {
        &self.f
    }

    pub fn skip_pairs(mut self, pairs: Vec<SkipPair>) -> Self {
        self.skip_pairs = pairs;
        self
    }

    pub fn skip_pairs_slice(&self) -> &[SkipPair] {
        &self.skip_pairs
    }

    pub fn test_level(mut self, level: u8) -> Self {
        self.test_level = level;
        self
    }

    pub fn get_test_level(&self) -> u8 {
        self.test_level
    }

    /// `halfEm = round(UPEM * fullwidth_advance_ems / 2)` for a given UPEM.
    pub fn half_em(&self, units_per_em: u16) -> i16 {
        ((units_per_em as f64) * self.fullwidth_advance_ems / 2.0).round() as i16
    }

    /// Absolute tolerance in design units for a given UPEM.
    pub fn tolerance_units(&self, units_per_em: u16) -> f64 {
        (units_per_em as f64) * self.fullwidth_tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jan_puts_ideographic_comma_in_l() {
        let config = Config::new(Language::Jan);
        assert!(config.l_set().iter().any(|cp| cp == '\u{3001}' as u32));
        assert!(!config.m_set().iter().any(|cp| cp == '\u{3001}' as u32));
    }

    #[test]
    fn zht_puts_ideographic_comma_in_m() {
        let config = Config::new(Language::Zht);
        assert!(config.m_set().iter().any(|cp| cp == '\u{3001}' as u32));
        assert!(!config.l_set().iter().any(|cp| cp == '\u{3001}' as u32));
    }

    #[test]
    fn auto_seeds_both_classes() {
        let config = Config::new(Language::Auto);
        assert!(config.l_set().iter().any(|cp| cp == '\u{3001}' as u32));
        assert!(config.m_set().iter().any(|cp| cp == '\u{3001}' as u32));
    }

    #[test]
    fn half_em_rounds() {
        let config = Config::new(Language::Jan);
        assert_eq!(config.half_em(1000), 500);
        assert_eq!(config.half_em(2048), 1024);
    }

    #[test]
    fn builder_chains() {
        let config = Config::new(Language::Kor).vertical(true).test_level(2);
        assert!(config.is_vertical());
        assert_eq!(config.get_test_level(), 2);
    }
}
