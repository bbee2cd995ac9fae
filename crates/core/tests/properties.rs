//! Property-style tests for the testable properties in spec.md §8.

use east_asian_spacing_core::{
    config::{Config, Language},
    font::Font,
    pipeline::{Outcome, Pipeline},
};

#[test]
fn language_dichotomy_seeds_differ() {
    // Property 5: same code point, different class, by language.
    let jan = Config::new(Language::Jan);
    let zht = Config::new(Language::Zht);

    let ideographic_comma = '\u{3001}' as u32;
    assert!(jan.l_set().iter().any(|cp| cp == ideographic_comma));
    assert!(zht.m_set().iter().any(|cp| cp == ideographic_comma));
    assert!(!zht.l_set().iter().any(|cp| cp == ideographic_comma));
}

#[test]
fn half_em_is_deterministic_function_of_upem_and_config() {
    // Property 1 (determinism) at the unit level: half_em is a pure
    // function of (units_per_em, fullwidth_advance_ems).
    let config = Config::new(Language::Jan);
    let a = config.half_em(1000);
    let b = config.half_em(1000);
    assert_eq!(a, b);
    assert_eq!(a, 500);
}

#[test]
fn skip_pairs_builder_roundtrips() {
    use east_asian_spacing_core::config::SkipPair;

    let config = Config::new(Language::Kor)
        .skip_pairs(vec![SkipPair { left: '\u{300C}' as u32, right: '\u{300D}' as u32 }]);
    assert_eq!(config.skip_pairs_slice().len(), 1);
}

#[test]
fn latin_only_fixture_is_left_unchanged() {
    // Scenario S3 (spec.md §8): a face with no CJK code-page coverage at
    // all runs the full pipeline against a real font rather than a
    // synthesized glyph set, and comes back `Unchanged` instead of
    // `LanguageAmbiguous` or any adjustment.
    let data = font_test_data::VAZIRMATN_VAR;
    let font = Font::new(data, 0).expect("VAZIRMATN_VAR is a valid single-face font");
    let config = Config::new(Language::Auto);

    match Pipeline::run(&font, &config).expect("auto-detect on a Latin/Arabic font must not error") {
        Outcome::Unchanged { .. } => {}
        Outcome::Adjusted { .. } => panic!("a font with no CJK punctuation should never gain a GPOS adjustment"),
    }
}
