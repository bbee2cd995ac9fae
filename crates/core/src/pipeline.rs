//! Single-face orchestration tying together the six components in the
//! order described by spec.md §2's data flow.

use write_fonts::tables::gpos::Gpos;

use crate::{
    config::{Config, Language},
    error::{Error, Result},
    font::Font,
    glyph_set::GlyphSetResolver,
    gpos_builder::GposBuilder,
    language::LanguageClassifier,
    pair_classifier::{GlyphSet, PairClassifier},
    shaper::{RustybuzzShaper, Shaper},
};

/// The result of running the pipeline on one face.
pub enum Outcome {
    /// The face gained (or already idempotently has) the synthesized
    /// GPOS contribution. `horizontal`/`vertical` and `half_em` are the
    /// classification this GPOS was built from, exposed so callers (the
    /// `--glyphs` sidecar, `FeatureTester`) don't have to re-run
    /// classification themselves to get at the same data.
    Adjusted {
        gpos: Gpos,
        resolved_language: Language,
        horizontal: GlyphSet,
        vertical: Option<GlyphSet>,
        half_em: i16,
    },
    /// Nothing applicable was found; the caller should copy the face
    /// unchanged (spec.md §4.4 edge case, §7 `NoApplicableGlyphs`).
    Unchanged { reason: &'static str },
}

pub struct Pipeline;

impl Pipeline {
    /// Run LanguageClassifier -> GlyphSetResolver -> InkBoundsAnalyzer ->
    /// PairClassifier -> GPOSBuilder in that fixed order (spec.md §5).
    pub fn run(font: &Font, config: &Config) -> Result<Outcome> {
        Self::run_with_shaper(font, config, &mut RustybuzzShaper)
    }

    pub fn run_with_shaper(font: &Font, config: &Config, shaper: &mut dyn Shaper) -> Result<Outcome> {
        let resolved_language = LanguageClassifier::resolve(font, config.language())?;

        let candidates = GlyphSetResolver::resolve(font, config, resolved_language, shaper);

        let (horizontal, vertical) = match PairClassifier::classify(font, config, &candidates) {
            Ok(pair) => pair,
            Err(Error::NoApplicableGlyphs) => {
                log::warn!("no applicable L/R glyphs found; face emitted unchanged");
                return Ok(Outcome::Unchanged { reason: "no applicable glyphs" });
            }
            Err(e) => return Err(e),
        };

        let gpos = match GposBuilder::build(font, config, &horizontal, vertical.as_ref()) {
            Ok(gpos) => gpos,
            Err(Error::GposUnsupportedLookup(kind)) => {
                log::warn!("existing GPOS has a {kind} lookup this engine cannot preserve; face emitted unchanged");
                return Ok(Outcome::Unchanged { reason: "existing GPOS has an unsupported lookup type" });
            }
            Err(e) => return Err(e),
        };

        let half_em = config.half_em(font.units_per_em()?);
        Ok(Outcome::Adjusted { gpos, resolved_language, horizontal, vertical, half_em })
    }
}
