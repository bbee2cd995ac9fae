//! GPOSBuilder: synthesizes `chws`/`vchw`/`halt`/`vhal` GPOS subtables and
//! merges them into a face's existing GPOS (spec.md §4.5).

use std::collections::HashMap;

use font_types::Tag;
use read_fonts::{
    TableProvider,
    tables::{
        gpos::PositionLookupList as ReadPositionLookupList,
        layout::{FeatureList as ReadFeatureList, ScriptList as ReadScriptList},
    },
};
use write_fonts::tables::{
    gpos::{
        Class1Record, Class2Record, Gpos, PairPos, PairPosFormat1, PairPosFormat2, PairSet,
        PairValueRecord, PositionLookup, PositionLookupList, SinglePos, SinglePosFormat2, ValueRecord,
    },
    layout::{
        ClassDef, ClassDefFormat2, ClassRangeRecord, CoverageTable, Feature, FeatureList,
        FeatureRecord, LangSys, LangSysRecord, Lookup, LookupFlag, Script, ScriptList, ScriptRecord,
    },
};

use crate::{
    config::{Config, SkipPair},
    error::{Error, Result},
    font::Font,
    glyph_set::Candidate,
    layout_convert::convert_existing_lookup,
    pair_classifier::GlyphSet,
};

/// Script tag -> lang tag -> feature indices, accumulated while walking an
/// existing ScriptList and while registering new features.
///
/// Grounded on the teacher's `ScriptLangFeatureMap` (merger crate): same
/// shape, generalized from "merge several fonts' scripts" to "extend one
/// face's scripts with newly synthesized features".
#[derive(Debug, Default)]
struct ScriptLangFeatureMap {
    inner: HashMap<Tag, HashMap<Tag, Vec<u16>>>,
}

impl ScriptLangFeatureMap {
    fn add_feature_to_all_scripts(&mut self, feature_index: u16) {
        if self.inner.is_empty() {
            self.inner.entry(Tag::new(b"DFLT")).or_default().entry(Tag::new(b"dflt")).or_default();
        }
        for langs in self.inner.values_mut() {
            for features in langs.values_mut() {
                features.push(feature_index);
            }
        }
    }

    fn ensure_script_lang(&mut self, script: Tag, lang: Tag) {
        self.inner.entry(script).or_default().entry(lang).or_default();
    }

    /// Seed a (script, lang) entry with feature indices already present in
    /// the face's existing ScriptList, so the rebuilt table keeps
    /// referencing them alongside whatever `add_feature_to_all_scripts`
    /// appends later.
    fn seed_existing_features(&mut self, script: Tag, lang: Tag, feature_indices: impl IntoIterator<Item = u16>) {
        self.inner.entry(script).or_default().entry(lang).or_default().extend(feature_indices);
    }

    fn into_raw(self) -> HashMap<Tag, HashMap<Tag, Vec<u16>>> {
        self.inner
    }
}

const CHWS: &[u8; 4] = b"chws";
const VCHW: &[u8; 4] = b"vchw";
const HALT: &[u8; 4] = b"halt";
const VHAL: &[u8; 4] = b"vhal";

pub struct GposBuilder;

impl GposBuilder {
    /// Build the synthesized lookups for `horizontal` (and, if present,
    /// `vertical`) glyph sets and merge them into `font`'s existing GPOS,
    /// returning the new table to write back.
    ///
    /// Idempotent: if the font already carries an equivalent `chws`
    /// feature (same fingerprint), no new lookup is added and the
    /// existing table's bytes are returned unchanged upstream by the
    /// caller (spec.md §8 property 3, scenario S6).
    pub fn build(
        font: &Font,
        config: &Config,
        horizontal: &GlyphSet,
        vertical: Option<&GlyphSet>,
    ) -> Result<Gpos> {
        let units_per_em = font.units_per_em()?;
        let half_em = config.half_em(units_per_em);

        // One lookup per candidate feature, in registration order. Each is
        // only actually appended to the face's lookup list by
        // `merge_into_existing` once it is known not to duplicate an
        // already-present feature of the same tag (spec.md §8 property 3,
        // scenario S6): building them eagerly here is cheap and keeps this
        // function's shape independent of that merge policy.
        let mut candidates: Vec<(Tag, PositionLookup)> = Vec::new();

        if !horizontal.is_empty() {
            let pair_lookup =
                Self::build_pair_lookup(horizontal, half_em, Axis::Horizontal, config.skip_pairs_slice());
            let single_lookup = Self::build_single_lookup(horizontal, half_em, Axis::Horizontal);
            candidates.push((Tag::new(CHWS), PositionLookup::Pair(pair_lookup)));
            candidates.push((Tag::new(HALT), PositionLookup::Single(single_lookup)));
        }

        if let Some(vertical) = vertical {
            if !vertical.is_empty() {
                let pair_lookup =
                    Self::build_pair_lookup(vertical, half_em, Axis::Vertical, config.skip_pairs_slice());
                let single_lookup = Self::build_single_lookup(vertical, half_em, Axis::Vertical);
                candidates.push((Tag::new(VCHW), PositionLookup::Pair(pair_lookup)));
                candidates.push((Tag::new(VHAL), PositionLookup::Single(single_lookup)));
            }
        }

        Self::merge_into_existing(font, candidates)
    }

    /// Build the `chws`/`vchw` pair-positioning lookup. `skip_pairs`
    /// (spec.md §4.4 step 4) are emitted as a leading `PairPosFormat1`
    /// subtable of explicit zero-valued exceptions: within one lookup,
    /// OpenType applies the first subtable whose coverage matches, so an
    /// exception pair is left untouched and the class-based subtable
    /// after it never runs for that specific pair.
    fn build_pair_lookup(
        set: &GlyphSet,
        half_em: i16,
        axis: Axis,
        skip_pairs: &[SkipPair],
    ) -> Lookup<PairPos> {
        let mut coverage_glyphs: Vec<_> =
            set.l.iter().chain(&set.r).chain(&set.m).map(|c| c.glyph_id).collect();
        coverage_glyphs.sort_by_key(|g| g.to_u16());
        coverage_glyphs.dedup();
        let coverage = CoverageTable::format_1(coverage_glyphs);

        let class_def1 = Self::class_def(&set.l, &set.m);
        let class_def2 = Self::class_def(&set.r, &set.m);

        let half = half_em;
        let half2 = half_em / 2;

        let empty = ValueRecord::new();
        let l_reduction = Self::advance_value(axis, -half);
        let half_reduction = Self::advance_value(axis, -half2);
        let r_reduction = Self::placement_and_advance_value(axis, -half2, -half2);

        // class1: 0 = none, 1 = L, 2 = M. class2: 0 = none, 1 = R, 2 = M.
        let class1_records = vec![
            // class1 = 0 (none): no adjustment regardless of class2.
            Class1Record::new(vec![
                Class2Record::new(empty.clone(), empty.clone()),
                Class2Record::new(empty.clone(), empty.clone()),
                Class2Record::new(empty.clone(), empty.clone()),
            ]),
            // class1 = 1 (L).
            Class1Record::new(vec![
                Class2Record::new(empty.clone(), empty.clone()),
                Class2Record::new(l_reduction.clone(), empty.clone()),
                Class2Record::new(half_reduction.clone(), empty.clone()),
            ]),
            // class1 = 2 (M).
            Class1Record::new(vec![
                Class2Record::new(empty.clone(), empty.clone()),
                Class2Record::new(empty.clone(), r_reduction.clone()),
                Class2Record::new(half_reduction, empty),
            ]),
        ];

        let mut subtables = Vec::new();
        if let Some(exceptions) = Self::build_skip_pair_exceptions(set, skip_pairs) {
            subtables.push(PairPos::Format1(exceptions));
        }
        subtables.push(PairPos::Format2(PairPosFormat2::new(
            coverage,
            class_def1,
            class_def2,
            class1_records,
        )));

        Lookup::new(LookupFlag::empty(), subtables)
    }

    /// An explicit-pair exceptions subtable with empty `ValueRecord`s for
    /// every `skip_pairs` combination whose glyphs are both present in
    /// `set`'s L and R classes. Returns `None` if no configured skip pair
    /// resolves to glyphs actually in this set.
    fn build_skip_pair_exceptions(set: &GlyphSet, skip_pairs: &[SkipPair]) -> Option<PairPosFormat1> {
        if skip_pairs.is_empty() {
            return None;
        }

        let find = |list: &[Candidate], codepoint: u32| {
            list.iter().find(|c| c.codepoint == codepoint).map(|c| c.glyph_id)
        };

        let mut by_left: HashMap<read_fonts::types::GlyphId, Vec<read_fonts::types::GlyphId>> = HashMap::new();
        for pair in skip_pairs {
            let (Some(left), Some(right)) = (find(&set.l, pair.left), find(&set.r, pair.right)) else {
                continue;
            };
            by_left.entry(left).or_default().push(right);
        }
        if by_left.is_empty() {
            return None;
        }

        let mut left_glyphs: Vec<_> = by_left.keys().copied().collect();
        left_glyphs.sort_by_key(|g| g.to_u16());
        let coverage = CoverageTable::format_1(left_glyphs.clone());

        let pair_sets = left_glyphs
            .into_iter()
            .map(|left| {
                let mut rights = by_left.remove(&left).unwrap_or_default();
                rights.sort_by_key(|g| g.to_u16());
                let records = rights
                    .into_iter()
                    .map(|right| PairValueRecord::new(right, ValueRecord::new(), ValueRecord::new()))
                    .collect();
                PairSet::new(records)
            })
            .collect();

        Some(PairPosFormat1::new(coverage, pair_sets))
    }

    fn build_single_lookup(set: &GlyphSet, half_em: i16, axis: Axis) -> Lookup<SinglePos> {
        let mut entries: Vec<_> = set
            .l
            .iter()
            .map(|c| (c.glyph_id, Self::advance_value(axis, -half_em)))
            .chain(set.r.iter().map(|c| {
                (c.glyph_id, Self::placement_and_advance_value(axis, -half_em / 2, -half_em / 2))
            }))
            .chain(set.m.iter().map(|c| (c.glyph_id, Self::advance_value(axis, -half_em / 2))))
            .collect();
        entries.sort_by_key(|(gid, _)| gid.to_u16());

        let coverage = CoverageTable::format_1(entries.iter().map(|(gid, _)| *gid).collect());
        let value_records = entries.into_iter().map(|(_, value)| value).collect();

        let subtable = SinglePos::Format2(SinglePosFormat2::new(coverage, value_records));
        Lookup::new(LookupFlag::empty(), vec![subtable])
    }

    fn class_def(primary: &[crate::glyph_set::Candidate], middle: &[crate::glyph_set::Candidate]) -> ClassDef {
        let mut ranges = Vec::new();
        for c in primary {
            ranges.push(ClassRangeRecord::new(c.glyph_id, c.glyph_id, 1));
        }
        for c in middle {
            ranges.push(ClassRangeRecord::new(c.glyph_id, c.glyph_id, 2));
        }
        ranges.sort_by_key(|r| r.start_glyph_id);
        ClassDef::Format2(ClassDefFormat2::new(ranges))
    }

    fn advance_value(axis: Axis, delta: i16) -> ValueRecord {
        match axis {
            Axis::Horizontal => ValueRecord::new().with_x_advance(delta),
            Axis::Vertical => ValueRecord::new().with_y_advance(delta),
        }
    }

    fn placement_and_advance_value(axis: Axis, placement: i16, advance: i16) -> ValueRecord {
        match axis {
            Axis::Horizontal => {
                ValueRecord::new().with_x_placement(placement).with_x_advance(advance)
            }
            Axis::Vertical => ValueRecord::new().with_y_placement(placement).with_y_advance(advance),
        }
    }

    /// Walk the face's existing GPOS (if any), append the new lookups and
    /// features, register them to every Script/LangSys, and detect
    /// conflicts (spec.md §4.5, §7 `GposConflict`).
    ///
    /// Each `candidates` entry is appended -- as both a lookup and a
    /// feature -- only if no feature of that tag already exists. If one
    /// does, the candidate is fingerprinted by structural equality against
    /// the already-converted existing lookup it would have duplicated: an
    /// equal candidate is a no-op idempotent re-run (spec.md §8 property
    /// 3, scenario S6) and is dropped silently; an unequal one is a real
    /// `GposConflict` (§7) and is dropped with a warning. Either way the
    /// candidate's lookup is never added to the table when it goes
    /// unused -- doing so unconditionally would grow the LookupList by two
    /// unreferenced entries on every re-run and break determinism.
    fn merge_into_existing(font: &Font, candidates: Vec<(Tag, PositionLookup)>) -> Result<Gpos> {
        let existing = font.read_ref().gpos().ok();

        let mut scripts = ScriptLangFeatureMap::default();
        let mut lookups: Vec<PositionLookup> = Vec::new();
        let mut features: Vec<(Tag, Vec<u16>)> = Vec::new();
        let mut existing_feature_tags: HashMap<Tag, usize> = HashMap::new();

        if let Some(gpos) = &existing {
            Self::collect_existing(gpos, &mut scripts, &mut features, &mut existing_feature_tags)?;
            // Existing lookups are preserved verbatim as raw positioning
            // lookups, at the same indices they already had; new
            // glyph-position lookups are appended after them per the
            // ordering invariant in spec.md §4.5.
            lookups = Self::copy_existing_lookups(gpos)?;
        } else {
            scripts.ensure_script_lang(Tag::new(b"DFLT"), Tag::new(b"dflt"));
        }

        for (tag, candidate_lookup) in candidates {
            match Self::resolve_candidate(tag, &candidate_lookup, &lookups, &features, &existing_feature_tags) {
                CandidateOutcome::DuplicatesExisting => {
                    log::info!("{tag:?} already present with an equivalent lookup; skipping (idempotent re-run)");
                }
                CandidateOutcome::Conflicts => {
                    log::warn!("existing GPOS already defines {tag:?} with a different lookup; skipping");
                }
                CandidateOutcome::New => {
                    let lookup_index = lookups.len() as u16;
                    lookups.push(candidate_lookup);
                    let feature_index = features.len() as u16;
                    features.push((tag, vec![lookup_index]));
                    scripts.add_feature_to_all_scripts(feature_index);
                }
            }
        }

        Self::build_gpos(scripts, features, lookups)
    }

    /// Decide what to do with one candidate feature against the
    /// lookups/features collected so far. A tag not yet present is
    /// always new. A tag that is already present is a duplicate only
    /// if it names exactly one existing lookup and that lookup is
    /// structurally equal to the candidate; otherwise it's a conflict.
    /// Either existing case leaves `lookups`/`features` untouched --
    /// only `New` causes the caller to append (spec.md §8 property 3).
    fn resolve_candidate(
        tag: Tag,
        candidate_lookup: &PositionLookup,
        lookups: &[PositionLookup],
        features: &[(Tag, Vec<u16>)],
        existing_feature_tags: &HashMap<Tag, usize>,
    ) -> CandidateOutcome {
        let Some(&existing_idx) = existing_feature_tags.get(&tag) else {
            return CandidateOutcome::New;
        };
        let existing_lookup_indices = &features[existing_idx].1;
        match existing_lookup_indices.as_slice() {
            [only] if lookups.get(*only as usize) == Some(candidate_lookup) => {
                CandidateOutcome::DuplicatesExisting
            }
            _ => CandidateOutcome::Conflicts,
        }
    }

    fn collect_existing(
        gpos: &read_fonts::tables::gpos::Gpos,
        scripts: &mut ScriptLangFeatureMap,
        features: &mut Vec<(Tag, Vec<u16>)>,
        existing_feature_tags: &mut HashMap<Tag, usize>,
    ) -> Result<()> {
        let script_list: ReadScriptList = gpos.script_list()?;
        let feature_list: ReadFeatureList = gpos.feature_list()?;

        for record in feature_list.feature_records() {
            let index = features.len();
            existing_feature_tags.insert(record.feature_tag(), index);
            let feature = record.feature(feature_list.offset_data())?;
            let lookup_indices = feature.lookup_list_indices().iter().map(|i| i.get()).collect();
            features.push((record.feature_tag(), lookup_indices));
        }

        for script_record in script_list.script_records() {
            let script_tag = script_record.script_tag();
            let script = script_record.script(script_list.offset_data())?;

            if let Some(Ok(default_lang_sys)) = script.default_lang_sys() {
                let feature_indices: Vec<u16> = default_lang_sys.feature_indices().iter().map(|i| i.get()).collect();
                scripts.seed_existing_features(script_tag, Tag::new(b"dflt"), feature_indices);
            }
            for lang_record in script.lang_sys_records() {
                let lang_sys = lang_record.lang_sys(script.offset_data())?;
                let feature_indices: Vec<u16> = lang_sys.feature_indices().iter().map(|i| i.get()).collect();
                scripts.seed_existing_features(script_tag, lang_record.lang_sys_tag(), feature_indices);
            }
        }

        Ok(())
    }

    /// Structurally re-encode every lookup already in `gpos` so new
    /// lookups can be appended after them in the same table. Lookup
    /// indices are preserved (no shifting): each converted lookup keeps
    /// the position it already had. Fails with
    /// [`Error::GposUnsupportedLookup`] on the first lookup type this
    /// engine cannot reconstruct (contextual/chained-contextual/
    /// extension positioning), which the caller treats as "cannot safely
    /// merge" rather than silently dropping the face's real GPOS content.
    fn copy_existing_lookups(gpos: &read_fonts::tables::gpos::Gpos) -> Result<Vec<PositionLookup>> {
        let list: ReadPositionLookupList = gpos.lookup_list()?;
        let mut lookups = Vec::with_capacity(list.lookup_count() as usize);
        for lookup in list.lookups().iter().filter_map(|l| l.ok()) {
            lookups.push(convert_existing_lookup(&lookup).map_err(Error::GposUnsupportedLookup)?);
        }
        Ok(lookups)
    }

    fn build_gpos(
        scripts: ScriptLangFeatureMap,
        features: Vec<(Tag, Vec<u16>)>,
        lookups: Vec<PositionLookup>,
    ) -> Result<Gpos> {
        let mut script_records: Vec<ScriptRecord> = Vec::new();
        for (script_tag, lang_map) in scripts.into_raw() {
            let mut lang_sys_records: Vec<LangSysRecord> = Vec::new();
            let mut default_lang_sys = None;
            for (lang_tag, feature_indices) in lang_map {
                let lang_sys = LangSys::new(0xFFFF, feature_indices);
                if lang_tag == Tag::new(b"dflt") {
                    default_lang_sys = Some(lang_sys);
                } else {
                    lang_sys_records.push(LangSysRecord::new(lang_tag, lang_sys));
                }
            }
            lang_sys_records.sort_by_key(|r| r.lang_sys_tag);
            let script = Script::new(default_lang_sys, lang_sys_records);
            script_records.push(ScriptRecord::new(script_tag, script));
        }
        script_records.sort_by_key(|r| r.script_tag);
        let script_list = ScriptList::new(script_records);

        let feature_records: Vec<FeatureRecord> = features
            .into_iter()
            .map(|(tag, lookup_indices)| FeatureRecord::new(tag, Feature::new(None, lookup_indices)))
            .collect();
        let feature_list = FeatureList::new(feature_records);

        let lookup_list = PositionLookupList::new(lookups);

        Ok(Gpos::new(script_list, feature_list, lookup_list))
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateOutcome {
    New,
    DuplicatesExisting,
    Conflicts,
}

#[cfg(test)]
mod tests {
    use read_fonts::types::GlyphId;

    use super::*;
    use crate::glyph_set::Candidate;

    fn candidate(codepoint: u32, glyph_id: u16) -> Candidate {
        Candidate { codepoint, glyph_id: GlyphId::new(glyph_id as u32) }
    }

    fn glyph_set() -> GlyphSet {
        GlyphSet {
            l: vec![candidate(0x3001, 10), candidate(0x3002, 11)],
            r: vec![candidate(0x300C, 20), candidate(0x300E, 21)],
            m: vec![candidate(0xFF1A, 30)],
        }
    }

    #[test]
    fn skip_pair_exceptions_none_when_empty() {
        let set = glyph_set();
        assert!(GposBuilder::build_skip_pair_exceptions(&set, &[]).is_none());
    }

    #[test]
    fn skip_pair_exceptions_none_when_pair_not_in_set() {
        let set = glyph_set();
        let skip = [SkipPair { left: 0x3001, right: 0x4E00 }];
        assert!(GposBuilder::build_skip_pair_exceptions(&set, &skip).is_none());
    }

    #[test]
    fn skip_pair_exceptions_builds_one_pair_set_per_left_glyph() {
        let set = glyph_set();
        let skip = [
            SkipPair { left: 0x3001, right: 0x300C },
            SkipPair { left: 0x3001, right: 0x300E },
            SkipPair { left: 0x3002, right: 0x300C },
        ];
        let exceptions = GposBuilder::build_skip_pair_exceptions(&set, &skip)
            .expect("both glyphs of each pair are present in the set");
        assert_eq!(exceptions.pair_sets.len(), 2);
        assert_eq!(exceptions.pair_sets[0].pair_value_records.len(), 2);
        assert_eq!(exceptions.pair_sets[1].pair_value_records.len(), 1);
        for pair_set in &exceptions.pair_sets {
            for record in &pair_set.pair_value_records {
                assert_eq!(record.value_record1, ValueRecord::new());
                assert_eq!(record.value_record2, ValueRecord::new());
            }
        }
    }

    #[test]
    fn pair_lookup_prepends_skip_pair_exceptions_subtable() {
        let set = glyph_set();
        let skip = [SkipPair { left: 0x3001, right: 0x300C }];
        let lookup = GposBuilder::build_pair_lookup(&set, 500, Axis::Horizontal, &skip);
        assert_eq!(lookup.subtables.len(), 2);
        assert!(matches!(lookup.subtables[0], PairPos::Format1(_)));
        assert!(matches!(lookup.subtables[1], PairPos::Format2(_)));
    }

    #[test]
    fn pair_lookup_has_single_subtable_without_skip_pairs() {
        let set = glyph_set();
        let lookup = GposBuilder::build_pair_lookup(&set, 500, Axis::Horizontal, &[]);
        assert_eq!(lookup.subtables.len(), 1);
        assert!(matches!(lookup.subtables[0], PairPos::Format2(_)));
    }

    #[test]
    fn single_lookup_covers_every_class_once() {
        let set = glyph_set();
        let lookup = GposBuilder::build_single_lookup(&set, 500, Axis::Horizontal);
        assert_eq!(lookup.subtables.len(), 1);
        let SinglePos::Format2(SinglePosFormat2 { value_records, .. }) = &lookup.subtables[0] else {
            panic!("expected Format2 subtable");
        };
        assert_eq!(value_records.len(), set.l.len() + set.r.len() + set.m.len());
    }

    /// Re-registering the same feature tag against a lookup that is
    /// already structurally identical must be detected as a duplicate,
    /// not appended (spec.md §8 property 3, scenario S6): a second
    /// `build()` over a face this engine already adjusted has to be a
    /// no-op.
    #[test]
    fn resolve_candidate_detects_an_idempotent_duplicate() {
        let lookup = PositionLookup::Single(GposBuilder::build_single_lookup(&glyph_set(), 500, Axis::Horizontal));
        let lookups = vec![lookup.clone()];
        let features = vec![(Tag::new(HALT), vec![0u16])];
        let mut existing_feature_tags = HashMap::new();
        existing_feature_tags.insert(Tag::new(HALT), 0usize);

        let outcome = GposBuilder::resolve_candidate(Tag::new(HALT), &lookup, &lookups, &features, &existing_feature_tags);
        assert_eq!(outcome, CandidateOutcome::DuplicatesExisting);
    }

    #[test]
    fn resolve_candidate_detects_a_genuine_conflict() {
        let existing = PositionLookup::Single(GposBuilder::build_single_lookup(&glyph_set(), 500, Axis::Horizontal));
        let mut other_set = glyph_set();
        other_set.l.push(candidate(0x3003, 12));
        let candidate_lookup =
            PositionLookup::Single(GposBuilder::build_single_lookup(&other_set, 500, Axis::Horizontal));

        let lookups = vec![existing];
        let features = vec![(Tag::new(HALT), vec![0u16])];
        let mut existing_feature_tags = HashMap::new();
        existing_feature_tags.insert(Tag::new(HALT), 0usize);

        let outcome =
            GposBuilder::resolve_candidate(Tag::new(HALT), &candidate_lookup, &lookups, &features, &existing_feature_tags);
        assert_eq!(outcome, CandidateOutcome::Conflicts);
    }

    #[test]
    fn resolve_candidate_is_new_when_tag_absent() {
        let lookup = PositionLookup::Single(GposBuilder::build_single_lookup(&glyph_set(), 500, Axis::Horizontal));
        let outcome = GposBuilder::resolve_candidate(Tag::new(CHWS), &lookup, &[], &[], &HashMap::new());
        assert_eq!(outcome, CandidateOutcome::New);
    }
}
