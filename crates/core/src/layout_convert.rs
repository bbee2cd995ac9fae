//! Structural read-fonts -> write-fonts conversion for GPOS lookups that
//! already exist in a face, so [`crate::gpos_builder`] can append its
//! synthesized lookups after them instead of discarding them.
//!
//! Grounded on `crates/merger/src/convert.rs` (`ToWrite`/`MarkArrayExt`
//! traits) and `crates/font-merger/src/tables/layout.rs`'s
//! `convert_gpos_lookup` (per-lookup-type subtable conversion), with the
//! glyph-ID remapping stripped out: this crate never renumbers glyphs, so
//! every coverage/class-def/glyph ID is carried over unchanged.

use font_types::GlyphId16;
use read_fonts::tables::{gpos as read_gpos, layout as read_layout};
use write_fonts::tables::{
    gpos::{
        AnchorFormat1, AnchorFormat2, AnchorFormat3, AnchorTable, BaseArray, BaseRecord,
        Class1Record, Class2Record, ComponentRecord, CursivePosFormat1, EntryExitRecord, LigatureArray,
        LigatureAttach, Mark2Array, Mark2Record, MarkArray, MarkBasePosFormat1, MarkLigPosFormat1,
        MarkMarkPosFormat1, MarkRecord, PairPos, PairPosFormat1, PairPosFormat2, PairSet,
        PairValueRecord, PositionLookup, SinglePos, SinglePosFormat1, SinglePosFormat2, ValueRecord,
    },
    layout::{ClassDef, CoverageTable, Lookup},
};

/// Convert a read-fonts type to its write-fonts equivalent, with no glyph
/// renumbering.
trait ToWrite {
    type Output;
    fn to_write(&self) -> Self::Output;
}

impl ToWrite for read_gpos::ValueRecord {
    type Output = ValueRecord;

    fn to_write(&self) -> ValueRecord {
        let mut result = ValueRecord::new();
        if let Some(v) = self.x_placement {
            result = result.with_x_placement(v.get());
        }
        if let Some(v) = self.y_placement {
            result = result.with_y_placement(v.get());
        }
        if let Some(v) = self.x_advance {
            result = result.with_x_advance(v.get());
        }
        if let Some(v) = self.y_advance {
            result = result.with_y_advance(v.get());
        }
        result
    }
}

impl<'a> ToWrite for read_gpos::AnchorTable<'a> {
    type Output = AnchorTable;

    fn to_write(&self) -> AnchorTable {
        match self {
            read_gpos::AnchorTable::Format1(a) => {
                AnchorTable::Format1(AnchorFormat1::new(a.x_coordinate(), a.y_coordinate()))
            }
            read_gpos::AnchorTable::Format2(a) => AnchorTable::Format2(AnchorFormat2::new(
                a.x_coordinate(),
                a.y_coordinate(),
                a.anchor_point(),
            )),
            read_gpos::AnchorTable::Format3(a) => {
                AnchorTable::Format3(AnchorFormat3::new(a.x_coordinate(), a.y_coordinate(), None, None))
            }
        }
    }
}

trait MarkArrayExt {
    fn to_write(&self) -> MarkArray;
}

impl<'a> MarkArrayExt for read_gpos::MarkArray<'a> {
    fn to_write(&self) -> MarkArray {
        let mark_records: Vec<MarkRecord> = self
            .mark_records()
            .iter()
            .map(|mr| {
                let anchor = mr
                    .mark_anchor(self.offset_data())
                    .ok()
                    .map(|a| a.to_write())
                    .unwrap_or_else(|| AnchorTable::Format1(AnchorFormat1::new(0, 0)));
                MarkRecord::new(mr.mark_class(), anchor)
            })
            .collect();
        MarkArray::new(mark_records)
    }
}

fn to_write_coverage(coverage: &read_layout::CoverageTable) -> CoverageTable {
    let glyphs: Vec<GlyphId16> = coverage.iter().map(|gid| GlyphId16::new(gid.to_u32() as u16)).collect();
    CoverageTable::format_1(glyphs)
}

fn to_write_class_def(class_def: &read_layout::ClassDef) -> ClassDef {
    let mappings: Vec<(GlyphId16, u16)> =
        class_def.iter().map(|(gid, class)| (GlyphId16::new(gid.to_u32() as u16), class)).collect();
    ClassDef::from_iter(mappings)
}

/// Convert one existing GPOS lookup verbatim (no glyph renumbering, no
/// lookup-index shifting: the lookup keeps whatever internal references
/// it already had, since it is placed at the same index it already
/// occupied in [`crate::gpos_builder::GposBuilder::merge_into_existing`]).
///
/// Returns `Err(<lookup type name>)` for lookup types this engine does
/// not reconstruct (contextual and chained-contextual positioning,
/// extension lookups) -- the caller treats that as "cannot safely merge"
/// rather than silently dropping the face's existing positioning data.
pub fn convert_existing_lookup(
    lookup: &read_gpos::PositionLookup,
) -> Result<PositionLookup, &'static str> {
    match lookup {
        read_gpos::PositionLookup::Single(read_lookup) => {
            let mut subtables = Vec::new();
            for subtable in read_lookup.subtables().iter().filter_map(|s| s.ok()) {
                match subtable {
                    read_gpos::SinglePos::Format1(f1) => {
                        let Ok(coverage) = f1.coverage() else { continue };
                        subtables.push(SinglePos::Format1(SinglePosFormat1::new(
                            to_write_coverage(&coverage),
                            f1.value_record().to_write(),
                        )));
                    }
                    read_gpos::SinglePos::Format2(f2) => {
                        let Ok(coverage) = f2.coverage() else { continue };
                        let value_records: Vec<ValueRecord> =
                            f2.value_records().iter().filter_map(|vr| vr.ok()).map(|vr| vr.to_write()).collect();
                        subtables.push(SinglePos::Format2(SinglePosFormat2::new(
                            to_write_coverage(&coverage),
                            value_records,
                        )));
                    }
                }
            }
            Ok(PositionLookup::Single(Lookup::new(read_lookup.lookup_flag(), subtables)))
        }
        read_gpos::PositionLookup::Pair(read_lookup) => {
            let mut subtables = Vec::new();
            for subtable in read_lookup.subtables().iter().filter_map(|s| s.ok()) {
                match subtable {
                    read_gpos::PairPos::Format1(f1) => {
                        let Ok(coverage) = f1.coverage() else { continue };
                        let pair_sets: Vec<PairSet> = f1
                            .pair_sets()
                            .iter()
                            .filter_map(|ps| ps.ok())
                            .map(|ps| {
                                let records: Vec<PairValueRecord> = ps
                                    .pair_value_records()
                                    .iter()
                                    .filter_map(|pvr| pvr.ok())
                                    .map(|pvr| {
                                        PairValueRecord::new(
                                            GlyphId16::new(pvr.second_glyph().to_u32() as u16),
                                            pvr.value_record1().to_write(),
                                            pvr.value_record2().to_write(),
                                        )
                                    })
                                    .collect();
                                PairSet::new(records)
                            })
                            .collect();
                        subtables
                            .push(PairPos::Format1(PairPosFormat1::new(to_write_coverage(&coverage), pair_sets)));
                    }
                    read_gpos::PairPos::Format2(f2) => {
                        let Ok(coverage) = f2.coverage() else { continue };
                        let class_def1 = f2.class_def1().map(|cd| to_write_class_def(&cd)).unwrap_or_default();
                        let class_def2 = f2.class_def2().map(|cd| to_write_class_def(&cd)).unwrap_or_default();
                        let class1_records: Vec<Class1Record> = f2
                            .class1_records()
                            .iter()
                            .filter_map(|c1r| c1r.ok())
                            .map(|c1r| {
                                let class2_records: Vec<Class2Record> = c1r
                                    .class2_records()
                                    .iter()
                                    .filter_map(|c2r| c2r.ok())
                                    .map(|c2r| {
                                        Class2Record::new(
                                            c2r.value_record1().to_write(),
                                            c2r.value_record2().to_write(),
                                        )
                                    })
                                    .collect();
                                Class1Record::new(class2_records)
                            })
                            .collect();
                        subtables.push(PairPos::Format2(PairPosFormat2::new(
                            to_write_coverage(&coverage),
                            class_def1,
                            class_def2,
                            class1_records,
                        )));
                    }
                }
            }
            Ok(PositionLookup::Pair(Lookup::new(read_lookup.lookup_flag(), subtables)))
        }
        read_gpos::PositionLookup::Cursive(read_lookup) => {
            let mut subtables = Vec::new();
            for subtable in read_lookup.subtables().iter().filter_map(|s| s.ok()) {
                let Ok(coverage) = subtable.coverage() else { continue };
                let entry_exit_records: Vec<EntryExitRecord> = subtable
                    .entry_exit_record()
                    .iter()
                    .map(|eer| {
                        let entry = eer.entry_anchor(subtable.offset_data()).and_then(|a| a.ok()).map(|a| a.to_write());
                        let exit = eer.exit_anchor(subtable.offset_data()).and_then(|a| a.ok()).map(|a| a.to_write());
                        EntryExitRecord::new(entry, exit)
                    })
                    .collect();
                subtables.push(CursivePosFormat1::new(to_write_coverage(&coverage), entry_exit_records));
            }
            Ok(PositionLookup::Cursive(Lookup::new(read_lookup.lookup_flag(), subtables)))
        }
        read_gpos::PositionLookup::MarkToBase(read_lookup) => {
            let mut subtables = Vec::new();
            for subtable in read_lookup.subtables().iter().filter_map(|s| s.ok()) {
                let (Ok(mark_cov), Ok(base_cov)) = (subtable.mark_coverage(), subtable.base_coverage()) else {
                    continue;
                };
                let mark_array = subtable.mark_array().map(|ma| ma.to_write()).unwrap_or_else(|_| MarkArray::new(vec![]));
                let base_array = subtable
                    .base_array()
                    .map(|ba| {
                        let base_records: Vec<BaseRecord> = ba
                            .base_records()
                            .iter()
                            .filter_map(|br| br.ok())
                            .map(|br| {
                                let anchors: Vec<Option<AnchorTable>> = br
                                    .base_anchors(ba.offset_data())
                                    .iter()
                                    .map(|a| a.and_then(|r| r.ok()).map(|a| a.to_write()))
                                    .collect();
                                BaseRecord::new(anchors)
                            })
                            .collect();
                        BaseArray::new(base_records)
                    })
                    .unwrap_or_else(|_| BaseArray::new(vec![]));
                subtables.push(MarkBasePosFormat1::new(
                    to_write_coverage(&mark_cov),
                    to_write_coverage(&base_cov),
                    mark_array,
                    base_array,
                ));
            }
            Ok(PositionLookup::MarkToBase(Lookup::new(read_lookup.lookup_flag(), subtables)))
        }
        read_gpos::PositionLookup::MarkToLig(read_lookup) => {
            let mut subtables = Vec::new();
            for subtable in read_lookup.subtables().iter().filter_map(|s| s.ok()) {
                let (Ok(mark_cov), Ok(lig_cov)) = (subtable.mark_coverage(), subtable.ligature_coverage()) else {
                    continue;
                };
                let mark_array = subtable.mark_array().map(|ma| ma.to_write()).unwrap_or_else(|_| MarkArray::new(vec![]));
                let ligature_array = subtable
                    .ligature_array()
                    .map(|la| {
                        let lig_attaches: Vec<LigatureAttach> = la
                            .ligature_attaches()
                            .iter()
                            .filter_map(|la| la.ok())
                            .map(|la| {
                                let component_records: Vec<ComponentRecord> = la
                                    .component_records()
                                    .iter()
                                    .filter_map(|cr| cr.ok())
                                    .map(|cr| {
                                        let anchors: Vec<Option<AnchorTable>> = cr
                                            .ligature_anchors(la.offset_data())
                                            .iter()
                                            .map(|a| a.and_then(|r| r.ok()).map(|a| a.to_write()))
                                            .collect();
                                        ComponentRecord::new(anchors)
                                    })
                                    .collect();
                                LigatureAttach::new(component_records)
                            })
                            .collect();
                        LigatureArray::new(lig_attaches)
                    })
                    .unwrap_or_else(|_| LigatureArray::new(vec![]));
                subtables.push(MarkLigPosFormat1::new(
                    to_write_coverage(&mark_cov),
                    to_write_coverage(&lig_cov),
                    mark_array,
                    ligature_array,
                ));
            }
            Ok(PositionLookup::MarkToLig(Lookup::new(read_lookup.lookup_flag(), subtables)))
        }
        read_gpos::PositionLookup::MarkToMark(read_lookup) => {
            let mut subtables = Vec::new();
            for subtable in read_lookup.subtables().iter().filter_map(|s| s.ok()) {
                let (Ok(mark1_cov), Ok(mark2_cov)) = (subtable.mark1_coverage(), subtable.mark2_coverage()) else {
                    continue;
                };
                let mark1_array = subtable.mark1_array().map(|ma| ma.to_write()).unwrap_or_else(|_| MarkArray::new(vec![]));
                let mark2_array = subtable
                    .mark2_array()
                    .map(|m2a| {
                        let mark2_records: Vec<Mark2Record> = m2a
                            .mark2_records()
                            .iter()
                            .filter_map(|m2r| m2r.ok())
                            .map(|m2r| {
                                let anchors: Vec<Option<AnchorTable>> = m2r
                                    .mark2_anchors(m2a.offset_data())
                                    .iter()
                                    .map(|a| a.and_then(|r| r.ok()).map(|a| a.to_write()))
                                    .collect();
                                Mark2Record::new(anchors)
                            })
                            .collect();
                        Mark2Array::new(mark2_records)
                    })
                    .unwrap_or_else(|_| Mark2Array::new(vec![]));
                subtables.push(MarkMarkPosFormat1::new(
                    to_write_coverage(&mark1_cov),
                    to_write_coverage(&mark2_cov),
                    mark1_array,
                    mark2_array,
                ));
            }
            Ok(PositionLookup::MarkToMark(Lookup::new(read_lookup.lookup_flag(), subtables)))
        }
        read_gpos::PositionLookup::Contextual(_) => Err("contextual positioning"),
        read_gpos::PositionLookup::ChainContextual(_) => Err("chained contextual positioning"),
        read_gpos::PositionLookup::Extension(_) => Err("extension positioning"),
    }
}
