//! InkBoundsAnalyzer: computes a glyph's ink bounding box from its outline
//! and decides whether it has "room" for half-width spacing (spec.md §4.2).

use kurbo::{BezPath, Shape};
use read_fonts::types::GlyphId;
use skrifa::outline::{DrawSettings, OutlinePen};

use crate::{
    error::{Error, Result},
    font::Font,
};

/// Axis-aligned ink bounding box, in design units, with the origin at the
/// glyph's advance-box left edge / baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InkBounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl InkBounds {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

/// Collects outline segments into a [`kurbo::BezPath`]. Quadratic and
/// cubic control points are included verbatim (not just endpoints), which
/// is a documented slight over-estimate of the true ink box at curve
/// bulges (spec.md §4.2).
#[derive(Default)]
struct BoundsPen {
    path: BezPath,
}

impl OutlinePen for BoundsPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path.quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

pub struct InkBoundsAnalyzer<'a, 'f> {
    font: &'a Font<'f>,
    tolerance: f64,
    fullwidth_advance: f64,
}

impl<'a, 'f> InkBoundsAnalyzer<'a, 'f> {
    pub fn new(font: &'a Font<'f>, tolerance: f64, fullwidth_advance: f64) -> Self {
        Self { font, tolerance, fullwidth_advance }
    }

    /// Walk `glyph_id`'s outline and return its ink bounding box.
    pub fn bounds(&self, glyph_id: GlyphId) -> Result<InkBounds> {
        let outlines = self.font.outline_glyphs();
        let outline = outlines
            .get(glyph_id)
            .ok_or(Error::OutlineMalformed(glyph_id.to_u16()))?;

        let mut pen = BoundsPen::default();
        let settings = DrawSettings::unhinted(skrifa::instance::Size::unscaled(), self.font.location());
        outline
            .draw(settings, &mut pen)
            .map_err(|_| Error::OutlineMalformed(glyph_id.to_u16()))?;

        if pen.path.elements().is_empty() {
            // Whitespace glyphs have no ink; treat as an empty box at origin.
            return Ok(InkBounds { left: 0.0, right: 0.0, top: 0.0, bottom: 0.0 });
        }

        let bbox = pen.path.bounding_box();
        Ok(InkBounds { left: bbox.x0, right: bbox.x1, top: bbox.y1, bottom: bbox.y0 })
    }

    pub fn is_halfwidth_left(&self, bounds: &InkBounds, advance: f64) -> bool {
        is_halfwidth_left(bounds, advance, self.tolerance)
    }

    pub fn is_halfwidth_right(&self, bounds: &InkBounds, advance: f64) -> bool {
        is_halfwidth_right(bounds, advance, self.tolerance)
    }

    pub fn is_halfwidth_middle(&self, bounds: &InkBounds, advance: f64) -> bool {
        is_halfwidth_middle(bounds, advance, self.tolerance)
    }

    pub fn is_fullwidth(&self, advance: f64, units_per_em: f64) -> bool {
        is_fullwidth(advance, units_per_em, self.fullwidth_advance, self.tolerance)
    }
}

/// `ink bbox's right edge <= advance/2 + tolerance` (spec.md §4.2).
pub fn is_halfwidth_left(bounds: &InkBounds, advance: f64, tolerance: f64) -> bool {
    bounds.right <= advance / 2.0 + tolerance
}

/// `ink bbox's left edge >= advance/2 - tolerance` (spec.md §4.2).
pub fn is_halfwidth_right(bounds: &InkBounds, advance: f64, tolerance: f64) -> bool {
    bounds.left >= advance / 2.0 - tolerance
}

/// Both `left >= advance/4 - tolerance` and `right <= 3*advance/4 +
/// tolerance` (spec.md §4.2).
pub fn is_halfwidth_middle(bounds: &InkBounds, advance: f64, tolerance: f64) -> bool {
    bounds.left >= advance / 4.0 - tolerance && bounds.right <= 3.0 * advance / 4.0 + tolerance
}

/// `advance` within `tolerance` of `units_per_em * fullwidth_advance_ems`.
pub fn is_fullwidth(advance: f64, units_per_em: f64, fullwidth_advance_ems: f64, tolerance: f64) -> bool {
    (advance - units_per_em * fullwidth_advance_ems).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halfwidth_left_accepts_ink_in_left_half() {
        let bounds = InkBounds { left: 0.0, right: 480.0, top: 700.0, bottom: 0.0 };
        assert!(is_halfwidth_left(&bounds, 1000.0, 50.0));
        assert!(!is_halfwidth_right(&bounds, 1000.0, 50.0));
    }

    #[test]
    fn halfwidth_right_accepts_ink_in_right_half() {
        let bounds = InkBounds { left: 520.0, right: 1000.0, top: 700.0, bottom: 0.0 };
        assert!(is_halfwidth_right(&bounds, 1000.0, 50.0));
        assert!(!is_halfwidth_left(&bounds, 1000.0, 50.0));
    }

    #[test]
    fn halfwidth_middle_requires_both_margins() {
        let centered = InkBounds { left: 260.0, right: 740.0, top: 700.0, bottom: 0.0 };
        assert!(is_halfwidth_middle(&centered, 1000.0, 50.0));

        let left_heavy = InkBounds { left: 0.0, right: 740.0, top: 700.0, bottom: 0.0 };
        assert!(!is_halfwidth_middle(&left_heavy, 1000.0, 50.0));
    }

    #[test]
    fn fullwidth_within_tolerance() {
        assert!(is_fullwidth(990.0, 1000.0, 1.0, 50.0));
        assert!(!is_fullwidth(400.0, 1000.0, 1.0, 50.0));
    }
}
