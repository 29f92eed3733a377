// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw plan for clipped avatars, initials discs and the border ring.
//!
//! Drawing goes through [`AvatarSurface`], a narrow backend seam. The free
//! functions here decide *what* to draw; surfaces decide how to rasterize it.

use alloc::vec::Vec;

use kurbo::{Affine, BezPath, Point, Rect};
use peniko::Color;

use crate::bitmap::AvatarBitmap;
use crate::palette::derive_color;
use crate::text::{InitialsShaper, ShapedInitials};

/// Initials font size as a fraction of the view height.
pub const INITIALS_TEXT_SCALE: f64 = 0.33;

/// Fill color of the initials glyphs.
pub const INITIALS_TEXT_COLOR: Color = Color::WHITE;

/// How the image is clipped to the oval.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClipStrategy {
    /// Fill the oval with the image as a clamped pattern.
    #[default]
    Shader,
    /// Paint an oval mask offscreen, composite the image onto it with
    /// source-in, then blit the result.
    Mask,
}

/// Stroke of the ring drawn around the avatar.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BorderStyle {
    width: f32,
    /// Ring color.
    pub color: Color,
}

impl BorderStyle {
    /// Create a border; negative or non-finite widths become `0.0`.
    pub fn new(width: f32, color: Color) -> Self {
        let mut border = Self { width: 0.0, color };
        border.set_width(width);
        border
    }

    /// Stroke width in pixels.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Set the stroke width in pixels; negative or non-finite widths become `0.0`.
    pub fn set_width(&mut self, width: f32) {
        self.width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    }
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self::new(2.0, Color::WHITE)
    }
}

/// Backend seam for avatar drawing.
///
/// Ovals are given by their bounding rectangle.
pub trait AvatarSurface {
    /// Fill an oval with a solid color.
    fn fill_oval(&mut self, oval: Rect, color: Color);

    /// Fill an oval using `pattern` as a clamped image paint whose origin is
    /// the oval's top-left corner.
    fn fill_oval_with_pattern(&mut self, oval: Rect, pattern: &AvatarBitmap);

    /// Draw `source` at the oval's top-left corner, keeping only the part
    /// inside an opaque oval mask.
    fn composite_masked(&mut self, oval: Rect, source: &AvatarBitmap);

    /// Stroke an oval outline centered on its bounding rectangle's inscribed ellipse.
    fn stroke_oval(&mut self, oval: Rect, width: f64, color: Color);

    /// Fill an arbitrary path, non-zero winding.
    fn fill_path(&mut self, path: &BezPath, color: Color);
}

impl<S: AvatarSurface + ?Sized> AvatarSurface for &mut S {
    fn fill_oval(&mut self, oval: Rect, color: Color) {
        (**self).fill_oval(oval, color);
    }

    fn fill_oval_with_pattern(&mut self, oval: Rect, pattern: &AvatarBitmap) {
        (**self).fill_oval_with_pattern(oval, pattern);
    }

    fn composite_masked(&mut self, oval: Rect, source: &AvatarBitmap) {
        (**self).composite_masked(oval, source);
    }

    fn stroke_oval(&mut self, oval: Rect, width: f64, color: Color) {
        (**self).stroke_oval(oval, width, color);
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        (**self).fill_path(path, color);
    }
}

/// A single recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum AvatarOp {
    /// See [`AvatarSurface::fill_oval`].
    FillOval {
        /// Oval bounds.
        oval: Rect,
        /// Fill color.
        color: Color,
    },
    /// See [`AvatarSurface::fill_oval_with_pattern`].
    FillOvalWithPattern {
        /// Oval bounds.
        oval: Rect,
        /// Pattern image.
        pattern: AvatarBitmap,
    },
    /// See [`AvatarSurface::composite_masked`].
    CompositeMasked {
        /// Oval bounds.
        oval: Rect,
        /// Source image.
        source: AvatarBitmap,
    },
    /// See [`AvatarSurface::stroke_oval`].
    StrokeOval {
        /// Oval bounds.
        oval: Rect,
        /// Stroke width.
        width: f64,
        /// Stroke color.
        color: Color,
    },
    /// See [`AvatarSurface::fill_path`].
    FillPath {
        /// Path to fill.
        path: BezPath,
        /// Fill color.
        color: Color,
    },
}

/// Surface that records calls instead of rasterizing them.
///
/// Useful for asserting on the draw plan in tests and for debugging.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<AvatarOp>,
}

impl RecordingSurface {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded operations, in call order.
    pub fn ops(&self) -> &[AvatarOp] {
        &self.ops
    }

    /// Drop all recorded operations.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Take the recorded operations.
    pub fn into_ops(self) -> Vec<AvatarOp> {
        self.ops
    }
}

impl AvatarSurface for RecordingSurface {
    fn fill_oval(&mut self, oval: Rect, color: Color) {
        self.ops.push(AvatarOp::FillOval { oval, color });
    }

    fn fill_oval_with_pattern(&mut self, oval: Rect, pattern: &AvatarBitmap) {
        self.ops.push(AvatarOp::FillOvalWithPattern {
            oval,
            pattern: pattern.clone(),
        });
    }

    fn composite_masked(&mut self, oval: Rect, source: &AvatarBitmap) {
        self.ops.push(AvatarOp::CompositeMasked {
            oval,
            source: source.clone(),
        });
    }

    fn stroke_oval(&mut self, oval: Rect, width: f64, color: Color) {
        self.ops.push(AvatarOp::StrokeOval { oval, width, color });
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.ops.push(AvatarOp::FillPath {
            path: path.clone(),
            color,
        });
    }
}

/// Bounding rectangle of the border ring.
///
/// The bounds are inset by half the stroke width, truncated to whole pixels.
/// With odd widths the stroke overhangs the bounds by up to half a pixel.
pub fn border_oval(bounds: Rect, width: f32) -> Rect {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "the inset is deliberately truncated to whole pixels"
    )]
    let half = (width / 2.0) as i32;
    bounds.inset(-f64::from(half))
}

/// Stroke the border ring. A zero-width border draws nothing.
pub fn draw_border<S: AvatarSurface + ?Sized>(surface: &mut S, bounds: Rect, border: &BorderStyle) {
    if border.width() <= 0.0 {
        return;
    }
    surface.stroke_oval(
        border_oval(bounds, border.width()),
        f64::from(border.width()),
        border.color,
    );
}

/// Draw the image clipped to the oval, then the border.
///
/// `prepared` must already be sized to `bounds`. Without it the oval stays
/// empty and only the border is drawn.
pub fn render_avatar<S: AvatarSurface + ?Sized>(
    surface: &mut S,
    bounds: Rect,
    prepared: Option<&AvatarBitmap>,
    strategy: ClipStrategy,
    border: &BorderStyle,
) {
    log::trace!("render_avatar {bounds:?} {strategy:?}");
    match (prepared, strategy) {
        (Some(bitmap), ClipStrategy::Shader) => surface.fill_oval_with_pattern(bounds, bitmap),
        (Some(bitmap), ClipStrategy::Mask) => surface.composite_masked(bounds, bitmap),
        (None, _) => {}
    }
    draw_border(surface, bounds, border);
}

/// Draw the placeholder disc with centered initials, then the border.
pub fn render_initials<S, T>(
    surface: &mut S,
    bounds: Rect,
    initials: &str,
    shaper: &T,
    border: &BorderStyle,
) where
    S: AvatarSurface + ?Sized,
    T: InitialsShaper + ?Sized,
{
    log::trace!("render_initials {bounds:?} {initials:?}");
    surface.fill_oval(bounds, derive_color(initials));

    #[allow(
        clippy::cast_possible_truncation,
        reason = "font sizes comfortably fit in f32"
    )]
    let font_size = (bounds.height() * INITIALS_TEXT_SCALE) as f32;
    if let Some(shaped) = shaper.shape(initials, font_size) {
        let origin = initials_origin(bounds, &shaped);
        let path = Affine::translate(origin.to_vec2()) * shaped.outline;
        surface.fill_path(&path, INITIALS_TEXT_COLOR);
    }

    draw_border(surface, bounds, border);
}

/// Pen origin that centers shaped initials in `bounds`.
///
/// Horizontally the run is centered on its advance; vertically the baseline
/// is moved by half of `ascent + descent` from the center line.
pub fn initials_origin(bounds: Rect, shaped: &ShapedInitials) -> Point {
    let center = bounds.center();
    Point::new(
        center.x - shaped.advance / 2.0,
        center.y - (shaped.ascent + shaped.descent) / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::color_from_argb;
    use crate::text::NoText;

    struct BoxShaper;

    impl InitialsShaper for BoxShaper {
        fn shape(&self, text: &str, font_size: f32) -> Option<ShapedInitials> {
            let size = f64::from(font_size);
            let advance = size * 0.5 * text.chars().count() as f64;
            let mut outline = BezPath::new();
            outline.move_to((0.0, 0.0));
            outline.line_to((advance, 0.0));
            outline.line_to((advance, -size * 0.7));
            outline.close_path();
            Some(ShapedInitials {
                outline,
                advance,
                ascent: -size * 0.8,
                descent: size * 0.2,
            })
        }
    }

    fn square(side: f64) -> Rect {
        Rect::new(0.0, 0.0, side, side)
    }

    #[test]
    fn border_inset_truncates_half_width() {
        assert_eq!(border_oval(square(100.0), 4.0), Rect::new(2.0, 2.0, 98.0, 98.0));
        assert_eq!(border_oval(square(100.0), 5.0), Rect::new(2.0, 2.0, 98.0, 98.0));
        assert_eq!(border_oval(square(100.0), 1.5), square(100.0));
        assert_eq!(border_oval(square(100.0), 0.0), square(100.0));
    }

    #[test]
    fn even_border_ring_stays_inside_bounds() {
        for side in [1_u32, 7, 40, 80, 121] {
            for width in [0.0_f32, 2.0, 4.0, 10.0] {
                let bounds = square(f64::from(side));
                let oval = border_oval(bounds, width);
                assert_eq!(oval.center(), bounds.center(), "ring must stay centered");
                assert_eq!(oval.width(), oval.height(), "ring must be a circle");
                let outer = oval.width() / 2.0 + f64::from(width) / 2.0;
                assert!(outer <= f64::from(side) / 2.0, "ring leaks at {side}/{width}");
            }
        }
    }

    #[test]
    fn odd_border_ring_overhangs_by_at_most_half_a_pixel() {
        let bounds = square(80.0);
        let oval = border_oval(bounds, 5.0);
        let outer = oval.width() / 2.0 + 2.5;
        assert_eq!(outer, 40.5);
    }

    #[test]
    fn shader_plan_fills_then_strokes() {
        let bitmap = AvatarBitmap::solid(40, 40, Color::BLACK).unwrap();
        let border = BorderStyle::new(4.0, Color::WHITE);
        let mut surface = RecordingSurface::new();
        render_avatar(
            &mut surface,
            square(40.0),
            Some(&bitmap),
            ClipStrategy::Shader,
            &border,
        );
        assert_eq!(
            surface.ops(),
            &[
                AvatarOp::FillOvalWithPattern {
                    oval: square(40.0),
                    pattern: bitmap,
                },
                AvatarOp::StrokeOval {
                    oval: Rect::new(2.0, 2.0, 38.0, 38.0),
                    width: 4.0,
                    color: Color::WHITE,
                },
            ]
        );
    }

    #[test]
    fn mask_plan_composites_then_strokes() {
        let bitmap = AvatarBitmap::solid(40, 40, Color::BLACK).unwrap();
        let mut surface = RecordingSurface::new();
        render_avatar(
            &mut surface,
            square(40.0),
            Some(&bitmap),
            ClipStrategy::Mask,
            &BorderStyle::default(),
        );
        assert!(matches!(
            surface.ops(),
            [AvatarOp::CompositeMasked { .. }, AvatarOp::StrokeOval { .. }]
        ));
    }

    #[test]
    fn missing_image_leaves_an_empty_oval() {
        let mut surface = RecordingSurface::new();
        render_avatar(
            &mut surface,
            square(40.0),
            None,
            ClipStrategy::Shader,
            &BorderStyle::default(),
        );
        assert!(matches!(surface.ops(), [AvatarOp::StrokeOval { .. }]));
    }

    #[test]
    fn zero_width_border_is_skipped() {
        let mut surface = RecordingSurface::new();
        draw_border(&mut surface, square(40.0), &BorderStyle::new(0.0, Color::WHITE));
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn border_width_is_sanitized() {
        assert_eq!(BorderStyle::new(-3.0, Color::WHITE).width(), 0.0);
        assert_eq!(BorderStyle::new(f32::NAN, Color::WHITE).width(), 0.0);
        assert_eq!(BorderStyle::new(3.5, Color::WHITE).width(), 3.5);
    }

    #[test]
    fn initials_disc_uses_derived_color() {
        let mut surface = RecordingSurface::new();
        render_initials(
            &mut surface,
            square(60.0),
            "A",
            &NoText,
            &BorderStyle::default(),
        );
        assert_eq!(
            surface.ops()[0],
            AvatarOp::FillOval {
                oval: square(60.0),
                color: color_from_argb(0xFFE1_7076),
            }
        );
        // No glyphs without a shaper, border still drawn.
        assert_eq!(surface.ops().len(), 2);
    }

    #[test]
    fn initials_are_centered() {
        let bounds = square(100.0);
        let mut surface = RecordingSurface::new();
        render_initials(&mut surface, bounds, "AB", &BoxShaper, &BorderStyle::default());

        let AvatarOp::FillPath { path, color } = &surface.ops()[1] else {
            panic!("expected glyph fill, got {:?}", surface.ops()[1]);
        };
        assert_eq!(*color, INITIALS_TEXT_COLOR);

        // font size 33: advance 33, ascent -26.4, descent 6.6.
        let shaped = BoxShaper.shape("AB", 33.0).unwrap();
        let origin = initials_origin(bounds, &shaped);
        assert!((origin.x - (50.0 - 16.5)).abs() < 1e-9);
        assert!((origin.y - (50.0 + 9.9)).abs() < 1e-9);

        let bbox = kurbo::Shape::bounding_box(path);
        assert!((bbox.center().x - 50.0).abs() < 1e-9, "not centered: {bbox:?}");
    }
}
