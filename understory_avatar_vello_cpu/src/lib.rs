// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_avatar_vello_cpu --heading-base-level=0

//! Vello CPU rasterization for avatar draw plans.
//!
//! [`VelloCpuAvatarSurface`] implements [`AvatarSurface`] on top of a borrowed
//! [`vello_cpu::RenderContext`]. Both clip strategies are supported:
//!
//! - [`ClipStrategy::Shader`](understory_avatar::ClipStrategy::Shader) fills
//!   the oval path with the bitmap as a padded image paint.
//! - [`ClipStrategy::Mask`](understory_avatar::ClipStrategy::Mask) pushes an
//!   isolated layer, fills an opaque oval into it, then draws the bitmap in a
//!   nested source-in layer before popping both.
//!
//! [`AvatarCanvas`] owns a context sized for one view and reads the result
//! back as straight-alpha RGBA8.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, Ellipse, Rect, Shape};
use peniko::{BlendMode, Color, Compose, Extend, ImageQuality, ImageSampler, Mix};
use understory_avatar::{AvatarBitmap, AvatarSurface, AvatarView, ClipStrategy, InitialsShaper};
use vello_cpu::kurbo::{Affine as CpuAffine, BezPath, Stroke};
use vello_cpu::{Image as CpuImage, ImageSource, Pixmap, RenderContext, RenderMode, RenderSettings};

/// Flattening tolerance for oval paths, in pixels.
const OVAL_TOLERANCE: f64 = 0.1;

/// Error returned by [`AvatarCanvas::new`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SurfaceError {
    /// A dimension was zero or did not fit in `u16`.
    InvalidSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { width, height } => write!(
                f,
                "surface size {width}x{height} must be non-zero and at most {}",
                u16::MAX
            ),
        }
    }
}

impl core::error::Error for SurfaceError {}

/// [`AvatarSurface`] drawing into a `vello_cpu` render context.
pub struct VelloCpuAvatarSurface<'ctx> {
    /// Underlying Vello CPU render context to draw into.
    pub ctx: &'ctx mut RenderContext,
}

impl fmt::Debug for VelloCpuAvatarSurface<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VelloCpuAvatarSurface { .. }")
    }
}

impl<'ctx> VelloCpuAvatarSurface<'ctx> {
    /// Create a surface that renders into the given CPU render context.
    pub fn new(ctx: &'ctx mut RenderContext) -> Self {
        Self { ctx }
    }

    fn affine_to_cpu(xf: Affine) -> CpuAffine {
        CpuAffine::new(xf.as_coeffs())
    }

    fn image_paint(bitmap: &AvatarBitmap) -> CpuImage {
        CpuImage {
            image: ImageSource::from_peniko_image_data(&bitmap.to_image_data()),
            sampler: ImageSampler {
                x_extend: Extend::Pad,
                y_extend: Extend::Pad,
                quality: ImageQuality::Medium,
                alpha: 1.0,
            },
        }
    }
}

fn oval_path(oval: Rect) -> BezPath {
    Ellipse::from_rect(oval).to_path(OVAL_TOLERANCE)
}

impl AvatarSurface for VelloCpuAvatarSurface<'_> {
    fn fill_oval(&mut self, oval: Rect, color: Color) {
        self.ctx.set_paint(color);
        self.ctx.fill_path(&oval_path(oval));
    }

    fn fill_oval_with_pattern(&mut self, oval: Rect, pattern: &AvatarBitmap) {
        let saved_paint = self.ctx.paint().clone();
        self.ctx.set_paint(Self::image_paint(pattern));
        self.ctx
            .set_paint_transform(Self::affine_to_cpu(Affine::translate(oval.origin().to_vec2())));
        self.ctx.fill_path(&oval_path(oval));
        self.ctx.set_paint_transform(CpuAffine::IDENTITY);
        self.ctx.set_paint(saved_paint);
    }

    fn composite_masked(&mut self, oval: Rect, source: &AvatarBitmap) {
        let saved_paint = self.ctx.paint().clone();
        let saved_transform = *self.ctx.transform();

        // Offscreen layer holding the mask, then the source composited into it.
        self.ctx.push_layer(None, None, None, None, None);
        self.ctx.set_paint(Color::BLACK);
        self.ctx.fill_path(&oval_path(oval));

        self.ctx.push_layer(
            None,
            Some(BlendMode::new(Mix::Normal, Compose::SrcIn)),
            None,
            None,
            None,
        );
        self.ctx.set_paint(Self::image_paint(source));
        self.ctx.set_transform(
            saved_transform * Self::affine_to_cpu(Affine::translate(oval.origin().to_vec2())),
        );
        let rect = Rect::new(
            0.0,
            0.0,
            f64::from(source.width()),
            f64::from(source.height()),
        );
        self.ctx.fill_rect(&rect);
        self.ctx.set_transform(saved_transform);
        self.ctx.pop_layer();

        self.ctx.pop_layer();
        self.ctx.set_paint(saved_paint);
    }

    fn stroke_oval(&mut self, oval: Rect, width: f64, color: Color) {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "stroke widths comfortably fit in f32"
        )]
        let width = width as f32;
        self.ctx.set_stroke(Stroke::new(width.into()));
        self.ctx.set_paint(color);
        self.ctx.stroke_path(&oval_path(oval));
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.ctx.set_paint(color);
        self.ctx.fill_path(path);
    }
}

/// A render context sized for one avatar, with RGBA8 readback.
pub struct AvatarCanvas {
    ctx: RenderContext,
    width: u16,
    height: u16,
}

impl fmt::Debug for AvatarCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl AvatarCanvas {
    /// Create a transparent canvas of `width x height` pixels.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let invalid = SurfaceError::InvalidSize { width, height };
        let w = u16::try_from(width).map_err(|_| invalid)?;
        let h = u16::try_from(height).map_err(|_| invalid)?;
        if w == 0 || h == 0 {
            return Err(invalid);
        }
        let settings = RenderSettings {
            render_mode: RenderMode::OptimizeSpeed,
            ..RenderSettings::default()
        };
        Ok(Self {
            ctx: RenderContext::new_with(w, h, settings),
            width: w,
            height: h,
        })
    }

    /// Create a canvas matching the view's current size.
    pub fn for_view(view: &AvatarView) -> Result<Self, SurfaceError> {
        let (width, height) = view.size();
        Self::new(width, height)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// A surface drawing into this canvas.
    pub fn surface(&mut self) -> VelloCpuAvatarSurface<'_> {
        VelloCpuAvatarSurface::new(&mut self.ctx)
    }

    /// Draw `view` into this canvas.
    pub fn draw_view<T: InitialsShaper + ?Sized>(
        &mut self,
        view: &AvatarView,
        strategy: ClipStrategy,
        shaper: &T,
    ) {
        view.draw(&mut self.surface(), strategy, shaper);
    }

    /// Rasterize everything drawn so far into straight-alpha RGBA8 bytes.
    pub fn to_rgba8(&mut self) -> Vec<u8> {
        let mut pixmap = Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        let unpremul = pixmap.take_unpremultiplied();
        let mut bytes = Vec::with_capacity(unpremul.len() * 4);
        for p in unpremul {
            bytes.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
        log::trace!("read back {}x{} avatar canvas", self.width, self.height);
        bytes
    }

    /// Rasterize into an [`AvatarBitmap`].
    pub fn to_bitmap(&mut self) -> AvatarBitmap {
        let bytes = self.to_rgba8();
        match AvatarBitmap::from_rgba8(self.width(), self.height(), bytes) {
            Ok(bitmap) => bitmap,
            Err(err) => unreachable!("canvas readback has the canvas size: {err}"),
        }
    }
}

/// Render `view` at its current size into a fresh bitmap.
pub fn render_view<T: InitialsShaper + ?Sized>(
    view: &AvatarView,
    strategy: ClipStrategy,
    shaper: &T,
) -> Result<AvatarBitmap, SurfaceError> {
    let mut canvas = AvatarCanvas::for_view(view)?;
    canvas.draw_view(view, strategy, shaper);
    Ok(canvas.to_bitmap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unrepresentable_sizes() {
        assert_eq!(
            AvatarCanvas::new(0, 10).unwrap_err(),
            SurfaceError::InvalidSize {
                width: 0,
                height: 10
            }
        );
        assert!(AvatarCanvas::new(10, 0).is_err());
        assert!(AvatarCanvas::new(70_000, 10).is_err());
    }

    #[test]
    fn oval_path_spans_its_rect() {
        let rect = Rect::new(2.0, 2.0, 38.0, 38.0);
        let bbox = oval_path(rect).bounding_box();
        assert!((bbox.x0 - 2.0).abs() < 0.5, "{bbox:?}");
        assert!((bbox.x1 - 38.0).abs() < 0.5, "{bbox:?}");
    }

    #[test]
    fn empty_canvas_is_transparent() {
        let mut canvas = AvatarCanvas::new(4, 3).unwrap();
        let bytes = canvas.to_rgba8();
        assert_eq!(bytes.len(), 4 * 3 * 4);
        assert!(bytes.iter().all(|b| *b == 0));
    }
}
