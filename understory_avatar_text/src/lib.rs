// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_avatar_text --heading-base-level=0

//! Understory Avatar Text: initials shaping from font bytes.
//!
//! [`FontInitials`] implements [`InitialsShaper`] on top of Skrifa. It maps
//! each character through the font's character map, lays glyphs out on a
//! single line using their advance widths, and converts the outlines into a
//! y-down [`BezPath`] with the pen origin on the baseline. Ascent and descent
//! come from the font's vertical metrics at the requested size.
//!
//! There is no shaping beyond that: no kerning, ligatures or bidi. Initials
//! are one to three characters, and that is enough for them.
//!
//! ```no_run
//! use understory_avatar::InitialsShaper;
//! use understory_avatar_text::FontInitials;
//!
//! let bytes = std::fs::read("DejaVuSans.ttf").unwrap();
//! let shaper = FontInitials::new(bytes, 0).unwrap();
//! let shaped = shaper.shape("JD", 26.4).unwrap();
//! assert!(shaped.advance > 0.0);
//! ```

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use kurbo::BezPath;
use peniko::{Blob, FontData};
use skrifa::instance::{LocationRef, Size};
use skrifa::metrics::GlyphMetrics;
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{FontRef, GlyphId, MetadataProvider};
use understory_avatar::{InitialsShaper, ShapedInitials};

/// Fallback advance, as a fraction of the font size, for glyphs without metrics.
const FALLBACK_ADVANCE: f32 = 0.6;

/// Error returned by [`FontInitials::new`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FontError {
    /// The bytes are not a font, or the collection has no font at `index`.
    InvalidFont {
        /// Requested index into the font collection.
        index: u32,
    },
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFont { index } => write!(f, "no readable font at index {index}"),
        }
    }
}

impl core::error::Error for FontError {}

/// An [`InitialsShaper`] backed by a single font face.
#[derive(Clone)]
pub struct FontInitials {
    font: FontData,
}

impl fmt::Debug for FontInitials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontInitials")
            .field("index", &self.font.index)
            .field("len", &self.font.data.len())
            .finish_non_exhaustive()
    }
}

impl FontInitials {
    /// Load face `index` from font (or collection) bytes.
    pub fn new(bytes: impl Into<Blob<u8>>, index: u32) -> Result<Self, FontError> {
        let data = bytes.into();
        if FontRef::from_index(data.data(), index).is_err() {
            return Err(FontError::InvalidFont { index });
        }
        Ok(Self {
            font: FontData::new(data, index),
        })
    }

    /// The font this shaper reads.
    pub fn font(&self) -> &FontData {
        &self.font
    }

    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(self.font.data.data(), self.font.index).ok()
    }
}

impl InitialsShaper for FontInitials {
    fn shape(&self, text: &str, font_size: f32) -> Option<ShapedInitials> {
        if font_size.is_nan() || font_size <= 0.0 {
            return None;
        }
        let font = self.font_ref()?;
        let charmap = font.charmap();
        let glyph_ids: Vec<GlyphId> = text.chars().filter_map(|ch| charmap.map(ch)).collect();
        if glyph_ids.is_empty() {
            log::debug!("no glyphs for initials {text:?}");
            return None;
        }

        let size = Size::new(font_size);
        let location = LocationRef::default();
        let glyph_metrics = GlyphMetrics::new(&font, size, location);
        let outlines = font.outline_glyphs();

        let mut pen = PathPen::default();
        for gid in glyph_ids {
            if let Some(outline) = outlines.get(gid) {
                // Glyphs without outlines (spaces) still advance the pen.
                if outline
                    .draw(DrawSettings::unhinted(size, location), &mut pen)
                    .is_err()
                {
                    log::debug!("failed to draw glyph {gid:?}");
                }
            }
            pen.origin_x += glyph_metrics
                .advance_width(gid)
                .unwrap_or(font_size * FALLBACK_ADVANCE);
        }

        let metrics = font.metrics(size, location);
        Some(ShapedInitials {
            outline: pen.path,
            advance: f64::from(pen.origin_x),
            ascent: -f64::from(metrics.ascent),
            descent: -f64::from(metrics.descent),
        })
    }
}

/// Collects glyph outlines into a y-down path, offset by the pen position.
#[derive(Default)]
struct PathPen {
    path: BezPath,
    origin_x: f32,
}

impl PathPen {
    fn point(&self, x: f32, y: f32) -> (f64, f64) {
        (f64::from(self.origin_x + x), -f64::from(y))
    }
}

impl OutlinePen for PathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let c = self.point(cx0, cy0);
        let p = self.point(x, y);
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let c0 = self.point(cx0, cy0);
        let c1 = self.point(cx1, cy1);
        let p = self.point(x, y);
        self.path.curve_to(c0, c1, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn garbage_is_not_a_font() {
        let err = FontInitials::new(vec![0_u8; 64], 0).unwrap_err();
        assert_eq!(err, FontError::InvalidFont { index: 0 });
    }

    #[test]
    fn empty_input_is_not_a_font() {
        assert!(FontInitials::new(Vec::new(), 3).is_err());
    }

    #[test]
    fn pen_flips_y_and_offsets_x() {
        let mut pen = PathPen {
            origin_x: 10.0,
            ..PathPen::default()
        };
        pen.move_to(1.0, 2.0);
        pen.line_to(3.0, -4.0);
        pen.close();
        let elements = pen.path.elements();
        assert_eq!(elements[0], kurbo::PathEl::MoveTo((11.0, -2.0).into()));
        assert_eq!(elements[1], kurbo::PathEl::LineTo((13.0, 4.0).into()));
        assert_eq!(elements[2], kurbo::PathEl::ClosePath);
    }
}
