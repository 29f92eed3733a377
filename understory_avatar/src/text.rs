// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text seam for initials: shaping is done by the host or a font crate.

use kurbo::BezPath;

/// Initials laid out on a single line.
///
/// All values are in pixels, y-down, relative to the pen origin on the
/// baseline at the left edge of the run.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapedInitials {
    /// Filled glyph outlines.
    pub outline: BezPath,
    /// Total advance width of the run.
    pub advance: f64,
    /// Distance from the baseline to the top of the font's ascender; negative.
    pub ascent: f64,
    /// Distance from the baseline to the bottom of the descender; positive.
    pub descent: f64,
}

/// Turns initials into outlines and metrics at a given font size.
pub trait InitialsShaper {
    /// Shape `text` at `font_size` pixels, or `None` if nothing can be drawn.
    fn shape(&self, text: &str, font_size: f32) -> Option<ShapedInitials>;
}

impl<T: InitialsShaper + ?Sized> InitialsShaper for &T {
    fn shape(&self, text: &str, font_size: f32) -> Option<ShapedInitials> {
        (**self).shape(text, font_size)
    }
}

/// Shaper for hosts without a font: initials render as a plain disc.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoText;

impl InitialsShaper for NoText {
    fn shape(&self, _text: &str, _font_size: f32) -> Option<ShapedInitials> {
        None
    }
}
