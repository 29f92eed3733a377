// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement policy: density conversion and square size resolution.

use kurbo::{Rect, Size};

/// Size used when the host leaves the width unconstrained, in dp.
pub const DEFAULT_SIZE_DP: u32 = 40;

/// Border width used when the configuration leaves it unset, in dp.
pub const DEFAULT_BORDER_WIDTH_DP: u32 = 2;

/// Display density: pixels per density-independent pixel (dp).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Density(pub f32);

impl Density {
    /// Baseline density, one pixel per dp.
    pub const BASELINE: Self = Self(1.0);

    /// Convert a length in dp to pixels.
    #[must_use]
    pub fn dp_to_px(self, dp: f32) -> f32 {
        dp * self.0
    }
}

impl Default for Density {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// Size constraint handed down by the host for one axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MeasureSpec {
    /// No constraint; the view picks its own default size.
    Unspecified,
    /// The view may be at most this many pixels.
    AtMost(u32),
    /// The view must be exactly this many pixels.
    Exactly(u32),
}

impl MeasureSpec {
    /// The pixel size carried by the spec, if any.
    pub fn size(self) -> Option<u32> {
        match self {
            Self::Unspecified => None,
            Self::AtMost(size) | Self::Exactly(size) => Some(size),
        }
    }
}

/// Resolve one axis: the default size when unconstrained, otherwise the host's size.
///
/// The default is [`DEFAULT_SIZE_DP`] at the given density, truncated to whole pixels.
pub fn resolve_default_size(spec: MeasureSpec, density: Density) -> u32 {
    spec.size()
        .unwrap_or_else(|| px_to_whole(density.dp_to_px(DEFAULT_SIZE_DP as f32)))
}

/// Resolve a square size from the width constraint.
///
/// `min_size` is a floor that the result never goes below; the toggle
/// animation drives it to grow the view.
pub fn measure_square(width_spec: MeasureSpec, min_size: u32, density: Density) -> Size {
    let side = f64::from(resolve_default_size(width_spec, density).max(min_size));
    Size::new(side, side)
}

/// Bounds rectangle for a view of the given pixel size, anchored at the origin.
pub fn view_bounds(width: u32, height: u32) -> Rect {
    Rect::new(0.0, 0.0, f64::from(width), f64::from(height))
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "pixel sizes are truncated toward zero and saturate at the u32 range"
)]
fn px_to_whole(px: f32) -> u32 {
    px as u32
}
