// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Source images: RGBA8 bitmaps, drawables and resource lookup.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `floor` and `round`
use peniko::{Blob, Color, ImageAlphaType, ImageData, ImageFormat};

/// Error returned when constructing an [`AvatarBitmap`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BitmapError {
    /// Width or height was zero.
    ZeroSize,
    /// The pixel buffer does not hold `width * height * 4` bytes.
    BufferSize {
        /// Number of bytes the dimensions call for.
        expected: usize,
        /// Number of bytes supplied.
        actual: usize,
    },
}

impl fmt::Display for BitmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSize => f.write_str("bitmap dimensions must be non-zero"),
            Self::BufferSize { expected, actual } => write!(
                f,
                "bitmap buffer holds {actual} bytes, dimensions need {expected}"
            ),
        }
    }
}

impl core::error::Error for BitmapError {}

/// Straight-alpha RGBA8 bitmap, row-major with no padding.
///
/// Pixel storage is a shared [`Blob`], so clones are cheap and keep the same
/// [`id`](Self::id).
#[derive(Clone)]
pub struct AvatarBitmap {
    width: u32,
    height: u32,
    pixels: Blob<u8>,
}

impl fmt::Debug for AvatarBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarBitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("id", &self.pixels.id())
            .finish_non_exhaustive()
    }
}

impl PartialEq for AvatarBitmap {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.pixels.data() == other.pixels.data()
    }
}

impl AvatarBitmap {
    /// Wrap an RGBA8 buffer.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 {
            return Err(BitmapError::ZeroSize);
        }
        let expected = byte_len(width, height);
        if pixels.len() != expected {
            return Err(BitmapError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: Blob::from(pixels),
        })
    }

    /// A bitmap filled with a single color.
    pub fn solid(width: u32, height: u32, color: Color) -> Result<Self, BitmapError> {
        let rgba = color.to_rgba8();
        let mut pixels = Vec::with_capacity(byte_len(width, height));
        for _ in 0..u64::from(width) * u64::from(height) {
            pixels.extend_from_slice(&[rgba.r, rgba.g, rgba.b, rgba.a]);
        }
        Self::from_rgba8(width, height, pixels)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Identity of the underlying pixel storage.
    pub fn id(&self) -> u64 {
        self.pixels.id()
    }

    /// Raw RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        self.pixels.data()
    }

    /// The RGBA value at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.pixels()[offset..offset + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// View the bitmap as `peniko` image data for renderers.
    pub fn to_image_data(&self) -> ImageData {
        ImageData {
            data: self.pixels.clone(),
            format: ImageFormat::Rgba8,
            alpha_type: ImageAlphaType::Alpha,
            width: self.width,
            height: self.height,
        }
    }

    /// Resample to `width x height` with bilinear filtering.
    ///
    /// Pixel centers are aligned and edge pixels are clamped. Color channels
    /// are weighted by alpha so transparent pixels do not bleed their color.
    /// Returns `None` when either target dimension is zero; returns a clone
    /// when the size already matches.
    pub fn resample(&self, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if width == self.width && height == self.height {
            return Some(self.clone());
        }

        let src = self.pixels();
        let src_w = self.width as usize;
        let scale_x = f64::from(self.width) / f64::from(width);
        let scale_y = f64::from(self.height) / f64::from(height);

        let mut out = vec![0_u8; byte_len(width, height)];
        for y in 0..height {
            let (y0, y1, fy) = sample_axis(y, scale_y, self.height);
            for x in 0..width {
                let (x0, x1, fx) = sample_axis(x, scale_x, self.width);
                let taps = [
                    (y0 * src_w + x0, (1.0 - fx) * (1.0 - fy)),
                    (y0 * src_w + x1, fx * (1.0 - fy)),
                    (y1 * src_w + x0, (1.0 - fx) * fy),
                    (y1 * src_w + x1, fx * fy),
                ];

                let mut alpha = 0.0;
                let mut color = [0.0_f64; 3];
                for (idx, weight) in taps {
                    let p = &src[idx * 4..idx * 4 + 4];
                    let a = f64::from(p[3]) * weight;
                    alpha += a;
                    for (acc, c) in color.iter_mut().zip(&p[..3]) {
                        *acc += f64::from(*c) * a;
                    }
                }

                let dst = (y as usize * width as usize + x as usize) * 4;
                if alpha > 0.0 {
                    for (i, c) in color.iter().enumerate() {
                        out[dst + i] = channel(c / alpha);
                    }
                }
                out[dst + 3] = channel(alpha);
            }
        }

        Some(Self {
            width,
            height,
            pixels: Blob::from(out),
        })
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// Source indices and blend factor for destination coordinate `dst`.
#[allow(
    clippy::cast_possible_truncation,
    reason = "the source coordinate is clamped to [0, len - 1] before casting"
)]
fn sample_axis(dst: u32, scale: f64, len: u32) -> (usize, usize, f64) {
    let max = f64::from(len - 1);
    let pos = ((f64::from(dst) + 0.5) * scale - 0.5).clamp(0.0, max);
    let lo = pos.floor();
    let hi = (lo + 1.0).min(max);
    (lo as usize, hi as usize, pos - lo)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "value is clamped to the u8 range before casting"
)]
fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Something that can be rasterized into a bitmap of a requested size.
pub trait Drawable {
    /// Render into a fresh `width x height` bitmap.
    ///
    /// Returns `None` when nothing can be produced (for example zero sizes).
    fn rasterize(&self, width: u32, height: u32) -> Option<AvatarBitmap>;
}

impl Drawable for AvatarBitmap {
    fn rasterize(&self, width: u32, height: u32) -> Option<AvatarBitmap> {
        self.resample(width, height)
    }
}

/// A plain color drawable.
impl Drawable for Color {
    fn rasterize(&self, width: u32, height: u32) -> Option<AvatarBitmap> {
        AvatarBitmap::solid(width, height, *self).ok()
    }
}

/// Handle to an image owned by the host's resource system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceId(pub u32);

/// Host-side image lookup used by
/// [`AvatarView::set_image_resource`](crate::AvatarView::set_image_resource).
pub trait ImageResources {
    /// Decode the image for `id`, or `None` if it does not exist.
    fn load(&self, id: ResourceId) -> Option<AvatarBitmap>;
}
