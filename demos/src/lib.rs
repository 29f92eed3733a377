// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the avatar demos.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use peniko::Color;
use png::{BitDepth, ColorType, Encoder};
use understory_avatar::{AvatarBitmap, BitmapError};
use vello_cpu::{Pixmap, RenderContext};

const LIGHT_TILE: Color = Color::from_rgb8(220, 220, 220);
const DARK_TILE: Color = Color::from_rgb8(80, 80, 160);

/// A two-tone checkerboard with 8 px tiles.
pub fn checker_bitmap(width: u32, height: u32) -> Result<AvatarBitmap, BitmapError> {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let tile = if ((x / 8) + (y / 8)) % 2 == 0 {
                LIGHT_TILE
            } else {
                DARK_TILE
            };
            let rgba = tile.to_rgba8();
            pixels.extend_from_slice(&[rgba.r, rgba.g, rgba.b, rgba.a]);
        }
    }
    AvatarBitmap::from_rgba8(width, height, pixels)
}

/// Flush `ctx` and write its contents to `path` as an RGBA PNG.
pub fn write_context_png(
    ctx: &mut RenderContext,
    width: u16,
    height: u16,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut pixmap = Pixmap::new(width, height);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
    for p in pixmap.take_unpremultiplied() {
        data.extend_from_slice(&[p.r, p.g, p.b, p.a]);
    }

    let file = BufWriter::new(File::create(path.as_ref())?);
    let mut encoder = Encoder::new(file, u32::from(width), u32::from(height));
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&data)?;
    Ok(())
}
