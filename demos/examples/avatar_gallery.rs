// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Avatar gallery rendered headlessly with Vello CPU.
//!
//! Usage: `avatar_gallery [FONT_PATH]`
//!
//! Draws one row of initials placeholders, one row of image avatars (shader
//! and mask clipping, different borders), and one row sampling the long-press
//! toggle animation, then writes `avatar_gallery.png`. Without a font the
//! initials discs are drawn without glyphs.

use std::env;

use kurbo::Affine;
use understory_avatar::{
    AvatarConfig, AvatarView, ClipStrategy, Density, InitialsShaper, MeasureSpec, NoText,
};
use understory_avatar_demos::{checker_bitmap, write_context_png};
use understory_avatar_text::FontInitials;
use understory_avatar_vello_cpu::VelloCpuAvatarSurface;
use vello_cpu::RenderContext;

const CELL: f64 = 110.0;
const COLUMNS: u16 = 6;
const ROWS: u16 = 3;

fn sized_view(config: &AvatarConfig) -> AvatarView {
    let mut view = AvatarView::new(config, Density(2.0));
    let size = view.measure(MeasureSpec::Unspecified, MeasureSpec::Unspecified);
    view.set_size(size.width as u32, size.height as u32);
    view
}

fn draw_cell(
    ctx: &mut RenderContext,
    column: u16,
    row: u16,
    view: &AvatarView,
    strategy: ClipStrategy,
    shaper: &dyn InitialsShaper,
) {
    let (width, _) = view.size();
    let inset = (CELL - f64::from(width)) / 2.0;
    let origin = Affine::translate((
        f64::from(column) * CELL + inset,
        f64::from(row) * CELL + inset,
    ));
    ctx.set_transform(vello_cpu::kurbo::Affine::new(origin.as_coeffs()));
    let mut surface = VelloCpuAvatarSurface::new(ctx);
    view.draw(&mut surface, strategy, shaper);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let shaper: Box<dyn InitialsShaper> = match env::args().nth(1) {
        Some(path) => Box::new(FontInitials::new(std::fs::read(&path)?, 0)?),
        None => {
            eprintln!("No font given; initials will be drawn without glyphs.");
            Box::new(NoText)
        }
    };

    let width = COLUMNS * CELL as u16;
    let height = ROWS * CELL as u16;
    let mut ctx = RenderContext::new(width, height);
    ctx.reset();

    // Row 0: placeholder colors.
    for (column, initials) in ["A", "JD", "MK", "??", "ZZ", "é"].into_iter().enumerate() {
        let mut view = sized_view(&AvatarConfig::new().with_initials(initials));
        view.toggle_mode();
        draw_cell(&mut ctx, column as u16, 0, &view, ClipStrategy::Shader, &*shaper);
    }

    // Row 1: image avatars.
    let checker = checker_bitmap(64, 64)?;
    let borders = [(2, 0xFFFF_FFFF), (4, 0xFF21_96F3), (0, 0xFFFF_FFFF)];
    let cases = [ClipStrategy::Shader, ClipStrategy::Mask]
        .into_iter()
        .flat_map(|strategy| borders.map(|border| (strategy, border)));
    for (column, (strategy, (border_dp, border_color))) in cases.enumerate() {
        let mut view = sized_view(&AvatarConfig::new().with_initials("IM"));
        view.set_border_width(border_dp);
        view.set_border_color(border_color);
        view.set_image_bitmap(checker.clone());
        draw_cell(&mut ctx, column as u16, 1, &view, strategy, &*shaper);
    }

    // Row 2: the long-press toggle, sampled across its cycle.
    let mut view = sized_view(&AvatarConfig::new().with_initials("LP"));
    view.set_image_bitmap(checker);
    view.on_long_press(0);
    for (column, now_ms) in [0_u64, 200, 400, 650, 900, 1_250].into_iter().enumerate() {
        view.on_frame(now_ms);
        let size = view.measure(MeasureSpec::Unspecified, MeasureSpec::Unspecified);
        // Cells are 110 px, so cap the animated size to stay inside one.
        let side = (size.width as u32).min(100);
        view.set_size(side, side);
        draw_cell(&mut ctx, column as u16, 2, &view, ClipStrategy::Shader, &*shaper);
    }

    write_context_png(&mut ctx, width, height, "avatar_gallery.png")?;
    eprintln!("Wrote avatar_gallery.png");
    Ok(())
}
