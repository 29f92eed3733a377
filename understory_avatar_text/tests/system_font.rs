// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shaping against a real font, when one is installed.

use kurbo::Shape;
use understory_avatar::{InitialsShaper, initials_origin};
use understory_avatar_text::FontInitials;

const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn system_font() -> Option<FontInitials> {
    CANDIDATES
        .iter()
        .find_map(|path| std::fs::read(path).ok())
        .and_then(|bytes| FontInitials::new(bytes, 0).ok())
}

#[test]
fn shapes_initials_with_y_down_metrics() {
    let Some(shaper) = system_font() else {
        eprintln!("no system font found, skipping");
        return;
    };
    let shaped = shaper.shape("AB", 33.0).expect("latin initials should map");
    assert!(shaped.advance > 0.0, "advance {}", shaped.advance);
    assert!(shaped.ascent < 0.0, "ascent {}", shaped.ascent);
    assert!(shaped.descent > 0.0, "descent {}", shaped.descent);

    // Capitals sit above the baseline.
    let bbox = shaped.outline.bounding_box();
    assert!(bbox.y1 <= 1.0, "glyphs extend below baseline: {bbox:?}");
    assert!(bbox.y0 < -10.0, "glyphs too short: {bbox:?}");
}

#[test]
fn centered_initials_stay_inside_the_disc() {
    let Some(shaper) = system_font() else {
        eprintln!("no system font found, skipping");
        return;
    };
    let bounds = kurbo::Rect::new(0.0, 0.0, 100.0, 100.0);
    let shaped = shaper.shape("AB", 33.0).expect("latin initials should map");
    let origin = initials_origin(bounds, &shaped);
    let placed = kurbo::Affine::translate(origin.to_vec2()) * shaped.outline;
    let bbox = placed.bounding_box();
    assert!(bounds.contains(bbox.origin()), "placed outside: {bbox:?}");
    assert!((bbox.center().x - 50.0).abs() < 5.0, "not centered: {bbox:?}");
}

#[test]
fn unmapped_text_and_bad_sizes_shape_to_nothing() {
    let Some(shaper) = system_font() else {
        eprintln!("no system font found, skipping");
        return;
    };
    assert!(shaper.shape("", 20.0).is_none());
    assert!(shaper.shape("JD", 0.0).is_none());
    assert!(shaper.shape("JD", f32::NAN).is_none());
}
