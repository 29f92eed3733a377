// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_avatar` crate driven the way a host would.
//!
//! A small fake host measures, lays out and redraws the view whenever a
//! mutation asks for it, and records what it drew.

use peniko::Color;
use understory_avatar::{
    AvatarBitmap, AvatarConfig, AvatarMode, AvatarOp, AvatarView, ClipStrategy, Density,
    Invalidation, MeasureSpec, NoText, PLACEHOLDER_COLORS, RecordingSurface, STATE_TAG,
    SavedState, color_from_argb, derive_color,
};

struct Host {
    view: AvatarView,
    surface: RecordingSurface,
    layouts: usize,
    redraws: usize,
}

impl Host {
    fn new(config: &AvatarConfig, density: f32) -> Self {
        let mut host = Self {
            view: AvatarView::new(config, Density(density)),
            surface: RecordingSurface::new(),
            layouts: 0,
            redraws: 0,
        };
        host.apply(Invalidation::RELAYOUT | Invalidation::REDRAW);
        host
    }

    fn apply(&mut self, invalidation: Invalidation) {
        if invalidation.contains(Invalidation::RELAYOUT) {
            let size = self
                .view
                .measure(MeasureSpec::Unspecified, MeasureSpec::Unspecified);
            self.view.set_size(size.width as u32, size.height as u32);
            self.layouts += 1;
        }
        if !invalidation.is_empty() {
            self.surface.clear();
            self.view
                .draw(&mut self.surface, ClipStrategy::Shader, &NoText);
            self.redraws += 1;
        }
    }

    fn width(&self) -> u32 {
        self.view.size().0
    }

    fn drew_image(&self) -> bool {
        matches!(
            self.surface.ops().first(),
            Some(AvatarOp::FillOvalWithPattern { .. })
        )
    }
}

fn photo() -> AvatarBitmap {
    AvatarBitmap::solid(16, 16, Color::from_rgba8(30, 60, 90, 255)).unwrap()
}

#[test]
fn long_press_grows_flips_and_settles() {
    let mut host = Host::new(&AvatarConfig::new(), 1.0);
    let inv = host.view.set_image_bitmap(photo());
    host.apply(inv);
    assert_eq!(host.width(), 40);
    assert!(host.drew_image());

    assert!(host.view.on_long_press(0));
    let mut max_width = 0;
    let mut flips = 0;
    for now in (0..=1_300).step_by(16) {
        let before = host.view.mode();
        let inv = host.view.on_frame(now);
        host.apply(inv);
        if host.view.mode() != before {
            flips += 1;
        }
        max_width = max_width.max(host.width());
    }

    assert_eq!(flips, 1);
    // One relayout per animation frame, plus the initial one.
    assert_eq!(host.layouts, 1 + 1_200 / 16 + 1);
    assert!(max_width >= 79, "grew only to {max_width}");
    assert!(max_width <= 80, "overshot to {max_width}");
    assert_eq!(host.width(), 40);
    assert_eq!(host.view.mode(), AvatarMode::Initials);
    assert!(!host.drew_image());
}

#[test]
fn initials_color_is_deterministic() {
    let mut host = Host::new(&AvatarConfig::new().with_initials("A"), 1.0);
    host.view.toggle_mode();
    host.apply(Invalidation::REDRAW);
    assert_eq!(
        host.surface.ops()[0],
        AvatarOp::FillOval {
            oval: kurbo::Rect::new(0.0, 0.0, 40.0, 40.0),
            color: color_from_argb(PLACEHOLDER_COLORS[1]),
        }
    );
    assert_eq!(derive_color("A"), derive_color("Alice"));
}

#[test]
fn hidden_initials_do_not_redraw() {
    let mut host = Host::new(&AvatarConfig::new(), 1.0);
    let inv = host.view.set_image_bitmap(photo());
    host.apply(inv);
    let redraws = host.redraws;
    let inv = host.view.set_initials("ZZ");
    host.apply(inv);
    assert_eq!(host.redraws, redraws);
    assert!(host.drew_image());
}

#[test]
fn initials_change_without_image_is_redrawn() {
    let mut host = Host::new(&AvatarConfig::new(), 1.0);
    assert_eq!(host.view.mode(), AvatarMode::Avatar);
    let inv = host.view.set_initials("A");
    assert_eq!(inv, Invalidation::REDRAW);
    host.apply(inv);
    assert_eq!(
        host.surface.ops()[0],
        AvatarOp::FillOval {
            oval: kurbo::Rect::new(0.0, 0.0, 40.0, 40.0),
            color: derive_color("A"),
        }
    );
}

#[test]
fn state_survives_an_encode_decode_cycle() {
    let mut host = Host::new(&AvatarConfig::new(), 3.0);
    host.view.set_image_bitmap(photo());
    host.view.set_border_width(2);
    host.view.set_border_color(0xFF7B_C862);
    host.view.toggle_mode();

    let bytes = SavedState::from(host.view.save(b"host".to_vec())).encode();
    assert!(bytes.starts_with(&STATE_TAG));

    let mut fresh = Host::new(&AvatarConfig::new(), 3.0);
    let base = fresh
        .view
        .restore(SavedState::<Vec<u8>>::decode(&bytes).unwrap());
    assert_eq!(base, b"host");
    assert_eq!(fresh.view.mode(), AvatarMode::Initials);
    assert_eq!(fresh.view.border().width(), 6.0);
    assert_eq!(fresh.view.border().color, color_from_argb(0xFF7B_C862));
}

#[test]
fn truncated_state_is_rejected() {
    let host = Host::new(&AvatarConfig::new(), 1.0);
    let bytes = SavedState::from(host.view.save(())).encode();
    assert!(SavedState::<()>::decode(&bytes[..bytes.len() - 1]).is_err());
}
