// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_avatar --heading-base-level=0

//! Understory Avatar: circular avatars with an initials fallback.
//!
//! An avatar is an image clipped to a circle with a border ring around it.
//! Without an image, or after a toggle, it shows a colored disc with the
//! person's initials instead. The disc color is derived from the first
//! character, so the same initials always get the same color.
//!
//! The crate is backend-neutral and host-driven:
//!
//! - **Layout** ([`measure_square`], [`MeasureSpec`], [`Density`]): square
//!   sizing from the host's width constraint, defaulting to 40 dp.
//! - **Render plan** ([`render_avatar`], [`render_initials`], [`draw_border`]):
//!   pure functions that emit calls into an [`AvatarSurface`]. Two
//!   [`ClipStrategy`]s are offered: a pattern-filled oval, or an offscreen
//!   oval mask composited with source-in.
//! - **Clip cache** ([`ClipCache`]): the image resampled to the exact view
//!   size, kept until the size or the image changes.
//! - **Toggle animation** ([`ToggleAnimation`]): grow to twice the size and
//!   back over 1.2 s, flipping the mode at the midpoint.
//! - **Saved state** ([`ExtendedState`], [`SavedState`]): mode and border
//!   fields layered over the host's own state, with a byte encoding.
//! - **Controller** ([`AvatarView`]): ties the above together; every mutation
//!   returns an [`Invalidation`] telling the host what to schedule.
//!
//! Text shaping is left to an [`InitialsShaper`]; rasterization to an
//! [`AvatarSurface`]. Sibling crates provide both.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_avatar::{
//!     AvatarConfig, AvatarOp, AvatarView, ClipStrategy, Density, Invalidation, MeasureSpec,
//!     NoText, RecordingSurface,
//! };
//!
//! let mut view = AvatarView::new(&AvatarConfig::new().with_initials("JD"), Density(2.0));
//!
//! let size = view.measure(MeasureSpec::Unspecified, MeasureSpec::Unspecified);
//! assert_eq!(size.width, 80.0);
//! view.set_size(80, 80);
//!
//! // No image yet: the initials disc is drawn.
//! let mut surface = RecordingSurface::new();
//! view.draw(&mut surface, ClipStrategy::Shader, &NoText);
//! assert!(matches!(surface.ops()[0], AvatarOp::FillOval { .. }));
//!
//! // A long press starts the toggle animation; the host drives it per frame.
//! assert!(view.on_long_press(0));
//! assert_eq!(view.on_frame(16), Invalidation::RELAYOUT);
//! ```
//!
//! ## Features
//!
//! - `std` (default): use the standard library's float math.
//! - `libm`: float math for `no_std` targets.
//! - `serde`: `Serialize`/`Deserialize` for [`AvatarConfig`] and [`AvatarMode`].

#![no_std]

extern crate alloc;

mod bitmap;
mod cache;
mod config;
mod layout;
mod palette;
mod render;
mod state;
mod text;
mod toggle;
mod view;

pub use bitmap::{AvatarBitmap, BitmapError, Drawable, ImageResources, ResourceId};
pub use cache::{CacheKey, ClipCache};
pub use config::{AvatarConfig, DEFAULT_BORDER_COLOR, DEFAULT_INITIALS};
pub use layout::{
    DEFAULT_BORDER_WIDTH_DP, DEFAULT_SIZE_DP, Density, MeasureSpec, measure_square,
    resolve_default_size, view_bounds,
};
pub use palette::{
    PLACEHOLDER_COLORS, color_from_argb, color_to_argb, derive_color, placeholder_index,
};
pub use render::{
    AvatarOp, AvatarSurface, BorderStyle, ClipStrategy, INITIALS_TEXT_COLOR, INITIALS_TEXT_SCALE,
    RecordingSurface, border_oval, draw_border, initials_origin, render_avatar, render_initials,
};
pub use state::{ExtendedState, ParcelableState, STATE_TAG, SavedState, StateDecodeError};
pub use text::{InitialsShaper, NoText, ShapedInitials};
pub use toggle::{AnimationPhase, AnimationTick, TOGGLE_DURATION_MS, ToggleAnimation, sample_toggle};
pub use view::{AvatarMode, AvatarView, Invalidation};
