// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The avatar view controller.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use kurbo::Size;

use crate::bitmap::{AvatarBitmap, Drawable, ImageResources, ResourceId};
use crate::cache::ClipCache;
use crate::config::{AvatarConfig, DEFAULT_BORDER_COLOR, DEFAULT_INITIALS};
use crate::layout::{DEFAULT_BORDER_WIDTH_DP, Density, MeasureSpec, measure_square, view_bounds};
use crate::palette::{color_from_argb, color_to_argb};
use crate::render::{AvatarSurface, BorderStyle, ClipStrategy, render_avatar, render_initials};
use crate::state::{ExtendedState, SavedState};
use crate::text::InitialsShaper;
use crate::toggle::{AnimationPhase, ToggleAnimation};

bitflags::bitflags! {
    /// Work the host has to schedule after a mutation.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Invalidation: u8 {
        /// The view must be drawn again.
        const REDRAW = 1 << 0;
        /// The view must be measured and laid out again.
        const RELAYOUT = 1 << 1;
    }
}

/// What the view shows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AvatarMode {
    /// The image, clipped to a circle. Falls back to initials without an image.
    #[default]
    Avatar,
    /// The colored initials disc.
    Initials,
}

impl AvatarMode {
    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Avatar => Self::Initials,
            Self::Initials => Self::Avatar,
        }
    }
}

struct ImageSource {
    drawable: Box<dyn Drawable + Send + Sync>,
    generation: u64,
}

/// One circular avatar.
///
/// The host forwards measurement, size changes, long presses and frame ticks,
/// and schedules work according to the returned [`Invalidation`]s. Drawing
/// goes through any [`AvatarSurface`].
pub struct AvatarView {
    density: Density,
    initials: String,
    border: BorderStyle,
    mode: AvatarMode,
    width: u32,
    height: u32,
    animated_size: u32,
    source: Option<ImageSource>,
    next_generation: u64,
    cache: ClipCache,
    animation: ToggleAnimation,
}

impl fmt::Debug for AvatarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarView")
            .field("density", &self.density)
            .field("initials", &self.initials)
            .field("border", &self.border)
            .field("mode", &self.mode)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("animated_size", &self.animated_size)
            .field(
                "source_generation",
                &self.source.as_ref().map(|source| source.generation),
            )
            .field("animation", &self.animation.phase())
            .finish_non_exhaustive()
    }
}

impl AvatarView {
    /// Create a view from `config` at the given display density.
    pub fn new(config: &AvatarConfig, density: Density) -> Self {
        let width = config
            .border_width_px
            .unwrap_or_else(|| density.dp_to_px(DEFAULT_BORDER_WIDTH_DP as f32));
        let color = color_from_argb(config.border_color.unwrap_or(DEFAULT_BORDER_COLOR));
        Self {
            density,
            initials: config
                .initials
                .clone()
                .unwrap_or_else(|| DEFAULT_INITIALS.into()),
            border: BorderStyle::new(width, color),
            mode: AvatarMode::default(),
            width: 0,
            height: 0,
            animated_size: 0,
            source: None,
            next_generation: 0,
            cache: ClipCache::new(),
            animation: ToggleAnimation::new(),
        }
    }

    /// Display density used for dp conversions.
    pub fn density(&self) -> Density {
        self.density
    }

    /// Current initials.
    pub fn initials(&self) -> &str {
        &self.initials
    }

    /// Current border.
    pub fn border(&self) -> &BorderStyle {
        &self.border
    }

    /// Current mode.
    pub fn mode(&self) -> AvatarMode {
        self.mode
    }

    /// Last size applied with [`set_size`](Self::set_size).
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether an image source is set.
    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    /// Phase of the toggle animation.
    pub fn animation_phase(&self) -> AnimationPhase {
        self.animation.phase()
    }

    /// The clip cache, for inspection.
    pub fn clip_cache(&self) -> &ClipCache {
        &self.cache
    }

    /// Square size for the given constraints.
    ///
    /// Only the width constraint is consulted. While the toggle animation
    /// runs, its value acts as a floor.
    pub fn measure(&self, width_spec: MeasureSpec, _height_spec: MeasureSpec) -> Size {
        measure_square(width_spec, self.animated_size, self.density)
    }

    /// Apply a new laid-out size. A zero width is ignored.
    pub fn set_size(&mut self, width: u32, height: u32) -> Invalidation {
        if width == 0 {
            return Invalidation::empty();
        }
        log::debug!("avatar resized to {width}x{height}");
        self.width = width;
        self.height = height;
        self.prepare_image();
        Invalidation::REDRAW
    }

    /// Replace the initials.
    ///
    /// Asks for a redraw only while the initials disc is what [`draw`](Self::draw)
    /// shows: in initials mode, or in avatar mode without an image.
    pub fn set_initials(&mut self, initials: impl Into<String>) -> Invalidation {
        self.initials = initials.into();
        if self.shows_initials() {
            Invalidation::REDRAW
        } else {
            Invalidation::empty()
        }
    }

    fn shows_initials(&self) -> bool {
        self.mode == AvatarMode::Initials || self.source.is_none()
    }

    /// Set the border color from `0xAARRGGBB`.
    pub fn set_border_color(&mut self, argb: u32) -> Invalidation {
        self.border.color = color_from_argb(argb);
        Invalidation::REDRAW
    }

    /// Set the border width in dp; stored in pixels.
    pub fn set_border_width(&mut self, dp: u32) -> Invalidation {
        self.border.set_width(self.density.dp_to_px(dp as f32));
        Invalidation::REDRAW
    }

    /// Use `bitmap` as the image.
    pub fn set_image_bitmap(&mut self, bitmap: AvatarBitmap) -> Invalidation {
        self.set_image_drawable(bitmap)
    }

    /// Use `drawable` as the image.
    ///
    /// In avatar mode the clip bitmap is regenerated right away.
    pub fn set_image_drawable(
        &mut self,
        drawable: impl Drawable + Send + Sync + 'static,
    ) -> Invalidation {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.source = Some(ImageSource {
            drawable: Box::new(drawable),
            generation,
        });
        self.cache.invalidate();
        if self.mode == AvatarMode::Avatar {
            self.prepare_image();
        }
        Invalidation::REDRAW
    }

    /// Load the image for `id` from `resources`.
    ///
    /// If the lookup fails the image is cleared.
    pub fn set_image_resource<R: ImageResources + ?Sized>(
        &mut self,
        resources: &R,
        id: ResourceId,
    ) -> Invalidation {
        match resources.load(id) {
            Some(bitmap) => self.set_image_bitmap(bitmap),
            None => {
                log::debug!("image resource {id:?} not found, clearing image");
                self.clear_image()
            }
        }
    }

    /// Remove the image; avatar mode then draws initials.
    pub fn clear_image(&mut self) -> Invalidation {
        self.source = None;
        self.cache.invalidate();
        Invalidation::REDRAW
    }

    /// Switch between avatar and initials mode.
    pub fn toggle_mode(&mut self) -> Invalidation {
        self.set_mode(self.mode.toggled())
    }

    /// Show `mode`.
    pub fn set_mode(&mut self, mode: AvatarMode) -> Invalidation {
        log::debug!("avatar mode {:?} -> {mode:?}", self.mode);
        self.mode = mode;
        if mode == AvatarMode::Avatar {
            self.prepare_image();
        }
        Invalidation::REDRAW
    }

    /// Start the toggle animation from the current width.
    ///
    /// Returns `false` if an animation is already running.
    pub fn on_long_press(&mut self, now_ms: u64) -> bool {
        let started = self.animation.start(self.width, now_ms);
        if !started {
            log::debug!("long press ignored, toggle animation already running");
        }
        started
    }

    /// Advance the toggle animation to `now_ms`.
    ///
    /// Every tick asks for a relayout; the midpoint tick also flips the mode.
    /// The animated size only applies while the cycle runs.
    pub fn on_frame(&mut self, now_ms: u64) -> Invalidation {
        let Some(tick) = self.animation.advance(now_ms) else {
            return Invalidation::empty();
        };
        self.animated_size = match tick.phase {
            AnimationPhase::Done => 0,
            _ => tick.value,
        };
        let mut invalidation = Invalidation::RELAYOUT;
        if tick.flipped {
            invalidation |= self.toggle_mode();
        }
        invalidation
    }

    /// Draw the current mode at the current size.
    pub fn draw<S, T>(&self, surface: &mut S, strategy: ClipStrategy, shaper: &T)
    where
        S: AvatarSurface + ?Sized,
        T: InitialsShaper + ?Sized,
    {
        let bounds = view_bounds(self.width, self.height);
        match (&self.source, self.mode) {
            (Some(source), AvatarMode::Avatar) => {
                let prepared = self.cache.get(self.width, self.height, source.generation);
                render_avatar(surface, bounds, prepared, strategy, &self.border);
            }
            _ => render_initials(surface, bounds, &self.initials, shaper, &self.border),
        }
    }

    /// Capture mode and border alongside the host's `base` state.
    pub fn save<B>(&self, base: B) -> ExtendedState<B> {
        ExtendedState {
            base,
            mode: self.mode,
            border_width: self.border.width(),
            border_color: color_to_argb(self.border.color),
        }
    }

    /// Apply saved state and hand back the host's base state.
    ///
    /// Foreign state leaves the view untouched.
    pub fn restore<B>(&mut self, state: SavedState<B>) -> B {
        match state {
            SavedState::Extended(state) => {
                self.mode = state.mode;
                self.border.set_width(state.border_width);
                self.border.color = color_from_argb(state.border_color);
                if self.mode == AvatarMode::Avatar {
                    self.prepare_image();
                }
                state.base
            }
            SavedState::Foreign(base) => {
                log::debug!("restoring foreign state, avatar fields left as they are");
                base
            }
        }
    }

    fn prepare_image(&mut self) {
        let Some(source) = &self.source else {
            return;
        };
        self.cache.prepare(
            self.width,
            self.height,
            source.generation,
            source.drawable.as_ref(),
        );
    }
}
