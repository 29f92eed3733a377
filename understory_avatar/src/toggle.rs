// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Long-press toggle animation: grow to twice the size, flip, shrink back.
//!
//! ## Usage
//!
//! 1) Call [`ToggleAnimation::start`] with the current size and a timestamp.
//! 2) On every frame, call [`ToggleAnimation::advance`] with the frame time and
//!    apply [`AnimationTick::value`] as the view size.
//! 3) When a tick reports [`AnimationTick::flipped`], toggle the view's mode.
//!
//! ```
//! use understory_avatar::{AnimationPhase, ToggleAnimation};
//!
//! let mut anim = ToggleAnimation::new();
//! assert!(anim.start(100, 1_000));
//!
//! let tick = anim.advance(1_300).unwrap();
//! assert_eq!(tick.value, 150);
//! assert!(!tick.flipped);
//!
//! let tick = anim.advance(1_600).unwrap();
//! assert_eq!(tick.phase, AnimationPhase::Shrinking);
//! assert!(tick.flipped);
//!
//! let tick = anim.advance(2_200).unwrap();
//! assert_eq!(tick.phase, AnimationPhase::Done);
//! assert_eq!(tick.value, 100);
//! ```

/// Duration of each direction of the animation, in milliseconds.
pub const TOGGLE_DURATION_MS: u64 = 600;

/// Where the animation is in its cycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationPhase {
    /// Never started.
    #[default]
    Idle,
    /// Interpolating from the start size up to twice the start size.
    Growing,
    /// Interpolating back down, after the midpoint.
    Shrinking,
    /// The cycle has completed.
    Done,
}

/// One frame of animation output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AnimationTick {
    /// Animated size in pixels.
    pub value: u32,
    /// Phase after this frame.
    pub phase: AnimationPhase,
    /// `true` on the single frame where the direction reversed.
    pub flipped: bool,
}

/// Phase and value `elapsed_ms` after starting from `from`.
///
/// Values are linear and truncated to whole pixels.
pub fn sample_toggle(from: u32, elapsed_ms: u64) -> (AnimationPhase, u32) {
    let delta = f64::from(from.saturating_mul(2) - from);
    let duration = TOGGLE_DURATION_MS as f64;
    if elapsed_ms < TOGGLE_DURATION_MS {
        let fraction = elapsed_ms as f64 / duration;
        (AnimationPhase::Growing, from + whole(fraction * delta))
    } else if elapsed_ms < 2 * TOGGLE_DURATION_MS {
        let fraction = (elapsed_ms - TOGGLE_DURATION_MS) as f64 / duration;
        (
            AnimationPhase::Shrinking,
            from + whole((1.0 - fraction) * delta),
        )
    } else {
        (AnimationPhase::Done, from)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "interpolated offsets lie in [0, from] and are truncated like integer animators do"
)]
fn whole(value: f64) -> u32 {
    value as u32
}

/// Timed state machine behind the long-press toggle.
///
/// Driven by the host's frame loop; there are no timers or threads.
#[derive(Copy, Clone, Debug, Default)]
pub struct ToggleAnimation {
    phase: AnimationPhase,
    from: u32,
    started_at: u64,
    flipped: bool,
}

impl ToggleAnimation {
    /// Create an idle animation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// Returns `true` while growing or shrinking.
    pub fn is_running(&self) -> bool {
        matches!(
            self.phase,
            AnimationPhase::Growing | AnimationPhase::Shrinking
        )
    }

    /// Start a cycle from `from` at time `now_ms`.
    ///
    /// Returns `false`, leaving the running cycle untouched, if one is
    /// already in progress.
    pub fn start(&mut self, from: u32, now_ms: u64) -> bool {
        if self.is_running() {
            return false;
        }
        *self = Self {
            phase: AnimationPhase::Growing,
            from,
            started_at: now_ms,
            flipped: false,
        };
        true
    }

    /// Advance to `now_ms`. Returns `None` when not running.
    ///
    /// Timestamps earlier than the start are treated as the start.
    pub fn advance(&mut self, now_ms: u64) -> Option<AnimationTick> {
        if !self.is_running() {
            return None;
        }
        let (phase, value) = sample_toggle(self.from, now_ms.saturating_sub(self.started_at));
        let flipped = !self.flipped && phase != AnimationPhase::Growing;
        self.flipped |= flipped;
        self.phase = phase;
        Some(AnimationTick {
            value,
            phase,
            flipped,
        })
    }
}
