// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-slot cache for the image prepared at the view's exact size.

use crate::bitmap::{AvatarBitmap, Drawable};

/// What a prepared bitmap was generated for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Identity of the image source the bitmap came from.
    pub source: u64,
}

/// Holds at most one bitmap, rasterized to match the current bounds.
///
/// Any change of size or source replaces the slot wholesale; there is no
/// incremental update.
#[derive(Clone, Debug, Default)]
pub struct ClipCache {
    slot: Option<(CacheKey, AvatarBitmap)>,
    regenerations: u64,
}

impl ClipCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure the slot holds `source` rasterized at `width x height`.
    ///
    /// Zero-sized bounds return `None` without touching the slot.
    pub fn prepare(
        &mut self,
        width: u32,
        height: u32,
        source: u64,
        drawable: &dyn Drawable,
    ) -> Option<&AvatarBitmap> {
        if width == 0 || height == 0 {
            return None;
        }
        let key = CacheKey {
            width,
            height,
            source,
        };
        let hit = matches!(&self.slot, Some((cached, _)) if *cached == key);
        if !hit {
            log::debug!("regenerating clip bitmap at {width}x{height} for source {source}");
            self.slot = drawable.rasterize(width, height).map(|bitmap| (key, bitmap));
            self.regenerations += 1;
        }
        self.slot.as_ref().map(|(_, bitmap)| bitmap)
    }

    /// The cached bitmap, only if it was prepared for exactly this key.
    pub fn get(&self, width: u32, height: u32, source: u64) -> Option<&AvatarBitmap> {
        let key = CacheKey {
            width,
            height,
            source,
        };
        match &self.slot {
            Some((cached, bitmap)) if *cached == key => Some(bitmap),
            _ => None,
        }
    }

    /// Key of the current slot, if filled.
    pub fn key(&self) -> Option<CacheKey> {
        self.slot.as_ref().map(|(key, _)| *key)
    }

    /// Empty the slot.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// How many times the slot has been regenerated.
    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }
}
