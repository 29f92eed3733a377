// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction-time configuration for [`AvatarView`](crate::AvatarView).

use alloc::string::String;

/// Initials shown when none are configured.
pub const DEFAULT_INITIALS: &str = "??";

/// Opaque white, as `0xAARRGGBB`.
pub const DEFAULT_BORDER_COLOR: u32 = 0xFFFF_FFFF;

/// Optional settings applied when a view is created.
///
/// Unset entries fall back to [`DEFAULT_INITIALS`],
/// [`DEFAULT_BORDER_WIDTH_DP`](crate::DEFAULT_BORDER_WIDTH_DP) at the view's
/// density, and [`DEFAULT_BORDER_COLOR`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AvatarConfig {
    /// Text shown in initials mode.
    pub initials: Option<String>,
    /// Border width, already in pixels.
    pub border_width_px: Option<f32>,
    /// Border color as `0xAARRGGBB`.
    pub border_color: Option<u32>,
}

impl AvatarConfig {
    /// A config with every entry unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initials.
    #[must_use]
    pub fn with_initials(mut self, initials: impl Into<String>) -> Self {
        self.initials = Some(initials.into());
        self
    }

    /// Set the border width in pixels.
    #[must_use]
    pub fn with_border_width_px(mut self, width: f32) -> Self {
        self.border_width_px = Some(width);
        self
    }

    /// Set the border color as `0xAARRGGBB`.
    #[must_use]
    pub fn with_border_color(mut self, argb: u32) -> Self {
        self.border_color = Some(argb);
        self
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use crate::AvatarMode;

    #[test]
    fn missing_fields_deserialize_as_unset() {
        let config: AvatarConfig = serde_json::from_str(r#"{"initials":"JD"}"#).unwrap();
        assert_eq!(config, AvatarConfig::new().with_initials("JD"));

        let config: AvatarConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AvatarConfig::new());
    }

    #[test]
    fn config_and_mode_round_trip() {
        let config = AvatarConfig::new()
            .with_border_width_px(3.0)
            .with_border_color(0xFF21_96F3);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<AvatarConfig>(&json).unwrap(), config);

        let json = serde_json::to_string(&AvatarMode::Initials).unwrap();
        assert_eq!(
            serde_json::from_str::<AvatarMode>(&json).unwrap(),
            AvatarMode::Initials
        );
    }
}
