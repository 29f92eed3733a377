// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placeholder palette for initials mode and ARGB color conversion.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `floor`
use peniko::Color;

/// Background colors used behind initials, as `0xAARRGGBB`.
///
/// The order is significant: [`placeholder_index`] maps initials onto it.
pub const PLACEHOLDER_COLORS: [u32; 8] = [
    0xFF7B_C862,
    0xFFE1_7076,
    0xFFFA_A774,
    0xFF6E_C9CB,
    0xFF65_AADD,
    0xFFA6_95E7,
    0xFFEE_7AAE,
    0xFF21_96F3,
];

/// Convert a packed `0xAARRGGBB` value into a color.
pub fn color_from_argb(argb: u32) -> Color {
    let [a, r, g, b] = argb.to_be_bytes();
    Color::from_rgba8(r, g, b, a)
}

/// Pack a color into `0xAARRGGBB`, rounding each channel to 8 bits.
pub fn color_to_argb(color: Color) -> u32 {
    let rgba = color.to_rgba8();
    u32::from_be_bytes([rgba.a, rgba.r, rgba.g, rgba.b])
}

/// Index into [`PLACEHOLDER_COLORS`] for the given initials.
///
/// Only the first UTF-16 code unit matters. It is truncated to a signed byte
/// `b`, and the index is the fractional part of `b / 8` scaled back up by 8.
/// For negative bytes the fractional part is taken against `floor`, so the
/// result is always in `0..8`. An empty string maps to index 0.
pub fn placeholder_index(initials: &str) -> usize {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "only the low byte of the code unit takes part in the mapping"
    )]
    let byte = initials.encode_utf16().next().unwrap_or(0) as u8 as i8;

    let len = PLACEHOLDER_COLORS.len() as f64;
    let d = f64::from(byte) / len;
    let scaled = ((d - d.floor()) * len).floor();

    #[allow(
        clippy::cast_possible_truncation,
        reason = "scaled is a whole number in [0, 8)"
    )]
    let index = scaled as usize;
    index.min(PLACEHOLDER_COLORS.len() - 1)
}

/// Background color for the given initials.
pub fn derive_color(initials: &str) -> Color {
    color_from_argb(PLACEHOLDER_COLORS[placeholder_index(initials)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capital_a_maps_to_second_color() {
        // 65 / 8 = 8.125, fractional part 0.125, times 8 is 1.
        assert_eq!(placeholder_index("A"), 1);
        assert_eq!(placeholder_index("AB"), 1);
        assert_eq!(color_to_argb(derive_color("A")), 0xFFE1_7076);
    }

    #[test]
    fn question_marks_use_last_color() {
        // '?' is 63: 7.875 -> 0.875 -> 7.
        assert_eq!(placeholder_index("??"), 7);
        assert_eq!(color_to_argb(derive_color("??")), 0xFF21_96F3);
    }

    #[test]
    fn empty_initials_use_first_color() {
        assert_eq!(placeholder_index(""), 0);
    }

    #[test]
    fn only_the_low_byte_counts() {
        // U+0410 CYRILLIC CAPITAL LETTER A has low byte 0x10.
        assert_eq!(placeholder_index("\u{0410}"), 0);
        // U+0141 has low byte 0x41, the same as 'A'.
        assert_eq!(placeholder_index("\u{0141}"), placeholder_index("A"));
    }

    #[test]
    fn negative_bytes_wrap_into_range() {
        // U+00FF truncates to -1: d = -0.125, floor(d) = -1, fraction 0.875.
        assert_eq!(placeholder_index("\u{00FF}"), 7);
        // U+00E8 truncates to -24, an exact multiple of 8.
        assert_eq!(placeholder_index("\u{00E8}"), 0);
        // U+0080 truncates to -128.
        assert_eq!(placeholder_index("\u{0080}"), 0);
        // U+00FD truncates to -3: -0.375 -> 0.625 -> 5.
        assert_eq!(placeholder_index("\u{00FD}"), 5);
    }

    #[test]
    fn index_matches_euclidean_remainder_for_every_byte() {
        for unit in 0_u16..=0xFF {
            let ch = char::from_u32(u32::from(unit)).unwrap();
            let mut buf = [0_u8; 4];
            let text = ch.encode_utf8(&mut buf);
            let byte = unit as u8 as i8;
            let expected = usize::try_from(i32::from(byte).rem_euclid(8)).unwrap();
            let index = placeholder_index(text);
            assert!(index < PLACEHOLDER_COLORS.len(), "index out of range");
            assert_eq!(index, expected, "mismatch for U+{unit:04X}");
            assert_eq!(index, placeholder_index(text), "not deterministic");
        }
    }

    #[test]
    fn argb_round_trips_through_color() {
        for argb in PLACEHOLDER_COLORS
            .into_iter()
            .chain([0x0000_0000, 0xFFFF_FFFF, 0x80FF_0000, 0x1234_5678])
        {
            assert_eq!(color_to_argb(color_from_argb(argb)), argb);
        }
    }
}
