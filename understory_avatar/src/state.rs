// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Saved view state: the host's base state extended with avatar fields.
//!
//! The host owns its own base state (`B`). Saving wraps it in an
//! [`ExtendedState`]; restoring goes through [`SavedState`], which tells our
//! own state apart from a foreign one before unwrapping.
//!
//! The byte encoding writes the base state first, then mode, border width and
//! border color, all little-endian. Reading uses the same order.

use alloc::vec::Vec;
use core::fmt;

use crate::view::AvatarMode;

/// Prefix marking an encoded [`SavedState::Extended`].
pub const STATE_TAG: [u8; 4] = *b"AVS1";

/// Error returned when decoding saved state bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StateDecodeError {
    /// The input ended before a field could be read.
    UnexpectedEof {
        /// Bytes the field needed.
        needed: usize,
        /// Bytes that were left.
        remaining: usize,
    },
}

impl fmt::Display for StateDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof { needed, remaining } => write!(
                f,
                "saved state truncated: needed {needed} bytes, {remaining} left"
            ),
        }
    }
}

impl core::error::Error for StateDecodeError {}

/// A state value that can be written to and read back from bytes.
pub trait ParcelableState: Sized {
    /// Append this state's encoding to `out`.
    fn write_to(&self, out: &mut Vec<u8>);

    /// Decode from the front of `bytes`, returning the value and bytes consumed.
    fn read_from(bytes: &[u8]) -> Result<(Self, usize), StateDecodeError>;
}

/// Hosts without base state of their own.
impl ParcelableState for () {
    fn write_to(&self, _out: &mut Vec<u8>) {}

    fn read_from(_bytes: &[u8]) -> Result<(Self, usize), StateDecodeError> {
        Ok(((), 0))
    }
}

/// Opaque host state, stored with a `u32` length prefix.
///
/// Anything past `u32::MAX` bytes is dropped.
impl ParcelableState for Vec<u8> {
    fn write_to(&self, out: &mut Vec<u8>) {
        let len = u32::try_from(self.len()).unwrap_or(u32::MAX);
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&self[..len as usize]);
    }

    fn read_from(bytes: &[u8]) -> Result<(Self, usize), StateDecodeError> {
        let mut reader = Reader::new(bytes);
        let len = reader.read_u32()? as usize;
        let data = reader.take(len)?.to_vec();
        Ok((data, reader.pos))
    }
}

/// The host's base state plus the avatar fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtendedState<B> {
    /// State captured by the host for itself.
    pub base: B,
    /// Avatar or initials display.
    pub mode: AvatarMode,
    /// Border width in pixels.
    pub border_width: f32,
    /// Border color as `0xAARRGGBB`.
    pub border_color: u32,
}

impl<B: ParcelableState> ExtendedState<B> {
    /// Append the encoding to `out`: base, mode, width, color.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        self.base.write_to(out);
        let mode: i32 = match self.mode {
            AvatarMode::Avatar => 1,
            AvatarMode::Initials => 0,
        };
        out.extend_from_slice(&mode.to_le_bytes());
        out.extend_from_slice(&self.border_width.to_le_bytes());
        out.extend_from_slice(&self.border_color.to_le_bytes());
    }

    /// Decode in the order written by [`write_to`](Self::write_to).
    ///
    /// A mode value other than `1` reads as [`AvatarMode::Initials`].
    pub fn read_from(bytes: &[u8]) -> Result<(Self, usize), StateDecodeError> {
        let (base, used) = B::read_from(bytes)?;
        let mut reader = Reader::new(bytes);
        reader.pos = used;
        let mode = if reader.read_i32()? == 1 {
            AvatarMode::Avatar
        } else {
            AvatarMode::Initials
        };
        let border_width = f32::from_le_bytes(reader.array()?);
        let border_color = reader.read_u32()?;
        Ok((
            Self {
                base,
                mode,
                border_width,
                border_color,
            },
            reader.pos,
        ))
    }
}

/// State handed back by the host on restore.
#[derive(Clone, Debug, PartialEq)]
pub enum SavedState<B> {
    /// State saved by an avatar view.
    Extended(ExtendedState<B>),
    /// Anything else; only the host's base state is restored.
    Foreign(B),
}

impl<B> SavedState<B> {
    /// The base state, whichever variant this is.
    pub fn base(&self) -> &B {
        match self {
            Self::Extended(state) => &state.base,
            Self::Foreign(base) => base,
        }
    }
}

impl<B> From<ExtendedState<B>> for SavedState<B> {
    fn from(state: ExtendedState<B>) -> Self {
        Self::Extended(state)
    }
}

impl<B: ParcelableState> SavedState<B> {
    /// Encode, prefixing extended states with [`STATE_TAG`].
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Self::Extended(state) => {
                out.extend_from_slice(&STATE_TAG);
                state.write_to(&mut out);
            }
            Self::Foreign(base) => base.write_to(&mut out),
        }
        out
    }

    /// Decode; bytes without the tag are treated as a foreign base state.
    pub fn decode(bytes: &[u8]) -> Result<Self, StateDecodeError> {
        match bytes.strip_prefix(&STATE_TAG) {
            Some(rest) => ExtendedState::read_from(rest).map(|(state, _)| Self::Extended(state)),
            None => B::read_from(bytes).map(|(base, _)| Self::Foreign(base)),
        }
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], StateDecodeError> {
        let remaining = self.bytes.len().saturating_sub(self.pos);
        if remaining < len {
            return Err(StateDecodeError::UnexpectedEof {
                needed: len,
                remaining,
            });
        }
        let out = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    fn array(&mut self) -> Result<[u8; 4], StateDecodeError> {
        let bytes = self.take(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn read_i32(&mut self) -> Result<i32, StateDecodeError> {
        self.array().map(i32::from_le_bytes)
    }

    fn read_u32(&mut self) -> Result<u32, StateDecodeError> {
        self.array().map(u32::from_le_bytes)
    }
}
