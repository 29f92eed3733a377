// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Save an avatar's state to bytes and restore it into a fresh view.
//!
//! The host's own state is an opaque byte vector here; the avatar fields are
//! appended after it and tagged so a restore can tell them apart from state
//! written by some other widget.

use understory_avatar::{AvatarConfig, AvatarView, Density, SavedState};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut view = AvatarView::new(&AvatarConfig::new().with_initials("SR"), Density(2.0));
    view.toggle_mode();
    view.set_border_width(3);
    view.set_border_color(0xFFEE_7AAE);

    let host_state = b"scroll=120".to_vec();
    let bytes = SavedState::from(view.save(host_state)).encode();
    println!("encoded {} bytes: {bytes:02x?}", bytes.len());

    let mut restored = AvatarView::new(&AvatarConfig::new(), Density(2.0));
    let host_state = restored.restore(SavedState::<Vec<u8>>::decode(&bytes)?);
    println!(
        "host state {:?}, mode {:?}, border {} px",
        String::from_utf8_lossy(&host_state),
        restored.mode(),
        restored.border().width()
    );

    // Bytes from some other widget are handed straight back.
    let foreign = SavedState::Foreign(b"other".to_vec()).encode();
    let host_state = restored.restore(SavedState::<Vec<u8>>::decode(&foreign)?);
    println!("foreign state {:?}", String::from_utf8_lossy(&host_state));
    Ok(())
}
