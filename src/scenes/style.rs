//! Palette and typography shared by every scene.

use crate::foundation::core::Rgba8Premul;

/// Titles and labels.
pub const INK: Rgba8Premul = Rgba8Premul::opaque(0x3B, 0x1F, 0x2B);
/// Secret digits, bulls and the URL badge.
pub const NAVY: Rgba8Premul = Rgba8Premul::opaque(0x38, 0x61, 0x8C);
/// Guess digits and cows.
pub const CORAL: Rgba8Premul = Rgba8Premul::opaque(0xFE, 0x93, 0x8C);
/// Background and text on highlighted tiles.
pub const CREAM: Rgba8Premul = Rgba8Premul::opaque(0xEB, 0xEB, 0xD3);
/// Captions under the rule headlines.
pub const STEEL: Rgba8Premul = Rgba8Premul::opaque(0x42, 0x81, 0xA4);

/// Font family requested for all text.
pub const FONT_FAMILY: &str = "Space Mono";
