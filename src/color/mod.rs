//! Color quantization: palette construction, nearest-neighbor search
//! (MPS + PDS + TIE), and Sierra-Lite error diffusion.
//!
//! This module is the "Fast Palette Mapping" core described in the design
//! document: [`base`] builds the fixed 256-entry expanded game palette,
//! [`tables`] precomputes the auxiliary lookup structures the quantizer
//! needs, [`quantizer`] is the accelerated nearest-neighbor search itself,
//! and [`diffuser`] carries the Sierra-Lite dithering state between pixels.

pub mod base;
pub mod diffuser;
pub mod quantizer;
pub mod tables;

pub use base::{expanded_game_palette, BASE_PALETTE};
pub use diffuser::ErrorDiffuser;
pub use quantizer::Quantizer;
pub use tables::{GamePaletteEntry, PaletteTables};

use crate::utils::error::PaletteError;

/// The combined, mean-sorted expanded game palette: a [`PaletteTables`] for
/// the quantizer plus the `(bg, fg)` pair for each sorted index, as
/// consumed by the frame differencer (§6 "GamePalette mapping").
pub struct GamePalette {
    tables: PaletteTables,
    cells: Vec<GamePaletteEntry>,
}

impl GamePalette {
    /// Builds the 256-entry expanded palette and sorts it by mean exactly
    /// once, keeping the color table and the `(bg, fg)` satellite data in
    /// lockstep (see `SPEC_FULL.md` §4.A.1).
    pub fn build() -> Result<Self, PaletteError> {
        let entries: Vec<(Color, GamePaletteEntry)> = base::expanded_game_palette()
            .into_iter()
            .map(|cell| {
                (
                    cell.color,
                    GamePaletteEntry {
                        bg: cell.bg,
                        fg: cell.fg,
                    },
                )
            })
            .collect();
        let (tables, cells) = PaletteTables::build_with_satellite(entries)?;
        Ok(GamePalette { tables, cells })
    }

    pub fn tables(&self) -> &PaletteTables {
        &self.tables
    }

    /// The `(bg, fg)` cell pair for a given sorted palette index, as
    /// returned by the quantizer.
    #[inline]
    pub fn cell(&self, index: usize) -> GamePaletteEntry {
        self.cells[index]
    }
}

/// A 24-bit color stored as BGR, matching the channel order of a BGRA
/// video frame. Alpha is carried by the frame buffer, never by `Color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Color {
    pub const fn new(b: u8, g: u8, r: u8) -> Self {
        Color { b, g, r }
    }

    /// Integer mean of the three channels, `(B+G+R)/3`, truncating.
    #[inline]
    pub fn mean(&self) -> u16 {
        (self.b as u16 + self.g as u16 + self.r as u16) / 3
    }

    /// Squared Euclidean distance between two colors (the "SED" of the
    /// design document's glossary).
    #[inline]
    pub fn sed(&self, other: &Color) -> i32 {
        let db = self.b as i32 - other.b as i32;
        let dg = self.g as i32 - other.g as i32;
        let dr = self.r as i32 - other.r as i32;
        db * db + dg * dg + dr * dr
    }
}

#[inline]
pub(crate) fn clamp_i32(v: i32, lo: i32, hi: i32) -> i32 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}
