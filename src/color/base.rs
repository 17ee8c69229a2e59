//! The fixed 16-color base palette and its 16×16 "expanded" blend.
//!
//! Grounded on `examples/original_source/main.cpp`: the base colors are the
//! palette attributed there to John A. Watlington, and the expansion rule
//! (`0.4 * base[i] + 0.6 * base[j]`, background index `j`, foreground index
//! `i`) is copied verbatim from `initializeExpandedColors()`.

use super::Color;

/// One base color, stored as (R, G, B) the way the source table lists them;
/// converted to [`Color`] (BGR) at the blend step below.
struct BaseRgb(u8, u8, u8);

/// The 16 base colors a host's character-grid renderer can show as either
/// a background or a foreground color.
pub const BASE_PALETTE_RGB: [(u8, u8, u8); 16] = [
    (0, 0, 0),       // Black
    (87, 87, 87),    // Dark Gray
    (173, 35, 35),   // Red
    (42, 75, 215),   // Blue
    (29, 105, 20),   // Green
    (129, 74, 25),   // Brown
    (129, 38, 192),  // Purple
    (160, 160, 160), // Light Gray
    (129, 197, 122), // Light Green
    (157, 175, 255), // Light Blue
    (41, 208, 208),  // Cyan
    (255, 146, 51),  // Orange
    (255, 238, 51),  // Yellow
    (233, 222, 187), // Tan
    (255, 205, 243), // Pink
    (255, 255, 255), // White
];

/// [`BASE_PALETTE_RGB`] converted to [`Color`] (BGR), for callers that only
/// need the 16 unblended colors (e.g. rendering a legend).
pub const BASE_PALETTE: [Color; 16] = {
    let mut out = [Color::new(0, 0, 0); 16];
    let mut i = 0;
    while i < 16 {
        let (r, g, b) = BASE_PALETTE_RGB[i];
        out[i] = Color::new(b, g, r);
        i += 1;
    }
    out
};

fn blend_channel(a: u8, b: u8) -> u8 {
    // Matches the source's `(int)(0.4 * a + 0.6 * b)`: truncating cast, not
    // rounding.
    (0.4 * a as f64 + 0.6 * b as f64) as u8
}

/// One cell of the 256-entry expanded game palette, before sorting.
#[derive(Debug, Clone, Copy)]
pub struct ExpandedCell {
    /// The blended perceived color, BGR.
    pub color: Color,
    /// Background palette index (0..16) used to render this cell.
    pub bg: u8,
    /// Foreground palette index (0..16) used to render this cell.
    pub fg: u8,
}

/// Builds the 256-entry expanded palette: all 16×16 pairs of the base
/// palette, blended 40/60. Returned in enumeration order (`fg` outer,
/// `bg` inner) — *not* sorted by mean; sorting is the job of
/// [`crate::color::tables::PaletteTables`], which must own the single sort
/// so the color table and the `(bg, fg)` satellite data never diverge.
pub fn expanded_game_palette() -> Vec<ExpandedCell> {
    let mut cells = Vec::with_capacity(256);
    for fg in 0..16u8 {
        let BaseRgb(fr, fgc, fb) = rgb_of(fg);
        for bg in 0..16u8 {
            let BaseRgb(br, bgc, bb) = rgb_of(bg);
            let r = blend_channel(fr, br);
            let g = blend_channel(fgc, bgc);
            let b = blend_channel(fb, bb);
            cells.push(ExpandedCell {
                color: Color::new(b, g, r),
                bg,
                fg,
            });
        }
    }
    cells
}

fn rgb_of(index: u8) -> BaseRgb {
    let (r, g, b) = BASE_PALETTE_RGB[index as usize];
    BaseRgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_to_256_cells() {
        assert_eq!(expanded_game_palette().len(), 256);
    }

    #[test]
    fn white_on_white_blends_to_white() {
        let cells = expanded_game_palette();
        let white_white = cells
            .iter()
            .find(|c| c.bg == 15 && c.fg == 15)
            .expect("white/white cell present");
        assert_eq!(white_white.color, Color::new(255, 255, 255));
    }

    #[test]
    fn black_on_black_blends_to_black() {
        let cells = expanded_game_palette();
        let black_black = cells.iter().find(|c| c.bg == 0 && c.fg == 0).unwrap();
        assert_eq!(black_black.color, Color::new(0, 0, 0));
    }
}
