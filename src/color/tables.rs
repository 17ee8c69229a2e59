//! Palette auxiliary tables (component A): the sorted palette itself, the
//! per-entry mean, the mean-to-index prediction table, and the pairwise
//! distance matrix the quantizer's triangular-inequality elimination needs.

use super::Color;
use crate::utils::error::PaletteError;

/// `(bg, fg)` cell pair carried alongside a sorted palette entry, for
/// callers building a [`PaletteTables`] from the expanded game palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamePaletteEntry {
    pub bg: u8,
    pub fg: u8,
}

/// The read-only tables derived from a sorted palette, as described in
/// data model §3. Every field here is a pure function of the palette passed
/// to [`PaletteTables::build`]; nothing is mutated after construction.
pub struct PaletteTables {
    sorted: Vec<Color>,
    mean_palette: Vec<u16>,
    index_lut: [u16; 256],
    /// Row-major `K*K` squared-Euclidean distance matrix.
    palette_distance: Vec<i32>,
}

impl PaletteTables {
    /// Builds the tables from an unsorted palette of plain colors. Sorts a
    /// working copy ascending by integer mean; does not require the input
    /// to already be sorted.
    pub fn build(colors: &[Color]) -> Result<Self, PaletteError> {
        let (tables, _satellite) =
            Self::build_with_satellite(colors.iter().map(|&c| (c, ())).collect())?;
        Ok(tables)
    }

    /// Builds the tables from colors paired with arbitrary satellite data
    /// (e.g. the `(bg, fg)` cell pair of the expanded game palette). Sorts
    /// the `(color, satellite)` pairs together exactly once, so the
    /// returned satellite vector and the sorted color table can never
    /// disagree about the order — see the REDESIGN note in `SPEC_FULL.md`
    /// §4.A.1 on avoiding two independently-sorted arrays.
    pub fn build_with_satellite<T>(
        mut entries: Vec<(Color, T)>,
    ) -> Result<(Self, Vec<T>), PaletteError> {
        let k = entries.len();
        if k < 2 {
            return Err(PaletteError::TooFewColors(k));
        }

        entries.sort_by_key(|(color, _)| color.mean());

        let mut sorted = Vec::with_capacity(k);
        let mut satellite = Vec::with_capacity(k);
        for (color, extra) in entries {
            sorted.push(color);
            satellite.push(extra);
        }

        let mean_palette: Vec<u16> = sorted.iter().map(Color::mean).collect();

        if mean_palette[k - 1] < 255 {
            return Err(PaletteError::IncompleteMeanRange);
        }

        let index_lut = build_index_lut(&mean_palette, k);

        let mut palette_distance = vec![0i32; k * k];
        fill_palette_distance(&mut palette_distance, &sorted, k);

        Ok((
            PaletteTables {
                sorted,
                mean_palette,
                index_lut,
                palette_distance,
            },
            satellite,
        ))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        false // build() rejects K < 2
    }

    #[inline]
    pub fn color(&self, index: usize) -> Color {
        self.sorted[index]
    }

    #[inline]
    pub fn colors(&self) -> &[Color] {
        &self.sorted
    }

    #[inline]
    pub fn mean(&self, index: usize) -> u16 {
        self.mean_palette[index]
    }

    /// The predicted palette index for a pixel whose own channel-mean is
    /// `m` (`m` is clamped to `[0, 255]` by the caller).
    #[inline]
    pub fn predicted_index(&self, m: u8) -> usize {
        self.index_lut[m as usize] as usize
    }

    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> i32 {
        self.palette_distance[i * self.sorted.len() + j]
    }
}

/// Fills the row-major `K*K` squared-Euclidean distance matrix. Behind the
/// `rayon` feature this computes one row per task with `par_chunks_mut`
/// (mirroring the teacher's `into_par_iter()` fan-out in
/// `src/doc/djvu_document.rs`); without the feature it's a plain nested
/// loop. Either way the result is the same matrix — `rayon` only changes
/// how the K independent rows are computed, not what they compute.
#[cfg(feature = "rayon")]
fn fill_palette_distance(palette_distance: &mut [i32], sorted: &[Color], k: usize) {
    use rayon::prelude::*;
    palette_distance
        .par_chunks_mut(k)
        .enumerate()
        .for_each(|(i, row)| {
            for (j, slot) in row.iter_mut().enumerate() {
                *slot = sorted[i].sed(&sorted[j]);
            }
        });
}

#[cfg(not(feature = "rayon"))]
fn fill_palette_distance(palette_distance: &mut [i32], sorted: &[Color], k: usize) {
    for i in 0..k {
        for j in 0..k {
            palette_distance[i * k + j] = sorted[i].sed(&sorted[j]);
        }
    }
}

/// Builds `indexLUT` per the data model's definitional form:
/// `indexLUT[m] = argmax_j { m >= mid(mean[j-1], mean[j]) }`, with values
/// below `mid(mean[0], mean[1])` mapped to 0 and values at or above
/// `mid(mean[K-2], mean[K-1])` mapped to `K-1`. This is equivalent to, but
/// more directly total than, the source's hand-rolled loop (see the open
/// question recorded in `SPEC_FULL.md` §9): it always assigns every slot
/// and is non-decreasing in `m` by construction.
fn build_index_lut(mean_palette: &[u16], k: usize) -> [u16; 256] {
    let mut lut = [0u16; 256];
    let zero_check = (mean_palette[0] + mean_palette[1]) / 2;
    let k_check = (mean_palette[k - 2] + mean_palette[k - 1]) / 2;

    for m in 0..256u16 {
        lut[m as usize] = if m < zero_check {
            0
        } else if m >= k_check {
            (k - 1) as u16
        } else {
            let mut assigned = (k - 1) as u16;
            for j in 1..(k - 1) {
                let lo = (mean_palette[j - 1] + mean_palette[j]) / 2;
                let hi = (mean_palette[j] + mean_palette[j + 1]) / 2;
                if m >= lo && m < hi {
                    assigned = j as u16;
                    break;
                }
            }
            assigned
        };
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(mean: u16) -> Color {
        // A gray with the given mean, exactly (channels equal -> mean exact).
        Color::new(mean as u8, mean as u8, mean as u8)
    }

    #[test]
    fn rejects_too_small_palette() {
        let err = PaletteTables::build(&[Color::new(0, 0, 0)]).unwrap_err();
        assert!(matches!(err, PaletteError::TooFewColors(1)));
    }

    #[test]
    fn rejects_palette_without_near_white() {
        let colors: Vec<Color> = (0..10).map(|i| color(i * 10)).collect();
        let err = PaletteTables::build(&colors).unwrap_err();
        assert!(matches!(err, PaletteError::IncompleteMeanRange));
    }

    #[test]
    fn index_lut_is_non_decreasing() {
        let mut colors: Vec<Color> = (0..16).map(|i| color(i * 17)).collect();
        colors.push(Color::new(255, 255, 255));
        let tables = PaletteTables::build(&colors).unwrap();
        let mut prev = tables.predicted_index(0);
        for m in 1..=255u16 {
            let cur = tables.predicted_index(m as u8);
            assert!(cur >= prev, "indexLUT decreased at m={m}");
            prev = cur;
        }
    }

    #[test]
    fn palette_distance_is_symmetric_and_zero_on_diagonal() {
        let colors: Vec<Color> = vec![
            Color::new(0, 0, 0),
            Color::new(10, 20, 30),
            Color::new(255, 255, 255),
        ];
        let tables = PaletteTables::build(&colors).unwrap();
        for i in 0..tables.len() {
            assert_eq!(tables.distance(i, i), 0);
            for j in 0..tables.len() {
                assert_eq!(tables.distance(i, j), tables.distance(j, i));
            }
        }
    }

    #[test]
    fn satellite_data_follows_its_color_through_the_sort() {
        let entries = vec![
            (Color::new(255, 255, 255), "white"),
            (Color::new(0, 0, 0), "black"),
            (Color::new(128, 128, 128), "gray"),
        ];
        let (tables, satellite) = PaletteTables::build_with_satellite(entries).unwrap();
        assert_eq!(tables.color(0), Color::new(0, 0, 0));
        assert_eq!(satellite[0], "black");
        assert_eq!(tables.color(tables.len() - 1), Color::new(255, 255, 255));
        assert_eq!(satellite[tables.len() - 1], "white");
    }
}
