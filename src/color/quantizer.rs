//! Component B: the accelerated nearest-neighbor color quantizer.
//!
//! Implements Mean-ordered Partial Search (MPS) + Partial Distance Search
//! (PDS) + Triangular Inequality Elimination (TIE), as ported from
//! `examples/original_source/fastpixelmap.cpp`'s `convertImage` inner loop.
//! The result is required (and property-tested, see below) to always equal
//! a brute-force full search over the palette.

use super::{clamp_i32, tables::PaletteTables, Color};

/// Wraps a [`PaletteTables`] reference and exposes the `nearest` operation.
/// Holds no mutable state of its own; safe to share (by reference) across
/// worker threads.
pub struct Quantizer<'a> {
    tables: &'a PaletteTables,
}

impl<'a> Quantizer<'a> {
    pub fn new(tables: &'a PaletteTables) -> Self {
        Quantizer { tables }
    }

    /// Returns the index of the palette entry closest to `(b, g, r)` under
    /// squared Euclidean distance. Total: every input maps to some index.
    /// Ties keep the earlier (lower-mean-distance) winner.
    pub fn nearest(&self, b: u8, g: u8, r: u8) -> usize {
        let k = self.tables.len();
        let target = Color::new(b, g, r);
        let sum = b as i32 + g as i32 + r as i32;

        let m = clamp_i32(sum / 3, 0, 255) as u8;
        let pred = self.tables.predicted_index(m);

        let sed_min = target.sed(&self.tables.color(pred));
        let best = pred;

        let result = self.search(target, sum, pred, sed_min, best, k);
        log::trace!(
            "quantize ({b},{g},{r}): predicted={pred} chosen={result} delta={}",
            result as isize - pred as isize
        );
        result
    }

    fn search(&self, target: Color, sum: i32, pred: usize, mut sed_min: i32, mut best: usize, k: usize) -> usize {
        let mut down_idx = pred;
        let mut down_active = pred + 1 < k;
        let mut up_idx = pred as isize;
        let mut up_active = pred > 0;

        while down_active || up_active {
            if down_active {
                down_idx += 1;
                if down_idx >= k {
                    down_active = false;
                } else {
                    let candidate = self.tables.color(down_idx);
                    if 3 * sed_min < mean_sum_sq_diff(sum, candidate) {
                        down_active = false;
                    } else if 4 * sed_min < self.tables.distance(best, down_idx) {
                        // Triangular inequality elimination: skip without
                        // evaluating, side stays active.
                    } else if let Some(test) = partial_sed(&target, &candidate, sed_min) {
                        sed_min = test;
                        best = down_idx;
                    }
                }
            }
            if up_active {
                up_idx -= 1;
                if up_idx < 0 {
                    up_active = false;
                } else {
                    let c = up_idx as usize;
                    let candidate = self.tables.color(c);
                    if 3 * sed_min < mean_sum_sq_diff(sum, candidate) {
                        up_active = false;
                    } else if 4 * sed_min < self.tables.distance(best, c) {
                        // Triangular inequality elimination.
                    } else if let Some(test) = partial_sed(&target, &candidate, sed_min) {
                        sed_min = test;
                        best = c;
                    }
                }
            }
        }

        best
    }
}

/// `((B+G+R) - (B_c+G_c+R_c))^2`, the MPS mean-sum cutoff quantity.
#[inline]
fn mean_sum_sq_diff(sum: i32, candidate: Color) -> i32 {
    let candidate_sum = candidate.b as i32 + candidate.g as i32 + candidate.r as i32;
    let d = sum - candidate_sum;
    d * d
}

/// Partial distance search: accumulates squared channel differences in
/// B, G, R order, aborting (`None`) the moment the running sum can no
/// longer beat `sed_min`.
#[inline]
fn partial_sed(target: &Color, candidate: &Color, sed_min: i32) -> Option<i32> {
    let db = target.b as i32 - candidate.b as i32;
    let mut sum = db * db;
    if sum >= sed_min {
        return None;
    }
    let dg = target.g as i32 - candidate.g as i32;
    sum += dg * dg;
    if sum >= sed_min {
        return None;
    }
    let dr = target.r as i32 - candidate.r as i32;
    sum += dr * dr;
    if sum >= sed_min {
        return None;
    }
    Some(sum)
}

/// Brute-force full search, used only to property-test [`Quantizer::nearest`]
/// against. Not part of the public API.
#[cfg(test)]
pub(crate) fn brute_force_nearest(tables: &PaletteTables, b: u8, g: u8, r: u8) -> usize {
    let target = Color::new(b, g, r);
    let mut best = 0usize;
    let mut best_sed = target.sed(&tables.color(0));
    for i in 1..tables.len() {
        let d = target.sed(&tables.color(i));
        if d < best_sed {
            best_sed = d;
            best = i;
        }
    }
    best
}
