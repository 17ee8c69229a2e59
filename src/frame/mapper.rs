//! Component D: the frame mapper. Walks a BGRA frame row-major, feeding
//! each effective (error-adjusted, clamped) pixel through the quantizer and
//! accumulating its error into the diffuser. Grounded on
//! `examples/original_source/fastpixelmap.cpp`'s `convertImage`.

use crate::color::{clamp_i32, Color, ErrorDiffuser, PaletteTables, Quantizer};
use crate::frame::source::BorrowedBgraFrame;

/// Iterates a frame's pixels, invoking the quantizer and error diffuser in
/// lockstep. Holds its own [`ErrorDiffuser`] so it can be reused (and
/// reset) across many frames without reallocating every call.
pub struct FrameMapper {
    diffuser: Option<ErrorDiffuser>,
}

impl FrameMapper {
    pub fn new() -> Self {
        FrameMapper { diffuser: None }
    }

    /// Converts one BGRA frame to a fresh width*height pal8 buffer. Does
    /// not mutate `frame`. Error carried from the previous call is used as
    /// the seed for row 0 of this frame only if the caller hasn't called
    /// [`FrameMapper::reset`] — matching the pipeline's per-worker usage,
    /// where each worker owns one mapper across all the frames it converts
    /// and error is intentionally *not* carried across frames.
    pub fn convert_image(&mut self, frame: &BorrowedBgraFrame<'_>, tables: &PaletteTables) -> Vec<u8> {
        let width = frame.width;
        let height = frame.height;
        let quantizer = Quantizer::new(tables);

        let diffuser = self
            .diffuser
            .get_or_insert_with(|| ErrorDiffuser::new(width));
        if diffuser.width() != width {
            *diffuser = ErrorDiffuser::new(width);
        } else {
            diffuser.end_frame();
        }

        let mut pal8 = vec![0u8; width * height];

        for y in 0..height {
            for x in 0..width {
                let (b, g, r) = frame.pixel_bgr(x, y);
                let err = diffuser.error_at(x);
                let eb = clamp_i32(b as i32 + err[0], 0, 255);
                let eg = clamp_i32(g as i32 + err[1], 0, 255);
                let er = clamp_i32(r as i32 + err[2], 0, 255);

                let idx = quantizer.nearest(eb as u8, eg as u8, er as u8);
                pal8[y * width + x] = idx as u8;

                let chosen = tables.color(idx);
                let actual_err = [
                    eb - chosen.b as i32,
                    eg - chosen.g as i32,
                    er - chosen.r as i32,
                ];
                diffuser.push(x, actual_err);
            }
            diffuser.end_row();
        }

        diffuser.end_frame();
        pal8
    }
}

impl Default for FrameMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{expanded_game_palette, PaletteTables};
    use crate::frame::source::{row_stride, FrameSource, VecFrameSource};

    fn tables() -> PaletteTables {
        let colors: Vec<Color> = expanded_game_palette().into_iter().map(|c| c.color).collect();
        PaletteTables::build(&colors).unwrap()
    }

    #[test]
    fn single_black_pixel_maps_to_lowest_mean_entry() {
        let tables = tables();
        let mut src = VecFrameSource::solid(1, 1, 24, (0, 0, 0), 1);
        let frame = src.read_frame().unwrap().unwrap();
        let mut mapper = FrameMapper::new();
        let pal8 = mapper.convert_image(&frame, &tables);
        assert_eq!(pal8, vec![0]);
    }

    #[test]
    fn single_white_pixel_maps_to_highest_mean_entry() {
        let tables = tables();
        let mut src = VecFrameSource::solid(1, 1, 24, (255, 255, 255), 1);
        let frame = src.read_frame().unwrap().unwrap();
        let mut mapper = FrameMapper::new();
        let pal8 = mapper.convert_image(&frame, &tables);
        assert_eq!(pal8, vec![(tables.len() - 1) as u8]);
    }

    #[test]
    fn aligned_width_has_zero_padding() {
        assert_eq!(row_stride(64) % (64 * 4), 0);
        assert_eq!(row_stride(64), 64 * 4);
    }

    #[test]
    fn second_frame_starts_from_zeroed_error() {
        let tables = tables();
        let mut src = VecFrameSource::solid(4, 4, 24, (12, 34, 56), 2);
        let mut mapper = FrameMapper::new();

        let frame1 = src.read_frame().unwrap().unwrap();
        let pal8_a = mapper.convert_image(&frame1, &tables);
        drop(frame1);

        let frame2 = src.read_frame().unwrap().unwrap();
        let pal8_b = mapper.convert_image(&frame2, &tables);

        // Same solid-color input, error reset between frames -> identical
        // quantization both times.
        assert_eq!(pal8_a, pal8_b);
    }
}
