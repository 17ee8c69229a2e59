//! Component G: the per-frame record writer. Grounded on
//! `examples/original_source/main.cpp`'s `writeGameImage`, updated to the
//! "multithreaded version" wire convention recorded as the design target in
//! `SPEC_FULL.md` §9: a `u32` little-endian record count, records of
//! `u16` little-endian coordinates plus two ASCII hex digit bytes.

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::frame::PixelRecord;
use crate::stream::header::StreamHeader;

/// Lowercase hex digits 0-15, used to encode a palette-cell index (0..16)
/// as a single ASCII byte.
const HEX_CHARS: [u8; 16] = *b"0123456789abcdef";

#[inline]
fn hex_char(nibble: u8) -> u8 {
    HEX_CHARS[(nibble & 0x0f) as usize]
}

/// Writes the stream header once, then a sequence of per-frame record
/// blocks. Owns the output sink exclusively, per §5's resource model.
pub struct StreamWriter<W: Write> {
    sink: W,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(sink: W) -> Self {
        StreamWriter { sink }
    }

    pub fn write_header(&mut self, header: &StreamHeader) -> io::Result<()> {
        header.write_to(&mut self.sink)
    }

    /// Writes one frame's record block: a `u32` LE count followed by that
    /// many 6-byte records, in the order given (the caller is responsible
    /// for row-major ordering, per §4.F's "within a frame" guarantee).
    pub fn write_frame(&mut self, records: &[PixelRecord]) -> io::Result<()> {
        self.sink.write_u32::<LittleEndian>(records.len() as u32)?;
        for record in records {
            self.sink.write_u16::<LittleEndian>(record.x)?;
            self.sink.write_u16::<LittleEndian>(record.y)?;
            self.sink.write_u8(hex_char(record.bg))?;
            self.sink.write_u8(hex_char(record.fg))?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_record_frame_matches_reference_bytes() {
        let mut writer = StreamWriter::new(Vec::new());
        let records = [PixelRecord { x: 1, y: 1, bg: 0, fg: 0 }];
        writer.write_frame(&records).unwrap();
        let buf = writer.into_inner();
        assert_eq!(buf, vec![0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, b'0', b'0']);
    }

    #[test]
    fn white_cell_encodes_as_lowercase_f() {
        let mut writer = StreamWriter::new(Vec::new());
        let records = [PixelRecord { x: 1, y: 1, bg: 15, fg: 15 }];
        writer.write_frame(&records).unwrap();
        let buf = writer.into_inner();
        assert_eq!(&buf[8..10], &[b'f', b'f']);
    }

    #[test]
    fn empty_frame_writes_only_the_count() {
        let mut writer = StreamWriter::new(Vec::new());
        writer.write_frame(&[]).unwrap();
        let buf = writer.into_inner();
        assert_eq!(buf, vec![0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn header_then_frame_are_contiguous() {
        let mut writer = StreamWriter::new(Vec::new());
        writer.write_header(&StreamHeader::new(1, 1, 0x12)).unwrap();
        writer.write_frame(&[PixelRecord { x: 1, y: 1, bg: 0, fg: 0 }]).unwrap();
        let buf = writer.into_inner();
        assert_eq!(
            buf,
            vec![0x00, 0x01, 0x00, 0x01, 0x12, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, b'0', b'0']
        );
    }
}
