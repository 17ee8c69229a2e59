//! The 5-byte stream header: width and height as big-endian u16, and an
//! output frame rate as a single byte. Grounded on
//! `examples/original_source/main.cpp`'s header write
//! (`(width>>8),(width&0xff),(height>>8),(height&0xff),(frameRate/skipFrame)`)
//! and, for the Rust idiom of using `byteorder` for multi-byte fields,
//! `examples/LegeApp-DJVULibRust/src/iff/byte_stream.rs`.

use std::io::{self, Write};

use byteorder::{BigEndian, WriteBytesExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    pub width: u16,
    pub height: u16,
    pub fps_out: u8,
}

impl StreamHeader {
    pub fn new(width: u16, height: u16, fps_out: u8) -> Self {
        StreamHeader { width, height, fps_out }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_u16::<BigEndian>(self.width)?;
        out.write_u16::<BigEndian>(self.height)?;
        out.write_u8(self.fps_out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pixel_header_matches_reference_bytes() {
        let header = StreamHeader::new(1, 1, 0x12);
        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();
        assert_eq!(buf, vec![0x00, 0x01, 0x00, 0x01, 0x12]);
    }

    #[test]
    fn header_is_five_bytes() {
        let header = StreamHeader::new(1920, 1080, 24);
        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), 5);
        assert_eq!(&buf[0..2], &[0x07, 0x80]);
        assert_eq!(&buf[2..4], &[0x04, 0x38]);
        assert_eq!(buf[4], 24);
    }
}
