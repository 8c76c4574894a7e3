//! Generated image fixtures for tests.

use std::io::{self, BufRead, Cursor, Read, Seek, SeekFrom};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};

/// Smallest valid GIF: one white pixel.
pub const GIF_1X1: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0xFF, 0xFF,
    0xFF, 0x00, 0x00, 0x00, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3B,
];

/// Deterministic RGB noise, so encoded sizes scale with the pixel count.
fn noise(width: u32, height: u32) -> Vec<u8> {
    let mut state: u32 = 0x9E37_79B9 ^ width.wrapping_mul(31) ^ height;
    (0..width as usize * height as usize * 3)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(&noise(width, height), width, height, ColorType::Rgb8)
        .expect("png encoding");
    out
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, 90)
        .write_image(&noise(width, height), width, height, ColorType::Rgb8)
        .expect("jpeg encoding");
    out
}

/// A valid PNG padded with trailing bytes to at least `len` bytes.
pub fn oversized_png(len: usize) -> Vec<u8> {
    let mut out = png_bytes(8, 8);
    if out.len() < len {
        out.resize(len, 0);
    }
    out
}

/// Which operation a [`FaultyReader`] refuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Every seek fails, so the stream cannot be repositioned.
    Seek,
    /// Every read fails; seeking still works.
    Read,
}

/// A reader over real image bytes that fails with a non-EOF I/O error.
#[derive(Debug)]
pub struct FaultyReader {
    inner: Cursor<Vec<u8>>,
    fault: Fault,
}

impl FaultyReader {
    pub fn new(data: Vec<u8>, fault: Fault) -> Self {
        Self {
            inner: Cursor::new(data),
            fault,
        }
    }

    fn broken(&self) -> io::Error {
        io::Error::new(io::ErrorKind::ConnectionReset, format!("{:?} failed", self.fault))
    }
}

impl Read for FaultyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.fault {
            Fault::Read => Err(self.broken()),
            Fault::Seek => self.inner.read(buf),
        }
    }
}

impl BufRead for FaultyReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self.fault {
            Fault::Read => Err(self.broken()),
            Fault::Seek => self.inner.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

impl Seek for FaultyReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self.fault {
            Fault::Seek => Err(self.broken()),
            Fault::Read => self.inner.seek(pos),
        }
    }
}
