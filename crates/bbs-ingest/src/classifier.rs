use std::fmt;
use std::io::{BufRead, ErrorKind, Seek};

use image::io::Reader as ImageReader;
use image::ImageError;

use crate::error::{IngestError, IngestResult};

/// Image encodings accepted as attachments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    /// Conventional file extension, used for blob object names.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }

    fn from_sniffed(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Gif => Some(Self::Gif),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Identify the image encoding of an attachment.
///
/// `declared_size` is the length reported by the transport. If it exceeds
/// `max_size` the reader is never touched. Otherwise only the magic bytes and
/// image header are read, and the reader is rewound to its start before
/// returning, on success and on failure alike.
pub fn classify<R>(reader: &mut R, declared_size: u64, max_size: u64) -> IngestResult<ImageFormat>
where
    R: BufRead + Seek,
{
    if declared_size > max_size {
        return Err(IngestError::AttachmentTooLarge {
            size: declared_size,
            max: max_size,
        });
    }

    reader.rewind()?;
    let outcome = sniff(reader);
    reader.rewind()?;
    outcome
}

fn sniff<R: BufRead + Seek>(reader: &mut R) -> IngestResult<ImageFormat> {
    let guessed = ImageReader::new(&mut *reader).with_guessed_format()?;

    let format = match guessed.format() {
        Some(sniffed) => ImageFormat::from_sniffed(sniffed).ok_or_else(|| {
            IngestError::UnsupportedFormat(format!("{sniffed:?} images are not accepted"))
        })?,
        None => {
            return Err(IngestError::UnsupportedFormat(
                "not a recognized image encoding".into(),
            ))
        }
    };

    // Parse the header the way a decoder would, so a bare magic number with
    // garbage behind it is still rejected.
    match guessed.into_dimensions() {
        Ok(_) => Ok(format),
        Err(ImageError::IoError(e)) if e.kind() != ErrorKind::UnexpectedEof => {
            Err(IngestError::Io(e))
        }
        Err(e) => Err(IngestError::UnsupportedFormat(format!("invalid {format} header: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, Fault, FaultyReader};
    use proptest::prelude::*;
    use std::io::{Cursor, Read, SeekFrom};

    const MAX: u64 = 2 * 1024 * 1024;

    fn classify_bytes(data: &[u8]) -> IngestResult<ImageFormat> {
        let mut cursor = Cursor::new(data);
        classify(&mut cursor, data.len() as u64, MAX)
    }

    // -----------------------------------------------------------------------
    // Recognized formats
    // -----------------------------------------------------------------------

    #[test]
    fn recognizes_png() {
        assert_eq!(classify_bytes(&fixtures::png_bytes(16, 16)).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn recognizes_jpeg() {
        assert_eq!(classify_bytes(&fixtures::jpeg_bytes(16, 16)).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn recognizes_gif() {
        assert_eq!(classify_bytes(fixtures::GIF_1X1).unwrap(), ImageFormat::Gif);
    }

    #[test]
    fn extensions_and_mime_types() {
        assert_eq!(ImageFormat::Jpeg.extension(), "jpeg");
        assert_eq!(ImageFormat::Png.mime_type(), "image/png");
        assert_eq!(ImageFormat::Gif.to_string(), "gif");
    }

    // -----------------------------------------------------------------------
    // Rejections
    // -----------------------------------------------------------------------

    #[test]
    fn rejects_plain_text() {
        let err = classify_bytes(b"this is just a text file\n").unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(_)));
    }

    #[test]
    fn rejects_empty_stream() {
        let err = classify_bytes(b"").unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(_)));
    }

    #[test]
    fn rejects_magic_without_header() {
        let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
        data.extend_from_slice(b"definitely not an IHDR chunk");
        let err = classify_bytes(&data).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(_)));
    }

    #[test]
    fn rejects_unaccepted_image_format() {
        // BMP magic is recognized by the guesser but not accepted.
        let err = classify_bytes(b"BM\0\0\0\0\0\0\0\0\0\0\0\0").unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(_)));
    }

    #[test]
    fn oversized_declared_size_is_rejected_unread() {
        let data = fixtures::png_bytes(4, 4);
        let mut cursor = Cursor::new(&data[..]);
        cursor.seek(SeekFrom::Start(3)).unwrap();

        let err = classify(&mut cursor, MAX + 1, MAX).unwrap_err();
        assert!(matches!(
            err,
            IngestError::AttachmentTooLarge { size, max } if size == MAX + 1 && max == MAX
        ));
        assert_eq!(cursor.position(), 3, "reader must not be touched");
    }

    #[test]
    fn size_equal_to_max_is_accepted() {
        let data = fixtures::png_bytes(4, 4);
        let mut cursor = Cursor::new(&data[..]);
        assert!(classify(&mut cursor, data.len() as u64, data.len() as u64).is_ok());
    }

    // -----------------------------------------------------------------------
    // Broken streams
    // -----------------------------------------------------------------------

    #[test]
    fn unseekable_stream_is_io_error() {
        let data = fixtures::png_bytes(4, 4);
        let len = data.len() as u64;
        let mut reader = FaultyReader::new(data, Fault::Seek);
        let err = classify(&mut reader, len, MAX).unwrap_err();
        assert!(matches!(err, IngestError::Io(_)), "got {err:?}");
        assert_eq!(err.kind(), "io");
        assert!(!err.is_client_error());
    }

    #[test]
    fn unreadable_stream_is_io_error() {
        let data = fixtures::jpeg_bytes(8, 8);
        let len = data.len() as u64;
        let mut reader = FaultyReader::new(data, Fault::Read);
        let err = classify(&mut reader, len, MAX).unwrap_err();
        assert!(matches!(err, IngestError::Io(_)), "got {err:?}");
    }

    #[test]
    fn broken_stream_over_the_limit_is_still_too_large() {
        let mut reader = FaultyReader::new(Vec::new(), Fault::Seek);
        let err = classify(&mut reader, MAX + 1, MAX).unwrap_err();
        assert!(matches!(err, IngestError::AttachmentTooLarge { .. }));
    }

    // -----------------------------------------------------------------------
    // Non-destructive peek
    // -----------------------------------------------------------------------

    #[test]
    fn stream_is_restored_after_success() {
        let data = fixtures::jpeg_bytes(32, 32);
        let mut cursor = Cursor::new(&data[..]);
        classify(&mut cursor, data.len() as u64, MAX).unwrap();

        let mut read_back = Vec::new();
        cursor.read_to_end(&mut read_back).unwrap();
        assert_eq!(read_back, data);
    }

    #[test]
    fn classifying_twice_agrees() {
        let data = fixtures::png_bytes(8, 8);
        let mut cursor = Cursor::new(&data[..]);
        let first = classify(&mut cursor, data.len() as u64, MAX).unwrap();
        let second = classify(&mut cursor, data.len() as u64, MAX).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn starts_from_the_beginning_regardless_of_position() {
        let data = fixtures::png_bytes(8, 8);
        let mut cursor = Cursor::new(&data[..]);
        cursor.seek(SeekFrom::End(0)).unwrap();
        assert_eq!(
            classify(&mut cursor, data.len() as u64, MAX).unwrap(),
            ImageFormat::Png
        );
        assert_eq!(cursor.position(), 0);
    }

    proptest! {
        #[test]
        fn printable_text_is_never_an_image(text in "[ -~\\n]{0,512}") {
            let mut cursor = Cursor::new(text.as_bytes());
            let result = classify(&mut cursor, text.len() as u64, MAX);
            prop_assert!(matches!(result, Err(IngestError::UnsupportedFormat(_))));
            prop_assert_eq!(cursor.position(), 0);
        }

        #[test]
        fn position_is_always_restored(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            let mut cursor = Cursor::new(&data[..]);
            let _ = classify(&mut cursor, data.len() as u64, MAX);
            prop_assert_eq!(cursor.position(), 0);
        }
    }
}
