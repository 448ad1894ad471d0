//! Fetched image payloads.

use bytes::Bytes;
use std::fmt;

/// Container format detected from the leading magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
    Bmp,
    Unknown,
}

impl ImageFormat {
    pub fn sniff(data: &[u8]) -> Self {
        match data {
            [0xFF, 0xD8, 0xFF, ..] => ImageFormat::Jpeg,
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => ImageFormat::Png,
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => ImageFormat::Gif,
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => ImageFormat::Webp,
            [b'B', b'M', ..] => ImageFormat::Bmp,
            _ => ImageFormat::Unknown,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Unknown => "application/octet-stream",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// One fully-read image blob.
///
/// Not cached by the core; callers hold it for as long as they render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBytes {
    path: String,
    format: ImageFormat,
    data: Bytes,
}

impl ImageBytes {
    pub fn new(path: impl Into<String>, data: Bytes) -> Self {
        let format = ImageFormat::sniff(&data);
        Self {
            path: path.into(),
            format,
            data,
        }
    }

    /// Blob path the bytes were read from.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl AsRef<[u8]> for ImageBytes {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
