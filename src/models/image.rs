// Image payload types
// Author: kelexine (https://github.com/kelexine)

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Svg,
}

impl ImageFormat {
    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Svg => "image/svg+xml",
        }
    }

    /// Try to detect format from MIME type, ignoring parameters like `charset`
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/webp" => Some(ImageFormat::WebP),
            "image/gif" => Some(ImageFormat::Gif),
            "image/svg+xml" => Some(ImageFormat::Svg),
            _ => None,
        }
    }

    /// Detect format from magic bytes at start of image data
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"\xFF\xD8\xFF") {
            Some(ImageFormat::Jpeg)
        } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageFormat::Png)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else if data.len() >= 12 && data.starts_with(b"RIFF") && data[8..12] == *b"WEBP" {
            Some(ImageFormat::WebP)
        } else if looks_like_svg(data) {
            Some(ImageFormat::Svg)
        } else {
            None
        }
    }
}

fn looks_like_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(256)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Raw image bytes plus their declared MIME type.
///
/// Always holds undecoded binary (or SVG markup); base64 only happens in
/// the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResult {
    pub bytes: Bytes,
    pub mime_type: String,
}

impl ImageResult {
    pub fn new(bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A `data:<mime>;base64,<payload>` string, the only artifact returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub(crate) fn from_data_uri(uri: String) -> Self {
        Self(uri)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The MIME type declared in the URI header, if well formed
    pub fn mime_type(&self) -> Option<&str> {
        let rest = self.0.strip_prefix("data:")?;
        let header = rest.split(',').next()?;
        header.split(';').next()
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_magic_bytes() {
        assert_eq!(ImageFormat::detect(b"\xFF\xD8\xFF\xE0\x00\x10JFIF"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::detect(b"\x89PNG\r\n\x1a\n\x00\x00"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::detect(b"GIF89a......"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::detect(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::detect(b"\n  <svg width=\"1\"/>"), Some(ImageFormat::Svg));
        assert_eq!(ImageFormat::detect(b"<html><body>502</body></html>"), None);
    }

    #[test]
    fn test_from_mime_type_ignores_parameters() {
        assert_eq!(ImageFormat::from_mime_type("image/JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(
            ImageFormat::from_mime_type("image/svg+xml; charset=utf-8"),
            Some(ImageFormat::Svg)
        );
        assert_eq!(ImageFormat::from_mime_type("text/html"), None);
    }

    #[test]
    fn test_encoded_image_mime_type() {
        let encoded = EncodedImage::from_data_uri("data:image/png;base64,AAAA".to_string());
        assert_eq!(encoded.mime_type(), Some("image/png"));
        assert_eq!(
            serde_json::to_string(&encoded).unwrap(),
            "\"data:image/png;base64,AAAA\""
        );
    }
}
