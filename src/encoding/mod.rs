//! Response encoding: turns a winning `ImageResult` into a data URI.
//!
//! This is the only place in the crate that base64-encodes image data.
//! Adapters and the synthetic generator hand over raw bytes; a payload
//! that already arrives as a `data:` URI is passed through untouched so it
//! is never encoded twice.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::models::{EncodedImage, ImageResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

const DATA_URI_PREFIX: &str = "data:";

/// Encode an image result as a data URI.
pub fn encode(image: &ImageResult) -> EncodedImage {
    encode_bytes(&image.bytes, &image.mime_type)
}

/// Encode raw bytes with an explicit MIME type.
pub fn encode_bytes(bytes: &[u8], mime_type: &str) -> EncodedImage {
    if let Some(existing) = already_encoded(bytes) {
        return EncodedImage::from_data_uri(existing.to_string());
    }

    let mime_type = mime_type.split(';').next().unwrap_or_default().trim();
    let mime_type = if mime_type.is_empty() {
        "application/octet-stream"
    } else {
        mime_type
    };

    EncodedImage::from_data_uri(format!("data:{};base64,{}", mime_type, BASE64.encode(bytes)))
}

/// Split a data URI back into its MIME type and decoded payload.
pub fn decode(image: &EncodedImage) -> Option<(String, Vec<u8>)> {
    let rest = image.as_str().strip_prefix(DATA_URI_PREFIX)?;
    let (header, payload) = rest.split_once(',')?;
    let mime_type = header.strip_suffix(";base64")?;
    let bytes = BASE64.decode(payload.as_bytes()).ok()?;
    Some((mime_type.to_string(), bytes))
}

// Pre-encoded payloads are UTF-8 text starting with a base64 data URI header
fn already_encoded(bytes: &[u8]) -> Option<&str> {
    if !bytes.starts_with(DATA_URI_PREFIX.as_bytes()) {
        return None;
    }
    let text = std::str::from_utf8(bytes).ok()?.trim();
    let (header, _) = text.split_once(',')?;
    header.ends_with(";base64").then_some(text)
}
