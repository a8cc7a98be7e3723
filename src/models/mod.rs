//! Domain types shared by the acquisition pipeline and the HTTP layer.
//!
//! # Submodules
//!
//! - `prompt`: The validated, immutable prompt text.
//! - `image`: Raw image payloads, their formats, and the encoded data URI.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod image;
pub mod prompt;

pub use image::{EncodedImage, ImageFormat, ImageResult};
pub use prompt::Prompt;
