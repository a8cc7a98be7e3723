//! Local SVG generator, the last entry of every acquisition chain.
//!
//! `SyntheticGenerator::generate` has no error type in its signature: it
//! performs no I/O and touches no shared state, so the pipeline can rely on
//! it to always produce an image.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::models::{ImageFormat, ImageResult, Prompt};

/// Words of the prompt kept for the caption.
pub const EXCERPT_WORDS: usize = 4;

/// Characters kept before the truncation marker is appended.
pub const EXCERPT_CHARS: usize = 25;

pub const TRUNCATION_MARKER: &str = "...";

pub const GENERATED_CAPTION: &str = "AI Generated Image";

pub const PROVENANCE_CAPTION: &str = "Generated locally";

/// Canvas edge length in pixels.
pub const CANVAS_SIZE: u32 = 512;

/// Renders a prompt excerpt onto a fixed gradient template.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticGenerator;

impl SyntheticGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self) -> &'static str {
        "synthetic"
    }

    /// Build the SVG for `prompt`. Identical prompts yield identical bytes.
    pub fn generate(&self, prompt: &Prompt) -> ImageResult {
        let caption = escape_xml(&excerpt(prompt));
        let svg = render(&caption);
        ImageResult::new(svg.into_bytes(), ImageFormat::Svg.mime_type())
    }
}

/// The caption text shown on the image, before XML escaping.
pub fn excerpt(prompt: &Prompt) -> String {
    let words = prompt.leading_words(EXCERPT_WORDS).join(" ");
    if words.chars().count() > EXCERPT_CHARS {
        let head: String = words.chars().take(EXCERPT_CHARS).collect();
        format!("{}{}", head, TRUNCATION_MARKER)
    } else {
        words
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c if c.is_control() => escaped.push(' '),
            c => escaped.push(c),
        }
    }
    escaped
}

fn render(caption: &str) -> String {
    let size = CANVAS_SIZE;
    format!(
        r##"<svg width="{size}" height="{size}" viewBox="0 0 {size} {size}" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="grad" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:#667eea;stop-opacity:1" />
      <stop offset="50%" style="stop-color:#764ba2;stop-opacity:1" />
      <stop offset="100%" style="stop-color:#f093fb;stop-opacity:1" />
    </linearGradient>
    <filter id="shadow" x="-20%" y="-20%" width="140%" height="140%">
      <feDropShadow dx="0" dy="4" stdDeviation="8" flood-color="#000000" flood-opacity="0.3"/>
    </filter>
  </defs>
  <rect width="100%" height="100%" fill="url(#grad)"/>
  <circle cx="256" cy="180" r="80" fill="rgba(255,255,255,0.15)" filter="url(#shadow)"/>
  <circle cx="256" cy="180" r="60" fill="rgba(255,255,255,0.1)"/>
  <text x="50%" y="300" font-family="Arial, sans-serif" font-size="20" font-weight="bold" text-anchor="middle" fill="white" dominant-baseline="middle" filter="url(#shadow)">{caption}</text>
  <text x="50%" y="330" font-family="Arial, sans-serif" font-size="16" text-anchor="middle" fill="rgba(255,255,255,0.9)" dominant-baseline="middle">{generated}</text>
  <text x="50%" y="360" font-family="Arial, sans-serif" font-size="12" text-anchor="middle" fill="rgba(255,255,255,0.7)" dominant-baseline="middle">{provenance}</text>
</svg>
"##,
        size = size,
        caption = caption,
        generated = GENERATED_CAPTION,
        provenance = PROVENANCE_CAPTION,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn prompt(text: &str) -> Prompt {
        Prompt::parse(text).unwrap()
    }

    fn svg_text(image: &ImageResult) -> String {
        String::from_utf8(image.bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_generate_is_deterministic() {
        let generator = SyntheticGenerator::new();
        let first = generator.generate(&prompt("A red fox"));
        let second = generator.generate(&prompt("A red fox"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_declares_svg() {
        let image = SyntheticGenerator::new().generate(&prompt("A red fox"));
        assert_eq!(image.mime_type, "image/svg+xml");
        assert_eq!(ImageFormat::detect(&image.bytes), Some(ImageFormat::Svg));
    }

    #[test]
    fn test_short_prompt_is_unmodified() {
        let image = SyntheticGenerator::new().generate(&prompt("sunset over mountains"));
        let svg = svg_text(&image);
        assert!(svg.contains(">sunset over mountains</text>"));
        assert!(svg.contains(GENERATED_CAPTION));
        assert!(svg.contains(PROVENANCE_CAPTION));
    }

    #[test]
    fn test_long_excerpt_is_truncated_with_marker() {
        let text = excerpt(&prompt("extraordinarily magnificent overwhelming landscapes"));
        assert_eq!(text, "extraordinarily magnifice...");
        assert_eq!(text.chars().count(), EXCERPT_CHARS + TRUNCATION_MARKER.len());
    }

    #[test]
    fn test_exactly_at_limit_is_not_truncated() {
        // 25 characters
        let text = excerpt(&prompt("abcdefghij klmnopqrstu vw"));
        assert_eq!(text, "abcdefghij klmnopqrstu vw");
    }

    #[test]
    fn test_excerpt_keeps_leading_words_only() {
        let text = excerpt(&prompt("a b c d e f"));
        assert_eq!(text, "a b c d");
    }

    #[test]
    fn test_markup_in_prompt_is_escaped() {
        let svg = svg_text(&SyntheticGenerator::new().generate(&prompt("<script> & \"x\"")));
        assert!(svg.contains("&lt;script&gt; &amp; &quot;x&quot;"));
        assert!(!svg.contains("<script>"));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let text = excerpt(&prompt("ééééééééééééééééééééééééééééé"));
        assert!(text.ends_with(TRUNCATION_MARKER));
        assert_eq!(text.chars().count(), EXCERPT_CHARS + 3);
    }

    proptest! {
        #[test]
        fn prop_generate_is_total_and_stable(raw in "\\PC{1,120}") {
            if let Ok(p) = Prompt::parse(&raw) {
                let generator = SyntheticGenerator::new();
                let a = generator.generate(&p);
                let b = generator.generate(&p);
                prop_assert_eq!(&a, &b);
                prop_assert!(std::str::from_utf8(&a.bytes).is_ok());
                prop_assert!(svg_text(&a).ends_with("</svg>\n"));
            }
        }
    }
}
