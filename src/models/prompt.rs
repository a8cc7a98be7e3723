// Prompt newtype
// Author: kelexine (https://github.com/kelexine)

use crate::error::{AppError, Result};
use std::fmt;

/// A non-empty prompt accepted from the caller.
///
/// Surrounding whitespace is trimmed on construction; the value cannot be
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prompt(String);

impl Prompt {
    /// Validate raw caller input.
    ///
    /// Fails with `InvalidInput` for empty or whitespace-only text.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput("Prompt is required".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first `n` whitespace-separated words.
    pub fn leading_words(&self, n: usize) -> Vec<&str> {
        self.0.split_whitespace().take(n).collect()
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
