//! Sticker identity value objects.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static STICKER_NAME_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]{2,30}$").ok());

/// Platform sticker identifier (a snowflake).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StickerId(String);

impl StickerId {
    const MIN_LENGTH: usize = 17;
    const MAX_LENGTH: usize = 20;

    /// Parses a sticker ID. Only decimal snowflakes are accepted.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();

        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&value.len()) {
            return None;
        }

        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        Some(Self(value))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sticker name: 2-30 ASCII letters, digits or underscores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerName(String);

impl StickerName {
    /// Validates and wraps a sticker name.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let pattern = STICKER_NAME_PATTERN.as_ref()?;
        pattern.is_match(&value).then_some(Self(value))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StickerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
