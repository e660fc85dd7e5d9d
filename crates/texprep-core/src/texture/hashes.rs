//! Texture hash names: the slot hash typed by the user and the hash pairs
//! carried in reference texture file names.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::TextureError;

/// Pixel format tag embedded in every texture file name.
pub const TEXTURE_FORMAT: &str = "R8G8B8A8_UNORM_SRGB";

#[allow(clippy::unwrap_used)] // Constant pattern
static HASH_PAIR_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)_(\w+)-R8G8B8A8_UNORM_SRGB\.\w+").unwrap());

/// Hash of the index buffer the override block is keyed on.
///
/// Always eight lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotHash(String);

impl SlotHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SlotHash {
    type Err = TextureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() == 8 && s.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(TextureError::InvalidSlotHash(s.to_string()))
        }
    }
}

impl TryFrom<String> for SlotHash {
    type Error = TextureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotHash> for String {
    fn from(hash: SlotHash) -> Self {
        hash.0
    }
}

impl fmt::Display for SlotHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two hashes of a `{primary}_{secondary}-R8G8B8A8_UNORM_SRGB.*` name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashPair {
    pub primary: String,
    pub secondary: String,
}

impl HashPair {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Parse a texture file name. Anything after the extension's word
    /// characters is ignored.
    pub fn parse(file_name: &str) -> Option<Self> {
        let caps = HASH_PAIR_NAME.captures(file_name)?;
        Some(Self::new(&caps[1], &caps[2]))
    }

    /// `{primary}_{secondary}-R8G8B8A8_UNORM_SRGB.{extension}`
    pub fn file_name(&self, extension: &str) -> String {
        format!(
            "{}_{}-{TEXTURE_FORMAT}.{extension}",
            self.primary, self.secondary
        )
    }
}

/// Hash pairs of every matching file name in `dir`, ordered by file name
/// case-insensitively. Names that do not match are ignored.
pub fn collect_hash_pairs(dir: &Path) -> Result<Vec<HashPair>, TextureError> {
    let mut names = super::file_names(dir)?;
    super::sort_case_insensitive(&mut names);
    Ok(names.iter().filter_map(|name| HashPair::parse(name)).collect())
}
