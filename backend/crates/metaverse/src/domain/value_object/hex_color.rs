//! HexColor Value Object
//!
//! `#rgb` or `#rrggbb`, stored lowercase.

use derive_more::Display;

use crate::error::{MetaverseError, MetaverseResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct HexColor(String);

impl HexColor {
    /// Cyan, the avatar editor's starting color
    pub fn cyan() -> Self {
        Self("#00ffff".to_string())
    }

    pub fn parse(raw: &str) -> MetaverseResult<Self> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| MetaverseError::validation("color", "must start with '#'"))?;

        if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(MetaverseError::validation(
                "color",
                "expected #rgb or #rrggbb",
            ));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::cyan()
    }
}
