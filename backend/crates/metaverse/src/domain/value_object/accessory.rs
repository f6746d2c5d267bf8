//! Avatar accessory

use std::fmt;
use std::str::FromStr;

use crate::error::MetaverseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accessory {
    #[default]
    None,
    Hat,
    Glasses,
    Mask,
}

impl Accessory {
    pub const ALL: [Accessory; 4] = [
        Accessory::None,
        Accessory::Hat,
        Accessory::Glasses,
        Accessory::Mask,
    ];

    /// Wire code
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Hat => "hat",
            Self::Glasses => "glasses",
            Self::Mask => "mask",
        }
    }

    /// Display label used by the avatar editor
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Hat => "VR Headset",
            Self::Glasses => "Cyber Glasses",
            Self::Mask => "Neon Mask",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl FromStr for Accessory {
    type Err = MetaverseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Accessory::from_code(s).ok_or_else(|| {
            MetaverseError::validation("accessory", format!("unknown accessory '{s}'"))
        })
    }
}

impl fmt::Display for Accessory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_case_insensitive() {
        assert_eq!(Accessory::from_code("HAT"), Some(Accessory::Hat));
        assert_eq!(Accessory::from_code(" mask "), Some(Accessory::Mask));
        assert_eq!(Accessory::from_code("crown"), None);
    }

    #[test]
    fn test_code_roundtrip() {
        for accessory in Accessory::ALL {
            assert_eq!(accessory.code().parse::<Accessory>().unwrap(), accessory);
        }
    }

    #[test]
    fn test_default_is_none() {
        assert_eq!(Accessory::default(), Accessory::None);
    }
}
