use serde::{Deserialize, Serialize};

/// Settings key under which the theme preference is persisted.
pub const THEME_SETTING_KEY: &str = "themeDark";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Stored value: `"1"` for dark, `"0"` for light.
    pub fn as_setting(&self) -> &'static str {
        match self {
            Self::Light => "0",
            Self::Dark => "1",
        }
    }

    /// Anything other than `"1"` reads back as light.
    pub fn from_setting(value: &str) -> Self {
        if value == "1" { Self::Dark } else { Self::Light }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}
