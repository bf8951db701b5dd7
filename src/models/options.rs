use crate::error::KuronekoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dimensions used when a size key is not in the table.
pub const FALLBACK_DIMENSIONS: &str = "1024x1024";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Style {
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "ghibli")]
    Ghibli,
    #[serde(rename = "cyberpunk")]
    Cyberpunk,
    #[serde(rename = "anime")]
    Anime,
    #[serde(rename = "portrait")]
    Portrait,
    #[serde(rename = "chibi")]
    Chibi,
    #[serde(rename = "pixel art")]
    PixelArt,
    #[serde(rename = "oil painting")]
    OilPainting,
    #[serde(rename = "3d")]
    ThreeD,
}

impl Style {
    /// Display order of the style picker.
    pub const ALL: [Style; 9] = [
        Style::Default,
        Style::Ghibli,
        Style::Cyberpunk,
        Style::Anime,
        Style::Portrait,
        Style::Chibi,
        Style::PixelArt,
        Style::OilPainting,
        Style::ThreeD,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Style::Default => "default",
            Style::Ghibli => "ghibli",
            Style::Cyberpunk => "cyberpunk",
            Style::Anime => "anime",
            Style::Portrait => "portrait",
            Style::Chibi => "chibi",
            Style::PixelArt => "pixel art",
            Style::OilPainting => "oil painting",
            Style::ThreeD => "3d",
        }
    }

    /// Label appended to the prompt as `-style <label>`.
    pub fn label(&self) -> &'static str {
        match self {
            Style::Default => "Realism",
            Style::Ghibli => "Ghibli Art",
            Style::Cyberpunk => "Cyberpunk",
            Style::Anime => "Anime",
            Style::Portrait => "Portrait",
            Style::Chibi => "Chibi",
            Style::PixelArt => "Pixel Art",
            Style::OilPainting => "Oil Painting",
            Style::ThreeD => "3D",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Style> {
        Style::ALL.into_iter().find(|style| style.tag() == tag)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Style {
    type Err = KuronekoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Style::from_tag(&tag)
            .ok_or_else(|| KuronekoError::Validation(format!("Unknown style '{}'", s.trim())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SizeKey {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:2")]
    Landscape,
    #[serde(rename = "2:3")]
    Portrait,
}

impl SizeKey {
    pub const ALL: [SizeKey; 3] = [SizeKey::Square, SizeKey::Landscape, SizeKey::Portrait];

    pub fn key(&self) -> &'static str {
        match self {
            SizeKey::Square => "1:1",
            SizeKey::Landscape => "3:2",
            SizeKey::Portrait => "2:3",
        }
    }

    pub fn dimensions(&self) -> &'static str {
        match self {
            SizeKey::Square => "1024x1024",
            SizeKey::Landscape => "1080x720",
            SizeKey::Portrait => "720x1080",
        }
    }

    pub fn from_key(key: &str) -> Option<SizeKey> {
        SizeKey::ALL.into_iter().find(|size| size.key() == key)
    }
}

impl fmt::Display for SizeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SizeKey {
    type Err = KuronekoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SizeKey::from_key(s.trim())
            .ok_or_else(|| KuronekoError::Validation(format!("Unknown size '{}'", s.trim())))
    }
}

/// Looks up the label for a raw style tag, `None` when the tag is unknown.
pub fn style_label(tag: &str) -> Option<&'static str> {
    Style::from_tag(tag).map(|style| style.label())
}

/// Resolves a raw size key to pixel dimensions, falling back to [`FALLBACK_DIMENSIONS`].
pub fn resolve_dimensions(key: &str) -> &'static str {
    match SizeKey::from_key(key) {
        Some(size) => size.dimensions(),
        None => {
            log::warn!(
                "Unknown size key '{}', using {}",
                key,
                FALLBACK_DIMENSIONS
            );
            FALLBACK_DIMENSIONS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_first_entries() {
        assert_eq!(Style::default(), Style::ALL[0]);
        assert_eq!(Style::default().tag(), "default");
        assert_eq!(SizeKey::default().key(), "1:1");
    }

    #[test]
    fn tags_round_trip_through_from_str() {
        for style in Style::ALL {
            assert_eq!(style.tag().parse::<Style>().unwrap(), style);
        }
        for size in SizeKey::ALL {
            assert_eq!(size.key().parse::<SizeKey>().unwrap(), size);
        }
    }

    #[test]
    fn style_parsing_is_case_insensitive() {
        assert_eq!("Pixel Art".parse::<Style>().unwrap(), Style::PixelArt);
        assert_eq!(" 3D ".parse::<Style>().unwrap(), Style::ThreeD);
        assert!("watercolor".parse::<Style>().is_err());
    }

    #[test]
    fn size_table() {
        assert_eq!(resolve_dimensions("3:2"), "1080x720");
        assert_eq!(resolve_dimensions("2:3"), "720x1080");
        assert_eq!(resolve_dimensions("1:1"), "1024x1024");
        assert_eq!(resolve_dimensions("16:9"), FALLBACK_DIMENSIONS);
        assert_eq!(resolve_dimensions(""), "1024x1024");
    }

    #[test]
    fn labels() {
        assert_eq!(style_label("ghibli"), Some("Ghibli Art"));
        assert_eq!(style_label("3d"), Some("3D"));
        assert_eq!(style_label("nope"), None);
    }

    #[test]
    fn serde_uses_tags() {
        let json = serde_json::to_string(&Style::OilPainting).unwrap();
        assert_eq!(json, "\"oil painting\"");
        let size: SizeKey = serde_json::from_str("\"2:3\"").unwrap();
        assert_eq!(size, SizeKey::Portrait);
    }
}
