//! Gadget configuration knobs.
//!
//! `GadgetConfig` is owned by the gadget surface and handed by reference to the
//! layout engine and the compositing pipeline. Persistence lives elsewhere;
//! this is only the in-memory shape and its defaults.

use std::fmt;
use std::str::FromStr;

use crate::sensor::TemperatureUnit;

/// Font sizes offered by the context menu, in points
pub const FONT_SIZE_PRESETS: [f32; 4] = [6.5, 7.5, 9.0, 11.0];

/// Opacity steps offered by the context menu (0%, 20%, ... 100%)
pub const OPACITY_PRESETS: [u8; 6] = [0, 51, 102, 153, 204, 255];

/// Color of the full-surface tint painted over the background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverColor {
    #[default]
    Black,
    White,
}

impl CoverColor {
    pub fn toggled(self) -> Self {
        match self {
            CoverColor::Black => CoverColor::White,
            CoverColor::White => CoverColor::Black,
        }
    }
}

impl fmt::Display for CoverColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CoverColor::Black => "Black",
            CoverColor::White => "White",
        })
    }
}

impl FromStr for CoverColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Black" => Ok(CoverColor::Black),
            "White" => Ok(CoverColor::White),
            other => Err(format!("Unknown cover color: {}", other)),
        }
    }
}

/// Display language for group and sensor names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Chinese,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::English => "English",
            Language::Chinese => "Chinese",
        })
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "English" => Ok(Language::English),
            "Chinese" => Ok(Language::Chinese),
            other => Err(format!("Unknown language: {}", other)),
        }
    }
}

/// Top-left corner of the gadget window in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GadgetLocation {
    pub x: i32,
    pub y: i32,
}

impl Default for GadgetLocation {
    fn default() -> Self {
        Self { x: 100, y: 100 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GadgetConfig {
    /// Whole-window opacity, applied by the host window
    pub opacity: u8,
    /// Opacity the background image is painted with
    pub background_image_opacity: u8,
    /// Opacity of the tint layer painted over the background every frame
    pub cover_opacity: u8,
    pub cover_color: CoverColor,
    /// Opacity of the dark band behind each group header
    pub hardware_background_opacity: u8,
    /// Opacity of the percentage bars
    pub progress_opacity: u8,
    pub font_size: f32,
    pub show_hardware_names: bool,
    pub always_on_top: bool,
    pub lock_position_and_size: bool,
    /// Color temperature values from the ramp instead of the neutral color
    pub colorful_temperature: bool,
    pub temperature_unit: TemperatureUnit,
    pub language: Language,
    pub location: GadgetLocation,
    /// Persisted width; `None` means the font-derived default width
    pub width: Option<i32>,
}

impl Default for GadgetConfig {
    fn default() -> Self {
        Self {
            opacity: 255,
            background_image_opacity: 255,
            cover_opacity: 255,
            cover_color: CoverColor::default(),
            hardware_background_opacity: 255,
            progress_opacity: 255,
            font_size: 7.5,
            show_hardware_names: true,
            always_on_top: false,
            lock_position_and_size: false,
            colorful_temperature: true,
            temperature_unit: TemperatureUnit::default(),
            language: Language::default(),
            location: GadgetLocation::default(),
            width: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_names_parse_back() {
        for color in [CoverColor::Black, CoverColor::White] {
            assert_eq!(color.to_string().parse::<CoverColor>(), Ok(color));
        }
        assert_eq!("Chinese".parse::<Language>(), Ok(Language::Chinese));
        assert!("Klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_cover_color_toggle() {
        assert_eq!(CoverColor::Black.toggled(), CoverColor::White);
        assert_eq!(CoverColor::White.toggled(), CoverColor::Black);
    }
}
