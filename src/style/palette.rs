//! Series colors
//!
//! Colors are taken from an explicit palette by series index instead of an
//! implicit color cycle, so a figure can be rebuilt with identical colors.

use egui::Color32;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Color representation (RGB, 0-255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color(r, g, b))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::hex(&value).ok_or_else(|| format!("invalid color {value:?}, expected #rrggbb"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl From<Color> for RGBColor {
    fn from(c: Color) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

impl From<Color> for Color32 {
    fn from(c: Color) -> Self {
        Color32::from_rgb(c.0, c.1, c.2)
    }
}

/// Ten-color category palette
pub const CATEGORY10: [Color; 10] = [
    Color(0x1f, 0x77, 0xb4), // Blue
    Color(0xff, 0x7f, 0x0e), // Orange
    Color(0x2c, 0xa0, 0x2c), // Green
    Color(0xd6, 0x27, 0x28), // Red
    Color(0x94, 0x67, 0xbd), // Purple
    Color(0x8c, 0x56, 0x4b), // Brown
    Color(0xe3, 0x77, 0xc2), // Pink
    Color(0x7f, 0x7f, 0x7f), // Gray
    Color(0xbc, 0xbd, 0x22), // Olive
    Color(0x17, 0xbe, 0xcf), // Cyan
];

/// Indexable color sequence; indices wrap around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<Color>);

impl Default for Palette {
    fn default() -> Self {
        Self(CATEGORY10.to_vec())
    }
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self(colors)
    }

    /// Color for series `index`. An empty palette draws everything black.
    pub fn color(&self, index: usize) -> Color {
        if self.0.is_empty() {
            return Color::BLACK;
        }
        self.0[index % self.0.len()]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
