//! Style module - Figure, axes, line and legend defaults
//!
//! A [`Style`] is a plain value. The [`Plotter`](crate::Plotter) holds the
//! active one and every figure it builds keeps a copy, so rendering never
//! depends on hidden global state.

mod palette;

pub use palette::{Color, Palette, CATEGORY10};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Tick mark direction relative to the axes frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickDirection {
    In,
    #[default]
    Out,
    InOut,
}

/// Dash pattern of line series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDash {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Point marker shape. `None` draws no marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    #[default]
    None,
    Point,
    Circle,
    Square,
    Triangle,
    Cross,
    Plus,
}

impl FromStr for Marker {
    type Err = String;

    /// Parse a one-character format code: `" "` (none), `.`, `o`, `s`, `^`, `x`, `+`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Marker::None),
            "." => Ok(Marker::Point),
            "o" => Ok(Marker::Circle),
            "s" => Ok(Marker::Square),
            "^" => Ok(Marker::Triangle),
            "x" => Ok(Marker::Cross),
            "+" => Ok(Marker::Plus),
            other => Err(format!("unknown marker format {other:?}")),
        }
    }
}

/// Horizontal line drawn at y = 0 under stem plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Baseline {
    Hidden,
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl FromStr for Baseline {
    type Err = String;

    /// Parse a line format code: `" "` (hidden), `-`, `--`, `:`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Baseline::Hidden),
            "-" => Ok(Baseline::Solid),
            "--" => Ok(Baseline::Dashed),
            ":" => Ok(Baseline::Dotted),
            other => Err(format!("unknown baseline format {other:?}")),
        }
    }
}

/// Legend placement inside the axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendLocation {
    #[default]
    Best,
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
    UpperCenter,
    LowerCenter,
    CenterLeft,
    CenterRight,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureStyle {
    /// Width and height in inches
    pub size: (f64, f64),
    pub dpi: f64,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            size: (6.4, 4.8),
            dpi: 100.0,
        }
    }
}

impl FigureStyle {
    /// Pixel dimensions of the figure.
    pub fn pixels(&self) -> (u32, u32) {
        let w = (self.size.0 * self.dpi).round().max(1.0) as u32;
        let h = (self.size.1 * self.dpi).round().max(1.0) as u32;
        (w, h)
    }

    /// Convert a font size in points to pixels.
    pub fn points_to_px(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }
}

/// Font sizes in points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    pub base: f64,
    pub label: f64,
    pub title: f64,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            base: 10.0,
            label: 10.0,
            title: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesStyle {
    pub grid: bool,
    pub spine_top: bool,
    pub spine_right: bool,
}

impl Default for AxesStyle {
    fn default() -> Self {
        Self {
            grid: false,
            spine_top: true,
            spine_right: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickStyle {
    pub direction: TickDirection,
    pub top: bool,
    pub right: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub width: f64,
    pub dash: LineDash,
    pub marker: Marker,
    pub marker_size: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: 1.5,
            dash: LineDash::Solid,
            marker: Marker::None,
            marker_size: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendStyle {
    pub font_size: f64,
    pub frame_alpha: f64,
    pub location: LegendLocation,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            frame_alpha: 0.8,
            location: LegendLocation::Best,
        }
    }
}

/// Spacing between and around subplots, as fractions of the figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubplotSpacing {
    /// Vertical gap between axes, relative to the average axes height
    pub hspace: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Default for SubplotSpacing {
    fn default() -> Self {
        Self {
            hspace: 0.2,
            bottom: 0.11,
            top: 0.88,
        }
    }
}

/// Rendering defaults shared by every chart drawn with the same plotter.
///
/// `Style::default()` holds the library defaults. Every field has a serde
/// default, so a JSON document only needs the options it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub figure: FigureStyle,
    pub font: FontSizes,
    pub axes: AxesStyle,
    pub ticks: TickStyle,
    pub lines: LineStyle,
    pub legend: LegendStyle,
    pub subplots: SubplotSpacing,
    pub palette: Palette,
}

impl Style {
    /// Compact report style: small fonts, grid, open frame.
    pub fn compact(x_in: f64, y_in: f64) -> Self {
        Self {
            figure: FigureStyle {
                size: (x_in, y_in),
                dpi: 80.0,
            },
            font: FontSizes {
                base: 8.0,
                label: 8.0,
                title: 9.0,
            },
            axes: AxesStyle {
                grid: true,
                spine_top: false,
                spine_right: false,
            },
            ticks: TickStyle {
                direction: TickDirection::Out,
                top: false,
                right: false,
            },
            lines: LineStyle {
                width: 0.8,
                dash: LineDash::Solid,
                marker: Marker::Point,
                marker_size: 4.0,
            },
            legend: LegendStyle {
                font_size: 8.0,
                frame_alpha: 0.5,
                location: LegendLocation::Best,
            },
            subplots: SubplotSpacing {
                hspace: 0.1,
                bottom: 0.16,
                top: 0.87,
            },
            palette: Palette::default(),
        }
    }

    pub fn with_subplot_spacing(mut self, hspace: f64, bottom: f64, top: f64) -> Self {
        self.subplots = SubplotSpacing { hspace, bottom, top };
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Parse a (possibly partial) JSON style document.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let style = Style::from_json_str(
            r#"{ "font": { "title": 14 }, "axes": { "grid": true }, "legend": { "location": "upper_left" } }"#,
        )
        .unwrap();
        assert_eq!(style.font.title, 14.0);
        assert_eq!(style.font.base, 10.0);
        assert!(style.axes.grid);
        assert!(style.axes.spine_top);
        assert_eq!(style.legend.location, LegendLocation::UpperLeft);
        assert_eq!(style.figure, FigureStyle::default());
    }

    #[test]
    fn json_round_trips_compact_preset() {
        let style = Style::compact(5.0, 3.0);
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(Style::from_json_str(&json).unwrap(), style);
    }

    #[test]
    fn bad_json_is_an_error() {
        let err = Style::from_json_str(r#"{ "ticks": { "direction": "sideways" } }"#).unwrap_err();
        assert!(matches!(err, crate::PlotError::Json(_)));
    }

    #[test]
    fn missing_style_file_is_io_error() {
        let err = Style::from_json_file("/nonexistent/tsplot/style.json").unwrap_err();
        assert!(matches!(err, crate::PlotError::Io(_)));
    }

    #[test]
    fn figure_pixels_follow_dpi() {
        assert_eq!(FigureStyle::default().pixels(), (640, 480));
        assert_eq!(Style::compact(10.0, 5.0).figure.pixels(), (800, 400));
    }

    #[test]
    fn format_codes() {
        assert_eq!(" ".parse::<Marker>(), Ok(Marker::None));
        assert_eq!("o".parse::<Marker>(), Ok(Marker::Circle));
        assert!("?".parse::<Marker>().is_err());
        assert_eq!(" ".parse::<Baseline>(), Ok(Baseline::Hidden));
        assert_eq!("--".parse::<Baseline>(), Ok(Baseline::Dashed));
    }

    #[test]
    fn subplot_spacing_builder() {
        let style = Style::default().with_subplot_spacing(0.3, 0.2, 0.9);
        assert_eq!(style.subplots.hspace, 0.3);
        assert_eq!(style.subplots.bottom, 0.2);
        assert_eq!(style.subplots.top, 0.9);
    }
}
