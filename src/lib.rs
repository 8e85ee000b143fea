//! tsplot - Validated time-series charts
//!
//! Draws one or more time series either stacked on vertically aligned axes
//! sharing the x-axis, or overlaid on a single axis. Every series is drawn as
//! a line or as a stem plot. Figures are shown in a native window or written
//! to an image file whose format follows the path extension.
//!
//! ```no_run
//! use tsplot::{fig_size_cm_to_in, Plotter, RenderOptions, Style, XSeries};
//!
//! let (w, h) = fig_size_cm_to_in(16.0, None);
//! let mut plotter = Plotter::new();
//! plotter.apply_style(&Style::compact(w, h), false);
//!
//! let x: Vec<XSeries> = vec![vec![0.0, 1.0, 2.0].into(), vec![0.0, 1.0, 2.0].into()];
//! let y = vec![vec![1.0, 3.0, 2.0], vec![0.5, 0.0, 1.5]];
//! plotter.render_overlay(
//!     &x,
//!     &y,
//!     &["level", "rain"],
//!     "Station 12",
//!     "m",
//!     &RenderOptions::default().output("/tmp/station_12.png"),
//! )?;
//! # Ok::<(), tsplot::PlotError>(())
//! ```

pub mod charts;
pub mod data;
pub mod gui;
pub mod style;
pub mod units;

use std::path::PathBuf;
use thiserror::Error;

pub use charts::{Backend, Figure, NativeBackend, Panel, Plotter, RenderOptions, Trace, TraceKind};
pub use data::{RenderMode, XSeries};
pub use style::{Baseline, Color, Marker, Palette, Style};
pub use units::fig_size_cm_to_in;

/// Disagreement between the shapes of the arrays describing a series set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeMismatch {
    #[error(
        "arrays must have the same length (x: {x}, y: {y}, legends: {legends}, labels: {labels:?})"
    )]
    SeriesCount {
        x: usize,
        y: usize,
        legends: usize,
        labels: Option<usize>,
    },
    #[error("x, y arrays {index} have different length ({x_len} != {y_len})")]
    SeriesLength {
        index: usize,
        x_len: usize,
        y_len: usize,
    },
}

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("output directory {} does not exist", dir.display())]
    Configuration { dir: PathBuf },
    #[error(transparent)]
    ShapeMismatch(#[from] ShapeMismatch),
    #[error("no series to plot")]
    NoSeries,
    #[error("Render error: {0}")]
    Render(String),
    #[error("Display error: {0}")]
    Display(String),
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid style document: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlotError {
    /// Raised for a bad output location.
    pub fn is_configuration(&self) -> bool {
        matches!(self, PlotError::Configuration { .. })
    }

    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, PlotError::ShapeMismatch(_))
    }
}

pub type Result<T> = std::result::Result<T, PlotError>;
