//! Figure Model
//! Backend-independent description of a chart: panels stacked top to bottom,
//! each holding colored line or stem traces.
//!
//! Builders here expect validated input (see [`crate::data::validate`]).

use crate::data::{RenderMode, XSeries};
use crate::style::{Baseline, Color, LegendLocation, Marker, Style};

/// Fraction of the data range added on each side of an axis.
const AXIS_MARGIN: f64 = 0.05;

/// Title size of the multi-series charts, in points
pub const SERIES_TITLE_PT: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    Line { marker: Marker },
    Stem { marker: Marker, baseline: Baseline },
}

impl TraceKind {
    /// Line without markers, whatever the style's default marker is.
    pub const PLAIN_LINE: TraceKind = TraceKind::Line {
        marker: Marker::None,
    };

    /// Stem with neither marker nor baseline, as used in multi-series charts.
    pub const BARE_STEM: TraceKind = TraceKind::Stem {
        marker: Marker::None,
        baseline: Baseline::Hidden,
    };

    pub fn is_stem(&self) -> bool {
        matches!(self, TraceKind::Stem { .. })
    }

    pub fn marker(&self) -> Marker {
        match *self {
            TraceKind::Line { marker } | TraceKind::Stem { marker, .. } => marker,
        }
    }
}

impl From<RenderMode> for TraceKind {
    fn from(mode: RenderMode) -> Self {
        match mode {
            RenderMode::Line => TraceKind::PLAIN_LINE,
            RenderMode::Stem => TraceKind::BARE_STEM,
        }
    }
}

/// One drawn series.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub label: Option<String>,
    pub color: Color,
    pub kind: TraceKind,
    pub points: Vec<(f64, f64)>,
}

impl Trace {
    fn new(label: Option<String>, color: Color, kind: TraceKind, x: &XSeries, y: &[f64]) -> Self {
        let points = x.coords().into_iter().zip(y.iter().copied()).collect();
        Self {
            label,
            color,
            kind,
            points,
        }
    }

    /// Consecutive finite points; a NaN or infinite value breaks the line.
    pub fn finite_runs(&self) -> Vec<Vec<(f64, f64)>> {
        let mut runs = Vec::new();
        let mut run = Vec::new();
        for &(x, y) in &self.points {
            if x.is_finite() && y.is_finite() {
                run.push((x, y));
            } else if !run.is_empty() {
                runs.push(std::mem::take(&mut run));
            }
        }
        if !run.is_empty() {
            runs.push(run);
        }
        runs
    }
}

/// One set of axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub y_label: String,
    pub traces: Vec<Trace>,
}

impl Panel {
    pub fn has_legend(&self) -> bool {
        self.traces.iter().any(|t| t.label.is_some())
    }

    /// y range of all traces, padded. Stem charts always include the baseline.
    pub fn y_range(&self) -> (f64, f64) {
        let values = self
            .traces
            .iter()
            .flat_map(|t| t.points.iter().map(|&(_, y)| y));
        let stems = self.traces.iter().any(|t| t.kind.is_stem());
        let (lo, hi) = finite_bounds(values);
        let (lo, hi) = match (lo, hi) {
            (Some(lo), Some(hi)) if stems => (lo.min(0.0), hi.max(0.0)),
            (Some(lo), Some(hi)) => (lo, hi),
            _ => (0.0, 1.0),
        };
        pad_range(lo, hi)
    }

    /// Corner of the axes covering the fewest data points. Ties go to the
    /// upper right, then upper left, lower left, lower right.
    pub fn least_crowded_corner(&self, x_range: (f64, f64)) -> LegendLocation {
        const CORNERS: [LegendLocation; 4] = [
            LegendLocation::UpperRight,
            LegendLocation::UpperLeft,
            LegendLocation::LowerLeft,
            LegendLocation::LowerRight,
        ];
        let x_mid = (x_range.0 + x_range.1) / 2.0;
        let (y0, y1) = self.y_range();
        let y_mid = (y0 + y1) / 2.0;

        let mut counts = [0usize; 4];
        for &(x, y) in self.traces.iter().flat_map(|t| t.points.iter()) {
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }
            let corner = match (x >= x_mid, y >= y_mid) {
                (true, true) => 0,
                (false, true) => 1,
                (false, false) => 2,
                (true, false) => 3,
            };
            counts[corner] += 1;
        }

        let mut best = 0;
        for (i, &count) in counts.iter().enumerate() {
            if count < counts[best] {
                best = i;
            }
        }
        CORNERS[best]
    }

    /// Legend placement for this panel under `style`.
    pub fn legend_location(&self, style: &Style, x_range: (f64, f64)) -> LegendLocation {
        match style.legend.location {
            LegendLocation::Best => self.least_crowded_corner(x_range),
            location => location,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAxisKind {
    Numeric,
    Time,
}

/// A complete chart ready to be drawn by a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    /// Title font size in points
    pub title_size: f64,
    pub style: Style,
    pub x_axis: XAxisKind,
    /// Gap between panels relative to the average panel height
    pub spacing: f64,
    pub panels: Vec<Panel>,
}

impl Figure {
    /// One panel per series, sharing the x-axis.
    #[allow(clippy::too_many_arguments)]
    pub fn stacked(
        x: &[XSeries],
        y: &[Vec<f64>],
        legends: &[impl AsRef<str>],
        title: &str,
        y_labels: &[impl AsRef<str>],
        modes: &[RenderMode],
        spacing: f64,
        style: &Style,
    ) -> Self {
        let panels = x
            .iter()
            .zip(y)
            .zip(legends.iter().zip(y_labels))
            .zip(modes)
            .enumerate()
            .map(|(i, (((xs, ys), (legend, label)), mode))| Panel {
                y_label: label.as_ref().to_string(),
                traces: vec![Trace::new(
                    Some(legend.as_ref().to_string()),
                    style.palette.color(i),
                    (*mode).into(),
                    xs,
                    ys,
                )],
            })
            .collect();

        Self {
            title: title.to_string(),
            title_size: SERIES_TITLE_PT,
            style: style.clone(),
            x_axis: x_axis_kind(x),
            spacing,
            panels,
        }
    }

    /// All series as lines on a single panel.
    pub fn overlay(
        x: &[XSeries],
        y: &[Vec<f64>],
        legends: &[impl AsRef<str>],
        title: &str,
        y_label: &str,
        style: &Style,
    ) -> Self {
        let traces = x
            .iter()
            .zip(y)
            .zip(legends)
            .enumerate()
            .map(|(i, ((xs, ys), legend))| {
                Trace::new(
                    Some(legend.as_ref().to_string()),
                    style.palette.color(i),
                    TraceKind::PLAIN_LINE,
                    xs,
                    ys,
                )
            })
            .collect();

        Self {
            title: title.to_string(),
            title_size: SERIES_TITLE_PT,
            style: style.clone(),
            x_axis: x_axis_kind(x),
            spacing: style.subplots.hspace,
            panels: vec![Panel {
                y_label: y_label.to_string(),
                traces,
            }],
        }
    }

    /// A single unlabeled stem series.
    pub fn stem(
        x: &XSeries,
        y: &[f64],
        title: &str,
        y_label: &str,
        marker: Marker,
        baseline: Baseline,
        style: &Style,
    ) -> Self {
        Self {
            title: title.to_string(),
            title_size: style.font.title,
            style: style.clone(),
            x_axis: x_axis_kind(std::slice::from_ref(x)),
            spacing: style.subplots.hspace,
            panels: vec![Panel {
                y_label: y_label.to_string(),
                traces: vec![Trace::new(
                    None,
                    style.palette.color(0),
                    TraceKind::Stem { marker, baseline },
                    x,
                    y,
                )],
            }],
        }
    }

    /// x range shared by every panel, padded.
    pub fn x_range(&self) -> (f64, f64) {
        let values = self
            .panels
            .iter()
            .flat_map(|p| p.traces.iter())
            .flat_map(|t| t.points.iter().map(|&(x, _)| x));
        match finite_bounds(values) {
            (Some(lo), Some(hi)) => pad_range(lo, hi),
            _ => pad_range(0.0, 1.0),
        }
    }

    /// Height of each panel and of the gap between panels when `body`
    /// pixels are shared by all panels: n * panel + (n - 1) * spacing * panel = body.
    pub fn panel_layout(&self, body: f64) -> (f64, f64) {
        let n = self.panels.len().max(1) as f64;
        let spacing = self.spacing.max(0.0);
        let panel = body.max(0.0) / (n + (n - 1.0) * spacing);
        (panel, panel * spacing)
    }

    pub fn is_time_axis(&self) -> bool {
        self.x_axis == XAxisKind::Time
    }

    /// Colors in drawing order.
    pub fn colors(&self) -> Vec<Color> {
        self.panels
            .iter()
            .flat_map(|p| p.traces.iter().map(|t| t.color))
            .collect()
    }

    pub fn trace_kinds(&self) -> Vec<TraceKind> {
        self.panels
            .iter()
            .flat_map(|p| p.traces.iter().map(|t| t.kind))
            .collect()
    }
}

fn x_axis_kind(x: &[XSeries]) -> XAxisKind {
    if !x.is_empty() && x.iter().all(XSeries::is_time) {
        XAxisKind::Time
    } else {
        XAxisKind::Numeric
    }
}

fn finite_bounds(values: impl Iterator<Item = f64>) -> (Option<f64>, Option<f64>) {
    values
        .filter(|v| v.is_finite())
        .fold((None, None), |(lo, hi), v| {
            (
                Some(lo.map_or(v, |lo: f64| lo.min(v))),
                Some(hi.map_or(v, |hi: f64| hi.max(v))),
            )
        })
}

/// Pad a range on both sides; a degenerate range is widened so that the
/// axis still has a non-zero extent.
fn pad_range(lo: f64, hi: f64) -> (f64, f64) {
    if (hi - lo).abs() < f64::EPSILON {
        let delta = if lo.abs() > f64::EPSILON { lo.abs() * 0.05 } else { 1.0 };
        return (lo - delta, hi + delta);
    }
    let pad = (hi - lo) * AXIS_MARGIN;
    (lo - pad, hi + pad)
}
