//! Static Chart Renderer
//! Draws a [`Figure`] with plotters and writes it to disk.
//!
//! Layout, top to bottom:
//! 1. Title band, centered figure title
//! 2. One panel per [`Panel`], separated by `figure.spacing` times the panel height
//! 3. x tick labels under the last panel only (the x-axis is shared)
//!
//! SVG paths use the plotters SVG backend. Every other extension is rendered
//! into an RGB buffer and encoded by the `image` crate.

use crate::charts::figure::{Figure, Panel, Trace, TraceKind};
use crate::data::format_time_label;
use crate::style::{Baseline, LegendLocation, LineDash, Marker, Style, TickDirection};
use crate::{PlotError, Result};
use image::RgbImage;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::{FontDesc, FontStyle, FontTransform, TextStyle};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::debug;

const PAD: u32 = 6;
const RIGHT_MARGIN: u32 = 16;
const TICK_MARK: i32 = 5;
/// Date tick labels lean up to the right, like rotated calendar labels
const DATE_LABEL_ANGLE: f32 = -30.0;

fn font(size: f64) -> TextStyle<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal).into()
}

fn render_err<E: std::fmt::Debug>(e: E) -> PlotError {
    PlotError::Render(format!("{:?}", e))
}

/// Pixel sizes derived from a figure's point sizes.
struct Metrics {
    title: f64,
    rotated_x: bool,
    tick: f64,
    label: f64,
    legend: f64,
    line_width: u32,
    marker: u32,
}

impl Metrics {
    fn new(figure: &Figure) -> Self {
        let style = &figure.style;
        let px = |pt: f64| style.figure.points_to_px(pt);
        Self {
            title: px(figure.title_size),
            rotated_x: figure.is_time_axis(),
            tick: px(style.font.base),
            label: px(style.font.label),
            legend: px(style.legend.font_size),
            line_width: px(style.lines.width).round().max(1.0) as u32,
            marker: (px(style.lines.marker_size) / 2.0).round().max(1.0) as u32,
        }
    }

    fn title_band(&self, style: &Style, height: u32) -> u32 {
        let fitted = self.title * 2.0;
        let requested = (1.0 - style.subplots.top).clamp(0.0, 0.5) * height as f64;
        fitted.max(requested) as u32
    }

    fn x_label_area(&self, style: &Style, height: u32) -> u32 {
        let fitted = if self.rotated_x {
            self.tick * 5.0
        } else {
            self.tick * 2.5
        };
        let requested = style.subplots.bottom.clamp(0.0, 0.5) * height as f64;
        fitted.max(requested) as u32
    }

    fn y_label_area(&self) -> u32 {
        // ~7 tick characters plus the rotated axis description
        (self.tick * 0.6 * 7.0 + self.label * 2.0).clamp(40.0, 160.0) as u32
    }

    fn x_label_style(&self) -> TextStyle<'static> {
        let style = font(self.tick);
        if self.rotated_x {
            style
                .transform(FontTransform::RotateAngle(DATE_LABEL_ANGLE))
                .pos(Pos::new(HPos::Right, VPos::Top))
        } else {
            style
        }
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Save a figure; the format follows the path extension.
    pub fn save(figure: &Figure, path: &Path) -> Result<()> {
        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

        if is_svg {
            let size = figure.style.figure.pixels();
            let root = SVGBackend::new(path, size).into_drawing_area();
            Self::draw(&root, figure)?;
            root.present().map_err(render_err)?;
        } else {
            Self::render_image(figure)?.save(path)?;
        }
        debug!(path = %path.display(), svg = is_svg, "figure written");
        Ok(())
    }

    /// Render a figure into an RGB image of the style's pixel size.
    pub fn render_image(figure: &Figure) -> Result<RgbImage> {
        let (w, h) = figure.style.figure.pixels();
        let mut buf = vec![0u8; w as usize * h as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
            Self::draw(&root, figure)?;
            root.present().map_err(render_err)?;
        }
        RgbImage::from_raw(w, h, buf)
            .ok_or_else(|| PlotError::Render("pixel buffer does not match image size".into()))
    }

    /// Draw a complete figure onto any plotters drawing area.
    pub fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, figure: &Figure) -> Result<()> {
        root.fill(&WHITE).map_err(render_err)?;

        let style = &figure.style;
        let metrics = Metrics::new(figure);
        let (w, h) = root.dim_in_pixel();

        let title_band = metrics.title_band(style, h);
        let x_area = metrics.x_label_area(style, h);

        if !figure.title.is_empty() {
            let title_style = font(metrics.title).pos(Pos::new(HPos::Center, VPos::Center));
            root.draw(&Text::new(
                figure.title.as_str(),
                ((w / 2) as i32, (title_band / 2) as i32),
                title_style,
            ))
            .map_err(render_err)?;
        }

        let body = h.saturating_sub(title_band + x_area + PAD) as f64;
        let (panel_h, gap) = figure.panel_layout(body);

        let x_range = figure.x_range();
        let last = figure.panels.len().saturating_sub(1);
        for (i, panel) in figure.panels.iter().enumerate() {
            let top = title_band as f64 + i as f64 * (panel_h + gap);
            let height = if i == last {
                panel_h + x_area as f64
            } else {
                panel_h
            };
            let area = root
                .clone()
                .shrink((0u32, top.round() as u32), (w, height.round().max(1.0) as u32));
            let panel_x_area = if i == last { x_area } else { 0 };
            Self::draw_panel(&area, figure, panel, x_range, panel_x_area, &metrics)?;
        }
        Ok(())
    }

    fn draw_panel<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        figure: &Figure,
        panel: &Panel,
        x_range: (f64, f64),
        x_area: u32,
        metrics: &Metrics,
    ) -> Result<()> {
        let style = &figure.style;
        let (x0, x1) = x_range;
        let (y0, y1) = panel.y_range();
        let (_, h) = area.dim_in_pixel();

        let mut builder = ChartBuilder::on(area);
        builder
            .margin_top(PAD)
            .margin_right(RIGHT_MARGIN)
            .x_label_area_size(x_area.min(h / 2))
            .y_label_area_size(metrics.y_label_area());
        if style.ticks.top {
            builder.top_x_label_area_size((metrics.tick * 2.0) as u32);
        }
        if style.ticks.right {
            builder.right_y_label_area_size(metrics.y_label_area());
        }
        let mut chart = builder
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(render_err)?;

        let span = x1 - x0;
        let time_axis = figure.is_time_axis();
        let x_fmt = move |v: &f64| {
            if time_axis {
                format_time_label(*v, span)
            } else {
                format_number(*v)
            }
        };
        let y_fmt = |v: &f64| format_number(*v);

        let tick = match style.ticks.direction {
            TickDirection::Out | TickDirection::InOut => TICK_MARK,
            TickDirection::In => -TICK_MARK,
        };

        let mut mesh = chart.configure_mesh();
        mesh.y_desc(panel.y_label.as_str())
            .x_labels(6)
            .y_labels(5)
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .label_style(font(metrics.tick))
            .x_label_style(metrics.x_label_style())
            .axis_desc_style(font(metrics.label))
            .set_tick_mark_size(LabelAreaPosition::Left, tick)
            .set_tick_mark_size(LabelAreaPosition::Bottom, tick);
        if style.axes.grid {
            mesh.bold_line_style(&BLACK.mix(0.15))
                .light_line_style(&WHITE);
        } else {
            mesh.disable_mesh();
        }
        mesh.draw().map_err(render_err)?;

        for trace in &panel.traces {
            Self::draw_trace(&mut chart, trace, x_range, style, metrics)?;
        }

        // Spines not drawn by the mesh
        if style.axes.spine_top {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x0, y1), (x1, y1)],
                    BLACK.stroke_width(1),
                )))
                .map_err(render_err)?;
        }
        if style.axes.spine_right {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x1, y0), (x1, y1)],
                    BLACK.stroke_width(1),
                )))
                .map_err(render_err)?;
        }

        if panel.has_legend() {
            let alpha = style.legend.frame_alpha.clamp(0.0, 1.0);
            chart
                .configure_series_labels()
                .position(series_label_position(
                    panel.legend_location(style, x_range),
                ))
                .label_font(font(metrics.legend))
                .background_style(&WHITE.mix(alpha))
                .border_style(&BLACK.mix(alpha * 0.5))
                .draw()
                .map_err(render_err)?;
        }
        Ok(())
    }

    fn draw_trace<DB: DrawingBackend>(
        chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        trace: &Trace,
        x_range: (f64, f64),
        style: &Style,
        metrics: &Metrics,
    ) -> Result<()> {
        let color = RGBColor::from(trace.color);
        let stroke = color.stroke_width(metrics.line_width);
        let points: Vec<(f64, f64)> = trace
            .points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();

        match trace.kind {
            TraceKind::Line { marker } => {
                for (i, run) in trace.finite_runs().into_iter().enumerate() {
                    let anno = match style.lines.dash {
                        LineDash::Solid => chart
                            .draw_series(LineSeries::new(run, stroke))
                            .map_err(render_err)?,
                        LineDash::Dashed => chart
                            .draw_series(DashedLineSeries::new(
                                run,
                                metrics.line_width * 6,
                                metrics.line_width * 3,
                                stroke,
                            ))
                            .map_err(render_err)?,
                        LineDash::Dotted => chart
                            .draw_series(DashedLineSeries::new(
                                run,
                                metrics.line_width,
                                metrics.line_width * 2,
                                stroke,
                            ))
                            .map_err(render_err)?,
                    };
                    // one legend entry per trace
                    if let (0, Some(label)) = (i, &trace.label) {
                        anno.label(label.as_str()).legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], stroke)
                        });
                    }
                }
                Self::draw_markers(chart, &points, marker, color, metrics.marker)?;
            }
            TraceKind::Stem { marker, baseline } => {
                if baseline != Baseline::Hidden && !points.is_empty() {
                    Self::draw_baseline(chart, baseline, x_range, style, metrics)?;
                }
                let anno = chart
                    .draw_series(
                        points
                            .iter()
                            .map(|&(x, y)| PathElement::new(vec![(x, 0.0), (x, y)], stroke)),
                    )
                    .map_err(render_err)?;
                if let Some(label) = &trace.label {
                    anno.label(label.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x + 10, y - 6), (x + 10, y + 6)], stroke)
                    });
                }
                Self::draw_markers(chart, &points, marker, color, metrics.marker)?;
            }
        }
        Ok(())
    }

    fn draw_baseline<DB: DrawingBackend>(
        chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        baseline: Baseline,
        x_range: (f64, f64),
        style: &Style,
        metrics: &Metrics,
    ) -> Result<()> {
        // Baselines use the fourth palette color
        let color = RGBColor::from(style.palette.color(3));
        let stroke = color.stroke_width(metrics.line_width);
        let ends = vec![(x_range.0, 0.0), (x_range.1, 0.0)];
        match baseline {
            Baseline::Hidden => {}
            Baseline::Solid => {
                chart
                    .draw_series(LineSeries::new(ends, stroke))
                    .map_err(render_err)?;
            }
            Baseline::Dashed => {
                chart
                    .draw_series(DashedLineSeries::new(
                        ends,
                        metrics.line_width * 6,
                        metrics.line_width * 3,
                        stroke,
                    ))
                    .map_err(render_err)?;
            }
            Baseline::Dotted => {
                chart
                    .draw_series(DashedLineSeries::new(
                        ends,
                        metrics.line_width,
                        metrics.line_width * 2,
                        stroke,
                    ))
                    .map_err(render_err)?;
            }
        }
        Ok(())
    }

    fn draw_markers<DB: DrawingBackend>(
        chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        points: &[(f64, f64)],
        marker: Marker,
        color: RGBColor,
        size: u32,
    ) -> Result<()> {
        let s = size as i32;
        let filled = color.filled();
        let stroke = color.stroke_width(1);
        match marker {
            Marker::None => {}
            Marker::Point => {
                chart
                    .draw_series(
                        points
                            .iter()
                            .map(|&p| Circle::new(p, (size / 2).max(1), filled)),
                    )
                    .map_err(render_err)?;
            }
            Marker::Circle => {
                chart
                    .draw_series(points.iter().map(|&p| Circle::new(p, size, filled)))
                    .map_err(render_err)?;
            }
            Marker::Square => {
                chart
                    .draw_series(points.iter().map(|&p| {
                        EmptyElement::at(p) + Rectangle::new([(-s, -s), (s, s)], filled)
                    }))
                    .map_err(render_err)?;
            }
            Marker::Triangle => {
                chart
                    .draw_series(points.iter().map(|&p| TriangleMarker::new(p, size, filled)))
                    .map_err(render_err)?;
            }
            Marker::Cross => {
                chart
                    .draw_series(points.iter().map(|&p| Cross::new(p, size, stroke)))
                    .map_err(render_err)?;
            }
            Marker::Plus => {
                chart
                    .draw_series(points.iter().map(|&p| {
                        EmptyElement::at(p)
                            + PathElement::new(vec![(-s, 0), (s, 0)], stroke)
                            + PathElement::new(vec![(0, -s), (0, s)], stroke)
                    }))
                    .map_err(render_err)?;
            }
        }
        Ok(())
    }
}

fn series_label_position(location: LegendLocation) -> SeriesLabelPosition {
    match location {
        LegendLocation::Best | LegendLocation::UpperRight => SeriesLabelPosition::UpperRight,
        LegendLocation::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendLocation::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendLocation::LowerRight => SeriesLabelPosition::LowerRight,
        LegendLocation::UpperCenter => SeriesLabelPosition::UpperMiddle,
        LegendLocation::LowerCenter => SeriesLabelPosition::LowerMiddle,
        LegendLocation::CenterLeft => SeriesLabelPosition::MiddleLeft,
        LegendLocation::CenterRight => SeriesLabelPosition::MiddleRight,
        LegendLocation::Center => SeriesLabelPosition::MiddleMiddle,
    }
}

/// Short tick label: plain decimals for moderate magnitudes, scientific
/// notation otherwise.
fn format_number(v: f64) -> String {
    let a = v.abs();
    if a != 0.0 && !(1e-3..1e5).contains(&a) {
        return format!("{:.1e}", v);
    }
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::XSeries;

    #[test]
    fn tick_numbers() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-1.0), "-1");
        assert_eq!(format_number(0.12345), "0.123");
        assert_eq!(format_number(-0.0001), "-1.0e-4");
        assert_eq!(format_number(250000.0), "2.5e5");
    }

    #[test]
    fn legend_positions() {
        assert!(matches!(
            series_label_position(LegendLocation::LowerCenter),
            SeriesLabelPosition::LowerMiddle
        ));
        assert!(matches!(
            series_label_position(LegendLocation::Best),
            SeriesLabelPosition::UpperRight
        ));
    }

    #[test]
    fn compact_metrics() {
        let style = Style::compact(6.4, 4.8);
        let x = vec![XSeries::from(vec![0.0, 1.0])];
        let fig = Figure::stem(&x[0], &[1.0, 2.0], "t", "y", Marker::None, Baseline::Hidden, &style);
        let m = Metrics::new(&fig);
        // 9 pt at 80 dpi
        assert!((m.title - 10.0).abs() < 1e-9);
        assert_eq!(m.line_width, 1);
        assert!(m.y_label_area() >= 40);
    }

    #[test]
    fn series_title_and_date_labels() {
        let style = Style::default();
        let day = |d| {
            chrono::NaiveDate::from_ymd_opt(2024, 1, d)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap()
        };
        let dates = XSeries::from(vec![day(1), day(2), day(3)]);
        let numbers = XSeries::from(vec![0.0, 1.0, 2.0]);
        let y = vec![vec![1.0, 2.0, 3.0]];

        let timed = Metrics::new(&Figure::overlay(&[dates], &y, &["a"], "t", "y", &style));
        let plain = Metrics::new(&Figure::overlay(&[numbers], &y, &["a"], "t", "y", &style));

        // 9 pt at 100 dpi
        assert!((plain.title - 12.5).abs() < 1e-9);
        assert!(timed.rotated_x && !plain.rotated_x);
        assert!(timed.x_label_area(&style, 480) > plain.x_label_area(&style, 480));
    }
}
