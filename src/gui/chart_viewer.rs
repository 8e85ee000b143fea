//! Chart Viewer Widget
//! Scrollable window listing every open figure, drawn with egui_plot.
//! Stacked panels share the x range of their figure.

use crate::charts::{Figure, Panel, Trace, TraceKind};
use crate::data::format_time_label;
use crate::style::{Baseline, LegendLocation, LineDash, Marker, Style};
use egui::{Color32, RichText, ScrollArea};
use egui_plot::{Corner, HLine, Legend, Line, LineStyle as Dash, MarkerShape, Plot, PlotPoints, PlotUi, Points};

/// Vertical space between figures
const CHART_SPACING: f32 = 15.0;

/// egui points per typographic point (egui lays out at 96 logical dpi)
const PT: f32 = 96.0 / 72.0;

/// Window content: one card per figure.
pub struct ChartViewer {
    pub figures: Vec<Figure>,
}

impl ChartViewer {
    pub fn new(figures: Vec<Figure>) -> Self {
        Self { figures }
    }

    /// Draw the figure list
    pub fn show(&self, ui: &mut egui::Ui) {
        if self.figures.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (idx, figure) in self.figures.iter().enumerate() {
                    Self::draw_figure(ui, idx, figure);
                    ui.add_space(CHART_SPACING);
                }
            });
    }

    fn draw_figure(ui: &mut egui::Ui, idx: usize, figure: &Figure) {
        let style = &figure.style;
        let (_, fig_h) = style.figure.pixels();
        let title_size = figure.title_size as f32 * PT;

        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&figure.title).size(title_size).strong());
        });

        let body = (fig_h as f32 - title_size * 2.0).max(80.0);
        let (panel_h, gap) = figure.panel_layout(body as f64);
        let x_range = figure.x_range();
        let last = figure.panels.len().saturating_sub(1);

        for (i, panel) in figure.panels.iter().enumerate() {
            if i > 0 {
                ui.add_space(gap as f32);
            }
            Self::draw_panel(
                ui,
                format!("figure_{}_panel_{}", idx, i),
                figure,
                panel,
                x_range,
                panel_h as f32,
                i == last,
            );
        }
    }

    fn draw_panel(
        ui: &mut egui::Ui,
        id: String,
        figure: &Figure,
        panel: &Panel,
        x_range: (f64, f64),
        height: f32,
        with_x_axis: bool,
    ) {
        let style = &figure.style;
        let (x0, x1) = x_range;
        let span = x1 - x0;

        let mut plot = Plot::new(id)
            .height(height)
            .y_axis_label(panel.y_label.as_str())
            .include_x(x0)
            .include_x(x1)
            .show_grid(style.axes.grid)
            .show_axes([with_x_axis, true])
            .allow_scroll(false);

        if panel.has_legend() {
            plot = plot.legend(
                Legend::default()
                    .position(legend_corner(panel.legend_location(style, x_range)))
                    .background_alpha(style.legend.frame_alpha as f32),
            );
        }
        if figure.is_time_axis() {
            plot = plot.x_axis_formatter(move |mark, _range| format_time_label(mark.value, span));
        }

        plot.show(ui, |plot_ui| {
            for trace in &panel.traces {
                Self::draw_trace(plot_ui, trace, style);
            }
        });
    }

    fn draw_trace(plot_ui: &mut PlotUi, trace: &Trace, style: &Style) {
        let color: Color32 = trace.color.into();
        let width = style.lines.width as f32 * PT;
        let name = trace.label.clone().unwrap_or_default();

        match trace.kind {
            TraceKind::Line { marker } => {
                let dash = match style.lines.dash {
                    LineDash::Solid => Dash::Solid,
                    LineDash::Dashed => Dash::dashed_dense(),
                    LineDash::Dotted => Dash::dotted_dense(),
                };
                for run in trace.finite_runs() {
                    let points: PlotPoints = run.into_iter().map(|(x, y)| [x, y]).collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(color)
                            .width(width)
                            .style(dash)
                            .name(&name),
                    );
                }
                Self::draw_markers(plot_ui, trace, marker, style, &name);
            }
            TraceKind::Stem { marker, baseline } => {
                if let Some(dash) = baseline_dash(baseline) {
                    let base_color: Color32 = style.palette.color(3).into();
                    plot_ui.hline(HLine::new(0.0).color(base_color).width(width).style(dash));
                }
                for &(x, y) in &trace.points {
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![[x, 0.0], [x, y]]))
                            .color(color)
                            .width(width)
                            .name(&name),
                    );
                }
                Self::draw_markers(plot_ui, trace, marker, style, &name);
            }
        }
    }

    fn draw_markers(plot_ui: &mut PlotUi, trace: &Trace, marker: Marker, style: &Style, name: &str) {
        let Some(shape) = marker_shape(marker) else {
            return;
        };
        let mut radius = style.lines.marker_size as f32 * PT / 2.0;
        if marker == Marker::Point {
            radius /= 2.0;
        }
        let points: PlotPoints = trace
            .points
            .iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|&(x, y)| [x, y])
            .collect();
        plot_ui.points(
            Points::new(points)
                .shape(shape)
                .radius(radius)
                .filled(true)
                .color(Color32::from(trace.color))
                .name(name),
        );
    }
}

impl eframe::App for ChartViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::WHITE).inner_margin(8.0))
            .show(ctx, |ui| self.show(ui));
    }
}

fn legend_corner(location: LegendLocation) -> Corner {
    match location {
        LegendLocation::UpperLeft | LegendLocation::CenterLeft => Corner::LeftTop,
        LegendLocation::LowerLeft => Corner::LeftBottom,
        LegendLocation::LowerRight | LegendLocation::LowerCenter => Corner::RightBottom,
        _ => Corner::RightTop,
    }
}

fn marker_shape(marker: Marker) -> Option<MarkerShape> {
    match marker {
        Marker::None => None,
        Marker::Point | Marker::Circle => Some(MarkerShape::Circle),
        Marker::Square => Some(MarkerShape::Square),
        Marker::Triangle => Some(MarkerShape::Up),
        Marker::Cross => Some(MarkerShape::Cross),
        Marker::Plus => Some(MarkerShape::Plus),
    }
}

fn baseline_dash(baseline: Baseline) -> Option<Dash> {
    match baseline {
        Baseline::Hidden => None,
        Baseline::Solid => Some(Dash::Solid),
        Baseline::Dashed => Some(Dash::dashed_dense()),
        Baseline::Dotted => Some(Dash::dotted_dense()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners() {
        assert_eq!(legend_corner(LegendLocation::UpperLeft), Corner::LeftTop);
        assert_eq!(legend_corner(LegendLocation::Best), Corner::RightTop);
        assert_eq!(legend_corner(LegendLocation::LowerRight), Corner::RightBottom);
    }

    #[test]
    fn suppressed_styling_draws_nothing_extra() {
        assert!(marker_shape(Marker::None).is_none());
        assert!(baseline_dash(Baseline::Hidden).is_none());
        assert_eq!(marker_shape(Marker::Triangle), Some(MarkerShape::Up));
        assert_eq!(baseline_dash(Baseline::Solid), Some(Dash::Solid));
    }
}
