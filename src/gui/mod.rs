//! GUI module - Interactive figure window

mod chart_viewer;

pub use chart_viewer::ChartViewer;

use crate::charts::Figure;
use crate::{PlotError, Result};
use eframe::egui;

/// Window height is capped; taller figure lists scroll
const MAX_WINDOW_HEIGHT: f32 = 900.0;

/// Open one blocking window showing every figure, top to bottom.
pub fn show_figures(figures: &[Figure]) -> Result<()> {
    if figures.is_empty() {
        return Ok(());
    }

    let (width, height) = window_size(figures);
    let title = figures
        .iter()
        .map(|f| f.title.as_str())
        .find(|t| !t.is_empty())
        .unwrap_or("tsplot")
        .to_string();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([320.0, 240.0])
            .with_title(title.clone()),
        ..Default::default()
    };

    let viewer = ChartViewer::new(figures.to_vec());
    eframe::run_native(&title, options, Box::new(move |_cc| Ok(Box::new(viewer))))
        .map_err(|e| PlotError::Display(e.to_string()))
}

fn window_size(figures: &[Figure]) -> (f32, f32) {
    let mut width = 0.0f32;
    let mut height = 0.0f32;
    for figure in figures {
        let (w, h) = figure.style.figure.pixels();
        width = width.max(w as f32 + 32.0);
        height += h as f32 + 48.0;
    }
    (width, height.min(MAX_WINDOW_HEIGHT))
}
