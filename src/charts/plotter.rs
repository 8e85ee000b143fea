//! Chart Plotter Module
//! Validates series sets, builds figures and hands them to a backend for
//! display or export.

use crate::charts::figure::Figure;
use crate::charts::StaticChartRenderer;
use crate::data::validate::{check_output_dir, check_series_count, check_series_lengths};
use crate::data::{resolve_modes, RenderMode, XSeries};
use crate::style::{Baseline, Marker, Style};
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[cfg(test)]
use mockall::automock;

/// Where finished figures go.
#[cfg_attr(test, automock)]
pub trait Backend {
    /// Display every open figure, blocking until the viewer is closed.
    fn show(&mut self, figures: &[Figure]) -> Result<()>;

    /// Write one figure to `path`; the format follows the extension.
    fn save(&mut self, figure: &Figure, path: &Path) -> Result<()>;
}

/// Native window for display, static renderer for files.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeBackend;

impl Backend for NativeBackend {
    fn show(&mut self, figures: &[Figure]) -> Result<()> {
        crate::gui::show_figures(figures)
    }

    fn save(&mut self, figure: &Figure, path: &Path) -> Result<()> {
        StaticChartRenderer::save(figure, path)
    }
}

/// Per-call options shared by the multi-series charts.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Gap between stacked axes, relative to the average axes height
    pub spacing: f64,
    /// Close figures left open by earlier calls before drawing
    pub reset_first: bool,
    /// Save here instead of displaying
    pub output: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            spacing: 0.1,
            reset_first: true,
            output: None,
        }
    }
}

impl RenderOptions {
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn reset_first(mut self, reset_first: bool) -> Self {
        self.reset_first = reset_first;
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }
}

/// Drawing context: the active style, the figures still open and the
/// backend that displays or saves them.
pub struct Plotter<B: Backend = NativeBackend> {
    style: Style,
    open: Vec<Figure>,
    backend: B,
}

impl Default for Plotter<NativeBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl Plotter<NativeBackend> {
    pub fn new() -> Self {
        Self::with_backend(NativeBackend)
    }
}

impl<B: Backend> Plotter<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            style: Style::default(),
            open: Vec::new(),
            backend,
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Replace the active style. With `use_library_defaults` the library
    /// defaults are restored and `config` is ignored.
    pub fn apply_style(&mut self, config: &Style, use_library_defaults: bool) {
        self.style = if use_library_defaults {
            Style::default()
        } else {
            config.clone()
        };
        debug!(defaults = use_library_defaults, "style applied");
    }

    /// Figures drawn but not yet displayed.
    pub fn open_figures(&self) -> &[Figure] {
        &self.open
    }

    pub fn close_all(&mut self) {
        self.open.clear();
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Draw n series on n vertically stacked axes sharing the x-axis.
    ///
    /// `modes` selects line or stem drawing per series; when it is missing
    /// or its length differs from `legends`, every series is a line except
    /// the last, which is a stem.
    #[allow(clippy::too_many_arguments)]
    pub fn render_stacked(
        &mut self,
        x: &[XSeries],
        y: &[Vec<f64>],
        legends: &[impl AsRef<str>],
        title: &str,
        y_labels: &[impl AsRef<str>],
        modes: Option<&[RenderMode]>,
        options: &RenderOptions,
    ) -> Result<()> {
        check_output_dir(options.output.as_deref())?;
        check_series_count(x.len(), y.len(), legends.len(), Some(y_labels.len()))?;
        check_series_lengths(x, y)?;

        let modes = resolve_modes(modes, legends.len());
        debug!(series = x.len(), ?modes, "stacked chart");

        if options.reset_first {
            self.close_all();
        }
        let figure = Figure::stacked(
            x,
            y,
            legends,
            title,
            y_labels,
            &modes,
            options.spacing,
            &self.style,
        );
        self.finish(figure, options.output.as_deref())
    }

    /// Draw n series as lines on a single axis with one shared y label.
    pub fn render_overlay(
        &mut self,
        x: &[XSeries],
        y: &[Vec<f64>],
        legends: &[impl AsRef<str>],
        title: &str,
        y_label: &str,
        options: &RenderOptions,
    ) -> Result<()> {
        check_output_dir(options.output.as_deref())?;
        check_series_count(x.len(), y.len(), legends.len(), None)?;
        check_series_lengths(x, y)?;
        debug!(series = x.len(), "overlay chart");

        if options.reset_first {
            self.close_all();
        }
        let figure = Figure::overlay(x, y, legends, title, y_label, &self.style);
        self.finish(figure, options.output.as_deref())
    }

    /// Draw one series as a stem chart and display it.
    #[allow(clippy::too_many_arguments)]
    pub fn stem_single(
        &mut self,
        x: &XSeries,
        y: &[f64],
        title: &str,
        y_label: &str,
        marker: Marker,
        baseline: Baseline,
        reset_first: bool,
    ) -> Result<()> {
        check_series_lengths(std::slice::from_ref(x), &[y.to_vec()])?;

        if reset_first {
            self.close_all();
        }
        let figure = Figure::stem(x, y, title, y_label, marker, baseline, &self.style);
        self.finish(figure, None)
    }

    fn finish(&mut self, figure: Figure, output: Option<&Path>) -> Result<()> {
        match output {
            Some(path) => {
                self.backend.save(&figure, path)?;
                self.open.push(figure);
                info!(path = %path.display(), "chart saved");
                Ok(())
            }
            None => {
                self.open.push(figure);
                info!(figures = self.open.len(), "showing charts");
                let shown = self.backend.show(&self.open);
                self.open.clear();
                shown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::TraceKind;
    use crate::{PlotError, ShapeMismatch};

    fn xs(n: usize) -> XSeries {
        XSeries::from((0..n).map(|i| i as f64).collect::<Vec<_>>())
    }

    fn ys(n: usize) -> Vec<f64> {
        (0..n).map(|i| (i as f64).sin()).collect()
    }

    /// A mock that fails the test on any call.
    fn untouched() -> MockBackend {
        let mut mock = MockBackend::new();
        mock.expect_show().never();
        mock.expect_save().never();
        mock
    }

    #[test]
    fn stacked_outer_length_mismatch_draws_nothing() {
        let mut plotter = Plotter::with_backend(untouched());
        let err = plotter
            .render_stacked(
                &[xs(3), xs(3)],
                &[ys(3), ys(3)],
                &["a", "b", "c"],
                "t",
                &["ya", "yb"],
                None,
                &RenderOptions::default(),
            )
            .unwrap_err();
        assert!(err.is_shape_mismatch());
        assert!(plotter.open_figures().is_empty());
    }

    #[test]
    fn stacked_series_length_mismatch_names_index() {
        let mut plotter = Plotter::with_backend(untouched());
        let err = plotter
            .render_stacked(
                &[xs(5), xs(4)],
                &[ys(4), ys(4)],
                &["a", "b"],
                "t",
                &["ya", "yb"],
                None,
                &RenderOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            PlotError::ShapeMismatch(ShapeMismatch::SeriesLength { index: 0, .. })
        ));
    }

    #[test]
    fn overlay_series_length_mismatch_names_index() {
        let mut plotter = Plotter::with_backend(untouched());
        let err = plotter
            .render_overlay(
                &[xs(3), xs(3), xs(4)],
                &[ys(3), ys(3), ys(3)],
                &["a", "b", "c"],
                "t",
                "y",
                &RenderOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            PlotError::ShapeMismatch(ShapeMismatch::SeriesLength {
                index: 2,
                x_len: 4,
                y_len: 3
            })
        ));
        assert!(plotter.open_figures().is_empty());
    }

    #[test]
    fn failed_save_leaves_no_open_figure() {
        let out = std::env::temp_dir().join("tsplot_failed_save.png");
        let mut mock = MockBackend::new();
        mock.expect_show().never();
        mock.expect_save()
            .times(1)
            .returning(|_, _| Err(PlotError::Render("disk full".into())));

        let mut plotter = Plotter::with_backend(mock);
        let err = plotter
            .render_overlay(
                &[xs(2)],
                &[ys(2)],
                &["a"],
                "t",
                "y",
                &RenderOptions::default().output(&out),
            )
            .unwrap_err();
        assert!(matches!(err, PlotError::Render(_)));
        assert!(plotter.open_figures().is_empty());
    }

    #[test]
    fn missing_output_dir_is_rejected_before_drawing() {
        let options = RenderOptions::default().output("/no/such/tsplot/dir/out.png");
        let mut plotter = Plotter::with_backend(untouched());

        let err = plotter
            .render_stacked(&[xs(2)], &[ys(2)], &["a"], "t", &["y"], None, &options)
            .unwrap_err();
        assert!(err.is_configuration());

        let err = plotter
            .render_overlay(&[xs(2)], &[ys(2)], &["a"], "t", "y", &options)
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(plotter.open_figures().is_empty());
    }

    #[test]
    fn missing_modes_default_to_lines_then_stem() {
        let mut mock = MockBackend::new();
        mock.expect_show()
            .times(1)
            .withf(|figures: &[Figure]| {
                figures.len() == 1
                    && figures[0].trace_kinds()
                        == vec![TraceKind::PLAIN_LINE, TraceKind::PLAIN_LINE, TraceKind::BARE_STEM]
            })
            .returning(|_| Ok(()));

        let mut plotter = Plotter::with_backend(mock);
        plotter
            .render_stacked(
                &[xs(3), xs(3), xs(3)],
                &[ys(3), ys(3), ys(3)],
                &["a", "b", "c"],
                "t",
                &["ya", "yb", "yc"],
                None,
                &RenderOptions::default(),
            )
            .unwrap();
        assert!(plotter.open_figures().is_empty());
    }

    #[test]
    fn explicit_modes_are_kept() {
        let mut mock = MockBackend::new();
        mock.expect_show()
            .times(1)
            .withf(|figures: &[Figure]| {
                figures[0].trace_kinds() == vec![TraceKind::BARE_STEM, TraceKind::PLAIN_LINE]
            })
            .returning(|_| Ok(()));

        let mut plotter = Plotter::with_backend(mock);
        plotter
            .render_stacked(
                &[xs(3), xs(3)],
                &[ys(3), ys(3)],
                &["a", "b"],
                "t",
                &["ya", "yb"],
                Some(&[RenderMode::Stem, RenderMode::Line][..]),
                &RenderOptions::default().spacing(0.3),
            )
            .unwrap();
    }

    #[test]
    fn overlay_with_output_saves_without_showing() {
        let out = std::env::temp_dir().join("tsplot_overlay_mock.png");
        let expected = out.clone();

        let mut mock = MockBackend::new();
        mock.expect_show().never();
        mock.expect_save()
            .times(1)
            .withf(move |figure: &Figure, path: &Path| {
                path == expected.as_path()
                    && figure.panels.len() == 1
                    && figure.panels[0].traces.len() == 2
            })
            .returning(|_, _| Ok(()));

        let mut plotter = Plotter::with_backend(mock);
        plotter
            .render_overlay(
                &[xs(4), xs(4)],
                &[ys(4), ys(4)],
                &["a", "b"],
                "t",
                "y",
                &RenderOptions::default().output(&out),
            )
            .unwrap();
        assert_eq!(plotter.open_figures().len(), 1);
    }

    #[test]
    fn figures_kept_open_without_reset_are_shown_together() {
        let out = std::env::temp_dir().join("tsplot_kept_open.png");

        let mut mock = MockBackend::new();
        mock.expect_save().times(1).returning(|_, _| Ok(()));
        mock.expect_show()
            .times(1)
            .withf(|figures: &[Figure]| figures.len() == 2)
            .returning(|_| Ok(()));

        let mut plotter = Plotter::with_backend(mock);
        plotter
            .render_overlay(
                &[xs(2)],
                &[ys(2)],
                &["a"],
                "first",
                "y",
                &RenderOptions::default().output(&out),
            )
            .unwrap();
        plotter
            .render_overlay(
                &[xs(2)],
                &[ys(2)],
                &["b"],
                "second",
                "y",
                &RenderOptions::default().reset_first(false),
            )
            .unwrap();
        assert!(plotter.open_figures().is_empty());
    }

    #[test]
    fn reset_closes_earlier_figures() {
        let out = std::env::temp_dir().join("tsplot_reset.png");

        let mut mock = MockBackend::new();
        mock.expect_save().times(2).returning(|_, _| Ok(()));

        let mut plotter = Plotter::with_backend(mock);
        let options = RenderOptions::default().output(&out);
        plotter
            .render_overlay(&[xs(2)], &[ys(2)], &["a"], "t", "y", &options)
            .unwrap();
        plotter
            .render_overlay(&[xs(2)], &[ys(2)], &["a"], "t", "y", &options)
            .unwrap();
        assert_eq!(plotter.open_figures().len(), 1);
    }

    #[test]
    fn stem_single_validates_lengths() {
        let mut plotter = Plotter::with_backend(untouched());
        let err = plotter
            .stem_single(&xs(3), &ys(2), "t", "y", Marker::None, Baseline::Hidden, true)
            .unwrap_err();
        assert!(matches!(
            err,
            PlotError::ShapeMismatch(ShapeMismatch::SeriesLength { index: 0, .. })
        ));
    }

    #[test]
    fn stem_single_is_shown_with_requested_styling() {
        let mut mock = MockBackend::new();
        mock.expect_save().never();
        mock.expect_show()
            .times(1)
            .withf(|figures: &[Figure]| {
                figures[0].trace_kinds()
                    == vec![TraceKind::Stem {
                        marker: Marker::Circle,
                        baseline: Baseline::Solid,
                    }]
            })
            .returning(|_| Ok(()));

        let mut plotter = Plotter::with_backend(mock);
        plotter
            .stem_single(&xs(3), &ys(3), "t", "y", Marker::Circle, Baseline::Solid, true)
            .unwrap();
    }

    #[test]
    fn style_is_snapshotted_into_figures() {
        let mut mock = MockBackend::new();
        mock.expect_show()
            .times(1)
            .withf(|figures: &[Figure]| figures[0].style.font.title == 9.0)
            .returning(|_| Ok(()));

        let mut plotter = Plotter::with_backend(mock);
        plotter.apply_style(&Style::compact(6.0, 4.0), false);
        plotter
            .render_overlay(&[xs(2)], &[ys(2)], &["a"], "t", "y", &RenderOptions::default())
            .unwrap();
    }

    #[test]
    fn library_defaults_are_idempotent() {
        let mut plotter = Plotter::with_backend(untouched());
        plotter.apply_style(&Style::compact(6.0, 4.0), false);
        assert_ne!(plotter.style(), &Style::default());

        let ignored = Style::compact(1.0, 1.0);
        plotter.apply_style(&ignored, true);
        let once = plotter.style().clone();
        plotter.apply_style(&ignored, true);
        assert_eq!(plotter.style(), &once);
        assert_eq!(once, Style::default());
    }

    #[test]
    fn backend_errors_propagate() {
        let mut mock = MockBackend::new();
        mock.expect_show()
            .returning(|_| Err(PlotError::Display("no display".into())));

        let mut plotter = Plotter::with_backend(mock);
        let err = plotter
            .render_overlay(&[xs(2)], &[ys(2)], &["a"], "t", "y", &RenderOptions::default())
            .unwrap_err();
        assert!(matches!(err, PlotError::Display(_)));
        assert!(plotter.open_figures().is_empty());
    }
}
