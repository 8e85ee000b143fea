//! Series Module
//! x values of a series (numeric or temporal) and per-series render modes.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Continuous line through the points
    Line,
    /// Vertical stem from the baseline to every point
    Stem,
}

/// Modes used when the caller gives none, or a list of the wrong length:
/// lines for every series except the last, which is a stem.
pub fn default_modes(n: usize) -> Vec<RenderMode> {
    let mut modes = vec![RenderMode::Line; n];
    if let Some(last) = modes.last_mut() {
        *last = RenderMode::Stem;
    }
    modes
}

/// Resolve the per-series modes against the number of legend entries.
pub fn resolve_modes(modes: Option<&[RenderMode]>, n_legends: usize) -> Vec<RenderMode> {
    match modes {
        Some(modes) if modes.len() == n_legends => modes.to_vec(),
        _ => default_modes(n_legends),
    }
}

/// x values of one series.
#[derive(Debug, Clone, PartialEq)]
pub enum XSeries {
    Numeric(Vec<f64>),
    Time(Vec<NaiveDateTime>),
}

impl XSeries {
    pub fn len(&self) -> usize {
        match self {
            XSeries::Numeric(v) => v.len(),
            XSeries::Time(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_time(&self) -> bool {
        matches!(self, XSeries::Time(_))
    }

    /// Plot coordinates. Timestamps become seconds since the Unix epoch.
    pub fn coords(&self) -> Vec<f64> {
        match self {
            XSeries::Numeric(v) => v.clone(),
            XSeries::Time(v) => v.iter().map(|t| timestamp_secs(*t)).collect(),
        }
    }
}

impl From<Vec<f64>> for XSeries {
    fn from(v: Vec<f64>) -> Self {
        XSeries::Numeric(v)
    }
}

impl From<&[f64]> for XSeries {
    fn from(v: &[f64]) -> Self {
        XSeries::Numeric(v.to_vec())
    }
}

impl From<Vec<NaiveDateTime>> for XSeries {
    fn from(v: Vec<NaiveDateTime>) -> Self {
        XSeries::Time(v)
    }
}

impl From<Vec<NaiveDate>> for XSeries {
    fn from(v: Vec<NaiveDate>) -> Self {
        XSeries::Time(v.into_iter().map(|d| d.and_time(Default::default())).collect())
    }
}

fn timestamp_secs(t: NaiveDateTime) -> f64 {
    let utc = t.and_utc();
    utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9
}

/// Label for an x coordinate on a time axis. `span` is the visible range in
/// seconds and selects the precision.
pub fn format_time_label(secs: f64, span: f64) -> String {
    const TWO_DAYS: f64 = 2.0 * 86_400.0;
    let Some(t) = DateTime::from_timestamp(secs.floor() as i64, 0) else {
        return String::new();
    };
    if span < TWO_DAYS {
        t.format("%m-%d %H:%M").to_string()
    } else {
        t.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_series_defaults_to_stem() {
        assert_eq!(
            default_modes(3),
            vec![RenderMode::Line, RenderMode::Line, RenderMode::Stem]
        );
        assert_eq!(default_modes(1), vec![RenderMode::Stem]);
        assert!(default_modes(0).is_empty());
    }

    #[test]
    fn modes_of_wrong_length_are_replaced() {
        let given = [RenderMode::Stem, RenderMode::Line];
        assert_eq!(resolve_modes(Some(&given), 2), given.to_vec());
        assert_eq!(resolve_modes(Some(&given), 3), default_modes(3));
        assert_eq!(resolve_modes(None, 2), default_modes(2));
    }

    #[test]
    fn dates_become_epoch_seconds() {
        let d = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        let x = XSeries::from(vec![d]);
        assert!(x.is_time());
        assert_eq!(x.coords(), vec![86_400.0]);
    }

    #[test]
    fn time_labels_depend_on_span() {
        let secs = 86_400.0 * 365.0;
        assert_eq!(format_time_label(secs, 30.0 * 86_400.0), "1971-01-01");
        assert_eq!(format_time_label(secs + 3_600.0, 3_600.0), "01-01 01:00");
    }
}
