//! Input validation
//! Every check runs before anything is drawn, so a rejected call leaves no
//! partial figure and writes no file.

use super::XSeries;
use crate::{PlotError, Result, ShapeMismatch};
use std::path::Path;

/// The parent directory of `output` must already exist. A bare file name
/// refers to the current directory.
pub fn check_output_dir(output: Option<&Path>) -> Result<()> {
    let Some(output) = output else {
        return Ok(());
    };
    match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => {
            Err(PlotError::Configuration {
                dir: dir.to_path_buf(),
            })
        }
        _ => Ok(()),
    }
}

/// Outer lengths of the parallel arrays must agree. `labels` is `None` for
/// charts with a single shared y label.
pub fn check_series_count(
    x: usize,
    y: usize,
    legends: usize,
    labels: Option<usize>,
) -> Result<()> {
    let same = x == y && x == legends && labels.map_or(true, |l| l == x);
    if !same {
        return Err(ShapeMismatch::SeriesCount {
            x,
            y,
            legends,
            labels,
        }
        .into());
    }
    if x == 0 {
        return Err(PlotError::NoSeries);
    }
    Ok(())
}

/// Every series needs as many x values as y values.
pub fn check_series_lengths(x: &[XSeries], y: &[Vec<f64>]) -> Result<()> {
    for (index, (xs, ys)) in x.iter().zip(y).enumerate() {
        if xs.len() != ys.len() {
            return Err(ShapeMismatch::SeriesLength {
                index,
                x_len: xs.len(),
                y_len: ys.len(),
            }
            .into());
        }
    }
    Ok(())
}
