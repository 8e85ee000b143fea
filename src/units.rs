//! Figure size conversion

/// Centimetres in one inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Width / height of the default 6.4 x 4.8 inch figure.
pub const DEFAULT_ASPECT_RATIO: f64 = 6.4 / 4.8;

/// Convert a figure size from centimetres to inches.
///
/// When `y_cm` is `None` the height keeps the default figure aspect ratio.
pub fn fig_size_cm_to_in(x_cm: f64, y_cm: Option<f64>) -> (f64, f64) {
    let x_in = x_cm / CM_PER_INCH;
    let y_in = match y_cm {
        Some(y_cm) => y_cm / CM_PER_INCH,
        None => x_in / DEFAULT_ASPECT_RATIO,
    };
    (x_in, y_in)
}
