//! Data module - Series values and input validation

mod series;
pub mod validate;

pub use series::{default_modes, format_time_label, resolve_modes, RenderMode, XSeries};
