//! Charts module - Figure model, plotting front end and static rendering

mod figure;
mod plotter;
mod renderer;

pub use figure::{Figure, Panel, Trace, TraceKind, XAxisKind};
pub use plotter::{Backend, NativeBackend, Plotter, RenderOptions};
pub use renderer::StaticChartRenderer;
