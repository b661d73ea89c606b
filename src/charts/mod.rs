//! Charts module - Static chart rendering

mod palette;
mod renderer;

pub use palette::Palette;
pub use renderer::{ChartVariant, RenderError, StaticChartRenderer};
