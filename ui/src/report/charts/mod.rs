//! Chart geometry: series in, scene description out. Nothing here touches a
//! drawing surface.

pub mod bar;
pub mod pie;
pub mod scene;
pub mod svg;

pub use bar::{bar_chart, BarScale};
pub use pie::{pie_chart, slices, Slice};
pub use scene::{ChartOptions, Palette, Primitive, Scene, Series};
pub use svg::to_svg;
