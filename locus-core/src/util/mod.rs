pub mod color_palette;
pub mod geojson_ops;
mod geometry_error;
pub mod ring_ops;

pub use color_palette::ColorPalette;
pub use geometry_error::GeometryError;
