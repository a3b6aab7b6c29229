//! Software 2D graphics: colors, images, fonts and rasterization

mod color;
mod font;
mod glyphs;
mod image;
pub mod raster;

pub use color::Color;
pub use font::{Font, Text};
pub use self::image::{Image, ImageError};
