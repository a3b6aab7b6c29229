//! Drawable RGBA images
//!
//! Every actor and the world background is an [`Image`]. Images carry a
//! current drawing color used by the shape methods and a surface alpha that
//! applies when the image is drawn onto another one.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::{Color, Font, raster};

/// An RGBA raster with a drawing color and surface alpha
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pixels: RgbaImage,
    color: Color,
    alpha: u8,
}

impl Image {
    /// Create a fully transparent image
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_rgba(RgbaImage::new(width, height))
    }

    /// Create an image filled with `color`
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self::from_rgba(RgbaImage::from_pixel(width, height, color.into()))
    }

    /// Wrap an existing RGBA buffer
    #[must_use]
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            color: Color::BLACK,
            alpha: 255,
        }
    }

    /// Load an image file (PNG, JPEG)
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| ImageError::IoError(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Decode an image from encoded bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a supported image format
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| ImageError::DecodeError(e.to_string()))?;
        Ok(Self::from_rgba(decoded.to_rgba8()))
    }

    /// The image actors get when none was set: a yellow disc with a dark rim
    #[must_use]
    pub fn default_actor() -> Self {
        let mut image = Self::new(28, 28);
        image.set_color(Color::YELLOW);
        image.draw_oval(0, 0, 28, 28, true);
        image.set_color(Color::DARK_GRAY);
        image.draw_oval(0, 0, 28, 28, false);
        image.draw_line(14, 14, 26, 14, 2);
        image.set_color(Color::BLACK);
        image
    }

    /// Save as PNG or JPEG depending on the extension
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ImageError> {
        self.pixels
            .save(path)
            .map_err(|e| ImageError::IoError(e.to_string()))
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Current drawing color
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Surface alpha, 255 is opaque
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Set the surface alpha, clamped to 0..=255
    pub fn set_alpha(&mut self, alpha: i32) {
        self.alpha = alpha.clamp(0, 255) as u8;
    }

    #[must_use]
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    #[must_use]
    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }

    /// Draw another image onto this one, honouring its surface alpha
    pub fn draw_image(&mut self, other: &Image, x: i32, y: i32) {
        raster::blit(&mut self.pixels, &other.pixels, x, y, other.alpha);
    }

    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, width: u32) {
        raster::line(&mut self.pixels, x1, y1, x2, y2, width, self.color);
    }

    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, fill: bool) {
        raster::rect(&mut self.pixels, x, y, width, height, fill, self.color);
    }

    pub fn draw_oval(&mut self, x: i32, y: i32, width: i32, height: i32, fill: bool) {
        raster::ellipse(&mut self.pixels, x, y, width, height, fill, self.color);
    }

    /// Draw a closed polygon
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::TooFewPoints`] for fewer than three points
    pub fn draw_polygon(&mut self, points: &[(i32, i32)], fill: bool) -> Result<(), ImageError> {
        if points.len() < 3 {
            return Err(ImageError::TooFewPoints(points.len()));
        }
        raster::polygon(&mut self.pixels, points, fill, self.color);
        Ok(())
    }

    /// Fill the whole image with the drawing color
    pub fn fill(&mut self) {
        self.fill_with(self.color);
    }

    pub fn fill_with(&mut self, color: Color) {
        let pixel: Rgba<u8> = color.into();
        for p in self.pixels.pixels_mut() {
            *p = pixel;
        }
    }

    /// Make every pixel fully transparent
    pub fn clear(&mut self) {
        self.fill_with(Color::TRANSPARENT);
    }

    /// Draw text in the drawing color
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, font: &Font) {
        font.draw(&mut self.pixels, text, x, y, self.color);
    }

    /// Read a pixel
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::OutOfBounds`] outside the image
    pub fn color_at(&self, x: i32, y: i32) -> Result<Color, ImageError> {
        self.check_bounds(x, y)?;
        Ok((*self.pixels.get_pixel(x as u32, y as u32)).into())
    }

    /// Set a pixel to the drawing color
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::OutOfBounds`] outside the image
    pub fn set_color_at(&mut self, x: i32, y: i32) -> Result<(), ImageError> {
        self.check_bounds(x, y)?;
        self.pixels.put_pixel(x as u32, y as u32, self.color.into());
        Ok(())
    }

    fn check_bounds(&self, x: i32, y: i32) -> Result<(), ImageError> {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return Err(ImageError::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(())
    }

    /// Resample to a new size
    pub fn scale(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == self.size() {
            return;
        }
        self.pixels = imageops::resize(&self.pixels, width, height, FilterType::Triangle);
    }

    /// Copy flipped left-right (`horizontal`) and/or upside down (`vertical`)
    #[must_use]
    pub fn mirrored(&self, horizontal: bool, vertical: bool) -> Self {
        let mut pixels = self.pixels.clone();
        if horizontal {
            pixels = imageops::flip_horizontal(&pixels);
        }
        if vertical {
            pixels = imageops::flip_vertical(&pixels);
        }
        Self {
            pixels,
            color: self.color,
            alpha: self.alpha,
        }
    }

    /// Size of the bounding box after a clockwise rotation by `degrees`
    #[must_use]
    pub fn rotated_size(&self, degrees: f64) -> (u32, u32) {
        let (w, h) = self.size();
        match QuarterTurn::of(degrees) {
            Some(QuarterTurn::None | QuarterTurn::Half) => (w, h),
            Some(QuarterTurn::Quarter | QuarterTurn::ThreeQuarters) => (h, w),
            None => {
                let rad = degrees.to_radians();
                let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
                let rw = f64::from(w) * cos + f64::from(h) * sin;
                let rh = f64::from(w) * sin + f64::from(h) * cos;
                ((rw - 1e-6).ceil() as u32, (rh - 1e-6).ceil() as u32)
            }
        }
    }

    /// Copy rotated clockwise by `degrees` around its centre
    #[must_use]
    pub fn rotated(&self, degrees: f64) -> Self {
        let pixels = match QuarterTurn::of(degrees) {
            Some(QuarterTurn::None) => self.pixels.clone(),
            Some(QuarterTurn::Quarter) => imageops::rotate90(&self.pixels),
            Some(QuarterTurn::Half) => imageops::rotate180(&self.pixels),
            Some(QuarterTurn::ThreeQuarters) => imageops::rotate270(&self.pixels),
            None => self.rotate_nearest(degrees),
        };
        Self {
            pixels,
            color: self.color,
            alpha: self.alpha,
        }
    }

    fn rotate_nearest(&self, degrees: f64) -> RgbaImage {
        let (w, h) = self.size();
        let (ow, oh) = self.rotated_size(degrees);
        let rad = degrees.to_radians();
        let (sin, cos) = rad.sin_cos();
        let (half_w, half_h) = (f64::from(w) / 2.0, f64::from(h) / 2.0);
        let (out_half_w, out_half_h) = (f64::from(ow) / 2.0, f64::from(oh) / 2.0);

        let mut out = RgbaImage::new(ow, oh);
        for (ox, oy, pixel) in out.enumerate_pixels_mut() {
            let dx = f64::from(ox) + 0.5 - out_half_w;
            let dy = f64::from(oy) + 0.5 - out_half_h;
            let sx = (dx * cos + dy * sin + half_w).floor();
            let sy = (-dx * sin + dy * cos + half_h).floor();
            if sx >= 0.0 && sy >= 0.0 && sx < f64::from(w) && sy < f64::from(h) {
                *pixel = *self.pixels.get_pixel(sx as u32, sy as u32);
            }
        }
        out
    }

    /// Build a boxed text label: background, text inset by `margin`, optional outline
    #[must_use]
    pub fn text_label(
        text: &str,
        font: &Font,
        foreground: Color,
        background: Color,
        outline: Option<Color>,
        margin: u32,
    ) -> Self {
        let (tw, th) = font.text_size(text);
        let mut label = Self::filled(tw + 2 * margin, th + 2 * margin, background);
        label.set_color(foreground);
        label.draw_text(text, margin as i32, margin as i32, font);
        if let Some(outline) = outline {
            label.set_color(outline);
            let (w, h) = label.size();
            label.draw_rect(0, 0, w as i32, h as i32, false);
            label.set_color(foreground);
        }
        label
    }
}

/// Rotations that can be done exactly by transposing pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuarterTurn {
    None,
    Quarter,
    Half,
    ThreeQuarters,
}

impl QuarterTurn {
    fn of(degrees: f64) -> Option<Self> {
        let normalized = degrees.rem_euclid(360.0);
        let nearest = (normalized / 90.0).round();
        if (normalized - nearest * 90.0).abs() > 1e-9 {
            return None;
        }
        Some(match nearest as i64 % 4 {
            0 => Self::None,
            1 => Self::Quarter,
            2 => Self::Half,
            _ => Self::ThreeQuarters,
        })
    }
}

/// Errors that can occur while loading or drawing images
#[derive(Debug, Clone, PartialEq)]
pub enum ImageError {
    /// IO error reading or writing a file
    IoError(String),
    /// Error decoding image data
    DecodeError(String),
    /// Pixel coordinates outside of the image
    OutOfBounds { x: i32, y: i32, width: u32, height: u32 },
    /// A polygon needs at least three points
    TooFewPoints(usize),
}

impl std::fmt::Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::DecodeError(e) => write!(f, "Decode error: {e}"),
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(f, "pixel ({x}, {y}) is outside of a {width}x{height} image"),
            Self::TooFewPoints(n) => write!(f, "a polygon needs at least 3 points, got {n}"),
        }
    }
}

impl std::error::Error for ImageError {}
