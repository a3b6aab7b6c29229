//! Fonts and rendered text

use image::RgbaImage;

use super::glyphs::{self, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH, LINE_HEIGHT};
use super::{Color, Image, raster};

/// A font: the built-in bitmap face scaled to a pixel size with style flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    size: u32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Font {
    /// Size used by world texts
    pub const DEFAULT_SIZE: u32 = 26;

    /// Create a plain font; `size` is the line height in pixels
    #[must_use]
    pub fn new(size: u32) -> Self {
        Self {
            size: size.max(1),
            bold: false,
            italic: false,
            underline: false,
        }
    }

    #[must_use]
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    #[must_use]
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    #[must_use]
    pub fn underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    /// Line height this font was requested with
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Integer scale applied to the 5x7 glyphs
    #[must_use]
    pub fn scale(&self) -> u32 {
        ((self.size as f32 / LINE_HEIGHT as f32).round() as u32).max(1)
    }

    fn extra_width(&self) -> u32 {
        let mut extra = 0;
        if self.bold {
            extra += 1;
        }
        if self.italic {
            extra += 2 * self.scale();
        }
        extra
    }

    /// Measure `text` in pixels as (width, height); lines split on `\n`
    #[must_use]
    pub fn text_size(&self, text: &str) -> (u32, u32) {
        let scale = self.scale();
        let mut lines = 0;
        let mut widest = 0;
        for line in text.split('\n') {
            lines += 1;
            let chars = line.chars().count() as u32;
            if chars > 0 {
                widest = widest.max(chars * ADVANCE * scale - scale);
            }
        }
        let width = if widest == 0 { 0 } else { widest + self.extra_width() };
        (width, lines * LINE_HEIGHT * scale)
    }

    /// Draw `text` onto `img` with its top-left corner at (x, y)
    pub fn draw(&self, img: &mut RgbaImage, text: &str, x: i32, y: i32, color: Color) {
        let scale = self.scale() as i32;
        let line_height = (LINE_HEIGHT as i32) * scale;

        for (line_index, line) in text.split('\n').enumerate() {
            let top = y + line_index as i32 * line_height;
            let mut left = x;
            for c in line.chars() {
                self.draw_glyph(img, c, left, top, color);
                left += ADVANCE as i32 * scale;
            }
            if self.underline && left > x {
                let base = top + GLYPH_HEIGHT as i32 * scale;
                raster::rect(img, x, base, left - x - scale, scale.max(1), true, color);
            }
        }
    }

    fn draw_glyph(&self, img: &mut RgbaImage, c: char, x: i32, y: i32, color: Color) {
        let rows = glyphs::glyph(c);
        let scale = self.scale() as i32;
        for row in 0..GLYPH_HEIGHT {
            let shear = if self.italic {
                (GLYPH_HEIGHT - 1 - row) as i32 * scale / 3
            } else {
                0
            };
            for col in 0..GLYPH_WIDTH {
                if !glyphs::is_set(rows, col, row) {
                    continue;
                }
                let px = x + col as i32 * scale + shear;
                let py = y + row as i32 * scale;
                raster::rect(img, px, py, scale, scale, true, color);
                if self.bold {
                    raster::rect(img, px + 1, py, scale, scale, true, color);
                }
            }
        }
    }

    /// Render `text` into a new transparent image sized to fit
    #[must_use]
    pub fn render(&self, text: &str, color: Color) -> Image {
        let (w, h) = self.text_size(text);
        let mut canvas = RgbaImage::new(w.max(1), h.max(1));
        self.draw(&mut canvas, text, 0, 0, color);
        Image::from_rgba(canvas)
    }

    /// Build a [`Text`] using this font
    #[must_use]
    pub fn text(&self, display_text: impl Into<String>, color: Color) -> Text {
        Text::new(self.clone(), display_text, color)
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

/// Text with a font and color, kept rendered
#[derive(Debug, Clone)]
pub struct Text {
    font: Font,
    display_text: String,
    color: Color,
    rendered: Image,
}

impl Text {
    #[must_use]
    pub fn new(font: Font, display_text: impl Into<String>, color: Color) -> Self {
        let display_text = display_text.into();
        let rendered = font.render(&display_text, color);
        Self {
            font,
            display_text,
            color,
            rendered,
        }
    }

    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Replace the text and re-render
    pub fn set_display_text(&mut self, value: impl ToString) {
        self.display_text = value.to_string();
        self.rendered = self.font.render(&self.display_text, self.color);
    }

    #[must_use]
    pub fn font(&self) -> &Font {
        &self.font
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.rendered = self.font.render(&self.display_text, color);
    }

    /// Size of the rendered text in pixels
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.font.text_size(&self.display_text)
    }

    #[must_use]
    pub fn image(&self) -> &Image {
        &self.rendered
    }
}
