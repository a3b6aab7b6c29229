//! A text label actor

use crate::graphics::{Color, Font, Image};
use crate::world::{Actor, ActorContext};

/// Text drawn into a cell-sized image; text larger than the cell is clipped
#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    font: Font,
    color: Color,
    background: Option<Color>,
    needs_update: bool,
}

impl Default for Label {
    fn default() -> Self {
        Self::new("", Font::default())
    }
}

impl Label {
    #[must_use]
    pub fn new(text: impl ToString, font: Font) -> Self {
        Self {
            text: text.to_string(),
            font,
            color: Color::BLACK,
            background: None,
            needs_update: true,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl ToString) {
        self.text = text.to_string();
        self.needs_update = true;
    }

    #[must_use]
    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
        self.needs_update = true;
    }

    #[must_use]
    pub const fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn set_background(&mut self, background: Option<Color>) {
        self.background = background;
        self.needs_update = true;
    }

    /// Draw the label into an image of the given size
    #[must_use]
    pub fn render(&self, width: u32, height: u32) -> Image {
        let mut image = match self.background {
            Some(color) => Image::filled(width, height, color),
            None => Image::new(width, height),
        };
        image.set_color(self.color);
        image.draw_text(&self.text, 0, 0, &self.font);
        image
    }
}

impl Actor for Label {
    fn act(&mut self, ctx: &mut ActorContext<'_>) {
        if self.needs_update {
            let size = ctx.image().map(|image| image.size());
            let cell = ctx.world().cell_size();
            let (width, height) = size.unwrap_or((cell, cell));
            ctx.set_image(self.render(width, height));
            self.needs_update = false;
        }
    }

    fn on_world_add(&mut self, ctx: &mut ActorContext<'_>) {
        let cell = ctx.world().cell_size();
        ctx.set_image(Image::new(cell, cell));
        self.needs_update = true;
    }
}
