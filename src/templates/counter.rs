//! A score counter actor

use crate::graphics::{Color, Font, Image};
use crate::world::{Actor, ActorContext};

/// Margin between the border and the text
const PADDING: u32 = 5;

/// Shows `prefix + value` in a white box with a black border
#[derive(Debug, Clone)]
pub struct Counter {
    prefix: String,
    value: i64,
    font: Font,
    needs_update: bool,
}

impl Default for Counter {
    fn default() -> Self {
        Self::new("", 0)
    }
}

impl Counter {
    #[must_use]
    pub fn new(prefix: impl Into<String>, start_value: i64) -> Self {
        Self {
            prefix: prefix.into(),
            value: start_value,
            font: Font::default(),
            needs_update: true,
        }
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.value
    }

    pub fn set_value(&mut self, value: i64) {
        if value != self.value {
            self.value = value;
            self.needs_update = true;
        }
    }

    pub fn add(&mut self, delta: i64) {
        self.set_value(self.value.saturating_add(delta));
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        if prefix != self.prefix {
            self.prefix = prefix;
            self.needs_update = true;
        }
    }

    /// Text currently displayed
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{}", self.prefix, self.value)
    }

    /// Whether the image is stale
    #[must_use]
    pub const fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Draw the counter box
    #[must_use]
    pub fn render(&self) -> Image {
        let display = self.display();
        let (width, height) = self.font.text_size(&display);
        let (width, height) = (width + 2 * PADDING, height + 2 * PADDING);

        let mut image = Image::filled(width, height, Color::WHITE);
        image.set_color(Color::BLACK);
        image.draw_rect(0, 0, width as i32, height as i32, false);
        image.draw_text(&display, PADDING as i32, PADDING as i32, &self.font);
        image
    }

    fn refresh(&mut self, ctx: &mut ActorContext<'_>) {
        if self.needs_update {
            ctx.set_image(self.render());
            self.needs_update = false;
        }
    }
}

impl Actor for Counter {
    fn act(&mut self, ctx: &mut ActorContext<'_>) {
        self.refresh(ctx);
    }

    fn on_world_add(&mut self, ctx: &mut ActorContext<'_>) {
        self.needs_update = true;
        self.refresh(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Input;
    use crate::world::World;

    #[test]
    fn test_display() {
        let mut counter = Counter::new("Score: ", 3);
        assert_eq!(counter.display(), "Score: 3");
        counter.add(-5);
        assert_eq!(counter.value(), -2);
        counter.set_prefix("Lives ");
        assert_eq!(counter.display(), "Lives -2");
    }

    #[test]
    fn test_render_box() {
        let counter = Counter::new("", 7);
        let image = counter.render();
        let (text_w, text_h) = Font::default().text_size("7");
        assert_eq!(image.size(), (text_w + 10, text_h + 10));
        assert_eq!(image.color_at(0, 0), Ok(Color::BLACK));
        assert_eq!(image.color_at(2, 2), Ok(Color::WHITE));
    }

    #[test]
    fn test_redraws_only_on_change() {
        let mut world = World::new(5, 5, 10);
        let id = world.add_to_world(Counter::new("", 1), 2, 2);
        assert!(!world.actor::<Counter>(id).unwrap().needs_update());
        let first = world.image(id).unwrap().size();

        world.actor_mut::<Counter>(id).unwrap().set_value(1);
        assert!(!world.actor::<Counter>(id).unwrap().needs_update());

        world.actor_mut::<Counter>(id).unwrap().set_value(1000);
        assert!(world.actor::<Counter>(id).unwrap().needs_update());
        world.act_cycle(&mut (), &Input::new());
        assert!(!world.actor::<Counter>(id).unwrap().needs_update());
        assert!(world.image(id).unwrap().width() > first.0);
    }
}
