//! Demo scenario: a rabbit collecting carrots

use greenfoot::prelude::*;

/// Steered with WASD, turned with the arrow keys
struct Rabbit;

impl Actor for Rabbit {
    fn on_world_add(&mut self, ctx: &mut ActorContext<'_>) {
        let mut image = Image::new(24, 24);
        image.set_color(Color::LIGHT_GRAY);
        image.draw_oval(2, 6, 20, 16, true);
        image.draw_oval(5, 0, 5, 12, true);
        image.draw_oval(14, 0, 5, 12, true);
        image.set_color(Color::BLACK);
        image.draw_line(12, 14, 22, 14, 2);
        ctx.set_image(image);
    }

    fn act(&mut self, ctx: &mut ActorContext<'_>) {
        let (mut x, mut y) = ctx.location();
        if ctx.is_key_pressed("a") {
            x -= 1;
        }
        if ctx.is_key_pressed("d") {
            x += 1;
        }
        if ctx.is_key_pressed("w") {
            y -= 1;
        }
        if ctx.is_key_pressed("s") {
            y += 1;
        }
        ctx.set_location(x, y);

        if ctx.is_key_pressed("left") {
            ctx.turn(-90.0);
        }
        if ctx.is_key_pressed("right") {
            ctx.turn(90.0);
        }
        if ctx.is_key_pressed("up") {
            ctx.move_by(1.0);
        }
        if ctx.is_key_pressed("down") {
            ctx.move_by(-1.0);
        }

        if ctx.remove_touching::<Carrot>() {
            ctx.play_sound("eat.wav");
            let world = ctx.world_mut();
            for id in world.actors_of::<Counter>() {
                if let Some(counter) = world.actor_mut::<Counter>(id) {
                    counter.add(1);
                }
            }
        }
    }
}

struct Carrot;

impl Actor for Carrot {
    fn on_world_add(&mut self, ctx: &mut ActorContext<'_>) {
        let mut image = Image::new(20, 20);
        image.set_color(Color::ORANGE);
        image.draw_polygon(&[(4, 2), (16, 2), (10, 19)], true).ok();
        image.set_color(Color::GREEN);
        image.draw_line(10, 0, 10, 4, 2);
        ctx.set_image(image);
    }

    fn act(&mut self, _ctx: &mut ActorContext<'_>) {}
}

/// Follows the mouse while the left button is held
struct Seeker;

impl Actor for Seeker {
    fn on_world_add(&mut self, ctx: &mut ActorContext<'_>) {
        let mut image = Image::new(40, 40);
        image.set_color(Color::CYAN);
        image.draw_oval(0, 0, 40, 40, true);
        image.set_color(Color::WHITE);
        image.draw_line(20, 20, 40, 20, 3);
        ctx.set_image(image);
    }

    fn act(&mut self, ctx: &mut ActorContext<'_>) {
        let mouse = ctx.mouse();
        if mouse.is_pressed(1) && mouse.is_in_window() {
            let (x, y) = ctx.mouse_cell();
            ctx.turn_towards(x, y);
        }
    }
}

/// Scrolls with the mouse wheel and quits on Ctrl+Shift+Q
struct Meadow;

impl Scenario for Meadow {
    fn act(&mut self, stage: &mut Stage<'_>) {
        let shift = stage.is_key_pressed("shift");
        let movement = (-30.0 * stage.mouse().wheel()) as i32;
        if movement != 0 {
            if shift {
                stage.move_view(movement, 0);
            } else {
                stage.move_view(0, movement);
            }
        }

        if shift && stage.is_key_pressed("ctrl") && stage.is_key_pressed("q") {
            stage.quit();
        }

        if stage.world().actors_of::<Carrot>().is_empty() {
            stage.world_mut().show_text(Some("All eaten!"), 10, 7);
        }
    }
}

fn meadow() -> World {
    let mut world = World::new(20, 15, 30);

    let mut grass = Image::filled(30, 30, Color::rgb(96, 160, 64));
    grass.set_color(Color::rgb(80, 140, 50));
    grass.draw_rect(0, 0, 30, 30, false);
    world.set_background(grass, false);

    world.add_to_world(Counter::new("Carrots: ", 0), 2, 0);
    for (x, y) in [(4, 3), (15, 4), (8, 11), (17, 12), (12, 7)] {
        world.add_to_world(Carrot, x, y);
    }
    world.add_to_world(Seeker, 18, 1);
    world.add_to_world(Rabbit, 10, 7);
    world.set_paint_order(&[ActorType::of::<Carrot>(), ActorType::of::<Rabbit>()]);
    world
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::load_or_default(CONFIG_FILE) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Config error, using defaults: {e}");
            Config::default()
        }
    };

    let mut app = Application::new(config);
    app.set_world(meadow(), Meadow);

    if let Err(e) = run(app) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
