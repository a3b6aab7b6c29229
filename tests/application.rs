//! Headless application loop tests
//!
//! Frames are driven with synthetic events and instants, no window is opened.

use std::time::{Duration, Instant};

use greenfoot::core::AppEvent;
use greenfoot::prelude::*;

/// Walks right while the right arrow is held
struct Walker;

impl Actor for Walker {
    fn act(&mut self, ctx: &mut ActorContext<'_>) {
        if ctx.is_key_pressed("right") {
            let (x, y) = ctx.location();
            ctx.set_location(x + 1, y);
        }
    }
}

/// Counts its act cycles and pauses the world on the first one
struct Sleeper {
    acts: u32,
}

impl Actor for Sleeper {
    fn act(&mut self, ctx: &mut ActorContext<'_>) {
        self.acts += 1;
        if self.acts == 1 {
            ctx.stop();
        }
    }
}

struct Quitter;

impl Actor for Quitter {
    fn act(&mut self, ctx: &mut ActorContext<'_>) {
        ctx.quit();
    }
}

/// Switches to a 3x3 world on its second act cycle
struct Switcher {
    cycles: u32,
}

impl Scenario for Switcher {
    fn act(&mut self, stage: &mut Stage<'_>) {
        self.cycles += 1;
        if self.cycles == 2 {
            stage.set_world(World::new(3, 3, 10), ());
        }
    }
}

fn started(world: World, scenario: impl Scenario) -> Application {
    let mut app = Application::new(Config::default());
    app.set_world(world, scenario);
    app.start().unwrap();
    app
}

/// Run `frames` updates, 16 ms apart
fn step(app: &mut Application, start: Instant, frames: u32) {
    for frame in 0..frames {
        app.update(start + Duration::from_millis(16 * u64::from(frame)));
    }
}

#[test]
fn test_actor_follows_held_key() {
    let mut world = World::new(10, 10, 10);
    let id = world.add_to_world(Walker, 0, 5);
    let mut app = started(world, ());

    app.push_event(AppEvent::KeyDown(KeyCode::ArrowRight));
    step(&mut app, Instant::now(), 3);
    assert_eq!(app.world().unwrap().transform(id).unwrap().x, 3);

    app.push_event(AppEvent::KeyUp(KeyCode::ArrowRight));
    step(&mut app, Instant::now(), 2);
    assert_eq!(app.world().unwrap().transform(id).unwrap().x, 3);
}

#[test]
fn test_bounded_world_keeps_walker_inside() {
    let mut world = World::new(4, 4, 10);
    let id = world.add_to_world(Walker, 2, 0);
    let mut app = started(world, ());

    app.push_event(AppEvent::KeyDown(KeyCode::ArrowRight));
    step(&mut app, Instant::now(), 5);
    assert_eq!(app.world().unwrap().transform(id).unwrap().x, 3);
}

#[test]
fn test_stopped_world_resumes_with_space() {
    let mut world = World::new(4, 4, 10);
    let id = world.add_to_world(Sleeper { acts: 0 }, 1, 1);
    let mut app = started(world, ());
    let acts = |app: &Application| app.world().unwrap().actor::<Sleeper>(id).unwrap().acts;

    let start = Instant::now();
    step(&mut app, start, 3);
    assert_eq!(acts(&app), 1);
    assert!(!app.world().unwrap().is_running());
    assert!(app.is_running());

    app.push_event(AppEvent::KeyDown(KeyCode::Space));
    app.update(start + Duration::from_millis(100));
    assert!(app.world().unwrap().is_running());

    app.update(start + Duration::from_millis(116));
    assert_eq!(acts(&app), 2);
}

#[test]
fn test_actor_can_quit() {
    let mut world = World::new(2, 2, 10);
    world.add_to_world(Quitter, 0, 0);
    let mut app = started(world, ());

    app.update(Instant::now());
    assert!(!app.is_running());
}

#[test]
fn test_scenario_switches_world_after_cycle() {
    let mut app = started(World::new(8, 8, 10), Switcher { cycles: 0 });

    let start = Instant::now();
    step(&mut app, start, 1);
    assert_eq!(app.world().unwrap().width(), 8);
    app.update(start + Duration::from_millis(50));
    assert_eq!(app.world().unwrap().width(), 3);
    assert_eq!(app.window_size(), (30, 30));
}

#[test]
fn test_world_speed_paces_act_cycles() {
    let mut world = World::new(4, 4, 10);
    world.set_speed(Duration::from_millis(50));
    let id = world.add_to_world(Sleeper { acts: 0 }, 0, 0);
    let mut app = started(world, ());

    // The first cycle pauses the world; resume it by hand
    let start = Instant::now();
    app.update(start);
    app.world_mut().unwrap().set_running(true);
    app.update(start + Duration::from_millis(20));
    app.update(start + Duration::from_millis(40));
    assert_eq!(app.world().unwrap().actor::<Sleeper>(id).unwrap().acts, 1);

    app.update(start + Duration::from_millis(60));
    assert_eq!(app.world().unwrap().actor::<Sleeper>(id).unwrap().acts, 2);
}

#[test]
fn test_frame_shows_actor_image() {
    let mut world = World::new(3, 3, 30);
    world.add_to_world(Walker, 1, 1);
    let mut app = started(world, ());
    app.update(Instant::now());

    let frame = app.compose_frame().unwrap();
    assert_eq!(frame.size(), (90, 90));
    assert_eq!(frame.color_at(38, 38).unwrap(), Color::YELLOW);
    assert_eq!(frame.color_at(2, 2).unwrap(), Color::BLACK);
}
