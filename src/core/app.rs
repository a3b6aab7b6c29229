//! The application: owns the current world and drives it frame by frame
//!
//! [`Application`] is independent of any window. The windowed runner feeds it
//! [`AppEvent`]s and calls [`Application::update`] once per frame; tests do
//! the same with synthetic events and instants.

use std::time::Instant;

use glam::Vec2;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::assets::Resources;
use crate::audio::AudioManager;
use crate::core::debug::DebugInfo;
use crate::core::events::{AppEvent, EventQueue};
use crate::core::time::Time;
use crate::core::{Config, Error, Result};
use crate::diagram::{self, DiagramOptions};
use crate::graphics::{Color, Image};
use crate::input::Input;
use crate::world::{Scenario, SoundRequest, World};

/// Visible part of the world canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Window size in pixels; `None` shows the whole canvas
    size: Option<(u32, u32)>,
    /// Top-left canvas pixel shown in the window
    offset: (i32, i32),
}

impl Viewport {
    #[must_use]
    pub const fn new(size: Option<(u32, u32)>) -> Self {
        Self {
            size,
            offset: (0, 0),
        }
    }

    #[must_use]
    pub const fn offset(&self) -> (i32, i32) {
        self.offset
    }

    /// Window size, falling back to the canvas size
    #[must_use]
    pub fn size_for(&self, canvas: (u32, u32)) -> (u32, u32) {
        self.size.unwrap_or(canvas)
    }

    pub fn resize(&mut self, width: u32, height: u32, canvas: (u32, u32)) {
        self.size = Some((width.max(1), height.max(1)));
        self.scroll(0, 0, canvas);
    }

    /// Scroll by a pixel delta, keeping the canvas covering the window
    pub fn scroll(&mut self, dx: i32, dy: i32, canvas: (u32, u32)) {
        let (width, height) = self.size_for(canvas);
        let clamp_axis = |offset: i32, window: u32, canvas: u32| {
            if canvas <= window {
                0
            } else {
                offset.clamp(0, (canvas - window) as i32)
            }
        };
        self.offset = (
            clamp_axis(self.offset.0 + dx, width, canvas.0),
            clamp_axis(self.offset.1 + dy, height, canvas.1),
        );
    }

    pub fn reset(&mut self) {
        self.offset = (0, 0);
    }
}

/// Owns the world, its scenario and every per-frame service
pub struct Application {
    config: Config,
    resources: Resources,
    world: Option<World>,
    scenario: Box<dyn Scenario>,
    input: Input,
    events: EventQueue,
    time: Time,
    debug: DebugInfo,
    viewport: Viewport,
    audio: Option<AudioManager>,
    running: bool,
}

impl Application {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let size = match (config.window_width, config.window_height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w as u32, h as u32)),
            _ => None,
        };
        Self {
            resources: Resources::from_config(&config),
            debug: DebugInfo::new(config.show_fps),
            viewport: Viewport::new(size),
            config,
            world: None,
            scenario: Box::new(()),
            input: Input::new(),
            events: EventQueue::new(),
            time: Time::new(),
            audio: None,
            running: false,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn resources(&self) -> &Resources {
        &self.resources
    }

    #[must_use]
    pub const fn input(&self) -> &Input {
        &self.input
    }

    #[must_use]
    pub const fn time(&self) -> &Time {
        &self.time
    }

    #[must_use]
    pub const fn debug(&self) -> &DebugInfo {
        &self.debug
    }

    pub fn debug_mut(&mut self) -> &mut DebugInfo {
        &mut self.debug
    }

    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Open the default audio output; sound requests are ignored without it
    pub fn enable_audio(&mut self) {
        match AudioManager::new(self.resources.clone()) {
            Ok(audio) => self.audio = Some(audio),
            Err(e) => log::warn!("Sound disabled: {e}"),
        }
    }

    /// Replace the current world
    pub fn set_world(&mut self, world: World, scenario: impl Scenario) {
        self.install_world(world, Box::new(scenario));
    }

    fn install_world(&mut self, mut world: World, scenario: Box<dyn Scenario>) {
        world.set_resources(self.resources.clone());
        if let Some(mut previous) = self.world.take() {
            world.adopt_images(&mut previous);
        }
        if !world.has_speed() {
            world.set_speed(self.config.world_speed());
        }
        world.reset_pacing();
        world.repaint();
        log::info!(
            "World set: {}x{} cells of {} px, {} actors",
            world.width(),
            world.height(),
            world.cell_size(),
            world.number_of_actors()
        );

        self.viewport.reset();
        world.view_offset = self.viewport.offset();
        self.world = Some(world);
        self.scenario = scenario;
    }

    /// The current world
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoWorld`] if no world was set
    pub fn world(&self) -> Result<&World> {
        self.world.as_ref().ok_or(Error::NoWorld)
    }

    /// The current world, mutably
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoWorld`] if no world was set
    pub fn world_mut(&mut self) -> Result<&mut World> {
        self.world.as_mut().ok_or(Error::NoWorld)
    }

    /// Start running the current world
    ///
    /// Writes the class diagram first when `generateDiagram` is set; a
    /// failure there is logged and does not prevent the start.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoWorld`] if no world was set
    pub fn start(&mut self) -> Result<()> {
        let world = self.world.as_mut().ok_or(Error::NoWorld)?;
        world.set_running(true);
        self.running = true;
        log::info!("Starting {}", self.config.title);

        if self.config.generate_diagram {
            let source_dir = &self.config.diagram_source_dir;
            let options = DiagramOptions::from_config(&self.config, source_dir);
            match diagram::generate(&options) {
                Ok(path) => log::info!("Class diagram written to {}", path.display()),
                Err(e) => log::error!("Class diagram generation failed: {e}"),
            }
        }
        Ok(())
    }

    /// Stop the application; the window closes on the next frame
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Stopping {}", self.config.title);
        }
        self.running = false;
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Queue an event for the next update
    pub fn push_event(&mut self, event: AppEvent) {
        self.events.push(event);
    }

    /// Run one frame at `now`
    pub fn update(&mut self, now: Instant) {
        self.time.update(now);

        self.events.swap();
        let events: Vec<AppEvent> = self.events.drain().collect();
        for event in events {
            self.handle_event(event);
        }

        if self.running
            && let Some(world) = self.world.as_mut()
            && world.frame(now, self.scenario.as_mut(), &self.input)
        {
            self.debug.frame_stats.record_act();
        }
        self.apply_requests();

        if let Some(audio) = &mut self.audio {
            audio.update(self.time.delta());
        }
        self.debug.record_frame(self.time.delta());
        self.input.update();
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => self.stop(),
            AppEvent::KeyDown(key) => {
                self.input.process_keyboard(key, ElementState::Pressed);
                if key == KeyCode::Escape {
                    self.stop();
                }
            }
            AppEvent::KeyUp(key) => self.input.process_keyboard(key, ElementState::Released),
            AppEvent::MouseDown(button) => {
                self.input
                    .process_mouse_button(button, ElementState::Pressed);
            }
            AppEvent::MouseUp(button) => {
                self.input
                    .process_mouse_button(button, ElementState::Released);
            }
            AppEvent::CursorMoved(x, y) => self.input.process_cursor(Vec2::new(x, y)),
            AppEvent::CursorEntered => self.input.process_cursor_presence(true),
            AppEvent::CursorLeft => self.input.process_cursor_presence(false),
            AppEvent::MouseWheel(lines) => self.input.process_wheel(lines),
            AppEvent::WindowResized(width, height) => {
                let canvas = self.canvas_size();
                self.viewport.resize(width, height, canvas);
                self.sync_view();
            }
        }
    }

    /// Apply what actors and the scenario asked for during the act cycle
    fn apply_requests(&mut self) {
        let Some(world) = self.world.as_mut() else {
            return;
        };
        let requests = std::mem::take(&mut world.requests);

        let (dx, dy) = requests.view_move;
        if (dx, dy) != (0, 0) {
            self.move_world(dx, dy);
        }
        for sound in requests.sounds {
            self.handle_sound(sound);
        }
        if let Some(next) = requests.next_world {
            let next = *next;
            self.install_world(next.world, next.scenario);
        }
        if requests.quit {
            self.stop();
        }
    }

    fn handle_sound(&mut self, request: SoundRequest) {
        let Some(audio) = &mut self.audio else {
            log::debug!("No audio output, ignoring {request:?}");
            return;
        };
        match request {
            SoundRequest::Play(file) => {
                if let Err(e) = audio.play(&file) {
                    log::warn!("Could not play {file}: {e}");
                }
            }
            SoundRequest::StopAll(fade) => audio.stop_all(fade),
            SoundRequest::PauseAll => audio.pause_all(),
            SoundRequest::ResumeAll => audio.resume_all(),
        }
    }

    fn canvas_size(&self) -> (u32, u32) {
        self.world.as_ref().map_or((1, 1), World::pixel_size)
    }

    fn sync_view(&mut self) {
        let offset = self.viewport.offset();
        if let Some(world) = &mut self.world {
            world.view_offset = offset;
        }
    }

    /// Scroll the view over a world larger than the window
    pub fn move_world(&mut self, dx: i32, dy: i32) {
        let canvas = self.canvas_size();
        self.viewport.scroll(dx, dy, canvas);
        self.sync_view();
    }

    /// Window size in pixels
    #[must_use]
    pub fn window_size(&self) -> (u32, u32) {
        self.viewport.size_for(self.canvas_size())
    }

    /// The window-sized frame: the world canvas at the viewport offset
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoWorld`] if no world was set
    pub fn compose_frame(&self) -> Result<Image> {
        let world = self.world()?;
        let (width, height) = self.window_size();
        let (ox, oy) = self.viewport.offset();
        let mut frame = Image::filled(width, height, Color::BLACK);
        frame.draw_image(world.canvas(), -ox, -oy);
        Ok(frame)
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("title", &self.config.title)
            .field("world", &self.world)
            .field("running", &self.running)
            .field("viewport", &self.viewport)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::world::{Actor, ActorContext, Stage};

    struct Counter {
        acts: u32,
    }

    impl Actor for Counter {
        fn act(&mut self, _ctx: &mut ActorContext<'_>) {
            self.acts += 1;
        }
    }

    fn app_with_world(world: World) -> Application {
        let mut app = Application::new(Config::default());
        app.set_world(world, ());
        app
    }

    #[test]
    fn test_start_without_world() {
        let mut app = Application::new(Config::default());
        assert!(matches!(app.start(), Err(Error::NoWorld)));
        assert!(matches!(app.world(), Err(Error::NoWorld)));
        assert!(matches!(app.compose_frame(), Err(Error::NoWorld)));
    }

    #[test]
    fn test_update_acts_once_per_frame() {
        let mut world = World::new(4, 4, 10);
        let id = world.add_to_world(Counter { acts: 0 }, 0, 0);
        let mut app = app_with_world(world);
        app.start().unwrap();

        let start = Instant::now();
        for frame in 0..3 {
            app.update(start + Duration::from_millis(16 * frame));
        }
        let acts = app.world().unwrap().actor::<Counter>(id).unwrap().acts;
        assert_eq!(acts, 3);
        assert_eq!(app.debug().frame_stats.total_acts(), 3);
    }

    #[test]
    fn test_not_started_does_not_act() {
        let mut world = World::new(4, 4, 10);
        let id = world.add_to_world(Counter { acts: 0 }, 0, 0);
        let mut app = app_with_world(world);
        app.update(Instant::now());
        assert_eq!(app.world().unwrap().actor::<Counter>(id).unwrap().acts, 0);
    }

    #[test]
    fn test_world_speed_from_config() {
        let mut app = Application::new(Config::default().with_world_speed(100));
        app.set_world(World::new(2, 2, 10), ());
        assert_eq!(app.world().unwrap().speed(), Duration::from_millis(100));

        let mut fast = World::new(2, 2, 10);
        fast.set_speed(Duration::from_millis(5));
        app.set_world(fast, ());
        assert_eq!(app.world().unwrap().speed(), Duration::from_millis(5));
    }

    #[test]
    fn test_escape_and_quit_stop() {
        let mut app = app_with_world(World::new(2, 2, 10));
        app.start().unwrap();
        app.push_event(AppEvent::KeyDown(KeyCode::Escape));
        assert!(app.is_running());
        app.update(Instant::now());
        assert!(!app.is_running());

        app.start().unwrap();
        app.push_event(AppEvent::Quit);
        app.update(Instant::now());
        assert!(!app.is_running());
    }

    #[test]
    fn test_events_reach_input() {
        let mut app = app_with_world(World::new(2, 2, 10));
        app.push_event(AppEvent::KeyDown(KeyCode::KeyA));
        app.push_event(AppEvent::CursorMoved(12.0, 3.0));
        app.push_event(AppEvent::CursorEntered);
        app.update(Instant::now());
        assert!(app.input().is_key_pressed(KeyCode::KeyA));
        assert!(app.input().is_cursor_in_window());
        assert_eq!(app.input().cursor(), Vec2::new(12.0, 3.0));

        app.push_event(AppEvent::KeyUp(KeyCode::KeyA));
        app.update(Instant::now());
        assert!(!app.input().is_key_pressed(KeyCode::KeyA));
    }

    #[test]
    fn test_viewport_clamps_scrolling() {
        let config = Config::default().with_window_size(50, 40);
        let mut app = Application::new(config);
        app.set_world(World::new(10, 10, 10), ());
        assert_eq!(app.window_size(), (50, 40));

        app.move_world(30, 20);
        assert_eq!(app.viewport().offset(), (30, 20));
        app.move_world(100, 100);
        assert_eq!(app.viewport().offset(), (50, 60));
        app.move_world(-500, 0);
        assert_eq!(app.viewport().offset(), (0, 60));
        assert_eq!(app.world().unwrap().view_offset, (0, 60));
    }

    #[test]
    fn test_viewport_zero_when_canvas_fits() {
        let mut viewport = Viewport::new(Some((200, 200)));
        viewport.scroll(10, 10, (100, 100));
        assert_eq!(viewport.offset(), (0, 0));
    }

    #[test]
    fn test_compose_frame_uses_offset() {
        let config = Config::default().with_window_size(10, 10);
        let mut world = World::new(2, 1, 10);
        let mut background = Image::filled(20, 10, Color::RED);
        background.set_color(Color::BLUE);
        background.draw_rect(10, 0, 10, 10, true);
        world.set_background(background, false);

        let mut app = Application::new(config);
        app.set_world(world, ());
        assert_eq!(app.compose_frame().unwrap().color_at(5, 5), Ok(Color::RED));
        app.move_world(10, 0);
        let frame = app.compose_frame().unwrap();
        assert_eq!(frame.size(), (10, 10));
        assert_eq!(frame.color_at(5, 5), Ok(Color::BLUE));
    }

    #[test]
    fn test_scenario_requests_world_switch_and_quit() {
        struct Switcher;
        impl Scenario for Switcher {
            fn act(&mut self, stage: &mut Stage<'_>) {
                stage.set_world(World::new(7, 3, 5), ());
                stage.move_view(5, 5);
            }
        }

        struct Quitter;
        impl Scenario for Quitter {
            fn act(&mut self, stage: &mut Stage<'_>) {
                stage.quit();
            }
        }

        let mut app = Application::new(Config::default());
        app.set_world(World::new(2, 2, 10), Switcher);
        app.start().unwrap();
        app.update(Instant::now());
        assert_eq!(app.world().unwrap().width(), 7);

        app.set_world(World::new(2, 2, 10), Quitter);
        app.update(Instant::now());
        assert!(!app.is_running());
    }

    #[test]
    fn test_sound_requests_without_audio_are_ignored() {
        struct Noisy;
        impl Actor for Noisy {
            fn act(&mut self, ctx: &mut ActorContext<'_>) {
                ctx.play_sound("boom.wav");
                ctx.stop_sounds(Duration::from_millis(10));
            }
        }

        let mut world = World::new(2, 2, 10);
        world.add_to_world(Noisy, 0, 0);
        let mut app = app_with_world(world);
        app.start().unwrap();
        app.update(Instant::now());
        assert!(app.is_running());
    }

    #[test]
    fn test_sound_control_requests_are_drained() {
        struct Conductor;
        impl Scenario for Conductor {
            fn act(&mut self, stage: &mut Stage<'_>) {
                stage.pause_sounds();
                stage.resume_sounds();
            }
        }

        let mut app = Application::new(Config::default());
        app.set_world(World::new(2, 2, 10), Conductor);
        app.start().unwrap();
        app.update(Instant::now());
        assert!(app.world().unwrap().requests.sounds.is_empty());
        assert!(app.is_running());
    }

    fn diagram_config(root: &std::path::Path) -> Config {
        Config::default()
            .with_generate_diagram(true)
            .with_diagram_dirs(
                root.join("src").to_string_lossy(),
                root.join("uml").to_string_lossy(),
            )
    }

    #[test]
    fn test_start_writes_class_diagram() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src").join("rocket.rs"), "pub struct Rocket;").unwrap();

        let config = diagram_config(dir.path());
        let path = config.diagram_path();
        let mut app = Application::new(config);
        app.set_world(World::new(2, 2, 10), ());
        app.start().unwrap();

        assert!(app.is_running());
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("Rocket"));
    }

    #[test]
    fn test_start_survives_diagram_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = diagram_config(dir.path());
        let path = config.diagram_path();
        let mut app = Application::new(config);
        app.set_world(World::new(2, 2, 10), ());

        assert!(app.start().is_ok());
        assert!(app.is_running());
        assert!(!path.exists());
    }
}
