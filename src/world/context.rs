//! What scenarios and actors can reach while they act
//!
//! Requests that affect the application (quitting, switching worlds, sounds,
//! scrolling the view) are recorded on the world and applied by the
//! application after the act cycle.

use std::ops::{Deref, DerefMut};
use std::sync::LazyLock;
use std::time::Duration;

use crate::core::Result;
use crate::graphics::Image;
use crate::input::{Input, MouseInfo};

use super::{Actor, ActorId, Transform, World};

/// Input used when no frame is in progress, e.g. while building a world
static NO_INPUT: LazyLock<Input> = LazyLock::new(Input::new);

/// The world's own behaviour, run before any actor acts
pub trait Scenario: 'static {
    fn act(&mut self, _stage: &mut Stage<'_>) {}
}

/// A world without behaviour of its own
impl Scenario for () {}

/// A world to switch to once the current act cycle is over
pub(crate) struct NextWorld {
    pub world: World,
    pub scenario: Box<dyn Scenario>,
}

/// Sound commands forwarded to the audio output
#[derive(Debug, Clone, PartialEq)]
pub enum SoundRequest {
    /// Play a file from the sound folder
    Play(String),
    /// Fade every sound out over the duration
    StopAll(Duration),
    PauseAll,
    ResumeAll,
}

/// Deferred requests collected during an act cycle
#[derive(Default)]
pub(crate) struct Requests {
    pub quit: bool,
    pub next_world: Option<Box<NextWorld>>,
    pub view_move: (i32, i32),
    pub sounds: Vec<SoundRequest>,
}

/// Access to the world and application services during an act cycle
pub struct Stage<'a> {
    world: &'a mut World,
    input: &'a Input,
}

impl<'a> Stage<'a> {
    pub fn new(world: &'a mut World, input: &'a Input) -> Self {
        Self { world, input }
    }

    /// A stage outside of any frame; input reads as idle
    pub fn detached(world: &'a mut World) -> Self {
        Self::new(world, &NO_INPUT)
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &*self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut *self.world
    }

    #[must_use]
    pub fn input(&self) -> &Input {
        self.input
    }

    /// Whether the named key is held, e.g. `"left"`, `"a"`, `"A"`
    #[must_use]
    pub fn is_key_pressed(&self, name: &str) -> bool {
        self.input.is_key_down(name)
    }

    #[must_use]
    pub fn mouse(&self) -> MouseInfo {
        MouseInfo::from_input(self.input)
    }

    /// The world cell under the cursor
    #[must_use]
    pub fn mouse_cell(&self) -> (i32, i32) {
        self.mouse()
            .cell(self.world.cell_size(), self.world.view_offset)
    }

    /// Play a file from the sound folder
    pub fn play_sound(&mut self, file: impl Into<String>) {
        self.world
            .requests
            .sounds
            .push(SoundRequest::Play(file.into()));
    }

    /// Stop every sound, fading out over `fade`
    pub fn stop_sounds(&mut self, fade: Duration) {
        self.world.requests.sounds.push(SoundRequest::StopAll(fade));
    }

    /// Pause every playing sound
    pub fn pause_sounds(&mut self) {
        self.world.requests.sounds.push(SoundRequest::PauseAll);
    }

    pub fn resume_sounds(&mut self) {
        self.world.requests.sounds.push(SoundRequest::ResumeAll);
    }

    /// Load an image from the image folder
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be found or decoded
    pub fn load_image(&mut self, file: &str) -> Result<Image> {
        self.world.load_image(file)
    }

    /// Pause the world; it resumes when Space is pressed
    pub fn stop(&mut self) {
        self.world.set_running(false);
    }

    /// Stop the application after this act cycle
    pub fn quit(&mut self) {
        self.world.requests.quit = true;
    }

    /// Switch to another world after this act cycle
    pub fn set_world(&mut self, world: World, scenario: impl Scenario) {
        self.world.requests.next_world = Some(Box::new(NextWorld {
            world,
            scenario: Box::new(scenario),
        }));
    }

    /// Scroll the view over a world larger than the window
    pub fn move_view(&mut self, dx: i32, dy: i32) {
        let (x, y) = self.world.requests.view_move;
        self.world.requests.view_move = (x + dx, y + dy);
    }
}

/// The acting actor's view of its world
pub struct ActorContext<'a> {
    stage: Stage<'a>,
    id: ActorId,
}

impl<'a> ActorContext<'a> {
    pub fn new(world: &'a mut World, input: &'a Input, id: ActorId) -> Self {
        Self {
            stage: Stage::new(world, input),
            id,
        }
    }

    /// A context outside of any frame; input reads as idle
    pub fn detached(world: &'a mut World, id: ActorId) -> Self {
        Self {
            stage: Stage::detached(world),
            id,
        }
    }

    /// Id of the acting actor
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Whether the acting actor is still part of the world
    #[must_use]
    pub fn is_in_world(&self) -> bool {
        self.stage.world.contains(self.id)
    }

    #[must_use]
    pub fn transform(&self) -> Transform {
        self.stage.world.transform(self.id).unwrap_or_default()
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.transform().x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.transform().y
    }

    #[must_use]
    pub fn location(&self) -> (i32, i32) {
        let t = self.transform();
        (t.x, t.y)
    }

    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.transform().rotation()
    }

    pub fn set_location(&mut self, x: i32, y: i32) {
        self.stage.world.set_location(self.id, x, y);
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.stage.world.set_rotation(self.id, degrees);
    }

    /// Move `distance` cells along the current rotation
    pub fn move_by(&mut self, distance: f64) {
        let t = self.transform();
        let (dx, dy) = t.step(distance);
        self.set_location(t.x + dx, t.y + dy);
    }

    /// Rotate clockwise
    pub fn turn(&mut self, degrees: f64) {
        self.set_rotation(self.rotation() + degrees);
    }

    /// Face the cell (x, y)
    pub fn turn_towards(&mut self, x: i32, y: i32) {
        let rotation = self.transform().rotation_towards(x, y);
        self.set_rotation(rotation);
    }

    /// Whether the actor stands on the outermost cells of the world
    #[must_use]
    pub fn is_at_edge(&self) -> bool {
        let (x, y) = self.location();
        let world = &self.stage.world;
        x <= 0 || y <= 0 || x >= world.width() as i32 - 1 || y >= world.height() as i32 - 1
    }

    #[must_use]
    pub fn image(&self) -> Option<hecs::Ref<'_, Image>> {
        self.stage.world.image(self.id)
    }

    pub fn image_mut(&mut self) -> Option<hecs::RefMut<'_, Image>> {
        self.stage.world.image_mut(self.id)
    }

    pub fn set_image(&mut self, image: Image) {
        self.stage.world.set_image(self.id, image);
    }

    /// Other actors of type `T` whose image overlaps this one
    #[must_use]
    pub fn intersecting_of<T: Actor>(&self) -> Vec<ActorId> {
        self.stage.world.intersecting_of::<T>(self.id)
    }

    /// Whether any actor of type `T` overlaps this one
    #[must_use]
    pub fn is_touching<T: Actor>(&self) -> bool {
        !self.intersecting_of::<T>().is_empty()
    }

    /// Remove one overlapping actor of type `T`; returns whether one was removed
    pub fn remove_touching<T: Actor>(&mut self) -> bool {
        match self.intersecting_of::<T>().first() {
            Some(&other) => self.stage.world.remove_from_world(other),
            None => false,
        }
    }

    /// Actors of type `T` in the cell at an offset from this actor
    #[must_use]
    pub fn objects_at_offset_of<T: Actor>(&self, dx: i32, dy: i32) -> Vec<ActorId> {
        let (x, y) = self.location();
        self.stage
            .world
            .objects_at_of::<T>(x + dx, y + dy)
            .into_iter()
            .filter(|&other| other != self.id)
            .collect()
    }

    /// Remove the acting actor; `on_world_remove` runs once `act` returns
    pub fn remove_self(&mut self) {
        self.stage.world.remove_from_world(self.id);
    }
}

impl<'a> Deref for ActorContext<'a> {
    type Target = Stage<'a>;

    fn deref(&self) -> &Self::Target {
        &self.stage
    }
}

impl DerefMut for ActorContext<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.stage
    }
}
