//! The world: a grid of cells holding actors
//!
//! Actor data (position, image, type) lives in a hecs world; behaviours are
//! kept beside it keyed by entity. During an act cycle each behaviour is taken
//! out of its slot while it acts, so an actor can freely mutate the world,
//! including removing itself.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use hecs::Entity;
use rustc_hash::FxHashMap;
use winit::keyboard::KeyCode;

use crate::assets::{AssetCache, ResourceKind, Resources};
use crate::core::Result;
use crate::graphics::{Color, Font, Image, ImageError, Text};
use crate::input::Input;

use super::components::{ActorKind, Spawned, Transform};
use super::context::{ActorContext, Requests, Scenario, Stage};
use super::{Actor, ActorId, ActorType};

/// Pixel rectangle an actor's image covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    /// Whether the two rectangles share a positive area
    #[must_use]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.width > 0
            && self.height > 0
            && other.width > 0
            && other.height > 0
            && i64::from(self.x) < i64::from(other.x) + i64::from(other.width)
            && i64::from(other.x) < i64::from(self.x) + i64::from(self.width)
            && i64::from(self.y) < i64::from(other.y) + i64::from(other.height)
            && i64::from(other.y) < i64::from(self.y) + i64::from(self.height)
    }
}

/// Pixel coordinate of the centre of cell `index`; saturates far outside
/// unbounded worlds
fn cell_centre(index: i32, cell: i32) -> i32 {
    index.saturating_mul(cell).saturating_add(cell / 2)
}

/// Top-left pixel of a sprite `size` pixels wide centred on cell `index`
fn sprite_origin(index: i32, cell: i32, size: u32) -> i32 {
    cell_centre(index, cell).saturating_sub(size as i32 / 2)
}

/// A text placed in a cell, centred on it
#[derive(Debug, Clone)]
struct PlacedText {
    text: Text,
    x: i32,
    y: i32,
}

/// A grid of `width` x `height` square cells of `cell_size` pixels
pub struct World {
    ecs: hecs::World,
    /// `None` while the actor is acting or being added
    behaviors: FxHashMap<Entity, Option<Box<dyn Actor>>>,
    next_spawn: u64,
    width: u32,
    height: u32,
    cell_size: u32,
    bounded: bool,
    act_order: Vec<ActorType>,
    paint_order: Vec<ActorType>,
    background: Option<Image>,
    canvas: Image,
    texts: BTreeMap<(i32, i32), PlacedText>,
    running: bool,
    speed: Option<Duration>,
    last_act: Option<Instant>,
    resources: Resources,
    images: AssetCache<Image>,
    pub(crate) requests: Requests,
    pub(crate) view_offset: (i32, i32),
}

impl World {
    /// Create a bounded world; actors cannot leave it
    #[must_use]
    pub fn new(width: u32, height: u32, cell_size: u32) -> Self {
        let (width, height, cell_size) = (width.max(1), height.max(1), cell_size.max(1));
        Self {
            ecs: hecs::World::new(),
            behaviors: FxHashMap::default(),
            next_spawn: 0,
            width,
            height,
            cell_size,
            bounded: true,
            act_order: Vec::new(),
            paint_order: Vec::new(),
            background: None,
            canvas: Image::filled(width * cell_size, height * cell_size, Color::BLACK),
            texts: BTreeMap::new(),
            running: true,
            speed: None,
            last_act: None,
            resources: Resources::default(),
            images: AssetCache::new(),
            requests: Requests::default(),
            view_offset: (0, 0),
        }
    }

    /// Create a world actors may leave
    #[must_use]
    pub fn unbounded(width: u32, height: u32, cell_size: u32) -> Self {
        Self {
            bounded: false,
            ..Self::new(width, height, cell_size)
        }
    }

    /// Width in cells
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Edge length of a cell in pixels
    #[must_use]
    pub const fn cell_size(&self) -> u32 {
        self.cell_size
    }

    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.bounded
    }

    /// Size of the canvas in pixels
    #[must_use]
    pub const fn pixel_size(&self) -> (u32, u32) {
        (self.width * self.cell_size, self.height * self.cell_size)
    }

    #[must_use]
    pub fn number_of_actors(&self) -> usize {
        self.behaviors.len()
    }

    #[must_use]
    pub fn contains(&self, id: ActorId) -> bool {
        self.ecs.contains(id.0)
    }

    fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        if self.bounded {
            (
                x.clamp(0, self.width as i32 - 1),
                y.clamp(0, self.height as i32 - 1),
            )
        } else {
            (x, y)
        }
    }

    /// Add an actor at cell (x, y)
    ///
    /// The actor gets the default image and its `on_world_add` runs before
    /// this returns.
    pub fn add_to_world<A: Actor>(&mut self, actor: A, x: i32, y: i32) -> ActorId {
        self.add_boxed(Box::new(actor), x, y)
    }

    /// Add an already boxed actor
    pub fn add_boxed(&mut self, mut actor: Box<dyn Actor>, x: i32, y: i32) -> ActorId {
        let kind = actor.actor_type();
        let (x, y) = self.clamp(x, y);
        let spawned = Spawned(self.next_spawn);
        self.next_spawn += 1;

        let entity = self.ecs.spawn((
            Transform::new(x, y, 0.0),
            Image::default_actor(),
            ActorKind(kind),
            spawned,
        ));
        self.behaviors.insert(entity, None);
        let id = ActorId(entity);
        log::debug!("Added {kind} at ({x}, {y})");

        actor.on_world_add(&mut ActorContext::detached(self, id));
        self.restore_behavior(entity, actor);
        id
    }

    /// Put a behaviour back into its slot, or finish its removal
    fn restore_behavior(&mut self, entity: Entity, mut actor: Box<dyn Actor>) {
        match self.behaviors.get_mut(&entity) {
            Some(slot) => *slot = Some(actor),
            None => actor.on_world_remove(),
        }
    }

    /// Remove an actor; returns `false` if it is not in this world
    ///
    /// An actor removed while it acts gets `on_world_remove` once its
    /// `act` returns.
    pub fn remove_from_world(&mut self, id: ActorId) -> bool {
        if self.ecs.despawn(id.0).is_err() {
            return false;
        }
        if let Some(Some(mut actor)) = self.behaviors.remove(&id.0) {
            actor.on_world_remove();
        }
        true
    }

    /// Remove several actors; returns how many were in this world
    pub fn remove_all(&mut self, ids: &[ActorId]) -> usize {
        ids.iter().filter(|&&id| self.remove_from_world(id)).count()
    }

    /// Entities sorted by the given type order, then insertion order
    fn ordered(&self, order: &[ActorType]) -> Vec<Entity> {
        let mut all: Vec<(Spawned, Entity, ActorType)> = self
            .ecs
            .query::<(&Spawned, &ActorKind)>()
            .iter()
            .map(|(entity, (spawned, kind))| (*spawned, entity, kind.0))
            .collect();
        all.sort_unstable_by_key(|(spawned, ..)| *spawned);

        let mut sorted = Vec::with_capacity(all.len());
        for ty in order {
            sorted.extend(all.iter().filter(|(_, _, k)| k == ty).map(|(_, e, _)| *e));
        }
        sorted.extend(
            all.iter()
                .filter(|(_, _, k)| !order.contains(k))
                .map(|(_, e, _)| *e),
        );
        sorted
    }

    /// Types acting first, in this order; other types act afterwards
    pub fn set_act_order(&mut self, order: &[ActorType]) {
        self.act_order = dedup(order);
    }

    #[must_use]
    pub fn act_order(&self) -> &[ActorType] {
        &self.act_order
    }

    /// Types painted first, in this order; later painted actors end up on top
    pub fn set_paint_order(&mut self, order: &[ActorType]) {
        self.paint_order = dedup(order);
    }

    #[must_use]
    pub fn paint_order(&self) -> &[ActorType] {
        &self.paint_order
    }

    /// All actors in insertion order
    #[must_use]
    pub fn actors(&self) -> Vec<ActorId> {
        self.ordered(&[]).into_iter().map(ActorId).collect()
    }

    /// Actors of type `T` in insertion order
    #[must_use]
    pub fn actors_of<T: Actor>(&self) -> Vec<ActorId> {
        let ty = ActorType::of::<T>();
        self.actors()
            .into_iter()
            .filter(|&id| self.actor_type(id) == Some(ty))
            .collect()
    }

    /// The actor behind `id` if it is a `T`
    ///
    /// Returns `None` for the actor that is currently acting.
    #[must_use]
    pub fn actor<T: Actor>(&self, id: ActorId) -> Option<&T> {
        self.behaviors.get(&id.0)?.as_deref()?.downcast_ref::<T>()
    }

    pub fn actor_mut<T: Actor>(&mut self, id: ActorId) -> Option<&mut T> {
        self.behaviors
            .get_mut(&id.0)?
            .as_deref_mut()?
            .downcast_mut::<T>()
    }

    #[must_use]
    pub fn actor_type(&self, id: ActorId) -> Option<ActorType> {
        self.ecs.get::<&ActorKind>(id.0).ok().map(|kind| kind.0)
    }

    #[must_use]
    pub fn transform(&self, id: ActorId) -> Option<Transform> {
        self.ecs.get::<&Transform>(id.0).ok().map(|t| *t)
    }

    /// Move an actor to cell (x, y), clamped in bounded worlds
    pub fn set_location(&mut self, id: ActorId, x: i32, y: i32) -> bool {
        let (x, y) = self.clamp(x, y);
        match self.ecs.get::<&mut Transform>(id.0) {
            Ok(mut transform) => {
                transform.x = x;
                transform.y = y;
                true
            }
            Err(_) => false,
        }
    }

    pub fn set_rotation(&mut self, id: ActorId, degrees: f64) -> bool {
        match self.ecs.get::<&mut Transform>(id.0) {
            Ok(mut transform) => {
                transform.set_rotation(degrees);
                true
            }
            Err(_) => false,
        }
    }

    #[must_use]
    pub fn image(&self, id: ActorId) -> Option<hecs::Ref<'_, Image>> {
        self.ecs.get::<&Image>(id.0).ok()
    }

    pub fn image_mut(&mut self, id: ActorId) -> Option<hecs::RefMut<'_, Image>> {
        self.ecs.get::<&mut Image>(id.0).ok()
    }

    pub fn set_image(&mut self, id: ActorId, image: Image) -> bool {
        self.ecs.insert_one(id.0, image).is_ok()
    }

    /// Pixel rectangle of an actor's rotated image, centred on its cell
    #[must_use]
    pub fn bounds(&self, id: ActorId) -> Option<Bounds> {
        let transform = self.transform(id)?;
        let image = self.image(id)?;
        let (w, h) = image.rotated_size(transform.rotation());
        let cell = self.cell_size as i32;
        Some(Bounds {
            x: sprite_origin(transform.x, cell, w),
            y: sprite_origin(transform.y, cell, h),
            width: w as i32,
            height: h as i32,
        })
    }

    fn cell_bounds(&self, x: i32, y: i32) -> Bounds {
        let cell = self.cell_size as i32;
        Bounds {
            x: x.saturating_mul(cell),
            y: y.saturating_mul(cell),
            width: cell,
            height: cell,
        }
    }

    /// Actors whose image overlaps cell (x, y)
    #[must_use]
    pub fn objects_at(&self, x: i32, y: i32) -> Vec<ActorId> {
        let area = self.cell_bounds(x, y);
        self.actors()
            .into_iter()
            .filter(|&id| self.bounds(id).is_some_and(|b| b.overlaps(&area)))
            .collect()
    }

    /// Actors of type `T` whose image overlaps cell (x, y)
    #[must_use]
    pub fn objects_at_of<T: Actor>(&self, x: i32, y: i32) -> Vec<ActorId> {
        let ty = ActorType::of::<T>();
        self.objects_at(x, y)
            .into_iter()
            .filter(|&id| self.actor_type(id) == Some(ty))
            .collect()
    }

    /// Other actors of type `T` whose image overlaps the image of `id`
    #[must_use]
    pub fn intersecting_of<T: Actor>(&self, id: ActorId) -> Vec<ActorId> {
        let Some(own) = self.bounds(id) else {
            return Vec::new();
        };
        self.actors_of::<T>()
            .into_iter()
            .filter(|&other| other != id)
            .filter(|&other| self.bounds(other).is_some_and(|b| b.overlaps(&own)))
            .collect()
    }

    /// Tile `image` over the whole world, optionally scaled to one cell first
    pub fn set_background(&mut self, image: Image, scale_to_cell: bool) {
        let mut tile = image;
        if scale_to_cell {
            tile.scale(self.cell_size, self.cell_size);
        }
        let (pw, ph) = self.pixel_size();
        let mut background = Image::filled(pw, ph, Color::BLACK);
        let (tw, th) = tile.size();
        if tw > 0 && th > 0 {
            for y in (0..ph).step_by(th as usize) {
                for x in (0..pw).step_by(tw as usize) {
                    background.draw_image(&tile, x as i32, y as i32);
                }
            }
        }
        self.background = Some(background);
    }

    /// Tile an image file from the image folder over the world
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be found or decoded
    pub fn set_background_file(&mut self, file: &str, scale_to_cell: bool) -> Result<()> {
        let image = self.load_image(file)?;
        self.set_background(image, scale_to_cell);
        Ok(())
    }

    /// The rendered background; white when none was set
    #[must_use]
    pub fn background(&self) -> Image {
        match &self.background {
            Some(background) => background.clone(),
            None => {
                let (pw, ph) = self.pixel_size();
                Image::filled(pw, ph, Color::WHITE)
            }
        }
    }

    /// Redraw the canvas: background, actors in paint order, then texts
    pub fn repaint(&mut self) {
        let mut canvas = match &self.background {
            Some(background) => background.clone(),
            None => {
                let (pw, ph) = self.pixel_size();
                Image::filled(pw, ph, Color::BLACK)
            }
        };

        let cell = self.cell_size as i32;
        for entity in self.ordered(&self.paint_order) {
            let (Ok(transform), Ok(image)) = (
                self.ecs.get::<&Transform>(entity),
                self.ecs.get::<&Image>(entity),
            ) else {
                continue;
            };
            let rotation = transform.rotation();
            let sprite = if rotation == 0.0 {
                None
            } else {
                Some(image.rotated(rotation))
            };
            let sprite = sprite.as_ref().unwrap_or(&*image);
            let (w, h) = sprite.size();
            let x = sprite_origin(transform.x, cell, w);
            let y = sprite_origin(transform.y, cell, h);
            canvas.draw_image(sprite, x, y);
        }

        for placed in self.texts.values() {
            canvas.draw_image(placed.text.image(), placed.x, placed.y);
        }
        self.canvas = canvas;
    }

    /// The last painted frame of the world
    #[must_use]
    pub fn canvas(&self) -> &Image {
        &self.canvas
    }

    /// Color of the canvas at the centre of cell (x, y)
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::OutOfBounds`] for cells outside the world
    pub fn color_at(&self, x: i32, y: i32) -> std::result::Result<Color, ImageError> {
        let cell = self.cell_size as i32;
        self.canvas
            .color_at(cell_centre(x, cell), cell_centre(y, cell))
    }

    /// Show black text centred in cell (x, y); `None` removes the text there
    pub fn show_text(&mut self, text: Option<&str>, x: i32, y: i32) {
        match text {
            Some(text) => {
                let styled = Font::default().text(text, Color::BLACK);
                self.show_styled_text(styled, x, y);
            }
            None => {
                self.texts.remove(&(x, y));
            }
        }
    }

    /// Show a styled text centred in cell (x, y)
    pub fn show_styled_text(&mut self, text: Text, x: i32, y: i32) {
        let (w, h) = text.size();
        let cell = self.cell_size as i32;
        let px = sprite_origin(x, cell, w);
        let py = sprite_origin(y, cell, h);
        self.texts.insert((x, y), PlacedText { text, x: px, y: py });
    }

    #[must_use]
    pub fn text_at(&self, x: i32, y: i32) -> Option<&str> {
        self.texts.get(&(x, y)).map(|placed| placed.text.display_text())
    }

    /// Texts by cell
    pub fn texts(&self) -> impl Iterator<Item = ((i32, i32), &str)> {
        self.texts
            .iter()
            .map(|(&cell, placed)| (cell, placed.text.display_text()))
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Minimum time between two act cycles
    #[must_use]
    pub fn speed(&self) -> Duration {
        self.speed.unwrap_or_default()
    }

    pub fn set_speed(&mut self, speed: Duration) {
        self.speed = Some(speed);
    }

    pub(crate) fn has_speed(&self) -> bool {
        self.speed.is_some()
    }

    /// Where resources of this world are looked up
    pub fn set_resources(&mut self, resources: Resources) {
        self.resources = resources;
    }

    #[must_use]
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Take over the image cache of the world this one replaces
    pub(crate) fn adopt_images(&mut self, previous: &mut World) {
        self.images = std::mem::take(&mut previous.images);
    }

    /// Load an image from the image folder, decoding each file once
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be found or decoded
    pub fn load_image(&mut self, file: &str) -> Result<Image> {
        let path = self.resources.resolve(file, ResourceKind::Image)?;
        let image = self.images.get_or_load(&path, |p| Image::load(p))?;
        Ok((*image).clone())
    }

    /// Run one act cycle: the scenario, then every actor in act order
    ///
    /// Actors added during the cycle act from the next cycle on.
    pub fn act_cycle(&mut self, scenario: &mut dyn Scenario, input: &Input) {
        scenario.act(&mut Stage::new(self, input));

        for entity in self.ordered(&self.act_order) {
            let Some(mut actor) = self.behaviors.get_mut(&entity).and_then(Option::take) else {
                continue;
            };
            actor.act(&mut ActorContext::new(self, input, ActorId(entity)));
            self.restore_behavior(entity, actor);
        }
    }

    /// Act and repaint if the world runs and its speed has elapsed
    ///
    /// A paused world resumes when Space is held. Returns whether an act
    /// cycle ran.
    pub fn frame(&mut self, now: Instant, scenario: &mut dyn Scenario, input: &Input) -> bool {
        if !self.running {
            if input.is_key_pressed(KeyCode::Space) {
                log::info!("World resumed");
                self.running = true;
            }
            return false;
        }
        let speed = self.speed();
        let due = self
            .last_act
            .is_none_or(|last| now.saturating_duration_since(last) >= speed);
        if !due {
            return false;
        }
        self.act_cycle(scenario, input);
        self.repaint();
        self.last_act = Some(now);
        true
    }

    /// Forget when the last act cycle ran
    pub fn reset_pacing(&mut self) {
        self.last_act = None;
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("cell_size", &self.cell_size)
            .field("bounded", &self.bounded)
            .field("actors", &self.behaviors.len())
            .field("running", &self.running)
            .finish()
    }
}

fn dedup(order: &[ActorType]) -> Vec<ActorType> {
    let mut unique: Vec<ActorType> = Vec::with_capacity(order.len());
    for ty in order {
        if !unique.contains(ty) {
            unique.push(*ty);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    type Log = Arc<Mutex<Vec<String>>>;

    /// Records every act and removal into a shared log
    struct Recorder {
        name: &'static str,
        log: Log,
    }

    impl Actor for Recorder {
        fn act(&mut self, _ctx: &mut ActorContext<'_>) {
            self.log.lock().unwrap().push(format!("act {}", self.name));
        }

        fn on_world_remove(&mut self) {
            self.log.lock().unwrap().push(format!("removed {}", self.name));
        }
    }

    struct Other {
        log: Log,
    }

    impl Actor for Other {
        fn act(&mut self, _ctx: &mut ActorContext<'_>) {
            self.log.lock().unwrap().push(String::from("act other"));
        }
    }

    struct SelfRemover {
        log: Log,
    }

    impl Actor for SelfRemover {
        fn act(&mut self, ctx: &mut ActorContext<'_>) {
            ctx.remove_self();
            self.log
                .lock()
                .unwrap()
                .push(format!("still in world: {}", ctx.is_in_world()));
        }

        fn on_world_remove(&mut self) {
            self.log.lock().unwrap().push(String::from("self removed"));
        }
    }

    struct Walker;

    impl Actor for Walker {
        fn act(&mut self, ctx: &mut ActorContext<'_>) {
            ctx.move_by(1.0);
        }
    }

    fn log() -> Log {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_new_world() {
        let world = World::new(10, 8, 20);
        assert_eq!((world.width(), world.height(), world.cell_size()), (10, 8, 20));
        assert_eq!(world.pixel_size(), (200, 160));
        assert!(world.is_bounded());
        assert!(!World::unbounded(1, 1, 1).is_bounded());
        assert_eq!(world.number_of_actors(), 0);
        assert!(world.is_running());
    }

    #[test]
    fn test_add_clamps_in_bounded_world() {
        let mut world = World::new(5, 5, 10);
        let id = world.add_to_world(Walker, 9, -3);
        let t = world.transform(id).unwrap();
        assert_eq!((t.x, t.y), (4, 0));
        assert!(world.image(id).is_some());

        let mut open = World::unbounded(5, 5, 10);
        let id = open.add_to_world(Walker, 9, -3);
        assert_eq!(open.transform(id).map(|t| (t.x, t.y)), Some((9, -3)));
    }

    #[test]
    fn test_act_in_insertion_order_without_act_order() {
        let log = log();
        let mut world = World::new(5, 5, 10);
        world.add_to_world(Recorder { name: "a", log: log.clone() }, 0, 0);
        world.add_to_world(Other { log: log.clone() }, 0, 0);
        world.add_to_world(Recorder { name: "b", log: log.clone() }, 0, 0);
        world.act_cycle(&mut (), &Input::new());
        assert_eq!(entries(&log), vec!["act a", "act other", "act b"]);
    }

    #[test]
    fn test_act_order_puts_listed_types_first() {
        let log = log();
        let mut world = World::new(5, 5, 10);
        world.add_to_world(Recorder { name: "a", log: log.clone() }, 0, 0);
        world.add_to_world(Other { log: log.clone() }, 0, 0);
        world.add_to_world(Recorder { name: "b", log: log.clone() }, 0, 0);
        world.set_act_order(&[ActorType::of::<Other>(), ActorType::of::<Other>()]);
        assert_eq!(world.act_order(), &[ActorType::of::<Other>()]);
        world.act_cycle(&mut (), &Input::new());
        assert_eq!(entries(&log), vec!["act other", "act a", "act b"]);
    }

    #[test]
    fn test_remove_calls_hook_once() {
        let log = log();
        let mut world = World::new(5, 5, 10);
        let id = world.add_to_world(Recorder { name: "a", log: log.clone() }, 0, 0);
        assert!(world.remove_from_world(id));
        assert!(!world.remove_from_world(id));
        assert_eq!(entries(&log), vec!["removed a"]);
        assert_eq!(world.number_of_actors(), 0);
        assert!(!world.contains(id));
    }

    #[test]
    fn test_remove_self_while_acting() {
        let log = log();
        let mut world = World::new(5, 5, 10);
        world.add_to_world(SelfRemover { log: log.clone() }, 0, 0);
        world.act_cycle(&mut (), &Input::new());
        assert_eq!(entries(&log), vec!["still in world: false", "self removed"]);
        assert_eq!(world.number_of_actors(), 0);
    }

    #[test]
    fn test_removed_actor_does_not_act_later_in_cycle() {
        struct Killer;
        impl Actor for Killer {
            fn act(&mut self, ctx: &mut ActorContext<'_>) {
                let victims = ctx.world().actors_of::<Recorder>();
                ctx.world_mut().remove_all(&victims);
            }
        }

        let log = log();
        let mut world = World::new(5, 5, 10);
        world.add_to_world(Killer, 0, 0);
        world.add_to_world(Recorder { name: "a", log: log.clone() }, 0, 0);
        world.act_cycle(&mut (), &Input::new());
        assert_eq!(entries(&log), vec!["removed a"]);
    }

    #[test]
    fn test_move_by_is_clamped() {
        let mut world = World::new(3, 3, 10);
        let id = world.add_to_world(Walker, 1, 1);
        let input = Input::new();
        world.act_cycle(&mut (), &input);
        world.act_cycle(&mut (), &input);
        world.act_cycle(&mut (), &input);
        assert_eq!(world.transform(id).map(|t| (t.x, t.y)), Some((2, 1)));
    }

    #[test]
    fn test_downcast_actor() {
        let log = log();
        let mut world = World::new(5, 5, 10);
        let id = world.add_to_world(Recorder { name: "a", log }, 0, 0);
        assert_eq!(world.actor::<Recorder>(id).map(|p| p.name), Some("a"));
        assert!(world.actor::<Walker>(id).is_none());
        world.actor_mut::<Recorder>(id).unwrap().name = "renamed";
        assert_eq!(world.actor::<Recorder>(id).unwrap().name, "renamed");
        assert_eq!(world.actor_type(id), Some(ActorType::of::<Recorder>()));
    }

    #[test]
    fn test_objects_at_uses_image_bounds() {
        let mut world = World::new(10, 10, 10);
        let id = world.add_to_world(Walker, 2, 2);
        world.set_image(id, Image::new(30, 10));
        // 30px wide image centred on cell 2 spans cells 1 to 3
        assert_eq!(world.objects_at(1, 2), vec![id]);
        assert_eq!(world.objects_at(3, 2), vec![id]);
        assert!(world.objects_at(4, 2).is_empty());
        assert!(world.objects_at(2, 1).is_empty());
        assert_eq!(world.objects_at_of::<Walker>(2, 2), vec![id]);
        assert!(world.objects_at_of::<Recorder>(2, 2).is_empty());
    }

    #[test]
    fn test_rotation_changes_bounds() {
        let mut world = World::new(10, 10, 10);
        let id = world.add_to_world(Walker, 5, 5);
        world.set_image(id, Image::new(30, 10));
        world.set_rotation(id, 90.0);
        assert!(world.objects_at(4, 5).is_empty());
        assert_eq!(world.objects_at(5, 4), vec![id]);
    }

    #[test]
    fn test_intersecting_excludes_self() {
        let mut world = World::new(10, 10, 10);
        let a = world.add_to_world(Walker, 2, 2);
        let b = world.add_to_world(Walker, 3, 2);
        let far = world.add_to_world(Walker, 8, 8);
        world.set_image(a, Image::new(20, 10));
        world.set_image(b, Image::new(20, 10));
        assert_eq!(world.intersecting_of::<Walker>(a), vec![b]);
        assert!(world.intersecting_of::<Walker>(far).is_empty());
    }

    #[test]
    fn test_bounds_overlap_needs_area() {
        let a = Bounds { x: 0, y: 0, width: 10, height: 10 };
        let touching = Bounds { x: 10, y: 0, width: 10, height: 10 };
        let inside = Bounds { x: 9, y: 9, width: 1, height: 1 };
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
    }

    #[test]
    fn test_far_away_actor_does_not_overflow() {
        let mut world = World::unbounded(10, 10, 10);
        let far = i32::MAX / 2;
        let id = world.add_to_world(Walker, far, 0);
        world.set_image(id, Image::new(10, 10));
        let bounds = world.bounds(id).unwrap();
        assert_eq!(bounds.x, i32::MAX - 5);
        assert!(world.objects_at(0, 0).is_empty());
        assert_eq!(world.objects_at(far, 0), vec![id]);
        world.show_text(Some("far"), far, far);
        world.repaint();
        assert!(world.color_at(far, 0).is_err());
    }

    #[test]
    fn test_background_is_white_until_set_and_tiles() {
        let mut world = World::new(4, 2, 10);
        assert_eq!(world.background().color_at(0, 0), Ok(Color::WHITE));

        let mut tile = Image::filled(2, 2, Color::RED);
        tile.set_color(Color::BLUE);
        tile.set_color_at(0, 0).unwrap();
        world.set_background(tile, false);
        let background = world.background();
        assert_eq!(background.size(), (40, 20));
        assert_eq!(background.color_at(0, 0), Ok(Color::BLUE));
        assert_eq!(background.color_at(1, 0), Ok(Color::RED));
        assert_eq!(background.color_at(38, 18), Ok(Color::BLUE));
    }

    #[test]
    fn test_background_scaled_to_cell() {
        let mut world = World::new(2, 1, 10);
        world.set_background(Image::filled(3, 3, Color::GREEN), true);
        assert_eq!(world.background().color_at(15, 5), Ok(Color::GREEN));
    }

    #[test]
    fn test_repaint_black_without_background() {
        let mut world = World::new(3, 3, 10);
        world.repaint();
        assert_eq!(world.color_at(1, 1), Ok(Color::BLACK));
        assert!(world.color_at(3, 0).is_err());
    }

    #[test]
    fn test_repaint_later_paint_order_on_top() {
        let mut world = World::new(3, 3, 10);
        let walker = world.add_to_world(Walker, 1, 1);
        let recorder = world.add_to_world(Recorder { name: "p", log: log() }, 1, 1);
        world.set_image(walker, Image::filled(10, 10, Color::RED));
        world.set_image(recorder, Image::filled(10, 10, Color::BLUE));

        world.repaint();
        assert_eq!(world.color_at(1, 1), Ok(Color::BLUE));

        world.set_paint_order(&[ActorType::of::<Recorder>()]);
        world.repaint();
        assert_eq!(world.color_at(1, 1), Ok(Color::RED));
    }

    #[test]
    fn test_repaint_honours_image_alpha() {
        let mut world = World::new(1, 1, 10);
        world.set_background(Image::filled(10, 10, Color::WHITE), false);
        let id = world.add_to_world(Walker, 0, 0);
        let mut image = Image::filled(10, 10, Color::BLACK);
        image.set_alpha(0);
        world.set_image(id, image);
        world.repaint();
        assert_eq!(world.color_at(0, 0), Ok(Color::WHITE));
    }

    #[test]
    fn test_show_text() {
        let mut world = World::new(5, 5, 40);
        world.set_background(Image::filled(40, 40, Color::WHITE), false);
        world.show_text(Some("hi"), 2, 2);
        assert_eq!(world.text_at(2, 2), Some("hi"));
        assert_eq!(world.texts().count(), 1);
        world.repaint();
        assert!(world.canvas().as_rgba().pixels().any(|p| p[0] == 0 && p[3] == 255));
        world.show_text(None, 2, 2);
        assert_eq!(world.text_at(2, 2), None);
    }

    #[test]
    fn test_frame_respects_speed_and_pause() {
        let log = log();
        let mut world = World::new(5, 5, 10);
        world.add_to_world(Recorder { name: "a", log: log.clone() }, 0, 0);
        world.set_speed(Duration::from_millis(100));
        let input = Input::new();
        let start = Instant::now();

        assert!(world.frame(start, &mut (), &input));
        assert!(!world.frame(start + Duration::from_millis(50), &mut (), &input));
        assert!(world.frame(start + Duration::from_millis(100), &mut (), &input));
        assert_eq!(entries(&log).len(), 2);

        world.set_running(false);
        assert!(!world.frame(start + Duration::from_secs(5), &mut (), &input));

        let mut space = Input::new();
        space.process_keyboard(KeyCode::Space, winit::event::ElementState::Pressed);
        assert!(!world.frame(start + Duration::from_secs(6), &mut (), &space));
        assert!(world.is_running());
        assert!(world.frame(start + Duration::from_secs(7), &mut (), &input));
    }

    #[test]
    fn test_scenario_acts_before_actors() {
        struct Spawner {
            log: Log,
        }
        impl Scenario for Spawner {
            fn act(&mut self, stage: &mut Stage<'_>) {
                self.log.lock().unwrap().push(String::from("scenario"));
                let count = stage.world().number_of_actors();
                if count == 0 {
                    stage
                        .world_mut()
                        .add_to_world(Recorder { name: "spawned", log: self.log.clone() }, 0, 0);
                }
            }
        }

        let log = log();
        let mut world = World::new(5, 5, 10);
        let mut scenario = Spawner { log: log.clone() };
        world.act_cycle(&mut scenario, &Input::new());
        assert_eq!(entries(&log), vec!["scenario", "act spawned"]);
    }

    #[test]
    fn test_on_world_add_sees_position() {
        struct Greeter {
            seen: Option<(i32, i32)>,
        }
        impl Actor for Greeter {
            fn act(&mut self, _ctx: &mut ActorContext<'_>) {}
            fn on_world_add(&mut self, ctx: &mut ActorContext<'_>) {
                self.seen = Some(ctx.location());
            }
        }

        let mut world = World::new(5, 5, 10);
        let id = world.add_to_world(Greeter { seen: None }, 3, 4);
        assert_eq!(world.actor::<Greeter>(id).unwrap().seen, Some((3, 4)));
    }
}
