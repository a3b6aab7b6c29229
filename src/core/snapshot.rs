//! World snapshots
//!
//! Saves the layout of a world (actor types, positions and texts) as RON or
//! JSON and rebuilds worlds from it through an [`ActorRegistry`].

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::world::{Actor, ActorType, World};

/// One actor as recorded in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    /// Full Rust type name of the actor
    pub type_name: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub rotation: f64,
}

/// A text shown in a cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSnapshot {
    pub x: i32,
    pub y: i32,
    pub text: String,
}

/// Serializable layout of a world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub width: u32,
    pub height: u32,
    pub cell_size: u32,
    #[serde(default = "default_bounded")]
    pub bounded: bool,
    /// Actors in insertion order
    #[serde(default)]
    pub actors: Vec<ActorSnapshot>,
    #[serde(default)]
    pub texts: Vec<TextSnapshot>,
}

const fn default_bounded() -> bool {
    true
}

impl WorldSnapshot {
    /// Save the snapshot to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SnapshotError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| SnapshotError::IoError(e.to_string()))
    }

    /// Load a snapshot from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let content =
            fs::read_to_string(path).map_err(|e| SnapshotError::IoError(e.to_string()))?;
        ron::from_str(&content).map_err(|e| SnapshotError::DeserializeError(e.to_string()))
    }

    /// Save the snapshot to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| SnapshotError::IoError(e.to_string()))
    }

    /// Load a snapshot from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let content =
            fs::read_to_string(path).map_err(|e| SnapshotError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| SnapshotError::DeserializeError(e.to_string()))
    }

    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }
}

impl World {
    /// Record the layout of this world
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        let actors = self
            .actors()
            .into_iter()
            .filter_map(|id| {
                let ty = self.actor_type(id)?;
                let transform = self.transform(id)?;
                Some(ActorSnapshot {
                    type_name: ty.name().to_string(),
                    x: transform.x,
                    y: transform.y,
                    rotation: transform.rotation(),
                })
            })
            .collect();
        let texts = self
            .texts()
            .map(|((x, y), text)| TextSnapshot {
                x,
                y,
                text: text.to_string(),
            })
            .collect();

        WorldSnapshot {
            width: self.width(),
            height: self.height(),
            cell_size: self.cell_size(),
            bounded: self.is_bounded(),
            actors,
            texts,
        }
    }
}

type Factory = Box<dyn Fn() -> Box<dyn Actor>>;

/// Maps actor type names to constructors
#[derive(Default)]
pub struct ActorRegistry {
    factories: FxHashMap<&'static str, Factory>,
}

impl ActorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `T` restorable, built with `T::default()`
    pub fn register<T: Actor + Default>(&mut self) -> &mut Self {
        self.register_with(ActorType::of::<T>(), || Box::new(T::default()));
        self
    }

    /// Make a type restorable with a custom constructor
    pub fn register_with(
        &mut self,
        ty: ActorType,
        factory: impl Fn() -> Box<dyn Actor> + 'static,
    ) -> &mut Self {
        self.factories.insert(ty.name(), Box::new(factory));
        self
    }

    #[must_use]
    pub fn is_registered(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Build a world from a snapshot; unknown actor types are skipped
    #[must_use]
    pub fn restore(&self, snapshot: &WorldSnapshot) -> World {
        let mut world = if snapshot.bounded {
            World::new(snapshot.width, snapshot.height, snapshot.cell_size)
        } else {
            World::unbounded(snapshot.width, snapshot.height, snapshot.cell_size)
        };

        for actor in &snapshot.actors {
            let Some(factory) = self.factories.get(actor.type_name.as_str()) else {
                log::warn!("Skipping unregistered actor type {}", actor.type_name);
                continue;
            };
            let id = world.add_boxed(factory(), actor.x, actor.y);
            world.set_rotation(id, actor.rotation);
        }
        for text in &snapshot.texts {
            world.show_text(Some(&text.text), text.x, text.y);
        }
        log::info!(
            "Restored world with {} of {} actors",
            world.number_of_actors(),
            snapshot.actors.len()
        );
        world
    }
}

impl std::fmt::Debug for ActorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorRegistry")
            .field("types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Errors that can occur while saving or loading snapshots
#[derive(Debug, Clone)]
pub enum SnapshotError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {}
