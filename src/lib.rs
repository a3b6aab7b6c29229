//! A small educational 2D game framework
//!
//! Scenarios are built from a [`world::World`], a grid of cells populated
//! by [`world::Actor`]s. Once started, the world runs act cycles at a fixed
//! speed: the scenario acts first, then every actor, then the canvas is
//! repainted and shown in a window.
//!
//! This crate provides:
//! - Worlds, actors, collision queries and act/paint ordering
//! - Software drawing on images with a built-in bitmap font
//! - Keyboard and mouse state with Greenfoot style key names
//! - Sound playback with rodio
//! - A `greenfoot.cfg` configuration file
//! - PlantUML class diagrams of a scenario's sources
//! - Release packaging of a scenario

pub mod assets;
pub mod audio;
pub mod core;
pub mod diagram;
pub mod graphics;
pub mod input;
pub mod release;
pub mod renderer;
pub mod templates;
pub mod world;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use winit;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::core::{Application, CONFIG_FILE, Config, WindowMode, run};
    pub use crate::graphics::{Color, Font, Image, Text};
    pub use crate::templates::{Counter, Init, InitOnce, Label, Timer};
    pub use crate::world::{Actor, ActorContext, ActorId, ActorType, Scenario, Stage, World};
    pub use glam::Vec2;
    pub use winit::keyboard::KeyCode;
}
