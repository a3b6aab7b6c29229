//! Worlds and the actors living in them
//!
//! Actor data is stored in a hecs world; behaviours are trait objects
//! implementing [`Actor`].

mod actor;
mod components;
mod context;
#[allow(clippy::module_inception)]
mod world;

pub use actor::{Actor, ActorId, ActorType, AsAny};
pub use components::{ActorKind, Spawned, Transform, normalize_degrees};
pub use context::{ActorContext, Scenario, SoundRequest, Stage};
pub(crate) use context::{NextWorld, Requests};
pub use world::{Bounds, World};
