//! Actors and their identity

use std::any::{Any, TypeId};

use super::context::ActorContext;

/// Handle of an actor inside a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub(crate) hecs::Entity);

impl ActorId {
    /// Raw bits, stable while the actor lives
    #[must_use]
    pub fn to_bits(self) -> u64 {
        self.0.to_bits().get()
    }
}

/// Runtime identity of an actor's Rust type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorType {
    id: TypeId,
    name: &'static str,
}

impl ActorType {
    #[must_use]
    pub fn of<T: Actor>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Full type path, e.g. `my_game::Rocket`
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.id
    }
}

impl std::fmt::Display for ActorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Downcasting support, implemented for every `'static` type
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Something that lives in a world and acts once per act cycle
pub trait Actor: AsAny + Send + Sync {
    /// Called once per act cycle while the world is running
    fn act(&mut self, ctx: &mut ActorContext<'_>);

    /// Called right after the actor was added to a world
    fn on_world_add(&mut self, _ctx: &mut ActorContext<'_>) {}

    /// Called right after the actor was removed from its world
    fn on_world_remove(&mut self) {}
}

impl dyn Actor {
    /// Type identity of the concrete actor
    #[must_use]
    pub fn actor_type(&self) -> ActorType {
        ActorType {
            id: self.as_any().type_id(),
            name: self.type_name(),
        }
    }

    #[must_use]
    pub fn downcast_ref<T: Actor>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Actor>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rocket;

    impl Actor for Rocket {
        fn act(&mut self, _ctx: &mut ActorContext<'_>) {}
    }

    struct Rock;

    impl Actor for Rock {
        fn act(&mut self, _ctx: &mut ActorContext<'_>) {}
    }

    #[test]
    fn test_actor_type_of_boxed_matches_static() {
        let boxed: Box<dyn Actor> = Box::new(Rocket);
        assert_eq!(boxed.actor_type(), ActorType::of::<Rocket>());
        assert_ne!(boxed.actor_type(), ActorType::of::<Rock>());
    }

    #[test]
    fn test_short_name() {
        assert_eq!(ActorType::of::<Rocket>().short_name(), "Rocket");
        assert_eq!(ActorType::of::<Rocket>().to_string(), "Rocket");
        assert!(ActorType::of::<Rocket>().name().ends_with("::Rocket"));
    }

    #[test]
    fn test_downcast() {
        let mut boxed: Box<dyn Actor> = Box::new(Rocket);
        assert!(boxed.downcast_ref::<Rocket>().is_some());
        assert!(boxed.downcast_ref::<Rock>().is_none());
        assert!(boxed.downcast_mut::<Rocket>().is_some());
    }
}
