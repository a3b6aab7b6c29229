//! Actors with a one-time initialisation on their first act

use crate::world::{Actor, ActorContext};

/// Behaviour wrapped by [`InitOnce`]
pub trait Init: Send + Sync + 'static {
    /// Runs on the first act cycle only, before `act`
    fn init(&mut self, ctx: &mut ActorContext<'_>);

    fn act(&mut self, _ctx: &mut ActorContext<'_>) {}

    fn on_world_remove(&mut self) {}
}

/// Runs [`Init::init`] once, then [`Init::act`] on every act cycle
#[derive(Debug, Clone, Default)]
pub struct InitOnce<T> {
    inner: T,
    initialized: bool,
}

impl<T: Init> InitOnce<T> {
    #[must_use]
    pub const fn new(inner: T) -> Self {
        Self {
            inner,
            initialized: false,
        }
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub const fn inner(&self) -> &T {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Init> Actor for InitOnce<T> {
    fn act(&mut self, ctx: &mut ActorContext<'_>) {
        if !self.initialized {
            self.inner.init(ctx);
            self.initialized = true;
        }
        self.inner.act(ctx);
    }

    fn on_world_remove(&mut self) {
        self.inner.on_world_remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Input;
    use crate::world::World;

    #[derive(Default)]
    struct Spawner {
        inits: u32,
        acts: u32,
    }

    impl Init for Spawner {
        fn init(&mut self, ctx: &mut ActorContext<'_>) {
            self.inits += 1;
            ctx.turn(90.0);
        }

        fn act(&mut self, _ctx: &mut ActorContext<'_>) {
            self.acts += 1;
        }
    }

    #[test]
    fn test_init_runs_once() {
        let mut world = World::new(3, 3, 10);
        let id = world.add_to_world(InitOnce::new(Spawner::default()), 1, 1);
        assert!(!world.actor::<InitOnce<Spawner>>(id).unwrap().is_initialized());

        let input = Input::new();
        world.act_cycle(&mut (), &input);
        world.act_cycle(&mut (), &input);

        let actor = world.actor::<InitOnce<Spawner>>(id).unwrap();
        assert!(actor.is_initialized());
        assert_eq!((actor.inner().inits, actor.inner().acts), (1, 2));
        assert_eq!(world.transform(id).unwrap().rotation(), 90.0);
    }
}
