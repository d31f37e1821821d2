//! The single published World

use arc_swap::ArcSwapOption;
use std::sync::Arc;

use crate::model::World;

/// Holds at most one published World. Readers take an `Arc` and keep it
/// for as long as they like; publishing swaps the pointer and never waits
/// for them.
#[derive(Debug, Default)]
pub struct WorldSlot {
    current: ArcSwapOption<World>,
}

impl WorldSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published World. The previous one is dropped once its
    /// last reader lets go.
    pub fn publish(&self, world: World) -> Arc<World> {
        let world = Arc::new(world);
        self.current.store(Some(world.clone()));
        world
    }

    pub fn get(&self) -> Option<Arc<World>> {
        self.current.load_full()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readers_keep_their_snapshot() {
        let slot = WorldSlot::new();
        assert!(!slot.is_loaded());

        let mut first = World::new();
        first.name = "first".into();
        slot.publish(first);
        let held = slot.get().unwrap();

        let mut second = World::new();
        second.name = "second".into();
        slot.publish(second);

        assert_eq!(held.name, "first");
        assert_eq!(slot.get().unwrap().name, "second");
    }
}
