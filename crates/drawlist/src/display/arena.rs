//! Arena storage for drawables
//!
//! Drawables recorded into a display list live exactly as long as the
//! recording generation that created them. The arena therefore supports only
//! two lifetimes: allocate-and-keep, and bulk reset. Individual entries are
//! never freed and never move; callers address them through copyable
//! [`DrawableId`] keys, which stay valid until the next `reset`.
//!
//! The recorded picture references these keys, which is why the container
//! must drop its picture handle before resetting the arena — a key resolved
//! after reset would address a recycled slot.

use super::drawable::Drawable;

/// Key into a [`DrawableArena`]
///
/// Valid until the owning arena's next `reset`. Resolving a key from an
/// earlier generation is a caller contract breach and panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawableId {
    block: u32,
    slot: u32,
    generation: u32,
}

/// Bump storage for one display-list generation
///
/// A growable chain of fixed-capacity blocks. Entries append to the newest
/// block; a full block is sealed and a fresh one started, so existing entries
/// never relocate.
#[derive(Debug)]
pub struct DrawableArena {
    blocks: Vec<Vec<Box<dyn Drawable>>>,
    block_capacity: usize,
    generation: u32,
}

impl DrawableArena {
    /// Default number of drawables per block
    pub const DEFAULT_BLOCK_CAPACITY: usize = 64;

    /// Create an arena with the default block capacity
    pub fn new() -> Self {
        Self::with_block_capacity(Self::DEFAULT_BLOCK_CAPACITY)
    }

    /// Create an arena with a custom block capacity
    ///
    /// A zero capacity is rounded up to one.
    pub fn with_block_capacity(block_capacity: usize) -> Self {
        let block_capacity = block_capacity.max(1);
        Self {
            blocks: vec![Vec::with_capacity(block_capacity)],
            block_capacity,
            generation: 0,
        }
    }

    /// Place a drawable in the arena and return its key
    ///
    /// The allocation itself does not register the drawable anywhere; callers
    /// that need the object visited during sync or prepare must also add it
    /// to the appropriate registry.
    pub fn alloc<T: Drawable + 'static>(&mut self, drawable: T) -> DrawableId {
        let full = self
            .blocks
            .last()
            .map_or(true, |block| block.len() >= self.block_capacity);
        if full {
            self.blocks.push(Vec::with_capacity(self.block_capacity));
        }
        let block = self.blocks.len() - 1;
        let slot = self.blocks[block].len();
        self.blocks[block].push(Box::new(drawable));
        DrawableId {
            block: block as u32,
            slot: slot as u32,
            generation: self.generation,
        }
    }

    /// Resolve a key to its drawable
    ///
    /// # Panics
    ///
    /// Panics if the key comes from before the last `reset` or from another
    /// arena.
    pub fn get(&self, id: DrawableId) -> &dyn Drawable {
        assert_eq!(
            id.generation, self.generation,
            "drawable key predates the arena's last reset"
        );
        self.blocks[id.block as usize][id.slot as usize].as_ref()
    }

    /// Resolve a key to its drawable, mutably
    ///
    /// # Panics
    ///
    /// Panics if the key comes from before the last `reset` or from another
    /// arena.
    pub fn get_mut(&mut self, id: DrawableId) -> &mut dyn Drawable {
        assert_eq!(
            id.generation, self.generation,
            "drawable key predates the arena's last reset"
        );
        self.blocks[id.block as usize][id.slot as usize].as_mut()
    }

    /// Number of live drawables
    pub fn len(&self) -> usize {
        self.blocks.iter().map(Vec::len).sum()
    }

    /// Whether the arena holds no drawables
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Vec::is_empty)
    }

    /// Drop every drawable and invalidate every outstanding key
    ///
    /// The first block's backing storage is kept so a recycled display list
    /// does not pay the allocation cost again.
    pub fn reset(&mut self) {
        self.blocks.truncate(1);
        if let Some(first) = self.blocks.first_mut() {
            first.clear();
        }
        // Slots are recycled, so keys must not be. Bumping the generation
        // turns any leaked key into a panic instead of a wrong drawable.
        self.generation += 1;
    }
}

impl Default for DrawableArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drawable::SubListDrawable;
    use crate::foundation::math::Mat3;
    use crate::scene::{NodeRegistry, RenderNode};

    #[test]
    fn test_alloc_and_resolve() {
        let mut nodes = NodeRegistry::new();
        let node = nodes.insert(RenderNode::new());

        let mut arena = DrawableArena::new();
        let id = arena.alloc(SubListDrawable::new(node, Mat3::identity()));

        assert_eq!(arena.len(), 1);
        let drawable = arena.get(id);
        assert_eq!(drawable.as_sub_list().unwrap().node(), node);
    }

    #[test]
    fn test_keys_survive_block_growth() {
        let mut nodes = NodeRegistry::new();
        let node = nodes.insert(RenderNode::new());

        let mut arena = DrawableArena::with_block_capacity(2);
        let ids: Vec<_> = (0..7)
            .map(|_| arena.alloc(SubListDrawable::new(node, Mat3::identity())))
            .collect();

        assert_eq!(arena.len(), 7);
        // Every key still resolves after the chain grew past one block.
        for id in ids {
            assert!(arena.get(id).as_sub_list().is_some());
        }
    }

    #[test]
    fn test_reset_empties_and_keeps_first_block() {
        let mut nodes = NodeRegistry::new();
        let node = nodes.insert(RenderNode::new());

        let mut arena = DrawableArena::with_block_capacity(2);
        for _ in 0..5 {
            arena.alloc(SubListDrawable::new(node, Mat3::identity()));
        }

        arena.reset();
        assert!(arena.is_empty());
        assert_eq!(arena.len(), 0);

        // The arena is usable again immediately.
        let id = arena.alloc(SubListDrawable::new(node, Mat3::identity()));
        assert!(arena.get(id).as_sub_list().is_some());
    }

    #[test]
    #[should_panic(expected = "predates the arena's last reset")]
    fn test_stale_key_panics_after_reset() {
        let mut nodes = NodeRegistry::new();
        let node = nodes.insert(RenderNode::new());

        let mut arena = DrawableArena::new();
        let stale = arena.alloc(SubListDrawable::new(node, Mat3::identity()));

        arena.reset();
        // The recycled slot now holds a different drawable; the old key must
        // not resolve to it.
        let _ = arena.alloc(SubListDrawable::new(node, Mat3::identity()));
        let _ = arena.get(stale);
    }
}
