//! Prepare-pass context and invalidation accumulation
//!
//! A [`TreeInfo`] travels down the tree during preparation. Each prepared
//! list records which of its content categories changed; the owning node
//! reads the accumulated output to decide whether a redraw must be scheduled.

use bitflags::bitflags;

/// How deep a preparation traversal reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalMode {
    /// Full prepare: staged properties, uploads, and child recursion
    Full,
    /// Playback-side refresh only; staged UI-thread properties are left alone
    PlaybackOnly,
}

bitflags! {
    /// Which content categories reported a change during preparation
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InvalidationFlags: u8 {
        /// A mutable image needed a re-upload
        const MUTABLE_IMAGES = 1 << 0;
        /// A vector-icon root committed changed properties
        const VECTOR_ICONS = 1 << 1;
        /// A sub-list child reported its own invalidation
        const CHILD_NODES = 1 << 2;
    }
}

/// Accumulated results of a preparation traversal
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeOutput {
    /// Union of every invalidation reported during the pass
    pub invalidations: InvalidationFlags,
}

impl TreeOutput {
    /// Whether any content change requires a redraw
    pub fn requires_redraw(&self) -> bool {
        !self.invalidations.is_empty()
    }
}

/// Per-traversal context handed to `prepare_list_and_children`
#[derive(Debug)]
pub struct TreeInfo {
    /// Traversal depth for this pass
    pub mode: TraversalMode,

    /// Whether texture uploads should actually be performed this pass
    ///
    /// Upload checks still run when false so invalidation state stays
    /// accurate; the backend defers the transfer itself.
    pub prepare_textures: bool,

    /// Accumulated invalidation output
    pub out: TreeOutput,
}

impl TreeInfo {
    /// Create a context for a new traversal
    pub fn new(mode: TraversalMode) -> Self {
        Self {
            mode,
            prepare_textures: true,
            out: TreeOutput::default(),
        }
    }
}
