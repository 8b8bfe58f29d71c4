//! The concrete paint-backend display-list container
//!
//! Owns the drawable arena, the shared picture handle, and the four child
//! registries, and implements the reset/reuse, sync, and prepare protocols
//! the owning scene-graph node drives once per frame.

use super::arena::{DrawableArena, DrawableId};
use super::display_list::DisplayList;
use super::drawable::Drawable;
use super::picture::RecordedPicture;
use super::resources::{MutableImage, VectorIconRoot};
use crate::config::ListConfig;
use crate::foundation::math::Rect;
use crate::scene::{InvalidationFlags, NodeId, RenderContext, RenderNode, TraversalMode, TreeInfo};
use log::{debug, trace, warn};
use std::rc::Rc;
use std::sync::Arc;

/// Lifecycle phase of a display list within one frame
///
/// `Recording` accepts arbitrary allocation and registration; `sync_contents`
/// moves to `Synced`; `prepare_list_and_children` requires `Synced` and moves
/// to `Prepared`. New recording activity while `Prepared` drops back to
/// `Recording`; `reset` returns to `Recording` from anywhere. Mutating a
/// `Synced` list before it has been prepared breaks the handoff contract and
/// trips a debug assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting drawable allocations and registry insertions
    Recording,
    /// Child state committed; waiting for tree preparation
    Synced,
    /// Prepared and handed off; next frame records or syncs again
    Prepared,
}

/// Arena-backed display list for the paint backend
///
/// See the crate docs for the full lifecycle walkthrough.
#[derive(Debug)]
pub struct PaintDisplayList {
    /// Declared extent of the recording
    bounds: Rect,

    /// Shared handle to the recorded command buffer
    ///
    /// `None` models a fresh, empty recording. Declared before the arena and
    /// released first on reset and drop: the picture references arena keys,
    /// so it must never outlive the generation that produced them.
    picture: Option<Arc<dyn RecordedPicture>>,

    /// Bump storage for this generation's drawables
    arena: DrawableArena,

    /// Sub-list children, in registration order
    sub_list_children: Vec<DrawableId>,

    /// External-draw children, in registration order
    external_children: Vec<DrawableId>,

    /// Mutable images needing a re-upload check each prepare pass
    mutable_images: Vec<Rc<MutableImage>>,

    /// Vector-icon roots needing a staged-property commit each prepare pass
    vector_icons: Vec<Rc<VectorIconRoot>>,

    /// Whether this list is registered as a projection receiver
    projection_receiver: bool,

    /// Current lifecycle phase
    phase: Phase,

    /// Whether `attempt_reuse` may accept
    enable_reuse: bool,
}

impl PaintDisplayList {
    /// Create an empty list with the given bounds
    pub fn new(bounds: Rect) -> Self {
        Self::with_config(bounds, &ListConfig::default())
    }

    /// Create an empty list with explicit tuning parameters
    pub fn with_config(bounds: Rect, config: &ListConfig) -> Self {
        if let Err(reason) = config.validate() {
            debug_assert!(false, "invalid list configuration: {reason}");
            warn!("invalid list configuration: {reason}");
        }
        Self {
            bounds,
            picture: None,
            arena: DrawableArena::with_block_capacity(config.arena_block_capacity),
            sub_list_children: Vec::new(),
            external_children: Vec::new(),
            mutable_images: Vec::new(),
            vector_icons: Vec::new(),
            projection_receiver: false,
            phase: Phase::Recording,
            enable_reuse: config.enable_reuse,
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Place a drawable in the arena and return its key
    ///
    /// The allocation does not register the drawable into any registry;
    /// callers that need it visited during sync or prepare must follow up
    /// with the matching `register_*` call.
    pub fn allocate_drawable<T: Drawable + 'static>(&mut self, drawable: T) -> DrawableId {
        self.note_recording_activity();
        self.arena.alloc(drawable)
    }

    /// Register an arena drawable as a sub-list child
    ///
    /// The key must address a [`SubListDrawable`](super::SubListDrawable).
    pub fn register_sub_list(&mut self, id: DrawableId) {
        self.note_recording_activity();
        debug_assert!(
            self.arena.get(id).as_sub_list().is_some(),
            "registered key does not address a sub-list drawable"
        );
        self.sub_list_children.push(id);
    }

    /// Register an arena drawable as an external-draw child
    ///
    /// The key must address an [`ExternalDrawable`](super::ExternalDrawable).
    pub fn register_external(&mut self, id: DrawableId) {
        self.note_recording_activity();
        debug_assert!(
            self.arena.get_mut(id).as_external_mut().is_some(),
            "registered key does not address an external drawable"
        );
        self.external_children.push(id);
    }

    /// Register a mutable image for per-frame upload checks
    ///
    /// Returns the registry slot, which recorded `DrawImage` ops reference.
    pub fn register_mutable_image(&mut self, image: Rc<MutableImage>) -> usize {
        self.note_recording_activity();
        self.mutable_images.push(image);
        self.mutable_images.len() - 1
    }

    /// Register a vector-icon root for per-frame property commits
    ///
    /// Returns the registry slot, which recorded `DrawVectorIcon` ops
    /// reference.
    pub fn register_vector_icon(&mut self, icon: Rc<VectorIconRoot>) -> usize {
        self.note_recording_activity();
        self.vector_icons.push(icon);
        self.vector_icons.len() - 1
    }

    /// Install the finalized picture for this recording generation
    pub fn set_picture(&mut self, picture: Arc<dyn RecordedPicture>) {
        self.note_recording_activity();
        self.picture = Some(picture);
    }

    /// The current picture handle, if one has been recorded
    pub fn picture(&self) -> Option<&Arc<dyn RecordedPicture>> {
        self.picture.as_ref()
    }

    /// Mark or clear this list as a projection receiver
    pub fn set_projection_receiver(&mut self, receiver: bool) {
        self.projection_receiver = receiver;
    }

    /// Whether this list is registered as a projection receiver
    pub fn is_projection_receiver(&self) -> bool {
        self.projection_receiver
    }

    /// Number of mutable images registered
    pub fn mutable_image_count(&self) -> usize {
        self.mutable_images.len()
    }

    /// Number of sub-list children registered
    pub fn sub_list_child_count(&self) -> usize {
        self.sub_list_children.len()
    }

    /// The sub-list child keys, in registration order
    pub fn sub_list_children(&self) -> &[DrawableId] {
        &self.sub_list_children
    }

    /// Resolve a registered drawable key
    pub fn drawable(&self, id: DrawableId) -> &dyn Drawable {
        self.arena.get(id)
    }

    /// Resolve a registered drawable key, mutably
    pub fn drawable_mut(&mut self, id: DrawableId) -> &mut dyn Drawable {
        self.arena.get_mut(id)
    }

    /// Recording-side mutations are only legal before sync or after prepare.
    fn note_recording_activity(&mut self) {
        debug_assert!(
            self.phase != Phase::Synced,
            "display list mutated between sync and prepare"
        );
        if self.phase == Phase::Prepared {
            trace!("display list re-entered recording after prepare");
            self.phase = Phase::Recording;
        }
    }
}

impl DisplayList for PaintDisplayList {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn is_empty(&self) -> bool {
        self.picture.as_ref().map_or(true, |p| p.is_empty())
    }

    fn has_external_draws(&self) -> bool {
        !self.external_children.is_empty()
    }

    fn has_vector_icon_content(&self) -> bool {
        !self.vector_icons.is_empty()
    }

    fn is_paint_list(&self) -> bool {
        true
    }

    fn reset(&mut self, bounds: Rect) {
        debug!(
            "resetting display list: {} drawables, {} ops discarded",
            self.arena.len(),
            self.picture.as_ref().map_or(0, |p| p.op_count())
        );

        self.sub_list_children.clear();
        self.external_children.clear();
        self.mutable_images.clear();
        self.vector_icons.clear();

        // The picture holds keys into the arena; release it before the keys
        // it references are invalidated.
        self.picture = None;
        self.arena.reset();

        self.bounds = bounds;
        self.projection_receiver = false;
        self.phase = Phase::Recording;
    }

    fn attempt_reuse(
        mut self: Box<Self>,
        node: &mut RenderNode,
        context: &RenderContext,
    ) -> Option<Box<dyn DisplayList>> {
        if !self.enable_reuse || !context.is_valid() || !node.is_attached() {
            debug!(
                "display list reuse rejected (enabled={}, context_valid={}, node_attached={})",
                self.enable_reuse,
                context.is_valid(),
                node.is_attached()
            );
            return Some(self);
        }

        self.reset(Rect::ZERO);
        node.stash_reusable_list(self);
        None
    }

    fn sync_contents(&mut self) {
        debug_assert!(
            self.phase != Phase::Synced,
            "sync_contents called twice without an intervening prepare"
        );
        trace!(
            "syncing display list contents: {} sub-lists, {} external draws",
            self.sub_list_children.len(),
            self.external_children.len()
        );

        for &id in &self.sub_list_children {
            self.arena.get_mut(id).sync();
        }
        for &id in &self.external_children {
            self.arena.get_mut(id).sync();
        }

        self.phase = Phase::Synced;
    }

    fn prepare_list_and_children(
        &mut self,
        info: &mut TreeInfo,
        functors_need_layer: bool,
        child_fn: &mut dyn FnMut(NodeId, &mut TreeInfo, bool) -> bool,
    ) -> bool {
        debug_assert!(
            self.phase == Phase::Synced,
            "prepare_list_and_children called without a prior sync_contents"
        );

        let mut dirty = false;

        for image in &self.mutable_images {
            // Without a texture budget the transfer is deferred, but the
            // pending change still invalidates the node.
            let changed = if info.prepare_textures {
                image.upload_if_needed()
            } else {
                image.needs_upload()
            };
            if changed {
                info.out.invalidations |= InvalidationFlags::MUTABLE_IMAGES;
                dirty = true;
            }
        }

        // Staged icon properties belong to the recording side; a
        // playback-only traversal leaves them for the next full prepare.
        if info.mode == TraversalMode::Full {
            for icon in &self.vector_icons {
                if icon.push_staged_properties() {
                    info.out.invalidations |= InvalidationFlags::VECTOR_ICONS;
                    dirty = true;
                }
            }
        }

        // Every child is visited even after an invalidation has already been
        // collected; children rely on their prepare running each frame.
        for &id in &self.sub_list_children {
            let Some(child) = self.arena.get(id).as_sub_list() else {
                debug_assert!(false, "sub-list registry key lost its drawable kind");
                warn!("skipping sub-list child with unexpected drawable kind");
                continue;
            };
            let node = child.node();
            if child_fn(node, info, functors_need_layer) {
                info.out.invalidations |= InvalidationFlags::CHILD_NODES;
                dirty = true;
            }
        }

        if functors_need_layer {
            for &id in &self.external_children {
                if let Some(external) = self.arena.get_mut(id).as_external_mut() {
                    external.set_needs_layer(true);
                } else {
                    debug_assert!(false, "external registry key lost its drawable kind");
                    warn!("skipping external child with unexpected drawable kind");
                }
            }
        }

        trace!("prepared display list, dirty={dirty}");
        self.phase = Phase::Prepared;
        dirty
    }

    fn update_children(&mut self, update_fn: &mut dyn FnMut(NodeId)) {
        for &id in &self.sub_list_children {
            if let Some(child) = self.arena.get(id).as_sub_list() {
                update_fn(child.node());
            }
        }
    }
}

impl Drop for PaintDisplayList {
    // The recorded picture references keys into the arena; any other holder
    // of those keys must be gone before the backing storage is torn down.
    fn drop(&mut self) {
        self.picture = None;
    }
}
