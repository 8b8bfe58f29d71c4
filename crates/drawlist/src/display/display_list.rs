//! The backend-agnostic display-list capability trait
//!
//! A renderer or scene-graph node holds display lists from any backend behind
//! `Box<dyn DisplayList>` and can query which concrete kind it has. The trait
//! carries the full lifecycle contract — queries, reset/reuse, sync, prepare,
//! and child enumeration — and nothing else, so alternative backends pay for
//! no shared state.

use crate::foundation::math::Rect;
use crate::scene::{NodeId, RenderContext, RenderNode, TreeInfo};
use std::fmt;

/// A retained, replayable recording of drawing commands plus its child and
/// resource registries
///
/// # Phase discipline
///
/// Callers drive one list through `record → sync → prepare → handoff` each
/// frame, with `reset` valid from any phase. Implementations check the phase
/// defensively (debug assertions); they do not tolerate out-of-order calls.
pub trait DisplayList: fmt::Debug {
    /// The recording's declared extent
    fn bounds(&self) -> Rect;

    /// True if the recorded picture has no commands
    fn is_empty(&self) -> bool;

    /// True if this list directly contains an external draw hook
    fn has_external_draws(&self) -> bool;

    /// True if this list directly contains vector-icon content
    fn has_vector_icon_content(&self) -> bool;

    /// Whether this is the paint-backend implementation
    ///
    /// Lets a renderer that holds `Box<dyn DisplayList>` recover the concrete
    /// kind when backends are switched at runtime.
    fn is_paint_list(&self) -> bool {
        false
    }

    /// Restore the list to the freshly-constructed state with new bounds
    ///
    /// Underlying storage capacity is retained. The caller must ensure no
    /// outstanding playback still reads the old picture handle.
    fn reset(&mut self, bounds: Rect);

    /// Attempt to recycle this list for the owning node's next recording pass
    ///
    /// Returns `None` when reuse is accepted — ownership has moved into the
    /// node's reuse stash and the caller must not destroy the list. Returns
    /// `Some(self)` when rejected; the caller falls back to dropping it.
    /// Rejection is a common outcome, not an error.
    ///
    /// The owning node must only call this once the renderer has dropped its
    /// picture handle for the outgoing frame; the decision here reads the
    /// context but cannot observe in-flight playback.
    fn attempt_reuse(
        self: Box<Self>,
        node: &mut RenderNode,
        context: &RenderContext,
    ) -> Option<Box<dyn DisplayList>>;

    /// Push every child's staged state into its committed form
    ///
    /// Called by the owning node after recording ends for the frame and
    /// before preparation. Visits sub-list children then external-draw
    /// children, in registration order; no other registry is touched.
    fn sync_contents(&mut self);

    /// Prepare this list and recurse into its children
    ///
    /// Runs the per-frame upload checks and staged-property commits, then
    /// invokes `child_fn` once per sub-list child — every child, every call,
    /// regardless of earlier results — and finally marks external children
    /// when `functors_need_layer` is set. Returns true iff any visited
    /// content requires the owning node to be scheduled for redraw.
    fn prepare_list_and_children(
        &mut self,
        info: &mut TreeInfo,
        functors_need_layer: bool,
        child_fn: &mut dyn FnMut(NodeId, &mut TreeInfo, bool) -> bool,
    ) -> bool;

    /// Invoke `update_fn` once per sub-list child's node, in registry order
    ///
    /// For lightweight tree-wide passes that do not need prepare semantics.
    fn update_children(&mut self, update_fn: &mut dyn FnMut(NodeId));
}
