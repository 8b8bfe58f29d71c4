//! Arena-allocated drawable proxies
//!
//! A drawable is a recording-time proxy placed in the display-list arena. The
//! two kinds the container knows how to visit are [`SubListDrawable`] ("draw
//! this child node here, with this transform") and [`ExternalDrawable`]
//! ("invoke this opaque external render hook here"). Both carry staged state
//! written by the recording side and a committed copy published during the
//! sync pass for the render side to read.

use crate::foundation::math::Mat3;
use crate::scene::NodeId;
use std::fmt;

/// A recording-time proxy stored in the display-list arena
///
/// `sync` is invoked exactly once per frame during the content-sync pass and
/// must push any staged state into its committed form; the default is a
/// no-op for drawables with no staged state.
pub trait Drawable: fmt::Debug {
    /// Push staged state into the committed snapshot
    fn sync(&mut self) {}

    /// Downcast hook used when visiting the sub-list registry
    fn as_sub_list(&self) -> Option<&SubListDrawable> {
        None
    }

    /// Mutable downcast hook used when visiting the sub-list registry
    fn as_sub_list_mut(&mut self) -> Option<&mut SubListDrawable> {
        None
    }

    /// Mutable downcast hook used when visiting the external-draw registry
    fn as_external_mut(&mut self) -> Option<&mut ExternalDrawable> {
        None
    }
}

/// Proxy recording "draw child node here, with this transform"
///
/// Holds a non-owning back-reference to the child scene-graph node; the
/// scene graph owns node lifetimes. The draw transform is double-buffered:
/// the recording side stages it, `sync` publishes it.
#[derive(Debug)]
pub struct SubListDrawable {
    node: NodeId,
    staged_transform: Mat3,
    committed_transform: Mat3,
}

impl SubListDrawable {
    /// Create a proxy for a child node with its draw transform
    pub fn new(node: NodeId, transform: Mat3) -> Self {
        Self {
            node,
            staged_transform: transform,
            committed_transform: transform,
        }
    }

    /// The child node this proxy draws
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Stage a new draw transform for the next sync
    pub fn set_transform(&mut self, transform: Mat3) {
        self.staged_transform = transform;
    }

    /// The committed transform, safe for the render side to read
    pub fn transform(&self) -> &Mat3 {
        &self.committed_transform
    }
}

impl Drawable for SubListDrawable {
    fn sync(&mut self) {
        self.committed_transform = self.staged_transform;
    }

    fn as_sub_list(&self) -> Option<&SubListDrawable> {
        Some(self)
    }

    fn as_sub_list_mut(&mut self) -> Option<&mut SubListDrawable> {
        Some(self)
    }
}

/// An opaque external render hook interleaved into the command stream
///
/// Implemented by platform views, legacy GPU draw hooks, and similar
/// content the display list cannot record itself. The container only ever
/// drives the two lifecycle notifications; execution of the hook belongs to
/// the playback side.
pub trait ExternalFunctor {
    /// Capture the hook's current frame state for concurrent playback
    fn sync_frame_state(&mut self);

    /// The prepare pass determined whether this hook must render into a layer
    fn layer_requirement_changed(&mut self, _needs_layer: bool) {}
}

/// Proxy recording "invoke this external render hook here"
pub struct ExternalDrawable {
    functor: Box<dyn ExternalFunctor>,
    needs_layer: bool,
}

impl ExternalDrawable {
    /// Wrap an external render hook for recording
    pub fn new(functor: Box<dyn ExternalFunctor>) -> Self {
        Self {
            functor,
            needs_layer: false,
        }
    }

    /// Whether the prepare pass asked this hook to render into a layer
    pub fn needs_layer(&self) -> bool {
        self.needs_layer
    }

    /// Update the layer requirement, notifying the hook on change
    pub fn set_needs_layer(&mut self, needs_layer: bool) {
        if self.needs_layer != needs_layer {
            self.needs_layer = needs_layer;
            self.functor.layer_requirement_changed(needs_layer);
        }
    }
}

impl fmt::Debug for ExternalDrawable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalDrawable")
            .field("needs_layer", &self.needs_layer)
            .finish_non_exhaustive()
    }
}

impl Drawable for ExternalDrawable {
    fn sync(&mut self) {
        self.functor.sync_frame_state();
    }

    fn as_external_mut(&mut self) -> Option<&mut ExternalDrawable> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{NodeRegistry, RenderNode};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_sub_list_transform_double_buffered() {
        let mut nodes = NodeRegistry::new();
        let node = nodes.insert(RenderNode::new());

        let mut drawable = SubListDrawable::new(node, Mat3::identity());
        let moved = Mat3::new_translation(&crate::foundation::math::Vec2::new(4.0, 2.0));
        drawable.set_transform(moved);

        // Staged only; the committed copy is untouched until sync.
        assert_eq!(*drawable.transform(), Mat3::identity());

        drawable.sync();
        assert_eq!(*drawable.transform(), moved);
    }

    #[derive(Debug)]
    struct CountingFunctor {
        syncs: Rc<Cell<u32>>,
        layer_changes: Rc<Cell<u32>>,
    }

    impl ExternalFunctor for CountingFunctor {
        fn sync_frame_state(&mut self) {
            self.syncs.set(self.syncs.get() + 1);
        }

        fn layer_requirement_changed(&mut self, _needs_layer: bool) {
            self.layer_changes.set(self.layer_changes.get() + 1);
        }
    }

    #[test]
    fn test_external_layer_notification_on_change_only() {
        let syncs = Rc::new(Cell::new(0));
        let layer_changes = Rc::new(Cell::new(0));
        let mut drawable = ExternalDrawable::new(Box::new(CountingFunctor {
            syncs: syncs.clone(),
            layer_changes: layer_changes.clone(),
        }));

        drawable.set_needs_layer(false);
        assert_eq!(layer_changes.get(), 0);

        drawable.set_needs_layer(true);
        drawable.set_needs_layer(true);
        assert_eq!(layer_changes.get(), 1);
        assert!(drawable.needs_layer());

        drawable.sync();
        assert_eq!(syncs.get(), 1);
    }
}
