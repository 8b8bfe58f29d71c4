//! Scene-graph node handles and display-list ownership
//!
//! A scene-graph node owns at most one active display list plus an optional
//! recycled list kept aside for the next recording pass. The node's wider
//! responsibilities (layout, animation, drawing order) are out of scope; what
//! lives here is exactly the ownership surface the display-list lifecycle
//! protocols need.

use crate::display::DisplayList;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a scene-graph node
    pub struct NodeId;
}

/// A scene-graph node as seen by the display-list core
///
/// Sub-list drawables hold a [`NodeId`] back-reference to their child node;
/// the registry owns node lifetimes, the drawable only records where to draw.
#[derive(Debug, Default)]
pub struct RenderNode {
    /// Whether this node is currently attached to the scene tree
    attached: bool,

    /// The active display list, if any content has been recorded
    display_list: Option<Box<dyn DisplayList>>,

    /// A recycled list waiting to back the next recording pass
    available_list: Option<Box<dyn DisplayList>>,
}

impl RenderNode {
    /// Create a new detached node with no content
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach this node to the scene tree
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Detach this node from the scene tree
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Whether this node is attached to the scene tree
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Replace the active display list, returning the outgoing one
    pub fn set_display_list(
        &mut self,
        list: Box<dyn DisplayList>,
    ) -> Option<Box<dyn DisplayList>> {
        self.display_list.replace(list)
    }

    /// The active display list, if any
    pub fn display_list(&self) -> Option<&dyn DisplayList> {
        self.display_list.as_deref()
    }

    /// Mutable access to the active display list, if any
    pub fn display_list_mut(&mut self) -> Option<&mut (dyn DisplayList + 'static)> {
        self.display_list.as_deref_mut()
    }

    /// Take the active display list out of the node
    pub fn take_display_list(&mut self) -> Option<Box<dyn DisplayList>> {
        self.display_list.take()
    }

    /// Stash a recycled list for the next recording pass
    ///
    /// Called by a list's `attempt_reuse` when reuse is accepted; a previously
    /// stashed list is dropped.
    pub fn stash_reusable_list(&mut self, list: Box<dyn DisplayList>) {
        self.available_list = Some(list);
    }

    /// Take the stashed recycled list, if one is waiting
    pub fn take_reusable_list(&mut self) -> Option<Box<dyn DisplayList>> {
        self.available_list.take()
    }

    /// Whether a recycled list is waiting
    pub fn has_reusable_list(&self) -> bool {
        self.available_list.is_some()
    }
}

/// Owning storage for scene-graph nodes with stable handles
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: SlotMap<NodeId, RenderNode>,
}

impl NodeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node and return its handle
    pub fn insert(&mut self, node: RenderNode) -> NodeId {
        self.nodes.insert(node)
    }

    /// Remove a node, returning it if the handle was live
    pub fn remove(&mut self, id: NodeId) -> Option<RenderNode> {
        self.nodes.remove(id)
    }

    /// Get a node by handle
    pub fn get(&self, id: NodeId) -> Option<&RenderNode> {
        self.nodes.get(id)
    }

    /// Get a node mutably by handle
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut RenderNode> {
        self.nodes.get_mut(id)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the registry holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_detach() {
        let mut node = RenderNode::new();
        assert!(!node.is_attached());

        node.attach();
        assert!(node.is_attached());

        node.detach();
        assert!(!node.is_attached());
    }

    #[test]
    fn test_registry_handles_stay_valid() {
        let mut nodes = NodeRegistry::new();
        let a = nodes.insert(RenderNode::new());
        let b = nodes.insert(RenderNode::new());

        nodes.remove(a);
        assert!(nodes.get(a).is_none());
        assert!(nodes.get(b).is_some());
        assert_eq!(nodes.len(), 1);
    }
}
