//! Scene-side collaborators of the display list
//!
//! The scene graph itself lives outside this crate; these types are the
//! minimal surface the display-list lifecycle protocols interact with: node
//! handles and ownership slots, the prepare-pass context, and the opaque
//! render context consulted for reuse decisions.

mod context;
mod node;
mod tree_info;

pub use context::RenderContext;
pub use node::{NodeId, NodeRegistry, RenderNode};
pub use tree_info::{InvalidationFlags, TraversalMode, TreeInfo, TreeOutput};
