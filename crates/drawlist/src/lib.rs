//! # Drawlist
//!
//! A retained-mode display list core for a 2D scene graph.
//!
//! A display list is a recorded, replayable sequence of drawing commands
//! produced once per frame (or reused across frames) and played back later by
//! a rendering backend, potentially on a different thread. This crate provides
//! the container side of that split:
//!
//! - **Arena-backed drawable storage**: child proxies live in a bump arena
//!   behind stable [`DrawableId`](display::DrawableId) handles for the
//!   lifetime of one recording generation.
//! - **Child registries**: nested sub-list children, opaque external-draw
//!   children, mutable images pending upload, and vector-icon roots pending
//!   property sync.
//! - **Lifecycle protocols**: reset/reuse, content sync, and tree
//!   preparation, driven by the owning scene-graph node once per frame.
//!
//! ## Quick Start
//!
//! ```rust
//! use drawlist::prelude::*;
//!
//! let mut nodes = NodeRegistry::new();
//! let child = nodes.insert(RenderNode::new());
//!
//! let mut list = PaintDisplayList::new(Rect::new(0.0, 0.0, 100.0, 100.0));
//! let id = list.allocate_drawable(SubListDrawable::new(child, Mat3::identity()));
//! list.register_sub_list(id);
//!
//! let mut recorder = PictureRecorder::new(list.bounds());
//! recorder.draw_sub_list(id);
//! list.set_picture(recorder.finish());
//!
//! list.sync_contents();
//! let mut info = TreeInfo::new(TraversalMode::Full);
//! let dirty = list.prepare_list_and_children(&mut info, false, &mut |_, _, _| false);
//! assert!(!dirty);
//! ```
//!
//! ## Threading
//!
//! One thread records into, resets, and mutates a given list. `sync_contents`
//! and `prepare_list_and_children` are the handoff points that push content
//! into a form a separate render thread can read; past them, no mutation is
//! permitted until the next reset. The crate has no internal locking — phase
//! discipline is the owning collaborator's job.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod display;
pub mod foundation;
pub mod scene;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ListConfig},
        display::{
            Color, DisplayList, Drawable, DrawableArena, DrawableId, ExternalDrawable,
            ExternalFunctor, MutableImage, PaintDisplayList, PaintOp, PaintPicture,
            PictureRecorder, RecordedPicture, SubListDrawable, VectorIconRoot,
        },
        foundation::math::{Mat3, Rect, Vec2},
        scene::{
            InvalidationFlags, NodeId, NodeRegistry, RenderContext, RenderNode, TraversalMode,
            TreeInfo,
        },
    };
}
