//! Display-list container, arena, drawables, and recorded pictures
//!
//! The module is organized leaf to root:
//!
//! - [`arena`] — bump storage for drawables, one generation at a time.
//! - [`drawable`] — arena-allocated proxies: sub-list children and external
//!   draw hooks.
//! - [`picture`] — the recorded command buffer and its shared handle.
//! - [`resources`] — externally-owned payloads visited during preparation:
//!   mutable images and vector-icon roots.
//! - [`display_list`] — the backend-agnostic capability trait.
//! - [`paint_list`] — the concrete container tying all of it together.

mod arena;
mod display_list;
mod drawable;
mod paint_list;
mod picture;
mod resources;

#[cfg(test)]
mod protocol_tests;

pub use arena::{DrawableArena, DrawableId};
pub use display_list::DisplayList;
pub use drawable::{Drawable, ExternalDrawable, ExternalFunctor, SubListDrawable};
pub use paint_list::{PaintDisplayList, Phase};
pub use picture::{Color, PaintOp, PaintPicture, PictureRecorder, RecordedPicture};
pub use resources::{MutableImage, VectorIconProperties, VectorIconRoot};
