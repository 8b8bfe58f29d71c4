//! Recorded pictures: the replayable command buffer
//!
//! The container treats its picture as opaque — emptiness queries and handle
//! release are the only operations it performs — so the picture surface is a
//! trait. [`PaintPicture`] is the concrete encoding this crate's recorder
//! produces: a flat list of [`PaintOp`]s referencing arena drawables and
//! registry resources by key, never by address, which keeps the picture plain
//! `Send + Sync` data a render thread can hold behind an `Arc`.

use super::arena::DrawableId;
use crate::foundation::math::Rect;
use std::fmt;
use std::sync::Arc;

/// An opaque, shareable recorded command buffer
///
/// The handle may be held simultaneously by the producing container and a
/// concurrently-rendering backend. Keys recorded inside it are only
/// meaningful against the arena generation that produced them, which is why
/// the container releases its handle before recycling the arena.
pub trait RecordedPicture: fmt::Debug + Send + Sync {
    /// Number of recorded commands
    fn op_count(&self) -> usize;

    /// True if nothing was recorded
    fn is_empty(&self) -> bool {
        self.op_count() == 0
    }

    /// The recording's declared extent
    fn cull_bounds(&self) -> Rect;
}

/// An rgba8 color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with explicit alpha
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A single recorded paint command
///
/// Drawables are referenced by arena key and registry resources by slot
/// index; the playback side resolves both against the owning container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintOp {
    /// Fill a rectangle with a solid color
    FillRect {
        /// Rectangle to fill
        rect: Rect,
        /// Fill color
        color: Color,
    },

    /// Draw a registered mutable image
    DrawImage {
        /// Slot in the container's mutable-image registry
        image: usize,
        /// Destination rectangle
        dst: Rect,
    },

    /// Draw a registered vector-icon root
    DrawVectorIcon {
        /// Slot in the container's vector-icon registry
        icon: usize,
        /// Destination rectangle
        dst: Rect,
    },

    /// Replay a sub-list child at this point in the command stream
    DrawSubList {
        /// Arena key of the sub-list drawable
        drawable: DrawableId,
    },

    /// Invoke an external render hook at this point in the command stream
    DrawExternal {
        /// Arena key of the external drawable
        drawable: DrawableId,
    },
}

/// The concrete command buffer produced by [`PictureRecorder`]
#[derive(Debug)]
pub struct PaintPicture {
    ops: Vec<PaintOp>,
    cull_bounds: Rect,
}

impl PaintPicture {
    /// The recorded commands in playback order
    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }
}

impl RecordedPicture for PaintPicture {
    fn op_count(&self) -> usize {
        self.ops.len()
    }

    fn cull_bounds(&self) -> Rect {
        self.cull_bounds
    }
}

/// Append-only builder for a [`PaintPicture`]
///
/// Used by the recording collaborator; the container itself never records.
#[derive(Debug)]
pub struct PictureRecorder {
    ops: Vec<PaintOp>,
    cull_bounds: Rect,
}

impl PictureRecorder {
    /// Begin recording with the given declared extent
    pub fn new(cull_bounds: Rect) -> Self {
        Self {
            ops: Vec::new(),
            cull_bounds,
        }
    }

    /// Record a solid rectangle fill
    pub fn fill_rect(&mut self, rect: Rect, color: Color) -> &mut Self {
        self.ops.push(PaintOp::FillRect { rect, color });
        self
    }

    /// Record a mutable-image draw by registry slot
    pub fn draw_image(&mut self, image: usize, dst: Rect) -> &mut Self {
        self.ops.push(PaintOp::DrawImage { image, dst });
        self
    }

    /// Record a vector-icon draw by registry slot
    pub fn draw_vector_icon(&mut self, icon: usize, dst: Rect) -> &mut Self {
        self.ops.push(PaintOp::DrawVectorIcon { icon, dst });
        self
    }

    /// Record a sub-list child replay
    pub fn draw_sub_list(&mut self, drawable: DrawableId) -> &mut Self {
        self.ops.push(PaintOp::DrawSubList { drawable });
        self
    }

    /// Record an external draw hook invocation
    pub fn draw_external(&mut self, drawable: DrawableId) -> &mut Self {
        self.ops.push(PaintOp::DrawExternal { drawable });
        self
    }

    /// Number of commands recorded so far
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Finalize into a shareable picture handle
    pub fn finish(self) -> Arc<PaintPicture> {
        Arc::new(PaintPicture {
            ops: self.ops,
            cull_bounds: self.cull_bounds,
        })
    }
}
