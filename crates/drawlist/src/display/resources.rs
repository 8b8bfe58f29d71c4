//! Externally-owned resources visited during preparation
//!
//! The container does not own these objects; it holds shared handles so the
//! prepare pass can iterate them. A [`MutableImage`] may change between
//! recording and playback and needs a re-upload check each frame; a
//! [`VectorIconRoot`] carries staged properties that must be committed before
//! handoff to the renderer. Both are single-thread types (the recording
//! thread), shared as `Rc`.

use crate::foundation::math::Rect;
use image::RgbaImage;
use std::cell::{Cell, RefCell};

/// A mutable bitmap that may change between recording and playback
///
/// Pixel edits bump a generation counter; the prepare pass compares it to the
/// last-uploaded generation and triggers a re-upload when they differ. The
/// actual GPU transfer belongs to the backend.
#[derive(Debug)]
pub struct MutableImage {
    pixels: RefCell<RgbaImage>,
    generation: Cell<u64>,
    uploaded_generation: Cell<u64>,
}

impl MutableImage {
    /// Wrap a bitmap for mutable sharing
    ///
    /// The initial content counts as generation 1, so the first prepare pass
    /// always uploads.
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: RefCell::new(pixels),
            generation: Cell::new(1),
            uploaded_generation: Cell::new(0),
        }
    }

    /// Image dimensions in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.borrow().dimensions()
    }

    /// Edit the pixel content, bumping the generation
    pub fn update_pixels(&self, edit: impl FnOnce(&mut RgbaImage)) {
        edit(&mut self.pixels.borrow_mut());
        self.generation.set(self.generation.get() + 1);
    }

    /// Read the pixel content without bumping the generation
    pub fn with_pixels<R>(&self, read: impl FnOnce(&RgbaImage) -> R) -> R {
        read(&self.pixels.borrow())
    }

    /// Current content generation
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Whether the content changed since the last upload
    pub fn needs_upload(&self) -> bool {
        self.uploaded_generation.get() != self.generation.get()
    }

    /// Check whether the content changed since the last upload and mark it
    /// uploaded
    ///
    /// Returns true if a re-upload was triggered, which invalidates the
    /// owning node.
    pub fn upload_if_needed(&self) -> bool {
        let current = self.generation.get();
        if self.uploaded_generation.get() == current {
            return false;
        }
        self.uploaded_generation.set(current);
        true
    }
}

/// Staged properties of a vector-icon render tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorIconProperties {
    /// Alpha applied to the whole icon
    pub root_alpha: f32,
    /// Viewport the icon's path space maps into
    pub viewport: Rect,
}

impl Default for VectorIconProperties {
    fn default() -> Self {
        Self {
            root_alpha: 1.0,
            viewport: Rect::ZERO,
        }
    }
}

/// An externally-owned vector-icon render tree
///
/// Animations and setters write staged properties on the recording thread;
/// the prepare pass commits them so the render side reads a stable snapshot.
#[derive(Debug, Default)]
pub struct VectorIconRoot {
    staged: RefCell<VectorIconProperties>,
    committed: RefCell<VectorIconProperties>,
    dirty: Cell<bool>,
}

impl VectorIconRoot {
    /// Create an icon root with default properties
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a new root alpha
    pub fn set_root_alpha(&self, alpha: f32) {
        self.staged.borrow_mut().root_alpha = alpha;
        self.dirty.set(true);
    }

    /// Stage a new viewport
    pub fn set_viewport(&self, viewport: Rect) {
        self.staged.borrow_mut().viewport = viewport;
        self.dirty.set(true);
    }

    /// Commit staged properties for the render side
    ///
    /// Returns true if anything changed since the last commit, which
    /// invalidates the owning node.
    pub fn push_staged_properties(&self) -> bool {
        if !self.dirty.get() {
            return false;
        }
        *self.committed.borrow_mut() = *self.staged.borrow();
        self.dirty.set(false);
        true
    }

    /// The committed snapshot, safe for the render side to read
    pub fn committed(&self) -> VectorIconProperties {
        *self.committed.borrow()
    }
}
