//! Render context consulted for reuse decisions
//!
//! The display-list core treats the render context as opaque: it is read only
//! by `attempt_reuse` to decide whether recycling a list is worthwhile, and
//! never otherwise touched.

/// State of the rendering backend relevant to list recycling
#[derive(Debug)]
pub struct RenderContext {
    /// Whether the backing surface is alive and frames are being produced
    surface_alive: bool,

    /// Frames presented since the context was created
    frame_index: u64,
}

impl RenderContext {
    /// Create a context for a live surface
    pub fn new() -> Self {
        Self {
            surface_alive: true,
            frame_index: 0,
        }
    }

    /// Whether the backing surface is still alive
    ///
    /// A dead surface means no further frames will be recorded, so keeping
    /// recycled lists around would only hold memory.
    pub fn is_valid(&self) -> bool {
        self.surface_alive
    }

    /// Mark the backing surface as gone
    pub fn invalidate(&mut self) {
        self.surface_alive = false;
    }

    /// Record that a frame was presented
    pub fn advance_frame(&mut self) {
        self.frame_index += 1;
    }

    /// Frames presented so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}
