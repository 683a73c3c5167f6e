//! External render backend surface
//!
//! The renderer on the other side of the wire protocol is opaque to the
//! runtime: it accepts full-frame op streams and presents them. Headless
//! runs and tests plug in [`NullBackend`].

use crate::error::BackendError;

/// The external renderer consuming encoded frames
pub trait RenderBackend {
    /// Hand a complete encoded frame to the renderer
    fn apply(&mut self, frame: &[u8]) -> Result<(), BackendError>;

    /// Present the most recently applied frame
    fn render(&mut self) -> Result<(), BackendError>;

    /// Propagate a logical-size change to the renderer's surface
    ///
    /// Infallible by contract: a renderer that cannot resize reports the
    /// failure from its next `render` call instead.
    fn resize(&mut self, width: f32, height: f32);
}

/// Accept-and-discard backend for headless use
#[derive(Default)]
pub struct NullBackend;

impl RenderBackend for NullBackend {
    fn apply(&mut self, _frame: &[u8]) -> Result<(), BackendError> {
        Ok(())
    }

    fn render(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn resize(&mut self, _width: f32, _height: f32) {}
}
