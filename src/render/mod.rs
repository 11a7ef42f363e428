//! Rendering Module
//!
//! Rasterizes eye frames and pushes them to a display sink.

pub mod display;
pub mod framebuffer;
pub mod painter;
pub mod renderer;

pub use display::{DisplayError, DisplaySink, HeadlessDisplay};
pub use framebuffer::Framebuffer;
pub use painter::{paint, Palette};
pub use renderer::Renderer;
