//! The software rendering path: CPU buffers, rasterization primitives and
//! the per-frame renderer.

pub mod framebuffer;
pub mod raster;
pub mod renderer;
pub mod settings;

pub use framebuffer::FrameBuffer;
pub use renderer::SoftwareRenderer;
pub use settings::{FogSettings, RenderSettings, ShadingMode};
