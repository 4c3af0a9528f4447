//! # User Interface Module
//!
//! Dear ImGui-based editing panels for the viewer. [`UiManager`] owns the
//! ImGui context and its winit/wgpu integration; [`panel`] holds the
//! pre-built panels that edit scene entities and renderer settings.
//!
//! All state the panels mutate lives in the [`Scene`] and
//! [`RenderSettings`] structs owned by the app and passed in by reference
//! each frame; the UI layer keeps no viewer state of its own.
//!
//! [`Scene`]: crate::scene::Scene
//! [`RenderSettings`]: crate::render::RenderSettings

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::viewer_panel;
