//! Rendering Adapter: renderer-agnostic interface and the chase camera.
//!
//! # Invariants
//! - Renderers cannot mutate the session.
//! - Render state derives from the session and a view.

mod camera;
mod renderer;

pub use camera::FollowCamera;
pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "kartway-render v0.1.0"
}
