//! First-person box-world renderer.
//!
//! # Invariants
//! - The renderer never mutates the world; it reads `pos`, `rot`, `map` and
//!   `enemies` once per frame.
//! - No per-entity GPU state. Every box is regenerated from the world each
//!   frame, so the pillar layout depends only on `map.seed`.
//!
//! Graphics APIs sit behind [`GraphicsBackend`]. [`RecordingBackend`] runs
//! headless; the wgpu implementation lives in `strikewing-render-wgpu`.

mod backend;
pub mod camera;
mod renderer;
pub mod scene;

pub use backend::{BoxInstance, CLEAR_COLOR, FrameUniforms, GraphicsBackend, RecordingBackend, RenderError};
pub use renderer::{DisplaySize, FOG_END, FOG_START, Renderer};
