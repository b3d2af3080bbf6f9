//! wgpu implementation of the renderer's graphics backend.
//!
//! One pipeline, one cube mesh, one instance buffer. Every box of a frame is
//! drawn in a single instanced call.

mod gpu;
mod shaders;

pub use gpu::WgpuBackend;
