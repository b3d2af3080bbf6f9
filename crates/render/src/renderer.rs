use crate::backend::{FrameUniforms, GraphicsBackend, RenderError};
use crate::{camera, scene};
use std::time::Instant;
use strikewing_kernel::World;

pub const FOG_START: f32 = 22.0;
pub const FOG_END: f32 = 110.0;

/// Output size in logical pixels plus the display's device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

impl DisplaySize {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Surface size in device pixels. The ratio is clamped to `[1, 2]` and
    /// neither side drops below one pixel.
    pub fn physical(&self) -> (u32, u32) {
        let dpr = 1.0f64.max(self.scale_factor.min(2.0));
        let scale = |v: u32| ((v as f64 * dpr).floor() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

/// First-person renderer. Regenerates the whole scene from a [`World`] every
/// frame; the only state it keeps is the surface size and its start time.
pub struct Renderer<B: GraphicsBackend> {
    backend: B,
    surface: Option<(u32, u32)>,
    started: Instant,
}

impl<B: GraphicsBackend> Renderer<B> {
    /// Fails when the backend cannot build its shader program.
    pub fn new(mut backend: B) -> Result<Self, RenderError> {
        backend.create_program()?;
        tracing::info!("renderer ready");
        Ok(Self {
            backend,
            surface: None,
            started: Instant::now(),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Current surface size in device pixels, once a frame has been drawn.
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.surface
    }

    pub fn frame(&mut self, world: &World, display: DisplaySize) -> Result<(), RenderError> {
        let elapsed = self.started.elapsed().as_secs_f32();
        self.frame_at(world, display, elapsed)
    }

    /// Draw one frame with an explicit animation clock.
    pub fn frame_at(
        &mut self,
        world: &World,
        display: DisplaySize,
        elapsed: f32,
    ) -> Result<(), RenderError> {
        let (width, height) = display.physical();
        if self.surface != Some((width, height)) {
            tracing::debug!(width, height, "resizing surface");
            self.backend.resize(width, height);
            self.surface = Some((width, height));
        }

        let aspect = width as f32 / height as f32;
        let theme = scene::Theme::from_name(&world.map.theme);
        self.backend.set_uniforms(&FrameUniforms {
            view_proj: camera::view_projection(world.pos, world.rot, aspect),
            camera_pos: world.pos.as_vec3(),
            time: elapsed,
            theme: theme.tint(),
            fog: [FOG_START, FOG_END],
        });

        for b in scene::build(world) {
            self.backend.draw_box(&b.instance());
        }
        self.backend.submit()
    }
}
