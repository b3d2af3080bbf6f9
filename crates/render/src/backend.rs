use glam::{Mat4, Vec3};
use std::fmt::Write as _;

/// Background color behind everything, before fog.
pub const CLEAR_COLOR: [f32; 4] = [0.02, 0.01, 0.04, 1.0];

/// Errors from the graphics backend. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),
    #[error("shader program failed to build: {0}")]
    Program(String),
    #[error("no shader program has been created")]
    ProgramMissing,
    #[error("surface error: {0}")]
    Surface(String),
}

/// Per-frame values shared by every draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub view_proj: Mat4,
    pub camera_pos: Vec3,
    /// Seconds since the renderer was created; drives the shading pulse.
    pub time: f32,
    /// Theme tint selector in `[0, 1]`.
    pub theme: f32,
    /// Fog start and full-fog distances.
    pub fog: [f32; 2],
}

/// One unit cube (spanning `[-1, 1]` on each axis) placed by `model`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxInstance {
    pub model: Mat4,
    pub color: [f32; 4],
}

/// The narrow surface the renderer needs from a graphics API.
///
/// A backend owns exactly one shader program and one cube vertex buffer. The
/// renderer calls `set_uniforms`, then `draw_box` for every box in the
/// frame, then `submit`.
pub trait GraphicsBackend {
    /// Build the box shader program. Called once, before any frame.
    fn create_program(&mut self) -> Result<(), RenderError>;
    /// Resize the output surface, in physical pixels.
    fn resize(&mut self, width: u32, height: u32);
    fn set_uniforms(&mut self, uniforms: &FrameUniforms);
    fn draw_box(&mut self, instance: &BoxInstance);
    /// Flush the frame's draws to the output.
    fn submit(&mut self) -> Result<(), RenderError>;
}

/// In-memory backend that records every call. Used for headless runs and
/// tests, and can dump the last frame as text.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub programs_created: usize,
    pub resizes: Vec<(u32, u32)>,
    pub uniforms: Option<FrameUniforms>,
    pub frames: Vec<Vec<BoxInstance>>,
    pending: Vec<BoxInstance>,
    program_error: Option<String>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose program creation fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            program_error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn last_frame(&self) -> &[BoxInstance] {
        self.frames.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Human-readable dump of the last submitted frame.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} ({} boxes) ===",
            self.frames.len(),
            self.last_frame().len()
        );
        if let Some((w, h)) = self.resizes.last() {
            let _ = writeln!(out, "Surface: {w}x{h}");
        }
        if let Some(u) = &self.uniforms {
            let c = u.camera_pos;
            let _ = writeln!(
                out,
                "Camera: ({:.2}, {:.2}, {:.2}) time={:.2} theme={:.2}",
                c.x, c.y, c.z, u.time, u.theme
            );
        }
        for b in self.last_frame() {
            let (scale, _, t) = b.model.to_scale_rotation_translation();
            let _ = writeln!(
                out,
                "  box pos=({:.2}, {:.2}, {:.2}) half=({:.2}, {:.2}, {:.2}) rgb=({:.2}, {:.2}, {:.2})",
                t.x, t.y, t.z, scale.x, scale.y, scale.z, b.color[0], b.color[1], b.color[2]
            );
        }
        out
    }
}

impl GraphicsBackend for RecordingBackend {
    fn create_program(&mut self) -> Result<(), RenderError> {
        if let Some(msg) = &self.program_error {
            return Err(RenderError::Program(msg.clone()));
        }
        self.programs_created += 1;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.resizes.push((width, height));
    }

    fn set_uniforms(&mut self, uniforms: &FrameUniforms) {
        self.uniforms = Some(*uniforms);
    }

    fn draw_box(&mut self, instance: &BoxInstance) {
        self.pending.push(*instance);
    }

    fn submit(&mut self) -> Result<(), RenderError> {
        if self.programs_created == 0 {
            return Err(RenderError::ProgramMissing);
        }
        self.frames.push(std::mem::take(&mut self.pending));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_without_program_fails() {
        let mut b = RecordingBackend::new();
        assert!(matches!(b.submit(), Err(RenderError::ProgramMissing)));
    }

    #[test]
    fn records_draws_per_frame() {
        let mut b = RecordingBackend::new();
        b.create_program().unwrap();
        let inst = BoxInstance {
            model: Mat4::IDENTITY,
            color: [1.0, 0.0, 0.0, 1.0],
        };
        b.draw_box(&inst);
        b.draw_box(&inst);
        b.submit().unwrap();
        b.submit().unwrap();
        assert_eq!(b.frames.len(), 2);
        assert_eq!(b.frames[0].len(), 2);
        assert!(b.last_frame().is_empty());
    }

    #[test]
    fn text_dump_lists_boxes() {
        let mut b = RecordingBackend::new();
        b.create_program().unwrap();
        b.draw_box(&BoxInstance {
            model: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            color: [0.5, 0.5, 0.5, 1.0],
        });
        b.submit().unwrap();
        let text = b.to_text();
        assert!(text.contains("1 boxes"));
        assert!(text.contains("pos=(1.00, 2.00, 3.00)"));
    }
}
