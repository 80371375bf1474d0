use crate::binding::{UNIFORM_MODEL_VIEW, UNIFORM_MOVE, UNIFORM_PROJECTION};
use crate::frame::{DrawCommand, FramePlan};
use glam::Mat4;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer replays a [`FramePlan`]; it never mutates transform state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&mut self, plan: &FramePlan) -> Self::Output;
}

/// A graphics call as a GL-style backend would issue it.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    Clear { color: [f32; 4], depth: f32 },
    UniformMatrix4fv { name: &'static str, value: Mat4 },
    DrawElements { count: u32 },
}

/// Records the calls a frame plan expands to instead of drawing.
///
/// Used by the headless CLI and by tests that check draw sequencing.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Vec<GlCall>,
    frames: u64,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn draw_elements_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, GlCall::DrawElements { .. }))
            .count()
    }

    pub fn clear_log(&mut self) {
        self.calls.clear();
    }

    /// Human-readable call log, one call per line.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== {} frame(s), {} call(s) ===\n",
            self.frames,
            self.calls.len()
        ));
        for call in &self.calls {
            match call {
                GlCall::Clear { color, depth } => out.push_str(&format!(
                    "clear color=({:.2}, {:.2}, {:.2}, {:.2}) depth={depth:.1}\n",
                    color[0], color[1], color[2], color[3]
                )),
                GlCall::UniformMatrix4fv { name, value } => {
                    let t = value.w_axis;
                    out.push_str(&format!(
                        "uniformMatrix4fv {name} w=({:.3}, {:.3}, {:.3}, {:.3})\n",
                        t.x, t.y, t.z, t.w
                    ));
                }
                GlCall::DrawElements { count } => {
                    out.push_str(&format!("drawElements count={count}\n"));
                }
            }
        }
        out
    }
}

impl Renderer for RecordingRenderer {
    /// Number of draw calls issued for the frame.
    type Output = usize;

    fn render(&mut self, plan: &FramePlan) -> usize {
        self.frames += 1;
        let mut draws = 0;
        for command in &plan.commands {
            match command {
                DrawCommand::Clear { color, depth } => self.calls.push(GlCall::Clear {
                    color: *color,
                    depth: *depth,
                }),
                DrawCommand::Uniforms(u) => {
                    for (name, cols) in [
                        (UNIFORM_PROJECTION, &u.projection),
                        (UNIFORM_MODEL_VIEW, &u.model_view),
                        (UNIFORM_MOVE, &u.move_matrix),
                    ] {
                        self.calls.push(GlCall::UniformMatrix4fv {
                            name,
                            value: Mat4::from_cols_array_2d(cols),
                        });
                    }
                }
                DrawCommand::Projection(p) => self.calls.push(GlCall::UniformMatrix4fv {
                    name: UNIFORM_PROJECTION,
                    value: *p,
                }),
                DrawCommand::DrawIndexed { index_count } => {
                    draws += 1;
                    self.calls.push(GlCall::DrawElements {
                        count: *index_count,
                    });
                }
            }
        }
        draws
    }
}
