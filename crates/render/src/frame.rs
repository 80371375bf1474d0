use bytemuck::{Pod, Zeroable};
use cubecross_geometry::CUBE_INDEX_COUNT;
use cubecross_transform::{SceneConfig, TransformState};
use glam::{Mat4, Vec3};

/// Uniform block uploaded to the shader, laid out as three column-major
/// `mat4x4<f32>` in binding order.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub projection: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub move_matrix: [[f32; 4]; 4],
}

impl FrameUniforms {
    pub fn from_state(state: &TransformState) -> Self {
        Self {
            projection: state.projection().to_cols_array_2d(),
            model_view: state.model_view().to_cols_array_2d(),
            move_matrix: state.move_matrix().to_cols_array_2d(),
        }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.projection)
    }
}

/// One step of a frame, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Clear color and depth.
    Clear { color: [f32; 4], depth: f32 },
    /// Upload all three matrices.
    Uniforms(FrameUniforms),
    /// Upload the projection matrix only.
    Projection(Mat4),
    /// Draw the cube's index buffer.
    DrawIndexed { index_count: u32 },
}

/// A draw together with the uniforms in effect when it was issued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedDraw {
    pub uniforms: FrameUniforms,
    pub index_count: u32,
}

/// Everything a backend needs to render one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramePlan {
    /// Milliseconds since the previous frame.
    pub dt_ms: f64,
    pub commands: Vec<DrawCommand>,
}

impl FramePlan {
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawIndexed { .. }))
            .count()
    }

    /// Clear values of the first `Clear` command, if any.
    pub fn clear(&self) -> Option<([f32; 4], f32)> {
        self.commands.iter().find_map(|c| match c {
            DrawCommand::Clear { color, depth } => Some((*color, *depth)),
            _ => None,
        })
    }

    /// Replay uploads and pair every draw with the uniform block it sees.
    /// Draws issued before any `Uniforms` upload see zeroed matrices.
    pub fn resolve_draws(&self) -> Vec<ResolvedDraw> {
        let mut current = FrameUniforms::zeroed();
        let mut draws = Vec::new();
        for command in &self.commands {
            match command {
                DrawCommand::Clear { .. } => {}
                DrawCommand::Uniforms(u) => current = *u,
                DrawCommand::Projection(p) => current.projection = p.to_cols_array_2d(),
                DrawCommand::DrawIndexed { index_count } => draws.push(ResolvedDraw {
                    uniforms: current,
                    index_count: *index_count,
                }),
            }
        }
        draws
    }
}

/// Offsets applied to the projection before each cube draw. Offsets
/// accumulate: each is relative to the previous placement.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeLayout {
    offsets: Vec<Vec3>,
}

impl CubeLayout {
    pub fn new(offsets: Vec<Vec3>) -> Self {
        Self { offsets }
    }

    pub fn from_config(config: &SceneConfig) -> Self {
        Self::new(config.layout.clone())
    }

    pub fn offsets(&self) -> &[Vec3] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Placement of each cube relative to the frame's starting projection.
    pub fn positions(&self) -> Vec<Vec3> {
        self.offsets
            .iter()
            .scan(Vec3::ZERO, |acc, o| {
                *acc += *o;
                Some(*acc)
            })
            .collect()
    }
}

impl Default for CubeLayout {
    fn default() -> Self {
        Self::from_config(&SceneConfig::default())
    }
}

/// Per-frame driver. Owns the frame clock and layout; borrows the transform
/// state for the duration of each frame.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    layout: CubeLayout,
    clear_color: [f32; 4],
    last_time_ms: f64,
    frames: u64,
}

impl FrameLoop {
    pub fn new(layout: CubeLayout, clear_color: [f32; 4]) -> Self {
        Self {
            layout,
            clear_color,
            last_time_ms: 0.0,
            frames: 0,
        }
    }

    pub fn from_config(config: &SceneConfig) -> Self {
        Self::new(CubeLayout::from_config(config), config.clear_color)
    }

    pub fn layout(&self) -> &CubeLayout {
        &self.layout
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Build the frame for timestamp `time_ms`, translating the projection
    /// in place before each draw. The projection is left wherever the last
    /// placement put it.
    pub fn frame(&mut self, time_ms: f64, state: &mut TransformState) -> FramePlan {
        let dt_ms = time_ms - self.last_time_ms;
        self.last_time_ms = time_ms;
        self.frames += 1;
        tracing::trace!(frame = self.frames, dt_ms, "frame");

        state.begin_frame();

        let mut commands = Vec::with_capacity(2 + self.layout.len() * 2);
        commands.push(DrawCommand::Clear {
            color: self.clear_color,
            depth: 1.0,
        });
        commands.push(DrawCommand::Uniforms(FrameUniforms::from_state(state)));

        for (i, offset) in self.layout.offsets().iter().enumerate() {
            // The first placement reuses the upload above.
            if i > 0 || *offset != Vec3::ZERO {
                state.translate(*offset);
                commands.push(DrawCommand::Projection(state.projection()));
            }
            commands.push(DrawCommand::DrawIndexed {
                index_count: CUBE_INDEX_COUNT,
            });
        }

        FramePlan { dt_ms, commands }
    }
}
