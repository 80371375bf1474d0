//! Rendering adapter: renderer-agnostic frame description.
//!
//! The [`FrameLoop`] turns the current [`TransformState`] into a
//! [`FramePlan`], an ordered list of clear/upload/draw commands. Backends
//! replay the plan; they never touch the transform state themselves.
//!
//! # Invariants
//! - One `DrawIndexed` per layout placement, each of [`CUBE_INDEX_COUNT`] indices.
//! - The projection uploaded before a draw is the one that draw uses.
//!
//! [`TransformState`]: cubecross_transform::TransformState
//! [`CUBE_INDEX_COUNT`]: cubecross_geometry::CUBE_INDEX_COUNT

pub mod binding;
mod frame;
mod renderer;

pub use frame::{CubeLayout, DrawCommand, FrameLoop, FramePlan, FrameUniforms, ResolvedDraw};
pub use renderer::{GlCall, RecordingRenderer, Renderer};

pub fn crate_info() -> &'static str {
    concat!("cubecross-render v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
