//! wgpu render backend for the cube scene.
//!
//! Uploads the cube's position, color and index buffers once, builds the
//! shader pipeline once, then replays each [`FramePlan`] as one render pass
//! with one indexed draw per placement.
//!
//! # Invariants
//! - Renderer never mutates transform state.
//! - Shader and pipeline validation errors are reported, not swallowed.
//!
//! [`FramePlan`]: cubecross_render::FramePlan

mod gpu;
mod shaders;

pub use gpu::{RenderError, WgpuFrame, WgpuRenderer};
pub use shaders::CUBE_SHADER;
