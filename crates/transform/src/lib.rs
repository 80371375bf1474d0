//! Transform state for the cube scene.
//!
//! Three matrices are uploaded every frame: projection, model-view and move.
//! The projection matrix doubles as the per-cube placement transform and is
//! mutated in place by both the frame loop and the key handler.
//!
//! # Invariants
//! - The model-view matrix is never mutated.
//! - Only Left/Right without Alt touch the move matrix.
//! - In [`TransformMode::Compounding`] nothing is reset between frames.

mod config;
pub mod ops;
mod state;

pub use config::{ConfigError, SceneConfig, WindowConfig};
pub use state::{Perspective, TransformMode, TransformState};
