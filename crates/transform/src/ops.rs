//! In-place matrix operations.
//!
//! Both post-multiply, so the new transform applies in the matrix's local
//! frame: `m = m * op`.

use glam::{Mat3, Mat4, Vec3};

/// `m = m * translate(v)`
pub fn translate(m: &mut Mat4, v: Vec3) {
    *m *= Mat4::from_translation(v);
}

/// `m = m * rotate_y(angle)`
pub fn rotate_y(m: &mut Mat4, angle: f32) {
    *m *= Mat4::from_rotation_y(angle);
}

/// Upper-left 3x3 block.
pub fn rotation_part(m: &Mat4) -> Mat3 {
    Mat3::from_mat4(*m)
}

/// Translation column.
pub fn translation_part(m: &Mat4) -> Vec3 {
    m.w_axis.truncate()
}

/// Largest absolute element-wise difference between two matrices.
pub fn max_abs_diff(a: &Mat4, b: &Mat4) -> f32 {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}
