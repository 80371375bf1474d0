/// Errors from mesh validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),
    #[error("index {index} at position {position} exceeds vertex count {vertex_count}")]
    IndexOutOfRange {
        position: usize,
        index: u16,
        vertex_count: usize,
    },
    #[error("{positions} positions but {colors} colors")]
    ColorCountMismatch { positions: usize, colors: usize },
}

/// Summary of a validated mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshStats {
    pub vertex_count: usize,
    pub index_count: usize,
    pub triangle_count: usize,
}

/// Check that positions, colors and indices describe a drawable triangle list.
pub fn validate_mesh(
    positions: &[[f32; 3]],
    colors: &[[f32; 3]],
    indices: &[u16],
) -> Result<MeshStats, MeshError> {
    if positions.len() != colors.len() {
        return Err(MeshError::ColorCountMismatch {
            positions: positions.len(),
            colors: colors.len(),
        });
    }
    if indices.len() % 3 != 0 {
        return Err(MeshError::PartialTriangle(indices.len()));
    }
    if let Some((position, &index)) = indices
        .iter()
        .enumerate()
        .find(|(_, i)| **i as usize >= positions.len())
    {
        return Err(MeshError::IndexOutOfRange {
            position,
            index,
            vertex_count: positions.len(),
        });
    }

    Ok(MeshStats {
        vertex_count: positions.len(),
        index_count: indices.len(),
        triangle_count: indices.len() / 3,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CUBE_COLORS, CUBE_INDICES, CUBE_POSITIONS};

    #[test]
    fn cube_is_valid() {
        let stats = validate_mesh(&CUBE_POSITIONS, &CUBE_COLORS, &CUBE_INDICES).unwrap();
        assert_eq!(stats.vertex_count, 24);
        assert_eq!(stats.index_count, 36);
        assert_eq!(stats.triangle_count, 12);
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = validate_mesh(&CUBE_POSITIONS[..3], &CUBE_COLORS[..3], &[0, 1, 3]).unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                position: 2,
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn rejects_partial_triangle() {
        let err = validate_mesh(&CUBE_POSITIONS, &CUBE_COLORS, &CUBE_INDICES[..4]).unwrap_err();
        assert_eq!(err, MeshError::PartialTriangle(4));
    }

    #[test]
    fn rejects_color_mismatch() {
        let err = validate_mesh(&CUBE_POSITIONS, &CUBE_COLORS[..4], &CUBE_INDICES).unwrap_err();
        assert!(matches!(err, MeshError::ColorCountMismatch { .. }));
    }
}
