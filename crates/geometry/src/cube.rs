use glam::Vec3;

/// Vertices per face; faces do not share vertices.
pub const VERTICES_PER_FACE: usize = 4;

/// One face of the cube, in buffer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    Back,
    Front,
    Left,
    Right,
    Bottom,
    Top,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Back,
        Face::Front,
        Face::Left,
        Face::Right,
        Face::Bottom,
        Face::Top,
    ];

    /// Index of the face's first vertex in [`CUBE_POSITIONS`].
    pub fn first_vertex(self) -> usize {
        self as usize * VERTICES_PER_FACE
    }

    /// Outward axis of the face.
    pub fn axis(self) -> Vec3 {
        match self {
            Face::Back => Vec3::NEG_Z,
            Face::Front => Vec3::Z,
            Face::Left => Vec3::NEG_X,
            Face::Right => Vec3::X,
            Face::Bottom => Vec3::NEG_Y,
            Face::Top => Vec3::Y,
        }
    }

    /// Flat color painted on every vertex of the face.
    pub fn color(self) -> [f32; 3] {
        CUBE_COLORS[self.first_vertex()]
    }

    /// Face owning the given vertex index, if in range.
    pub fn of_vertex(index: usize) -> Option<Face> {
        Face::ALL.get(index / VERTICES_PER_FACE).copied()
    }
}

#[rustfmt::skip]
pub const CUBE_POSITIONS: [[f32; 3]; 24] = [
    // back
    [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],
    // front
    [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0],
    // left
    [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0],
    // right
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0],
    // bottom
    [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0],
    // top
    [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0],
];

const YELLOW: [f32; 3] = [1.0, 1.0, 0.0];
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
const RED: [f32; 3] = [1.0, 0.0, 0.0];
const ORANGE: [f32; 3] = [1.0, 0.6, 0.0];

#[rustfmt::skip]
pub const CUBE_COLORS: [[f32; 3]; 24] = [
    YELLOW, YELLOW, YELLOW, YELLOW,
    WHITE, WHITE, WHITE, WHITE,
    GREEN, GREEN, GREEN, GREEN,
    BLUE, BLUE, BLUE, BLUE,
    RED, RED, RED, RED,
    ORANGE, ORANGE, ORANGE, ORANGE,
];

#[rustfmt::skip]
pub const CUBE_INDICES: [u16; 36] = [
    0, 1, 2,    0, 2, 3,    // back
    4, 5, 6,    4, 6, 7,    // front
    8, 9, 10,   8, 10, 11,  // left
    12, 13, 14, 12, 14, 15, // right
    16, 17, 18, 16, 18, 19, // bottom
    20, 21, 22, 20, 22, 23, // top
];
