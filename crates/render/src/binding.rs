//! Names shared by CPU code and the shader.

pub const ATTRIB_POSITION: &str = "aVertexPosition";
pub const ATTRIB_COLOR: &str = "aVertexColor";

pub const UNIFORM_PROJECTION: &str = "uProjectionMatrix";
pub const UNIFORM_MODEL_VIEW: &str = "uModelViewMatrix";
pub const UNIFORM_MOVE: &str = "uMoveMatrix";

/// Shader location of each vertex attribute.
pub const LOCATION_POSITION: u32 = 0;
pub const LOCATION_COLOR: u32 = 1;

pub const ALL_NAMES: [&str; 5] = [
    ATTRIB_POSITION,
    ATTRIB_COLOR,
    UNIFORM_PROJECTION,
    UNIFORM_MODEL_VIEW,
    UNIFORM_MOVE,
];
