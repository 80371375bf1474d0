use serde::{Deserialize, Serialize};

/// Matrix an action rotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// The shared projection/placement matrix.
    Projection,
    /// The move matrix.
    Move,
}

/// A transform update produced by a key press.
///
/// Rotation amounts are expressed in steps of the configured rotation rate;
/// `+1` turns counter-clockwise around Y, `-1` clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Rotate `target` about its local Y axis.
    RotateY { target: Target, steps: i32 },
    /// Rotate the projection about the scene pivot: translate to the pivot,
    /// rotate about Y, translate back.
    OrbitPivot { steps: i32 },
}

impl Action {
    /// Signed number of rotation steps.
    pub fn steps(self) -> i32 {
        match self {
            Action::RotateY { steps, .. } | Action::OrbitPivot { steps } => steps,
        }
    }

    /// Same action turning the other way.
    pub fn reversed(self) -> Self {
        match self {
            Action::RotateY { target, steps } => Action::RotateY {
                target,
                steps: -steps,
            },
            Action::OrbitPivot { steps } => Action::OrbitPivot { steps: -steps },
        }
    }
}
