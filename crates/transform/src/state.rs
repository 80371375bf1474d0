use crate::config::SceneConfig;
use crate::ops;
use cubecross_input::{Action, Target};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How key input turns into matrices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformMode {
    /// Mutate the shared matrices in place and never reset them. Each frame
    /// starts from whatever the previous frame and key presses left behind,
    /// including accumulated floating-point error.
    #[default]
    Compounding,
    /// Accumulate input as angles and rebuild the matrices at the start of
    /// every frame. Free of drift, but an Alt orbit issued after an Up/Down
    /// rotation composes differently than in `Compounding`.
    Recomputed,
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransformMode::Compounding => "compounding",
            TransformMode::Recomputed => "recomputed",
        })
    }
}

impl FromStr for TransformMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compounding" => Ok(TransformMode::Compounding),
            "recomputed" => Ok(TransformMode::Recomputed),
            other => Err(format!("unknown transform mode: {other}")),
        }
    }
}

/// Perspective parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Perspective {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// The three matrices uploaded every frame plus the input state that drives
/// them.
#[derive(Debug, Clone)]
pub struct TransformState {
    mode: TransformMode,
    perspective: Perspective,
    shift: Vec3,
    rotation_rate: f32,
    projection: Mat4,
    model_view: Mat4,
    move_matrix: Mat4,
    // Accumulated input, only read in `Recomputed` mode.
    yaw: f32,
    pivot_yaw: f32,
    move_yaw: f32,
}

impl TransformState {
    /// Projection starts as `perspective * translate(shift)`; model-view and
    /// move start as identity.
    pub fn new(config: &SceneConfig, aspect: f32) -> Self {
        let perspective = Perspective {
            fov_y: config.fov_degrees.to_radians(),
            aspect: sanitize_aspect(aspect),
            near: config.near,
            far: config.far,
        };
        let mut projection = perspective.matrix();
        ops::translate(&mut projection, config.shift);

        Self {
            mode: config.mode,
            perspective,
            shift: config.shift,
            rotation_rate: config.rotation_rate,
            projection,
            model_view: Mat4::IDENTITY,
            move_matrix: Mat4::IDENTITY,
            yaw: 0.0,
            pivot_yaw: 0.0,
            move_yaw: 0.0,
        }
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    pub fn shift(&self) -> Vec3 {
        self.shift
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn model_view(&self) -> Mat4 {
        self.model_view
    }

    pub fn move_matrix(&self) -> Mat4 {
        self.move_matrix
    }

    /// Translate the projection in place (`projection *= T(offset)`).
    pub fn translate(&mut self, offset: Vec3) {
        ops::translate(&mut self.projection, offset);
    }

    /// Apply a key action.
    pub fn apply(&mut self, action: Action) {
        tracing::debug!(?action, mode = %self.mode, "apply action");
        match self.mode {
            TransformMode::Compounding => self.apply_in_place(action),
            TransformMode::Recomputed => {
                self.accumulate(action);
                self.recompute();
            }
        }
    }

    /// Called before the frame's first draw. Rebuilds the matrices from
    /// accumulated input in `Recomputed` mode; a no-op otherwise.
    pub fn begin_frame(&mut self) {
        if self.mode == TransformMode::Recomputed {
            self.recompute();
        }
    }

    /// Rebuild the perspective for a new aspect ratio, keeping whatever
    /// placement state has accumulated on top of it.
    pub fn set_aspect(&mut self, aspect: f32) {
        let aspect = sanitize_aspect(aspect);
        if aspect == self.perspective.aspect {
            return;
        }
        let old = self.perspective.matrix();
        self.perspective.aspect = aspect;
        match self.mode {
            TransformMode::Compounding => {
                self.projection = self.perspective.matrix() * old.inverse() * self.projection;
            }
            TransformMode::Recomputed => self.recompute(),
        }
    }

    /// Projection as it would be with no input and no frame mutations.
    pub fn initial_projection(&self) -> Mat4 {
        self.perspective.matrix() * Mat4::from_translation(self.shift)
    }

    fn apply_in_place(&mut self, action: Action) {
        let angle = self.angle(action.steps());
        match action {
            Action::RotateY {
                target: Target::Projection,
                ..
            } => ops::rotate_y(&mut self.projection, angle),
            Action::RotateY {
                target: Target::Move,
                ..
            } => ops::rotate_y(&mut self.move_matrix, angle),
            Action::OrbitPivot { .. } => {
                ops::translate(&mut self.projection, -self.shift);
                ops::rotate_y(&mut self.projection, angle);
                ops::translate(&mut self.projection, self.shift);
            }
        }
    }

    fn accumulate(&mut self, action: Action) {
        let angle = self.angle(action.steps());
        match action {
            Action::RotateY {
                target: Target::Projection,
                ..
            } => self.yaw += angle,
            Action::RotateY {
                target: Target::Move,
                ..
            } => self.move_yaw += angle,
            Action::OrbitPivot { .. } => self.pivot_yaw += angle,
        }
    }

    fn recompute(&mut self) {
        self.projection = self.perspective.matrix()
            * Mat4::from_rotation_y(self.pivot_yaw)
            * Mat4::from_translation(self.shift)
            * Mat4::from_rotation_y(self.yaw);
        self.move_matrix = Mat4::from_rotation_y(self.move_yaw);
    }

    fn angle(&self, steps: i32) -> f32 {
        steps as f32 * self.rotation_rate
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::max_abs_diff;
    use cubecross_input::{Key, KeyMap, Modifiers};

    const EPS: f32 = 1e-4;

    fn state(mode: TransformMode) -> TransformState {
        let config = SceneConfig {
            mode,
            ..SceneConfig::default()
        };
        TransformState::new(&config, 16.0 / 9.0)
    }

    fn press(state: &mut TransformState, key: Key, mods: Modifiers) {
        if let Some(action) = KeyMap::default().resolve(key, mods) {
            state.apply(action);
        }
    }

    #[test]
    fn initial_matrices() {
        let s = state(TransformMode::Compounding);
        assert!(max_abs_diff(&s.projection(), &s.initial_projection()) < 1e-6);
        assert_eq!(s.model_view(), Mat4::IDENTITY);
        assert_eq!(s.move_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn arrow_up_down_rotate_projection() {
        let mut s = state(TransformMode::Compounding);
        let start = s.projection();
        press(&mut s, Key::ArrowUp, Modifiers::NONE);
        assert!(max_abs_diff(&s.projection(), &(start * Mat4::from_rotation_y(0.07))) < 1e-6);
        press(&mut s, Key::ArrowDown, Modifiers::ALT);
        assert!(max_abs_diff(&s.projection(), &start) < EPS);
        assert_eq!(s.move_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn alt_right_orbits_pivot() {
        let mut s = state(TransformMode::Compounding);
        let start = s.projection();
        let shift = s.shift();
        press(&mut s, Key::ArrowRight, Modifiers::ALT);
        let expected = start
            * Mat4::from_translation(-shift)
            * Mat4::from_rotation_y(0.07)
            * Mat4::from_translation(shift);
        assert!(max_abs_diff(&s.projection(), &expected) < EPS);
        // From the initial state, orbiting equals rotating before the shift.
        let pre_rotated = s.perspective().matrix()
            * Mat4::from_rotation_y(0.07)
            * Mat4::from_translation(shift);
        assert!(max_abs_diff(&s.projection(), &pre_rotated) < EPS);
    }

    #[test]
    fn alt_left_undoes_alt_right() {
        let mut s = state(TransformMode::Compounding);
        let start = s.projection();
        press(&mut s, Key::ArrowRight, Modifiers::ALT);
        press(&mut s, Key::ArrowLeft, Modifiers::ALT);
        assert!(max_abs_diff(&s.projection(), &start) < EPS);
    }

    #[test]
    fn plain_left_right_rotate_move_only() {
        let mut s = state(TransformMode::Compounding);
        let start = s.projection();
        press(&mut s, Key::ArrowRight, Modifiers::NONE);
        press(&mut s, Key::ArrowRight, Modifiers::NONE);
        press(&mut s, Key::ArrowLeft, Modifiers::NONE);
        assert!(s.move_matrix().abs_diff_eq(Mat4::from_rotation_y(0.07), 1e-6));
        assert_eq!(s.projection(), start);
    }

    #[test]
    fn model_view_is_inert() {
        for mode in [TransformMode::Compounding, TransformMode::Recomputed] {
            let mut s = state(mode);
            for key in Key::ALL {
                press(&mut s, key, Modifiers::NONE);
                press(&mut s, key, Modifiers::ALT);
            }
            s.translate(Vec3::ONE);
            s.set_aspect(1.0);
            s.begin_frame();
            assert_eq!(s.model_view(), Mat4::IDENTITY);
        }
    }

    #[test]
    fn compounding_state_persists_across_frames() {
        let mut s = state(TransformMode::Compounding);
        s.translate(Vec3::X);
        s.begin_frame();
        let expected = s.initial_projection() * Mat4::from_translation(Vec3::X);
        assert!(max_abs_diff(&s.projection(), &expected) < EPS);
    }

    #[test]
    fn recomputed_resets_frame_translation() {
        let mut s = state(TransformMode::Recomputed);
        s.translate(Vec3::X);
        s.begin_frame();
        assert!(max_abs_diff(&s.projection(), &s.initial_projection()) < 1e-6);
    }

    #[test]
    fn modes_agree_when_orbits_come_first() {
        let mut a = state(TransformMode::Compounding);
        let mut b = state(TransformMode::Recomputed);
        let presses = [
            (Key::ArrowRight, Modifiers::ALT),
            (Key::ArrowRight, Modifiers::ALT),
            (Key::ArrowLeft, Modifiers::ALT),
            (Key::ArrowRight, Modifiers::NONE),
            (Key::ArrowUp, Modifiers::NONE),
            (Key::ArrowUp, Modifiers::NONE),
            (Key::ArrowDown, Modifiers::NONE),
            (Key::ArrowLeft, Modifiers::NONE),
            (Key::ArrowLeft, Modifiers::NONE),
        ];
        for (key, mods) in presses {
            press(&mut a, key, mods);
            press(&mut b, key, mods);
        }
        assert!(max_abs_diff(&a.projection(), &b.projection()) < EPS);
        assert!(max_abs_diff(&a.move_matrix(), &b.move_matrix()) < EPS);
    }

    #[test]
    fn modes_diverge_when_orbit_follows_rotation() {
        let mut a = state(TransformMode::Compounding);
        let mut b = state(TransformMode::Recomputed);
        for (key, mods) in [(Key::ArrowUp, Modifiers::NONE), (Key::ArrowRight, Modifiers::ALT)] {
            press(&mut a, key, mods);
            press(&mut b, key, mods);
        }
        assert!(max_abs_diff(&a.projection(), &b.projection()) > 1e-3);
    }

    #[test]
    fn set_aspect_preserves_placement() {
        let mut s = state(TransformMode::Compounding);
        press(&mut s, Key::ArrowUp, Modifiers::NONE);
        s.set_aspect(1.0);
        let expected = s.perspective().matrix()
            * Mat4::from_translation(s.shift())
            * Mat4::from_rotation_y(0.07);
        assert!(max_abs_diff(&s.projection(), &expected) < 1e-3);
    }

    #[test]
    fn recomputed_resize_rebuilds_from_angles() {
        let mut s = state(TransformMode::Recomputed);
        press(&mut s, Key::ArrowUp, Modifiers::NONE);
        s.set_aspect(1.0);
        let expected = s.perspective().matrix()
            * Mat4::from_translation(s.shift())
            * Mat4::from_rotation_y(0.07);
        assert_eq!(s.perspective().aspect, 1.0);
        assert!(max_abs_diff(&s.projection(), &expected) < 1e-6);
        s.begin_frame();
        assert!(max_abs_diff(&s.projection(), &expected) < 1e-6);
    }

    #[test]
    fn every_in_place_mutation_uses_configured_rate() {
        let config = SceneConfig {
            rotation_rate: 0.25,
            ..SceneConfig::default()
        };
        let mut s = TransformState::new(&config, 1.0);
        let start = s.projection();
        let shift = s.shift();

        press(&mut s, Key::ArrowUp, Modifiers::NONE);
        let rotated = start * Mat4::from_rotation_y(0.25);
        assert!(max_abs_diff(&s.projection(), &rotated) < 1e-6);

        press(&mut s, Key::ArrowLeft, Modifiers::ALT);
        let orbited = rotated
            * Mat4::from_translation(-shift)
            * Mat4::from_rotation_y(-0.25)
            * Mat4::from_translation(shift);
        assert!(max_abs_diff(&s.projection(), &orbited) < EPS);

        press(&mut s, Key::ArrowLeft, Modifiers::NONE);
        assert!(s.move_matrix().abs_diff_eq(Mat4::from_rotation_y(-0.25), 1e-6));
    }

    #[test]
    fn degenerate_aspect_falls_back() {
        let s = TransformState::new(&SceneConfig::default(), 0.0);
        assert_eq!(s.perspective().aspect, 1.0);
        let s = TransformState::new(&SceneConfig::default(), f32::NAN);
        assert_eq!(s.perspective().aspect, 1.0);
    }

    #[test]
    fn mode_parse_and_display() {
        assert_eq!("Recomputed".parse::<TransformMode>(), Ok(TransformMode::Recomputed));
        assert_eq!(TransformMode::Compounding.to_string(), "compounding");
        assert!("bogus".parse::<TransformMode>().is_err());
    }
}
