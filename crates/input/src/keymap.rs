use crate::action::{Action, Target};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Keys the scene responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    pub const ALL: [Key; 4] = [Key::ArrowUp, Key::ArrowDown, Key::ArrowLeft, Key::ArrowRight];

    pub fn name(self) -> &'static str {
        match self {
            Key::ArrowUp => "ArrowUp",
            Key::ArrowDown => "ArrowDown",
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowRight => "ArrowRight",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown key: {s}"))
    }
}

/// Modifier state at the time of the key press. Only Alt is significant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Modifiers {
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { alt: false };
    pub const ALT: Modifiers = Modifiers { alt: true };
}

/// Lookup table from `(key, modifiers)` to an action.
///
/// Up/Down ignore Alt; Left/Right orbit the pivot with Alt held and rotate
/// the move matrix without it.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMap {
    bindings: BTreeMap<(Key, Modifiers), Action>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let projection_up = Action::RotateY {
            target: Target::Projection,
            steps: 1,
        };
        let orbit_right = Action::OrbitPivot { steps: 1 };
        let move_right = Action::RotateY {
            target: Target::Move,
            steps: 1,
        };

        let mut map = Self {
            bindings: BTreeMap::new(),
        };
        for mods in [Modifiers::NONE, Modifiers::ALT] {
            map.bind(Key::ArrowUp, mods, projection_up);
            map.bind(Key::ArrowDown, mods, projection_up.reversed());
        }
        map.bind(Key::ArrowRight, Modifiers::ALT, orbit_right);
        map.bind(Key::ArrowLeft, Modifiers::ALT, orbit_right.reversed());
        map.bind(Key::ArrowRight, Modifiers::NONE, move_right);
        map.bind(Key::ArrowLeft, Modifiers::NONE, move_right.reversed());
        map
    }
}

impl KeyMap {
    /// Bind (or rebind) a key combination.
    pub fn bind(&mut self, key: Key, mods: Modifiers, action: Action) {
        self.bindings.insert((key, mods), action);
    }

    /// Action bound to a key press, if any.
    pub fn resolve(&self, key: Key, mods: Modifiers) -> Option<Action> {
        let action = self.bindings.get(&(key, mods)).copied();
        tracing::trace!(%key, alt = mods.alt, ?action, "resolve key");
        action
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_down_ignore_alt() {
        let map = KeyMap::default();
        for mods in [Modifiers::NONE, Modifiers::ALT] {
            assert_eq!(
                map.resolve(Key::ArrowUp, mods),
                Some(Action::RotateY {
                    target: Target::Projection,
                    steps: 1
                })
            );
            assert_eq!(
                map.resolve(Key::ArrowDown, mods),
                Some(Action::RotateY {
                    target: Target::Projection,
                    steps: -1
                })
            );
        }
    }

    #[test]
    fn alt_left_right_orbit_pivot() {
        let map = KeyMap::default();
        assert_eq!(
            map.resolve(Key::ArrowRight, Modifiers::ALT),
            Some(Action::OrbitPivot { steps: 1 })
        );
        assert_eq!(
            map.resolve(Key::ArrowLeft, Modifiers::ALT),
            Some(Action::OrbitPivot { steps: -1 })
        );
    }

    #[test]
    fn plain_left_right_rotate_move() {
        let map = KeyMap::default();
        assert_eq!(
            map.resolve(Key::ArrowRight, Modifiers::NONE),
            Some(Action::RotateY {
                target: Target::Move,
                steps: 1
            })
        );
        assert_eq!(
            map.resolve(Key::ArrowLeft, Modifiers::NONE),
            Some(Action::RotateY {
                target: Target::Move,
                steps: -1
            })
        );
    }

    #[test]
    fn default_map_has_six_distinct_actions() {
        let map = KeyMap::default();
        assert_eq!(map.len(), 8);
        let mut distinct: Vec<Action> = Vec::new();
        for key in Key::ALL {
            for mods in [Modifiers::NONE, Modifiers::ALT] {
                let a = map.resolve(key, mods).unwrap();
                if !distinct.contains(&a) {
                    distinct.push(a);
                }
            }
        }
        assert_eq!(distinct.len(), 6);
    }

    #[test]
    fn rebind_overrides() {
        let mut map = KeyMap::default();
        map.bind(Key::ArrowUp, Modifiers::NONE, Action::OrbitPivot { steps: 2 });
        assert_eq!(
            map.resolve(Key::ArrowUp, Modifiers::NONE),
            Some(Action::OrbitPivot { steps: 2 })
        );
    }

    #[test]
    fn key_parse() {
        assert_eq!("arrowleft".parse::<Key>(), Ok(Key::ArrowLeft));
        assert_eq!("ArrowUp".parse::<Key>(), Ok(Key::ArrowUp));
        assert!("Enter".parse::<Key>().is_err());
    }
}
