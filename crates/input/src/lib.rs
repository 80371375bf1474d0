//! Keyboard input mapped to transform actions.
//!
//! Hosts translate their native key events into [`Key`] + [`Modifiers`],
//! then look the pair up in a [`KeyMap`]. The transform layer consumes
//! [`Action`]s, never raw events.
//!
//! # Invariants
//! - A key press resolves to at most one action.
//! - Unbound keys resolve to nothing.

pub mod action;
pub mod keymap;

pub use action::{Action, Target};
pub use keymap::{Key, KeyMap, Modifiers};
