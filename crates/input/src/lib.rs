//! Control input: the normalized per-frame sample the simulation consumes.
//!
//! # Invariants
//! - Stick deflection handed to the simulation is already deadzoned and
//!   clamped to the unit disk. The kernel never applies a deadzone itself.
//! - Touch, gamepad and keyboard all produce the same [`InputSample`].
//! - A stick marked `active` by a direct control wins over the gamepad.

pub mod gamepad;
pub mod pointer;
pub mod sample;

pub use gamepad::{GamepadAxes, GamepadButtons, GamepadProfile, apply_deadzone};
pub use pointer::PointerSticks;
pub use sample::{InputSample, KeyboardSticks, StickState, TOUCH_DEADZONE, clamp_to_unit_disk};
