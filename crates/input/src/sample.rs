use serde::{Deserialize, Serialize};

/// Radial deadzone applied to touch sticks.
pub const TOUCH_DEADZONE: f64 = 0.08;

/// One analog stick. `x`, `y` lie in the unit disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StickState {
    pub x: f64,
    pub y: f64,
    /// Whether a direct control (touch pointer or held keys) owns this stick.
    pub active: bool,
}

impl StickState {
    pub const CENTERED: StickState = StickState {
        x: 0.0,
        y: 0.0,
        active: false,
    };

    /// Build a touch-driven stick from a raw offset measured in half-extents
    /// of the touch zone: per-axis clamp, unit-disk clamp, then radial deadzone.
    pub fn from_touch(dx: f64, dy: f64) -> Self {
        let (mut x, mut y) = clamp_to_unit_disk(dx.clamp(-1.0, 1.0), dy.clamp(-1.0, 1.0));
        if x.hypot(y) < TOUCH_DEADZONE {
            x = 0.0;
            y = 0.0;
        }
        Self { x, y, active: true }
    }
}

/// Per-frame immutable control sample handed to `World::step`.
///
/// Left stick: throttle (y) and yaw (x). Right stick: pitch (y) and roll (x).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSample {
    pub left: StickState,
    pub right: StickState,
    pub fire: bool,
    pub pause: bool,
}

impl InputSample {
    /// Sticks centered, nothing pressed.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Layer `top` over this sample: sticks that `top` owns replace ours,
    /// buttons are OR-ed.
    pub fn overlay(self, top: InputSample) -> InputSample {
        InputSample {
            left: if top.left.active { top.left } else { self.left },
            right: if top.right.active { top.right } else { self.right },
            fire: self.fire || top.fire,
            pause: self.pause || top.pause,
        }
    }
}

/// Scale `(x, y)` back onto the unit circle when it lies outside it.
pub fn clamp_to_unit_disk(x: f64, y: f64) -> (f64, f64) {
    let m = x.hypot(y);
    if m > 1.0 { (x / m, y / m) } else { (x, y) }
}

/// Digital key state mapped onto full-deflection sticks, for keyboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardSticks {
    pub throttle_up: bool,
    pub throttle_down: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
    pub pitch_forward: bool,
    pub pitch_back: bool,
    pub roll_left: bool,
    pub roll_right: bool,
    pub fire: bool,
    pub pause: bool,
}

fn axis(negative: bool, positive: bool) -> f64 {
    match (negative, positive) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

impl KeyboardSticks {
    pub fn to_sample(&self) -> InputSample {
        let (lx, ly) = clamp_to_unit_disk(
            axis(self.yaw_left, self.yaw_right),
            axis(self.throttle_down, self.throttle_up),
        );
        // Pitch command is the negated right-stick y, so "forward" is -y.
        let (rx, ry) = clamp_to_unit_disk(
            axis(self.roll_left, self.roll_right),
            axis(self.pitch_forward, self.pitch_back),
        );
        InputSample {
            left: StickState {
                x: lx,
                y: ly,
                active: self.throttle_up || self.throttle_down || self.yaw_left || self.yaw_right,
            },
            right: StickState {
                x: rx,
                y: ry,
                active: self.pitch_forward || self.pitch_back || self.roll_left || self.roll_right,
            },
            fire: self.fire,
            pause: self.pause,
        }
    }
}
