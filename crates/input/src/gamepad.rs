use crate::sample::{InputSample, StickState, clamp_to_unit_disk};
use serde::{Deserialize, Serialize};

/// Axis indices into the raw gamepad axis array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamepadAxes {
    pub lx: usize,
    pub ly: usize,
    pub rx: usize,
    pub ry: usize,
}

/// Button indices into the raw gamepad button array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamepadButtons {
    pub fire: usize,
    pub pause: usize,
}

/// Maps a raw gamepad layout onto the two-stick control scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamepadProfile {
    pub name: String,
    pub axes: GamepadAxes,
    pub buttons: GamepadButtons,
    #[serde(default)]
    pub deadzone: Option<f64>,
}

const DEFAULT_DEADZONE: f64 = 0.1;

/// Zero inside `dz`, then rescale the remaining travel back to `[0, 1]`.
pub fn apply_deadzone(v: f64, dz: f64) -> f64 {
    if v.abs() < dz {
        return 0.0;
    }
    let s = (v.abs() - dz) / (1.0 - dz);
    v.signum() * s.clamp(0.0, 1.0)
}

impl GamepadProfile {
    /// Standard mapping (axes 0..3, fire on button 0, pause on button 9).
    fn standard(name: &str, deadzone: f64) -> Self {
        Self {
            name: name.to_string(),
            axes: GamepadAxes {
                lx: 0,
                ly: 1,
                rx: 2,
                ry: 3,
            },
            buttons: GamepadButtons { fire: 0, pause: 9 },
            deadzone: Some(deadzone),
        }
    }

    /// Profiles shipped with the game. The first one is the default.
    pub fn builtin() -> Vec<GamepadProfile> {
        vec![
            Self::standard("PS4 DualShock (standard)", 0.08),
            Self::standard("Generic Standard", 0.10),
        ]
    }

    /// Look up a built-in profile by name, falling back to the default one.
    pub fn by_name(name: &str) -> GamepadProfile {
        let mut profiles = Self::builtin();
        match profiles.iter().position(|p| p.name == name) {
            Some(i) => profiles.swap_remove(i),
            None => {
                tracing::warn!(name, "unknown gamepad profile, using default");
                profiles.swap_remove(0)
            }
        }
    }

    pub fn deadzone(&self) -> f64 {
        self.deadzone.unwrap_or(DEFAULT_DEADZONE)
    }

    /// Read sticks and buttons from raw arrays. Missing indices read as rest.
    /// Each stick is deadzoned per axis, then clamped to the unit disk.
    pub fn sample(&self, axes: &[f64], buttons: &[bool]) -> InputSample {
        let dz = self.deadzone();
        let read = |i: usize| apply_deadzone(axes.get(i).copied().unwrap_or(0.0), dz);
        let pressed = |i: usize| buttons.get(i).copied().unwrap_or(false);
        let stick = |ix: usize, iy: usize| {
            let (x, y) = clamp_to_unit_disk(read(ix), read(iy));
            StickState {
                x,
                y,
                active: false,
            }
        };
        InputSample {
            left: stick(self.axes.lx, self.axes.ly),
            right: stick(self.axes.rx, self.axes.ry),
            fire: pressed(self.buttons.fire),
            pause: pressed(self.buttons.pause),
        }
    }

    /// Combine an on-screen sample with a gamepad reading. A touch stick that
    /// is being held wins over the gamepad stick; buttons are OR-ed.
    pub fn merge(&self, touch: InputSample, axes: &[f64], buttons: &[bool]) -> InputSample {
        let pad = self.sample(axes, buttons);
        let mut out = touch;
        if !touch.left.active {
            out.left.x = pad.left.x;
            out.left.y = pad.left.y;
        }
        if !touch.right.active {
            out.right.x = pad.right.x;
            out.right.y = pad.right.y;
        }
        out.fire = touch.fire || pad.fire;
        out.pause = touch.pause || pad.pause;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadzone_rescales_remaining_travel() {
        assert_eq!(apply_deadzone(0.05, 0.1), 0.0);
        assert_eq!(apply_deadzone(1.0, 0.1), 1.0);
        assert!((apply_deadzone(0.55, 0.1) - 0.5).abs() < 1e-12);
        assert!((apply_deadzone(-0.55, 0.1) + 0.5).abs() < 1e-12);
    }

    #[test]
    fn builtin_profiles() {
        let p = GamepadProfile::builtin();
        assert_eq!(p.len(), 2);
        assert_eq!(p[0].deadzone(), 0.08);
        assert_eq!(p[1].buttons.pause, 9);
    }

    #[test]
    fn unknown_profile_falls_back_to_default() {
        let p = GamepadProfile::by_name("Flight Stick 3000");
        assert_eq!(p.name, "PS4 DualShock (standard)");
    }

    #[test]
    fn sample_reads_standard_layout() {
        let p = GamepadProfile::by_name("Generic Standard");
        let mut buttons = [false; 10];
        buttons[0] = true;
        let s = p.sample(&[0.0, -1.0, 1.0, 0.02], &buttons);
        assert_eq!(s.left.y, -1.0);
        assert_eq!(s.right.x, 1.0);
        assert_eq!(s.right.y, 0.0);
        assert!(s.fire);
        assert!(!s.pause);
    }

    #[test]
    fn short_axis_array_reads_as_rest() {
        let p = GamepadProfile::by_name("Generic Standard");
        let s = p.sample(&[0.5], &[]);
        assert_eq!(s.left.y, 0.0);
        assert!(!s.fire);
    }

    #[test]
    fn active_touch_stick_overrides_gamepad() {
        let p = GamepadProfile::by_name("Generic Standard");
        let touch = InputSample {
            left: StickState {
                x: 0.25,
                y: 0.5,
                active: true,
            },
            ..InputSample::default()
        };
        let mut buttons = [false; 10];
        buttons[9] = true;
        let merged = p.merge(touch, &[1.0, 1.0, 1.0, 1.0], &buttons);
        assert_eq!((merged.left.x, merged.left.y), (0.25, 0.5));
        assert!((merged.right.x - 0.5f64.sqrt()).abs() < 1e-12);
        assert!((merged.right.y - 0.5f64.sqrt()).abs() < 1e-12);
        assert!(merged.pause);
    }

    #[test]
    fn diagonal_full_deflection_stays_in_unit_disk() {
        let p = GamepadProfile::by_name("Generic Standard");
        let s = p.sample(&[1.0, 1.0, -1.0, 1.0], &[]);
        for stick in [s.left, s.right] {
            assert!((stick.x.hypot(stick.y) - 1.0).abs() < 1e-12);
            assert!((stick.x.abs() - stick.y.abs()).abs() < 1e-12);
        }
        assert!(s.right.x < 0.0);

        let merged = p.merge(InputSample::default(), &[1.0, 1.0, 1.0, 1.0], &[]);
        assert!(merged.left.x.hypot(merged.left.y) <= 1.0 + 1e-12);
        assert!(merged.right.x.hypot(merged.right.y) <= 1.0 + 1e-12);
    }

    #[test]
    fn single_axis_full_deflection_is_untouched() {
        let p = GamepadProfile::by_name("Generic Standard");
        let s = p.sample(&[0.0, -1.0, 0.55, 0.0], &[]);
        assert_eq!((s.left.x, s.left.y), (0.0, -1.0));
        assert!((s.right.x - 0.5).abs() < 1e-12);
    }
}
