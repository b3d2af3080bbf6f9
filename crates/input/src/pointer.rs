use crate::sample::{InputSample, StickState};

/// Pointer position inside a zone that a press claimed.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Grab {
    id: u64,
    x: f64,
    y: f64,
}

/// Two on-screen sticks: the left and right halves of a surface.
///
/// A press claims the free half it lands in and keeps it until that pointer
/// is released, wherever the pointer moves. Dragging up raises throttle on
/// the left stick and pitches forward on the right, as the keyboard does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerSticks {
    width: f64,
    height: f64,
    left: Option<Grab>,
    right: Option<Grab>,
}

impl PointerSticks {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Claim the stick under `(x, y)` for pointer `id`. Returns false when
    /// that half is already held by another pointer.
    pub fn press(&mut self, id: u64, x: f64, y: f64) -> bool {
        let slot = if x < self.width * 0.5 {
            &mut self.left
        } else {
            &mut self.right
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(Grab { id, x, y });
        true
    }

    pub fn moved(&mut self, id: u64, x: f64, y: f64) {
        for grab in [&mut self.left, &mut self.right].into_iter().flatten() {
            if grab.id == id {
                grab.x = x;
                grab.y = y;
            }
        }
    }

    pub fn release(&mut self, id: u64) {
        for slot in [&mut self.left, &mut self.right] {
            if slot.is_some_and(|g| g.id == id) {
                *slot = None;
            }
        }
    }

    /// Drop every grab, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.left = None;
        self.right = None;
    }

    fn stick(&self, grab: Option<Grab>, center_x: f64, forward_sign: f64) -> StickState {
        let Some(g) = grab else {
            return StickState::CENTERED;
        };
        let half_w = (self.width * 0.25).max(1.0);
        let half_h = (self.height * 0.5).max(1.0);
        let dx = (g.x - center_x) / half_w;
        let dy = (g.y - self.height * 0.5) / half_h;
        StickState::from_touch(dx, dy * forward_sign)
    }

    pub fn left(&self) -> StickState {
        self.stick(self.left, self.width * 0.25, -1.0)
    }

    pub fn right(&self) -> StickState {
        self.stick(self.right, self.width * 0.75, 1.0)
    }

    /// Sticks only; pointers carry no buttons.
    pub fn to_sample(&self) -> InputSample {
        InputSample {
            left: self.left(),
            right: self.right(),
            ..InputSample::default()
        }
    }
}
