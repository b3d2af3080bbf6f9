//! Gamepad polling. The gilrs backend is compiled with the `gamepad` feature;
//! without it no pad is ever reported.

/// Raw state of one pad in standard-mapping order: axes `[lx, ly, rx, ry]`,
/// buttons 0 to 16 (face buttons, shoulders, triggers, select, start, thumbs,
/// d-pad, home).
///
/// Pushing a stick up reads +1 on `ly` and -1 on `ry`, matching what W and
/// ArrowUp do on the keyboard.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PadReading {
    pub axes: [f64; 4],
    pub buttons: [bool; 17],
}

#[cfg(feature = "gamepad")]
mod backend {
    use super::PadReading;
    use gilrs::{Axis, Button, EventType, Gamepad, Gilrs};

    const BUTTONS: [Button; 17] = [
        Button::South,
        Button::East,
        Button::West,
        Button::North,
        Button::LeftTrigger,
        Button::RightTrigger,
        Button::LeftTrigger2,
        Button::RightTrigger2,
        Button::Select,
        Button::Start,
        Button::LeftThumb,
        Button::RightThumb,
        Button::DPadUp,
        Button::DPadDown,
        Button::DPadLeft,
        Button::DPadRight,
        Button::Mode,
    ];

    impl PadReading {
        pub(crate) fn read(axis: impl Fn(Axis) -> f32, pressed: impl Fn(Button) -> bool) -> Self {
            Self {
                axes: [
                    f64::from(axis(Axis::LeftStickX)),
                    f64::from(axis(Axis::LeftStickY)),
                    f64::from(axis(Axis::RightStickX)),
                    -f64::from(axis(Axis::RightStickY)),
                ],
                buttons: BUTTONS.map(&pressed),
            }
        }

        fn from_gamepad(pad: &Gamepad<'_>) -> Self {
            Self::read(|a| pad.value(a), |b| pad.is_pressed(b))
        }
    }

    pub struct PadSource {
        gilrs: Gilrs,
    }

    impl PadSource {
        pub fn new() -> Option<Self> {
            match Gilrs::new() {
                Ok(gilrs) => {
                    for (_, pad) in gilrs.gamepads() {
                        tracing::info!(name = pad.name(), "gamepad found");
                    }
                    Some(Self { gilrs })
                }
                Err(e) => {
                    tracing::warn!(error = %e, "gamepad support unavailable");
                    None
                }
            }
        }

        /// Drain pending events and read the first connected pad.
        pub fn poll(&mut self) -> Option<PadReading> {
            while let Some(gilrs::Event { id, event, .. }) = self.gilrs.next_event() {
                match event {
                    EventType::Connected => {
                        tracing::info!(name = self.gilrs.gamepad(id).name(), "gamepad connected");
                    }
                    EventType::Disconnected => tracing::info!(?id, "gamepad disconnected"),
                    _ => {}
                }
            }
            self.gilrs
                .gamepads()
                .next()
                .map(|(_, pad)| PadReading::from_gamepad(&pad))
        }
    }

}

#[cfg(not(feature = "gamepad"))]
mod backend {
    use super::PadReading;

    pub struct PadSource;

    impl PadSource {
        pub fn new() -> Option<Self> {
            tracing::debug!("built without the `gamepad` feature, gamepads ignored");
            None
        }

        pub fn poll(&mut self) -> Option<PadReading> {
            None
        }
    }
}

pub use backend::PadSource;
