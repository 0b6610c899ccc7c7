use crate::util::ScreenPos;

use super::{PointerButton, RawPointerEvent};

/// Normalized pointer signal consumed by the [`PointerStateMachine`](super::pointer_state::PointerStateMachine).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerSignal {
    Move(ScreenPos),
    Press { button: PointerButton, pos: ScreenPos },
    Release { button: PointerButton, pos: ScreenPos },
    Wheel(f32),
}

/// Turns backend pointer events into button-indexed press/release/move/wheel signals.
#[derive(Clone, Debug, Default)]
pub struct PointerSource {
    latest_pos: Option<ScreenPos>,
}

impl PointerSource {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns `None` for events that carry no new information, such as a move to the position
    /// the pointer is already at.
    pub fn normalize(&mut self, event: &RawPointerEvent) -> Option<PointerSignal> {
        match *event {
            RawPointerEvent::Moved(pos) => {
                if self.latest_pos == Some(pos) {
                    return None;
                }
                self.latest_pos = Some(pos);
                Some(PointerSignal::Move(pos))
            }
            RawPointerEvent::Button {
                button,
                pressed: true,
                pos,
            } => Some(PointerSignal::Press { button, pos }),
            RawPointerEvent::Button {
                button,
                pressed: false,
                pos,
            } => Some(PointerSignal::Release { button, pos }),
            RawPointerEvent::Wheel { delta } if delta != 0.0 => Some(PointerSignal::Wheel(delta)),
            RawPointerEvent::Wheel { .. } => None,
        }
    }

    pub fn latest_pos(&self) -> Option<ScreenPos> {
        self.latest_pos
    }

    pub fn reset(&mut self) {
        self.latest_pos = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::pos;

    #[test]
    fn repeated_moves_to_same_position_are_dropped() {
        let mut source = PointerSource::new();

        assert_eq!(
            source.normalize(&RawPointerEvent::Moved(pos(3., 4.))),
            Some(PointerSignal::Move(pos(3., 4.)))
        );
        assert_eq!(source.normalize(&RawPointerEvent::Moved(pos(3., 4.))), None);
        assert_eq!(source.latest_pos(), Some(pos(3., 4.)));
    }

    #[test]
    fn zero_wheel_is_dropped() {
        let mut source = PointerSource::new();

        assert_eq!(source.normalize(&RawPointerEvent::Wheel { delta: 0.0 }), None);
        assert_eq!(
            source.normalize(&RawPointerEvent::Wheel { delta: -120.0 }),
            Some(PointerSignal::Wheel(-120.0))
        );
    }
}
