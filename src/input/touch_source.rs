use crate::util::ScreenPos;

use super::{RawTouch, TouchId, TouchPhase};

/// A touch change reduced to the first active contact plus a contact count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchSignal {
    pub phase: TouchPhase,
    /// Position of the first active contact, or of the lifted contact when none remain.
    pub pos: ScreenPos,
    /// Contacts still down after this change.
    pub touches: usize,
}

/// Reduces per-contact backend events to a single touch stream.
#[derive(Clone, Debug, Default)]
pub struct TouchSource {
    /// Active contacts in the order they went down.
    active: Vec<(TouchId, ScreenPos)>,
}

impl TouchSource {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn touches(&self) -> usize {
        self.active.len()
    }

    fn first_pos(&self) -> Option<ScreenPos> {
        self.active.first().map(|(_, pos)| *pos)
    }

    fn position_of(&self, id: TouchId) -> Option<usize> {
        self.active.iter().position(|(active, _)| *active == id)
    }

    /// Contacts the source never saw start are ignored.
    pub fn normalize(&mut self, touch: &RawTouch) -> Option<TouchSignal> {
        match touch.phase {
            TouchPhase::Start => {
                match self.position_of(touch.id) {
                    Some(idx) => self.active[idx].1 = touch.pos,
                    None => self.active.push((touch.id, touch.pos)),
                }
            }
            TouchPhase::Move => {
                let idx = self.position_of(touch.id)?;
                self.active[idx].1 = touch.pos;
            }
            TouchPhase::End | TouchPhase::Cancel => {
                let idx = self.position_of(touch.id)?;
                self.active.remove(idx);
            }
        }

        Some(TouchSignal {
            phase: touch.phase,
            pos: self.first_pos().unwrap_or(touch.pos),
            touches: self.active.len(),
        })
    }

    pub fn reset(&mut self) {
        self.active.clear();
    }
}
