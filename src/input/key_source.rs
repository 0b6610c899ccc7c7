use rustc_hash::FxHashSet;

use super::{KeyCode, RawKeyEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    /// The key went down this frame.
    Down,
    /// The key is down, reported every frame including the first.
    Hold,
    /// The key was released this frame.
    Up,
}

/// A key transition handed to listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub phase: KeyPhase,
}

/// Keyboard state, queried on demand and polled once per frame.
#[derive(Clone, Debug, Default)]
pub struct KeySource {
    // The keys that are currently being held down.
    keys_down: FxHashSet<KeyCode>,

    /// Keys that went down since the last poll, in order.
    pressed: Vec<KeyCode>,

    /// Keys that went up since the last poll, in order.
    released: Vec<KeyCode>,
}

impl KeySource {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn on_key(&mut self, event: &RawKeyEvent) {
        if event.pressed {
            // key repeat is not a new press
            if self.keys_down.insert(event.key) {
                self.pressed.push(event.key);
            }
        } else if self.keys_down.remove(&event.key) {
            self.released.push(event.key);
        }
    }

    /// Is the given key currently held down?
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Drains this frame's transitions: presses, then every held key, then releases.
    pub fn poll(&mut self) -> Vec<KeyEvent> {
        let mut held: Vec<KeyCode> = self.keys_down.iter().copied().collect();
        held.sort();

        let pressed = self.pressed.drain(..).map(|key| KeyEvent {
            key,
            phase: KeyPhase::Down,
        });
        let held = held.into_iter().map(|key| KeyEvent {
            key,
            phase: KeyPhase::Hold,
        });
        let released = self.released.drain(..).map(|key| KeyEvent {
            key,
            phase: KeyPhase::Up,
        });

        pressed.chain(held).chain(released).collect()
    }

    /// Forget every key, e.g. when the window loses focus and key-up events will never arrive.
    pub fn clear(&mut self) {
        self.keys_down.clear();
        self.pressed.clear();
        self.released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: KeyCode, pressed: bool) -> RawKeyEvent {
        RawKeyEvent { key, pressed }
    }

    #[test]
    fn press_hold_release() {
        let mut keys = KeySource::new();

        keys.on_key(&key(KeyCode::W, true));
        assert!(keys.is_key_pressed(KeyCode::W));
        assert_eq!(
            keys.poll(),
            vec![
                KeyEvent {
                    key: KeyCode::W,
                    phase: KeyPhase::Down
                },
                KeyEvent {
                    key: KeyCode::W,
                    phase: KeyPhase::Hold
                },
            ]
        );

        // auto-repeat
        keys.on_key(&key(KeyCode::W, true));
        assert_eq!(
            keys.poll(),
            vec![KeyEvent {
                key: KeyCode::W,
                phase: KeyPhase::Hold
            }]
        );

        keys.on_key(&key(KeyCode::W, false));
        assert!(!keys.is_key_pressed(KeyCode::W));
        assert_eq!(
            keys.poll(),
            vec![KeyEvent {
                key: KeyCode::W,
                phase: KeyPhase::Up
            }]
        );
        assert_eq!(keys.poll(), vec![]);
    }

    #[test]
    fn clear_forgets_held_keys() {
        let mut keys = KeySource::new();

        keys.on_key(&key(KeyCode::LShift, true));
        keys.clear();

        assert!(!keys.is_key_pressed(KeyCode::LShift));
        assert_eq!(keys.poll(), vec![]);
    }
}
