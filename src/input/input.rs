use crate::util::{ScreenPos, ScreenSize};

pub type KeyCode = winit::event::VirtualKeyCode;

/// Mouse buttons this crate tracks. Anything else is dropped by the [`PointerSource`](super::pointer_source::PointerSource).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointerButton {
    Left = 0,
    Right = 1,
    Middle = 2,
}

impl PointerButton {
    pub const ALL: [PointerButton; 3] = [Self::Left, Self::Right, Self::Middle];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A pointer event as delivered by the windowing backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawPointerEvent {
    Moved(ScreenPos),
    Button {
        button: PointerButton,
        pressed: bool,
        pos: ScreenPos,
    },
    Wheel {
        delta: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TouchId(pub u64);

impl From<u64> for TouchId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A single contact change as delivered by the windowing backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawTouch {
    pub id: TouchId,
    pub phase: TouchPhase,
    pub pos: ScreenPos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub key: KeyCode,
    pub pressed: bool,
}

/// Everything the dispatcher can be fed between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawEvent {
    Pointer(RawPointerEvent),
    Touch(RawTouch),
    Key(RawKeyEvent),
    Focused(bool),
    Resized(ScreenSize),
}

impl From<RawPointerEvent> for RawEvent {
    fn from(event: RawPointerEvent) -> Self {
        Self::Pointer(event)
    }
}

impl From<RawTouch> for RawEvent {
    fn from(touch: RawTouch) -> Self {
        Self::Touch(touch)
    }
}

impl From<RawKeyEvent> for RawEvent {
    fn from(event: RawKeyEvent) -> Self {
        Self::Key(event)
    }
}
