use enum_as_inner::EnumAsInner;

use crate::{
    input::{key_source::KeyEvent, pointer_state::PointerState, touch_state::TouchState},
    time::Duration,
    util::ScreenSize,
};

/// Per-frame timing handed to `draw` listeners.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInfo {
    pub frame: u64,
    /// Time since the previous frame. `None` on the first one.
    pub dt: Option<Duration>,
    pub framerate: u32,
}

/// The state record an event carries.
#[derive(EnumAsInner, Debug, Clone, Copy)]
pub enum EventPayload<'a> {
    Pointer(&'a PointerState),
    Touch(&'a TouchState),
    Key(&'a KeyEvent),
    Frame(&'a FrameInfo),
    Resize(ScreenSize),
}
