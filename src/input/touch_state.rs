use bitflags::bitflags;

use crate::{
    events::EventKind,
    picking::ColorKey,
    time::{Duration, Instant},
    util::ScreenPos,
};

use super::{options::EventOptions, touch_source::TouchSignal, RawTouch, TouchPhase};

bitflags! {
    /// Touch phases seen since the last dispatch.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TouchFlags: u8 {
        const MOVING = 1 << 0;
        const START = 1 << 1;
        const END = 1 << 2;
        const CANCEL = 1 << 3;
        const DOUBLE = 1 << 4;
    }
}

/// Touch state handed to listeners.
#[derive(Clone, Debug)]
pub struct TouchState {
    pos: ScreenPos,
    prev_pos: ScreenPos,

    flags: TouchFlags,

    double_touch_delay: Duration,
    double_touch_radius: f32,

    /// Color key of the touched object, if it is registered.
    pub(crate) picked: Option<ColorKey>,

    sys: Option<RawTouch>,
}

impl Default for TouchState {
    fn default() -> Self {
        let options = EventOptions::default();
        Self {
            pos: ScreenPos::origin(),
            prev_pos: ScreenPos::origin(),
            flags: TouchFlags::empty(),
            double_touch_delay: options.double_touch_duration(),
            double_touch_radius: options.double_touch_radius,
            picked: None,
            sys: None,
        }
    }
}

impl TouchState {
    pub fn pos(&self) -> ScreenPos {
        self.pos
    }

    pub fn prev_pos(&self) -> ScreenPos {
        self.prev_pos
    }

    pub fn flags(&self) -> TouchFlags {
        self.flags
    }

    pub fn is_moving(&self) -> bool {
        self.flags.contains(TouchFlags::MOVING)
    }

    pub fn touch_start(&self) -> bool {
        self.flags.contains(TouchFlags::START)
    }

    pub fn touch_end(&self) -> bool {
        self.flags.contains(TouchFlags::END)
    }

    pub fn touch_cancel(&self) -> bool {
        self.flags.contains(TouchFlags::CANCEL)
    }

    pub fn double_touch(&self) -> bool {
        self.flags.contains(TouchFlags::DOUBLE)
    }

    pub fn double_touch_delay(&self) -> Duration {
        self.double_touch_delay
    }

    pub fn double_touch_radius(&self) -> f32 {
        self.double_touch_radius
    }

    pub fn picked(&self) -> Option<ColorKey> {
        self.picked
    }

    pub fn sys(&self) -> Option<&RawTouch> {
        self.sys.as_ref()
    }
}

pub struct TouchStateMachine {
    state: TouchState,

    /// Set while a gesture that started with a single contact is still a candidate tap.
    one_touch_start: bool,

    /// End time of the previous qualifying tap.
    pending_double: Option<Instant>,

    /// Where the current single-contact gesture started.
    double_touch_origin: ScreenPos,
}

impl Default for TouchStateMachine {
    fn default() -> Self {
        Self::new(&EventOptions::default())
    }
}

impl TouchStateMachine {
    pub fn new(options: &EventOptions) -> Self {
        let mut machine = Self {
            state: TouchState::default(),
            one_touch_start: false,
            pending_double: None,
            double_touch_origin: ScreenPos::origin(),
        };
        machine.set_options(options);
        machine
    }

    pub fn set_options(&mut self, options: &EventOptions) {
        self.state.double_touch_delay = options.double_touch_duration();
        self.state.double_touch_radius = options.double_touch_radius;
    }

    pub fn state(&self) -> &TouchState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut TouchState {
        &mut self.state
    }

    pub fn double_touch_origin(&self) -> ScreenPos {
        self.double_touch_origin
    }

    /// Applies a signal that arrived at `at`.
    pub fn apply(&mut self, signal: TouchSignal, sys: RawTouch, at: Instant) {
        let state = &mut self.state;
        state.sys = Some(sys);

        match signal.phase {
            TouchPhase::Start => {
                state.pos = signal.pos;
                state.prev_pos = signal.pos;
                state.flags.insert(TouchFlags::START);

                if signal.touches == 1 {
                    self.double_touch_origin = signal.pos;
                    self.one_touch_start = true;
                } else {
                    self.one_touch_start = false;
                }
            }
            TouchPhase::End => {
                state.flags.insert(TouchFlags::END);

                if signal.touches == 0 {
                    state.prev_pos = state.pos;

                    if self.one_touch_start {
                        if let Some(first) = self.pending_double.take() {
                            if at.saturating_duration_since(first) <= state.double_touch_delay {
                                state.flags.insert(TouchFlags::DOUBLE);
                            }
                        }
                        self.pending_double = Some(at);
                        self.one_touch_start = false;
                    }
                }
            }
            TouchPhase::Cancel => {
                state.flags.insert(TouchFlags::CANCEL);
            }
            TouchPhase::Move => {
                state.pos = signal.pos;
                state.flags.insert(TouchFlags::MOVING);

                // only still taps count towards a double touch
                self.pending_double = None;
                self.one_touch_start = false;
            }
        }
    }

    /// Emits this frame's touch events in dispatch order.
    ///
    /// `repick` is asked for the object under the touch right before `touchstart` goes out.
    pub fn advance(
        &mut self,
        mut repick: impl FnMut(ScreenPos) -> Option<ColorKey>,
        mut emit: impl FnMut(EventKind, &TouchState),
    ) {
        if self.state.touch_cancel() {
            emit(EventKind::TouchCancel, &self.state);
            self.state.flags.remove(TouchFlags::CANCEL);
        }

        if self.state.touch_start() {
            self.state.picked = repick(self.state.pos);
            emit(EventKind::TouchStart, &self.state);
            self.state.flags.remove(TouchFlags::START);
        }

        if self.state.double_touch() {
            emit(EventKind::DoubleTouch, &self.state);
            self.state.flags.remove(TouchFlags::DOUBLE);
        }

        if self.state.touch_end() {
            emit(EventKind::TouchEnd, &self.state);
            self.state.pos = ScreenPos::origin();
            self.state.flags.remove(TouchFlags::END);
        }

        if self.state.is_moving() {
            emit(EventKind::TouchMove, &self.state);
            self.state.prev_pos = self.state.pos;
            self.state.flags.remove(TouchFlags::MOVING);
        }
    }

    pub fn reset(&mut self) {
        self.state.flags = TouchFlags::empty();
        self.state.picked = None;
        self.state.sys = None;
        self.one_touch_start = false;
        self.pending_double = None;
    }
}
