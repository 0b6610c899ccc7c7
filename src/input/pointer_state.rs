use crate::{
    events::EventKind,
    picking::ColorKey,
    time::{Debounce, Duration, Instant},
    util::{ScreenPos, WorldVector},
};

use super::{
    options::EventOptions, pointer_source::PointerSignal, PointerButton, RawPointerEvent,
};

/// Where a single button is in its press cycle, as seen by listeners this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonPhase {
    Idle,
    /// First frame of a press.
    Pressed,
    /// Second and later frames of a press.
    Held,
    /// The button was released this frame. A release and re-press inside one frame reports
    /// `Released` for that frame and `Pressed` for the next.
    Released,
}

#[derive(Clone, Debug, Default)]
pub struct ButtonState {
    /// The button is physically down.
    pressed: bool,

    /// Latched once the press has been dispatched, until the release is.
    hold: bool,

    released: bool,
    click: bool,
    double_click: bool,

    /// Where the current press started. `None` if the button is not down.
    click_origin: Option<ScreenPos>,

    /// Release time of the previous click, waiting for a second one.
    pending_double: Option<Instant>,
}

impl ButtonState {
    pub fn phase(&self) -> ButtonPhase {
        if self.released {
            ButtonPhase::Released
        } else if self.pressed && self.hold {
            ButtonPhase::Held
        } else if self.pressed {
            ButtonPhase::Pressed
        } else {
            ButtonPhase::Idle
        }
    }

    #[inline(always)]
    pub fn is_down(&self) -> bool {
        self.phase() == ButtonPhase::Pressed
    }

    #[inline(always)]
    pub fn is_hold(&self) -> bool {
        self.phase() == ButtonPhase::Held
    }

    #[inline(always)]
    pub fn is_up(&self) -> bool {
        self.released
    }

    #[inline(always)]
    pub fn is_click(&self) -> bool {
        self.click
    }

    #[inline(always)]
    pub fn is_double_click(&self) -> bool {
        self.double_click
    }

    fn clear(&mut self) {
        *self = Default::default();
    }
}

/// Mouse state handed to listeners.
#[derive(Clone, Debug)]
pub struct PointerState {
    /// Latest reported pointer position.
    pos: ScreenPos,

    /// Position at the last dispatched `mousemove`.
    prev_pos: ScreenPos,

    /// World-space direction under the pointer, refreshed every frame.
    pub(crate) direction: WorldVector,

    buttons: [ButtonState; 3],

    moving: bool,
    just_stopped: bool,

    /// Last wheel delta, until consumed.
    wheel_delta: f32,

    double_click_delay: Duration,

    /// Color key of the object under the pointer, if it is registered.
    pub(crate) picked: Option<ColorKey>,

    /// The backend event that last touched this state.
    sys: Option<RawPointerEvent>,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            pos: ScreenPos::origin(),
            prev_pos: ScreenPos::origin(),
            direction: WorldVector::zero(),
            buttons: Default::default(),
            moving: false,
            just_stopped: false,
            wheel_delta: 0.0,
            double_click_delay: EventOptions::default().double_click_duration(),
            picked: None,
            sys: None,
        }
    }
}

impl PointerState {
    #[inline(always)]
    pub fn pos(&self) -> ScreenPos {
        self.pos
    }

    #[inline(always)]
    pub fn prev_pos(&self) -> ScreenPos {
        self.prev_pos
    }

    #[inline(always)]
    pub fn direction(&self) -> WorldVector {
        self.direction
    }

    #[inline(always)]
    pub fn button(&self, button: PointerButton) -> &ButtonState {
        &self.buttons[button.index()]
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn just_stopped(&self) -> bool {
        self.just_stopped
    }

    pub fn wheel_delta(&self) -> f32 {
        self.wheel_delta
    }

    pub fn double_click_delay(&self) -> Duration {
        self.double_click_delay
    }

    pub fn picked(&self) -> Option<ColorKey> {
        self.picked
    }

    pub fn sys(&self) -> Option<&RawPointerEvent> {
        self.sys.as_ref()
    }

    /// Is any button past the first frame of its press? Hover transitions are frozen while this is
    /// `true`.
    pub fn any_hold(&self) -> bool {
        self.buttons.iter().any(|b| b.hold)
    }

    pub fn any_down(&self) -> bool {
        self.buttons.iter().any(|b| b.pressed)
    }
}

pub struct PointerStateMachine {
    state: PointerState,
    stop: Debounce,
}

impl Default for PointerStateMachine {
    fn default() -> Self {
        Self::new(&EventOptions::default())
    }
}

impl PointerStateMachine {
    pub fn new(options: &EventOptions) -> Self {
        let mut state = PointerState::default();
        state.double_click_delay = options.double_click_duration();

        Self {
            state,
            stop: Debounce::new(options.stop_duration()),
        }
    }

    pub fn set_options(&mut self, options: &EventOptions) {
        self.state.double_click_delay = options.double_click_duration();
        self.stop.set_delay(options.stop_duration());
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut PointerState {
        &mut self.state
    }

    /// Applies a signal that arrived at `at`.
    pub fn apply(&mut self, signal: PointerSignal, sys: RawPointerEvent, at: Instant) {
        // the stop timer may have run out before this signal arrived
        self.poll_stop(at);

        let state = &mut self.state;
        state.sys = Some(sys);

        match signal {
            PointerSignal::Move(pos) => {
                state.pos = pos;
                state.moving = true;
                self.stop.arm(at);
            }
            PointerSignal::Press { button, pos } => {
                let b = &mut state.buttons[button.index()];
                b.click_origin = Some(pos);
                b.pressed = true;
            }
            PointerSignal::Release { button, pos } => {
                let double_click_delay = state.double_click_delay;
                let b = &mut state.buttons[button.index()];

                b.pressed = false;
                b.released = true;

                // time-gated only: the second release may be anywhere on screen
                match b.pending_double.take() {
                    Some(first) => {
                        if at.saturating_duration_since(first) <= double_click_delay {
                            b.double_click = true;
                        }
                    }
                    None => b.pending_double = Some(at),
                }

                if b.click_origin.take() == Some(pos) {
                    b.click = true;
                }
            }
            PointerSignal::Wheel(delta) => {
                state.wheel_delta = delta;
            }
        }
    }

    /// Fires the stop timer if the pointer has been still long enough.
    pub fn poll_stop(&mut self, now: Instant) {
        if self.stop.poll(now) {
            log::trace!("pointer stopped at {:?}", self.state.pos);
            self.state.just_stopped = true;
        }
    }

    /// Emits this frame's pointer events in dispatch order, clearing each one-shot flag right after
    /// its event has been emitted.
    pub fn advance(&mut self, now: Instant, mut emit: impl FnMut(EventKind, &PointerState)) {
        self.poll_stop(now);

        for button in PointerButton::ALL {
            if self.state.buttons[button.index()].click {
                emit(EventKind::button_click(button), &self.state);
                self.state.buttons[button.index()].click = false;
            }
        }

        for button in PointerButton::ALL {
            let b = &self.state.buttons[button.index()];
            // a release this frame wins over a re-press; the re-press shows up next frame
            if !b.pressed || b.released {
                continue;
            }

            if b.hold {
                emit(EventKind::button_hold(button), &self.state);
            } else {
                emit(EventKind::button_down(button), &self.state);
                self.state.buttons[button.index()].hold = true;
            }
        }

        for button in PointerButton::ALL {
            if self.state.buttons[button.index()].released {
                emit(EventKind::button_up(button), &self.state);

                let b = &mut self.state.buttons[button.index()];
                b.released = false;
                b.hold = false;
            }
        }

        for button in PointerButton::ALL {
            if self.state.buttons[button.index()].double_click {
                emit(EventKind::button_double_click(button), &self.state);
                self.state.buttons[button.index()].double_click = false;
            }
        }

        if self.state.wheel_delta != 0.0 {
            emit(EventKind::MouseWheel, &self.state);
            self.state.wheel_delta = 0.0;
        }

        if self.state.moving {
            emit(EventKind::MouseMove, &self.state);

            self.state.prev_pos = self.state.pos;
            self.state.moving = false;
            for button in [PointerButton::Left, PointerButton::Right] {
                self.state.buttons[button.index()].pending_double = None;
            }
        }

        if self.state.just_stopped {
            emit(EventKind::MouseStop, &self.state);
            self.state.just_stopped = false;
        }
    }

    /// Drops every press, pending timestamp and one-shot flag, and cancels the stop timer.
    pub fn reset(&mut self) {
        self.stop.cancel();

        let state = &mut self.state;
        for b in &mut state.buttons {
            b.clear();
        }
        state.moving = false;
        state.just_stopped = false;
        state.wheel_delta = 0.0;
        state.picked = None;
        state.sys = None;
    }
}
