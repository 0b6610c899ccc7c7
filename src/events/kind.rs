use crate::input::{key_source::KeyPhase, PointerButton};

// Every event listeners can subscribe to.
//
// `MouseEnter`/`MouseLeave` and `TouchEnter`/`TouchLeave` only ever reach per-object registries.
custom_derive! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, IterVariants(EventKinds))]
    pub enum EventKind {
        Draw,
        Resize,

        MouseMove,
        MouseStop,

        MouseLeftButtonClick,
        MouseRightButtonClick,
        MouseMiddleButtonClick,

        MouseLeftButtonDoubleClick,
        MouseRightButtonDoubleClick,
        MouseMiddleButtonDoubleClick,

        MouseLeftButtonUp,
        MouseRightButtonUp,
        MouseMiddleButtonUp,

        MouseLeftButtonDown,
        MouseRightButtonDown,
        MouseMiddleButtonDown,

        MouseLeftButtonHold,
        MouseRightButtonHold,
        MouseMiddleButtonHold,

        MouseWheel,

        TouchStart,
        TouchEnd,
        TouchCancel,
        TouchMove,
        DoubleTouch,

        TouchLeave,
        TouchEnter,
        MouseEnter,
        MouseLeave,

        KeyDown,
        KeyHold,
        KeyUp,
    }
}

impl EventKind {
    /// The lowercase name hosts subscribe with, e.g. `mouselbuttonclick`.
    pub fn name(self) -> &'static str {
        use EventKind::*;

        match self {
            Draw => "draw",
            Resize => "resize",
            MouseMove => "mousemove",
            MouseStop => "mousestop",
            MouseLeftButtonClick => "mouselbuttonclick",
            MouseRightButtonClick => "mouserbuttonclick",
            MouseMiddleButtonClick => "mousembuttonclick",
            MouseLeftButtonDoubleClick => "mouselbuttondoubleclick",
            MouseRightButtonDoubleClick => "mouserbuttondoubleclick",
            MouseMiddleButtonDoubleClick => "mousembuttondoubleclick",
            MouseLeftButtonUp => "mouselbuttonup",
            MouseRightButtonUp => "mouserbuttonup",
            MouseMiddleButtonUp => "mousembuttonup",
            MouseLeftButtonDown => "mouselbuttondown",
            MouseRightButtonDown => "mouserbuttondown",
            MouseMiddleButtonDown => "mousembuttondown",
            MouseLeftButtonHold => "mouselbuttonhold",
            MouseRightButtonHold => "mouserbuttonhold",
            MouseMiddleButtonHold => "mousembuttonhold",
            MouseWheel => "mousewheel",
            TouchStart => "touchstart",
            TouchEnd => "touchend",
            TouchCancel => "touchcancel",
            TouchMove => "touchmove",
            DoubleTouch => "doubletouch",
            TouchLeave => "touchleave",
            TouchEnter => "touchenter",
            MouseEnter => "mouseenter",
            MouseLeave => "mouseleave",
            KeyDown => "keydown",
            KeyHold => "keyhold",
            KeyUp => "keyup",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter_variants().find(|kind| kind.name() == name)
    }

    /// Whether the event is also delivered to the registry of the picked object's collection.
    pub fn is_object_scoped(self) -> bool {
        use EventKind::*;

        !matches!(
            self,
            Draw | Resize | MouseStop | TouchCancel | KeyDown | KeyHold | KeyUp
        )
    }

    pub fn button_click(button: PointerButton) -> Self {
        match button {
            PointerButton::Left => Self::MouseLeftButtonClick,
            PointerButton::Right => Self::MouseRightButtonClick,
            PointerButton::Middle => Self::MouseMiddleButtonClick,
        }
    }

    pub fn button_double_click(button: PointerButton) -> Self {
        match button {
            PointerButton::Left => Self::MouseLeftButtonDoubleClick,
            PointerButton::Right => Self::MouseRightButtonDoubleClick,
            PointerButton::Middle => Self::MouseMiddleButtonDoubleClick,
        }
    }

    pub fn button_up(button: PointerButton) -> Self {
        match button {
            PointerButton::Left => Self::MouseLeftButtonUp,
            PointerButton::Right => Self::MouseRightButtonUp,
            PointerButton::Middle => Self::MouseMiddleButtonUp,
        }
    }

    pub fn button_down(button: PointerButton) -> Self {
        match button {
            PointerButton::Left => Self::MouseLeftButtonDown,
            PointerButton::Right => Self::MouseRightButtonDown,
            PointerButton::Middle => Self::MouseMiddleButtonDown,
        }
    }

    pub fn button_hold(button: PointerButton) -> Self {
        match button {
            PointerButton::Left => Self::MouseLeftButtonHold,
            PointerButton::Right => Self::MouseRightButtonHold,
            PointerButton::Middle => Self::MouseMiddleButtonHold,
        }
    }

    pub fn key(phase: KeyPhase) -> Self {
        match phase {
            KeyPhase::Down => Self::KeyDown,
            KeyPhase::Hold => Self::KeyHold,
            KeyPhase::Up => Self::KeyUp,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
