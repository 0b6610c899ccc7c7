//! Translates [`winit`](https://github.com/rust-windowing/winit) window events into [`RawEvent`]s.

use crate::util::{PhysicalToLogical, ScreenPos, ScreenSize};

use super::{
    options::EventOptions, PointerButton, RawEvent, RawKeyEvent, RawPointerEvent, RawTouch,
    TouchId, TouchPhase,
};

pub fn native_pixels_per_point(window: &winit::window::Window) -> f32 {
    window.scale_factor() as f32
}

pub fn translate_mouse_button(button: winit::event::MouseButton) -> Option<PointerButton> {
    match button {
        winit::event::MouseButton::Left => Some(PointerButton::Left),
        winit::event::MouseButton::Right => Some(PointerButton::Right),
        winit::event::MouseButton::Middle => Some(PointerButton::Middle),
        winit::event::MouseButton::Other(_) => None,
    }
}

/// Handles the integration between the event dispatcher and winit.
pub struct WinitAdapter {
    pointer_pos_in_points: Option<ScreenPos>,
    current_pixels_per_point: f32,
    line_scroll_speed: f32,
}

impl WinitAdapter {
    pub fn new(window: &winit::window::Window, options: &EventOptions) -> Self {
        Self::with_pixels_per_point(native_pixels_per_point(window), options)
    }

    pub fn with_pixels_per_point(pixels_per_point: f32, options: &EventOptions) -> Self {
        Self {
            pointer_pos_in_points: None,
            current_pixels_per_point: pixels_per_point,
            line_scroll_speed: options.line_scroll_speed,
        }
    }

    #[inline]
    pub fn pixels_per_point(&self) -> f32 {
        self.current_pixels_per_point
    }

    /// Call this when there is a new event. Returns `None` for events the dispatcher does not care
    /// about.
    pub fn on_event(&mut self, event: &winit::event::WindowEvent<'_>) -> Option<RawEvent> {
        use winit::event::WindowEvent;
        match event {
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.current_pixels_per_point = *scale_factor as f32;
                None
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.on_mouse_button_input(*state, *button)
            }
            WindowEvent::MouseWheel { delta, .. } => self.on_mouse_wheel(*delta),
            WindowEvent::CursorMoved { position, .. } => {
                let pos = position.to_points(self.pixels_per_point());
                self.pointer_pos_in_points = Some(pos);
                Some(RawPointerEvent::Moved(pos).into())
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer_pos_in_points = None;
                None
            }
            WindowEvent::Touch(touch) => Some(self.on_touch(touch).into()),
            WindowEvent::KeyboardInput { input, .. } => {
                let key = input.virtual_keycode?;
                Some(
                    RawKeyEvent {
                        key,
                        pressed: input.state == winit::event::ElementState::Pressed,
                    }
                    .into(),
                )
            }
            WindowEvent::Focused(focused) => Some(RawEvent::Focused(*focused)),
            WindowEvent::Resized(size) => {
                Some(RawEvent::Resized(ScreenSize::new(size.width, size.height)))
            }
            _ => None,
        }
    }

    fn on_mouse_button_input(
        &mut self,
        state: winit::event::ElementState,
        button: winit::event::MouseButton,
    ) -> Option<RawEvent> {
        let pos = self.pointer_pos_in_points?;
        let button = translate_mouse_button(button)?;

        Some(
            RawPointerEvent::Button {
                button,
                pressed: state == winit::event::ElementState::Pressed,
                pos,
            }
            .into(),
        )
    }

    fn on_mouse_wheel(&mut self, delta: winit::event::MouseScrollDelta) -> Option<RawEvent> {
        let delta = match delta {
            winit::event::MouseScrollDelta::LineDelta(_, y) => y * self.line_scroll_speed,
            winit::event::MouseScrollDelta::PixelDelta(delta) => {
                delta.y as f32 / self.pixels_per_point()
            }
        };

        Some(RawPointerEvent::Wheel { delta }.into())
    }

    fn on_touch(&mut self, touch: &winit::event::Touch) -> RawTouch {
        RawTouch {
            id: TouchId::from(touch.id),
            phase: match touch.phase {
                winit::event::TouchPhase::Started => TouchPhase::Start,
                winit::event::TouchPhase::Moved => TouchPhase::Move,
                winit::event::TouchPhase::Ended => TouchPhase::End,
                winit::event::TouchPhase::Cancelled => TouchPhase::Cancel,
            },
            pos: touch.location.to_points(self.pixels_per_point()),
        }
    }
}
