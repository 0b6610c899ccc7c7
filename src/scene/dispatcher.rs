use std::{borrow::Cow, rc::Rc};

use crate::{
    events::{
        Diagnostics, EventKind, EventPayload, FrameInfo, ListenerRegistry, ListenerResult,
        SubscriptionId,
    },
    input::{
        key_source::{KeyPhase, KeySource},
        options::EventOptions,
        pointer_source::PointerSource,
        pointer_state::{PointerState, PointerStateMachine},
        touch_source::TouchSource,
        touch_state::{TouchState, TouchStateMachine},
        KeyCode, RawEvent,
    },
    picking::{ColorKey, PickingResolver, PickingTransition},
    time::{Clock, FramerateCounter, Instant, SystemClock},
    util::ScreenSize,
};

use super::SceneRenderer;

/// `key` if it names an object the scene knows about.
fn known_object<S: SceneRenderer + ?Sized>(scene: &S, key: ColorKey) -> Option<ColorKey> {
    (!key.is_none() && scene.has_object(key)).then_some(key)
}

/// Delivers one event to the picked object's collection, then to the global registry.
fn fan_out<S: SceneRenderer + ?Sized>(
    scene: &S,
    global: &ListenerRegistry,
    diagnostics: &mut Diagnostics,
    kind: EventKind,
    picked: Option<ColorKey>,
    payload: EventPayload<'_>,
) {
    if kind.is_object_scoped() {
        if let Some(events) = picked.and_then(|key| scene.object_events(key)) {
            diagnostics.report_all(events.dispatch(kind, &payload));
        }
    }

    diagnostics.report_all(global.dispatch(kind, &payload));
}

/// Delivers an event to the collection owning `key` only.
fn dispatch_to_object<S: SceneRenderer + ?Sized>(
    scene: &S,
    diagnostics: &mut Diagnostics,
    kind: EventKind,
    key: ColorKey,
    payload: EventPayload<'_>,
) {
    match scene.object_events(key) {
        Some(events) => diagnostics.report_all(events.dispatch(kind, &payload)),
        None => log::trace!("no object registered for {key}, dropping `{kind}`"),
    }
}

/// Turns raw input into interaction events, once per rendered frame.
///
/// Raw events are [`fed`](Self::feed) as they arrive from the windowing backend. Once per frame
/// the owning renderer calls [`handle_events`](Self::handle_events), which resolves the object
/// under the pointer and dispatches everything that happened since the last frame.
pub struct InteractionDispatcher<C: Clock = SystemClock> {
    clock: C,
    options: EventOptions,
    active: bool,

    events: Rc<ListenerRegistry>,
    diagnostics: Diagnostics,

    pointer_source: PointerSource,
    touch_source: TouchSource,
    keys: KeySource,

    pointer: PointerStateMachine,
    touch: TouchStateMachine,

    resolver: PickingResolver,
    frames: FramerateCounter,
}

impl Default for InteractionDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionDispatcher {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> InteractionDispatcher<C> {
    pub fn with_clock(clock: C) -> Self {
        Self::with_options(clock, EventOptions::default())
    }

    pub fn with_options(clock: C, options: EventOptions) -> Self {
        let options = options.sanitized();

        Self {
            clock,
            active: true,
            events: Default::default(),
            diagnostics: Default::default(),
            pointer_source: Default::default(),
            touch_source: Default::default(),
            keys: Default::default(),
            pointer: PointerStateMachine::new(&options),
            touch: TouchStateMachine::new(&options),
            resolver: Default::default(),
            frames: Default::default(),
            options,
        }
    }

    pub fn options(&self) -> &EventOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: EventOptions) {
        let options = options.sanitized();
        self.pointer.set_options(&options);
        self.touch.set_options(&options);
        self.options = options;
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The global registry. Every event is dispatched here after the picked object's registry.
    pub fn events(&self) -> &Rc<ListenerRegistry> {
        &self.events
    }

    pub fn on<F>(&self, kind: EventKind, context: impl Into<Cow<'static, str>>, callback: F) -> SubscriptionId
    where
        F: FnMut(&EventPayload<'_>) -> ListenerResult + 'static,
    {
        self.events.on(kind, context, callback)
    }

    pub fn on_with_priority<F>(
        &self,
        kind: EventKind,
        context: impl Into<Cow<'static, str>>,
        priority: i32,
        callback: F,
    ) -> SubscriptionId
    where
        F: FnMut(&EventPayload<'_>) -> ListenerResult + 'static,
    {
        self.events.on_with_priority(kind, context, priority, callback)
    }

    pub fn on_key<F>(
        &self,
        phase: KeyPhase,
        key: KeyCode,
        context: impl Into<Cow<'static, str>>,
        priority: i32,
        callback: F,
    ) -> SubscriptionId
    where
        F: FnMut(&EventPayload<'_>) -> ListenerResult + 'static,
    {
        self.events.on_key(phase, key, context, priority, callback)
    }

    pub fn on_named<F>(
        &self,
        name: &str,
        context: impl Into<Cow<'static, str>>,
        priority: i32,
        callback: F,
    ) -> Option<SubscriptionId>
    where
        F: FnMut(&EventPayload<'_>) -> ListenerResult + 'static,
    {
        self.events.on_named(name, context, priority, callback)
    }

    pub fn off(&self, id: SubscriptionId) -> bool {
        self.events.off(id)
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys.is_key_pressed(key)
    }

    pub fn pointer_state(&self) -> &PointerState {
        self.pointer.state()
    }

    pub fn touch_state(&self) -> &TouchState {
        self.touch.state()
    }

    pub fn resolver(&self) -> &PickingResolver {
        &self.resolver
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Deactivating drops all pending input: the stop timer is cancelled and every one-shot flag,
    /// pending double click/touch and held key is cleared. Input fed while inactive is ignored.
    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;

        if !active {
            log::debug!("deactivating interaction events");

            self.pointer.reset();
            self.touch.reset();
            self.pointer_source.reset();
            self.touch_source.reset();
            self.keys.clear();
            self.resolver.reset();
        }
    }

    /// Ingests one backend event. Nothing is dispatched until the next
    /// [`handle_events`](Self::handle_events), except for `resize`.
    pub fn feed(&mut self, event: RawEvent) {
        if !self.active {
            return;
        }

        let now = self.clock.now();

        match event {
            RawEvent::Pointer(raw) => match self.pointer_source.normalize(&raw) {
                Some(signal) => self.pointer.apply(signal, raw, now),
                None => self.pointer.poll_stop(now),
            },
            RawEvent::Touch(raw) => {
                if let Some(signal) = self.touch_source.normalize(&raw) {
                    self.touch.apply(signal, raw, now);
                }
            }
            RawEvent::Key(raw) => self.keys.on_key(&raw),
            RawEvent::Focused(false) => self.keys.clear(),
            RawEvent::Focused(true) => {}
            RawEvent::Resized(size) => self.resize(size),
        }
    }

    /// Resolves picking and dispatches everything that happened since the previous frame.
    pub fn handle_events<S: SceneRenderer + ?Sized>(&mut self, scene: &S) {
        if !self.active {
            return;
        }

        let now = self.clock.now();
        let pos = self.pointer.state().pos();

        self.pointer.state_mut().direction = scene.camera().unproject(pos);
        self.resolver.update(scene.picking_target(), pos);

        // dragging freezes hover
        if !self.pointer.state().any_hold() {
            self.entity_picking_events(scene);
        }

        self.key_events();
        self.pointer_events(scene, now);
        self.touch_events(scene);
    }

    fn set_picked(&mut self, picked: Option<ColorKey>) {
        self.pointer.state_mut().picked = picked;
        self.touch.state_mut().picked = picked;
    }

    /// Enter/leave transitions between the previous and the current frame.
    ///
    /// When the pointer moves off an object onto nothing, the object stays picked for the rest of
    /// the frame so its leave listeners, and any other listener this frame, still see it.
    fn entity_picking_events<S: SceneRenderer + ?Sized>(&mut self, scene: &S) {
        let current = self.resolver.current();
        let previous = self.resolver.previous();

        self.set_picked(known_object(scene, current));

        let transition = PickingTransition::between(previous, current);
        if transition != PickingTransition::None {
            log::trace!("picking transition {transition:?}");
        }

        if let Some(left) = transition.left() {
            self.set_picked(known_object(scene, left));

            dispatch_to_object(
                scene,
                &mut self.diagnostics,
                EventKind::MouseLeave,
                left,
                EventPayload::Pointer(self.pointer.state()),
            );
            dispatch_to_object(
                scene,
                &mut self.diagnostics,
                EventKind::TouchLeave,
                left,
                EventPayload::Touch(self.touch.state()),
            );
        }

        if let Some(entered) = transition.entered() {
            self.set_picked(known_object(scene, entered));

            dispatch_to_object(
                scene,
                &mut self.diagnostics,
                EventKind::MouseEnter,
                entered,
                EventPayload::Pointer(self.pointer.state()),
            );
            dispatch_to_object(
                scene,
                &mut self.diagnostics,
                EventKind::TouchEnter,
                entered,
                EventPayload::Touch(self.touch.state()),
            );
        }
    }

    fn key_events(&mut self) {
        for event in self.keys.poll() {
            let failures = self
                .events
                .dispatch(EventKind::key(event.phase), &EventPayload::Key(&event));
            self.diagnostics.report_all(failures);
        }
    }

    fn pointer_events<S: SceneRenderer + ?Sized>(&mut self, scene: &S, now: Instant) {
        let Self {
            pointer,
            events,
            diagnostics,
            ..
        } = self;

        pointer.advance(now, |kind, state| {
            fan_out(
                scene,
                events,
                diagnostics,
                kind,
                state.picked(),
                EventPayload::Pointer(state),
            )
        });
    }

    fn touch_events<S: SceneRenderer + ?Sized>(&mut self, scene: &S) {
        let Self {
            touch,
            resolver,
            events,
            diagnostics,
            ..
        } = self;

        touch.advance(
            |at| {
                let key = PickingResolver::resolve(scene.picking_target(), at);
                resolver.set_current(key);
                known_object(scene, key)
            },
            |kind, state| {
                fan_out(
                    scene,
                    events,
                    diagnostics,
                    kind,
                    state.picked(),
                    EventPayload::Touch(state),
                )
            },
        );
    }

    /// Dispatches `draw` to global listeners. Call once per rendered frame.
    pub fn draw(&mut self) {
        let dt = self.frames.tick(self.clock.now());

        let info = FrameInfo {
            frame: self.frames.frames().saturating_sub(1),
            dt,
            framerate: self.frames.framerate(),
        };

        let failures = self.events.dispatch(EventKind::Draw, &EventPayload::Frame(&info));
        self.diagnostics.report_all(failures);
    }

    /// Dispatches `resize` to global listeners.
    pub fn resize(&mut self, size: ScreenSize) {
        log::debug!("resized to {}x{}", size.width, size.height);

        let failures = self.events.dispatch(EventKind::Resize, &EventPayload::Resize(size));
        self.diagnostics.report_all(failures);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{
        input::{PointerButton, RawKeyEvent, RawPointerEvent},
        picking::PickingTarget,
        scene::{Camera, PinholeCamera},
        time::ManualClock,
        util::pos,
    };

    struct EmptyScene {
        camera: PinholeCamera,
    }

    impl SceneRenderer for EmptyScene {
        fn camera(&self) -> &dyn Camera {
            &self.camera
        }

        fn picking_target(&self) -> Option<&dyn PickingTarget> {
            None
        }

        fn object_events(&self, _key: ColorKey) -> Option<Rc<ListenerRegistry>> {
            None
        }
    }

    fn scene() -> EmptyScene {
        EmptyScene {
            camera: PinholeCamera::new(ScreenSize::new(64, 48), euclid::Angle::degrees(60.)),
        }
    }

    fn record(dispatcher: &InteractionDispatcher<ManualClock>, kind: EventKind) -> Rc<RefCell<u32>> {
        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        dispatcher.on(kind, "test", move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });
        count
    }

    #[test]
    fn handle_events_without_picking_target() {
        let clock = ManualClock::new();
        let mut dispatcher = InteractionDispatcher::with_clock(clock.clone());
        let clicks = record(&dispatcher, EventKind::MouseLeftButtonClick);

        let at = pos(10., 10.);
        dispatcher.feed(RawPointerEvent::Moved(at).into());
        dispatcher.feed(
            RawPointerEvent::Button {
                button: PointerButton::Left,
                pressed: true,
                pos: at,
            }
            .into(),
        );
        dispatcher.feed(
            RawPointerEvent::Button {
                button: PointerButton::Left,
                pressed: false,
                pos: at,
            }
            .into(),
        );

        dispatcher.handle_events(&scene());

        assert_eq!(*clicks.borrow(), 1);
        assert_eq!(dispatcher.resolver().current(), ColorKey::NONE);
        assert_eq!(dispatcher.pointer_state().picked(), None);
        assert!(dispatcher.pointer_state().direction().z < 0.);
    }

    #[test]
    fn keys_dispatch_globally_and_clear_on_focus_loss() {
        let clock = ManualClock::new();
        let mut dispatcher = InteractionDispatcher::with_clock(clock.clone());
        let downs = record(&dispatcher, EventKind::KeyDown);
        let holds = record(&dispatcher, EventKind::KeyHold);

        dispatcher.feed(
            RawKeyEvent {
                key: KeyCode::A,
                pressed: true,
            }
            .into(),
        );
        assert!(dispatcher.is_key_pressed(KeyCode::A));

        dispatcher.handle_events(&scene());
        dispatcher.handle_events(&scene());
        assert_eq!((*downs.borrow(), *holds.borrow()), (1, 2));

        dispatcher.feed(RawEvent::Focused(false));
        assert!(!dispatcher.is_key_pressed(KeyCode::A));
    }

    #[test]
    fn draw_and_resize_reach_global_listeners() {
        let clock = ManualClock::new();
        let mut dispatcher = InteractionDispatcher::with_clock(clock.clone());

        let frames = Rc::new(RefCell::new(vec![]));
        {
            let frames = frames.clone();
            dispatcher.on(EventKind::Draw, "hud", move |payload| {
                let info = payload.as_frame().ok_or_else(|| anyhow::anyhow!("not a frame"))?;
                frames.borrow_mut().push((info.frame, info.dt));
                Ok(())
            });
        }
        let resizes = record(&dispatcher, EventKind::Resize);

        dispatcher.draw();
        clock.advance_millis(16);
        dispatcher.draw();
        dispatcher.feed(RawEvent::Resized(ScreenSize::new(800, 600)));

        assert_eq!(
            *frames.borrow(),
            vec![(0, None), (1, Some(crate::time::Duration::from_millis(16)))]
        );
        assert_eq!(*resizes.borrow(), 1);
        assert_eq!(dispatcher.diagnostics().total(), 0);
    }

    #[test]
    fn inactive_dispatcher_ignores_input() {
        let clock = ManualClock::new();
        let mut dispatcher = InteractionDispatcher::with_clock(clock.clone());
        let moves = record(&dispatcher, EventKind::MouseMove);

        dispatcher.set_active(false);
        dispatcher.feed(RawPointerEvent::Moved(pos(3., 3.)).into());
        dispatcher.handle_events(&scene());
        assert_eq!(*moves.borrow(), 0);

        dispatcher.set_active(true);
        dispatcher.feed(RawPointerEvent::Moved(pos(3., 3.)).into());
        dispatcher.handle_events(&scene());
        assert_eq!(*moves.borrow(), 1);
    }

    #[test]
    fn negative_options_are_clamped() {
        let clock = ManualClock::new();
        let mut dispatcher = InteractionDispatcher::with_clock(clock);

        dispatcher.set_options(EventOptions {
            double_click_delay: -0.3,
            ..Default::default()
        });

        assert_eq!(dispatcher.options().double_click_delay, 0.0);
        assert_eq!(
            dispatcher.pointer_state().double_click_delay(),
            crate::time::Duration::ZERO
        );
    }

    #[test]
    fn huge_delays_are_capped_at_construction() {
        let clock = ManualClock::new();
        let dispatcher = InteractionDispatcher::with_options(
            clock,
            EventOptions {
                double_click_delay: 1e30,
                stop_delay: 1e30,
                ..Default::default()
            },
        );

        assert_eq!(
            dispatcher.options().double_click_delay,
            crate::input::options::MAX_DELAY_SECS
        );
        assert_eq!(
            dispatcher.pointer_state().double_click_delay(),
            crate::time::Duration::from_secs(60)
        );
    }
}
