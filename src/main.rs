use std::rc::Rc;

use scene_input::{
    events::{EventKind, EventPayload, ListenerRegistry},
    input::{PointerButton, RawEvent, RawPointerEvent, RawTouch, TouchId, TouchPhase},
    picking::{ColorKey, ColorRegistry, PickingBuffer, PickingTarget},
    scene::{Camera, InteractionDispatcher, PinholeCamera, SceneRenderer},
    time::ManualClock,
    util::{pos, ScreenSize},
};

const FRAME_MILLIS: u64 = 16;

struct Collection {
    name: &'static str,
    events: Rc<ListenerRegistry>,
}

impl Collection {
    fn new(name: &'static str) -> Rc<Self> {
        Rc::new(Self {
            name,
            events: Default::default(),
        })
    }
}

/// A scene with a fixed picking pass, standing in for a GPU renderer.
struct DemoScene {
    camera: PinholeCamera,
    picking: PickingBuffer,
    objects: ColorRegistry<Rc<Collection>>,
}

impl DemoScene {
    fn new(size: ScreenSize) -> Self {
        Self {
            camera: PinholeCamera::new(size, euclid::Angle::degrees(60.)),
            picking: PickingBuffer::new(size.width, size.height),
            objects: ColorRegistry::new(),
        }
    }

    fn add_object(
        &mut self,
        collection: &Rc<Collection>,
        (x, y, width, height): (u32, u32, u32, u32),
    ) -> anyhow::Result<ColorKey> {
        let key = self.objects.register(collection.clone())?;
        self.picking.fill_rect(x, y, width, height, key);

        log::debug!("{} object {key} at {x},{y} {width}x{height}", collection.name);
        Ok(key)
    }
}

impl SceneRenderer for DemoScene {
    fn camera(&self) -> &dyn Camera {
        &self.camera
    }

    fn picking_target(&self) -> Option<&dyn PickingTarget> {
        Some(&self.picking)
    }

    fn object_events(&self, key: ColorKey) -> Option<Rc<ListenerRegistry>> {
        self.objects.get(key).map(|collection| collection.events.clone())
    }
}

fn moved(x: f32, y: f32) -> RawEvent {
    RawPointerEvent::Moved(pos(x, y)).into()
}

fn button(pressed: bool, x: f32, y: f32) -> RawEvent {
    RawPointerEvent::Button {
        button: PointerButton::Left,
        pressed,
        pos: pos(x, y),
    }
    .into()
}

fn touch(phase: TouchPhase, x: f32, y: f32) -> RawEvent {
    RawTouch {
        id: TouchId(0),
        phase,
        pos: pos(x, y),
    }
    .into()
}

/// Input as `(milliseconds since start, event)`.
fn script() -> Vec<(u64, RawEvent)> {
    vec![
        (0, moved(2., 2.)),
        (40, moved(12., 12.)),
        (80, moved(16., 14.)),
        (200, button(true, 16., 14.)),
        (230, button(false, 16., 14.)),
        (300, button(true, 16., 14.)),
        (330, button(false, 16., 14.)),
        (400, moved(44., 24.)),
        (480, moved(60., 40.)),
        (600, touch(TouchPhase::Start, 46., 26.)),
        (630, touch(TouchPhase::End, 46., 26.)),
        (800, touch(TouchPhase::Start, 46., 26.)),
        (830, touch(TouchPhase::End, 46., 26.)),
    ]
}

fn init_logger() {
    #[cfg(target_arch = "wasm32")]
    wasm_logger::init(wasm_logger::Config::default());

    #[cfg(not(target_arch = "wasm32"))]
    pretty_env_logger::formatted_builder()
        .parse_env(env_logger::Env::default().filter_or(
            env_logger::DEFAULT_FILTER_ENV,
            if cfg!(debug_assertions) {
                "debug"
            } else {
                "info"
            },
        ))
        .filter_module("winit", log::LevelFilter::Warn)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logger();

    let size = ScreenSize::new(64, 48);
    let clock = ManualClock::new();
    let mut dispatcher = InteractionDispatcher::with_clock(clock.clone());
    let mut scene = DemoScene::new(size);

    let boxes = Collection::new("boxes");
    let markers = Collection::new("markers");

    scene.add_object(&boxes, (8, 8, 16, 16))?;
    scene.add_object(&markers, (40, 20, 12, 12))?;

    for collection in [&boxes, &markers] {
        let name = collection.name;
        for kind in [EventKind::MouseEnter, EventKind::MouseLeave] {
            collection.events.on(kind, name, move |payload| {
                if let EventPayload::Pointer(state) = payload {
                    log::info!("{kind} {name} {:?}", state.picked());
                }
                Ok(())
            });
        }
    }

    boxes
        .events
        .on(EventKind::MouseLeftButtonDoubleClick, "boxes", |_| {
            log::info!("double click on a box");
            Ok(())
        });
    markers.events.on(EventKind::DoubleTouch, "markers", |_| {
        anyhow::bail!("markers have no double-touch action")
    });

    dispatcher.on(EventKind::MouseStop, "demo", |payload| {
        if let Some(state) = payload.as_pointer() {
            log::info!("pointer stopped at {:?}", state.pos());
        }
        Ok(())
    });
    dispatcher.on(EventKind::DoubleTouch, "demo", |payload| {
        if let Some(state) = payload.as_touch() {
            log::info!("double touch on {:?}", state.picked());
        }
        Ok(())
    });

    let mut script = script().into_iter().peekable();
    for _ in 0..64 {
        let now = clock.elapsed().as_millis() as u64;

        while let Some((_, event)) = script.next_if(|(at, _)| *at <= now) {
            dispatcher.feed(event);
        }

        dispatcher.handle_events(&scene);
        dispatcher.draw();

        clock.advance_millis(FRAME_MILLIS);
    }

    for failure in dispatcher.diagnostics().recent() {
        log::info!("recorded failure: {failure}");
    }

    Ok(())
}
