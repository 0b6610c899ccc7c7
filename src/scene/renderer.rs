use std::rc::Rc;

use crate::{
    events::ListenerRegistry,
    picking::{ColorKey, PickingTarget},
    util::{ScreenPos, WorldVector},
};

pub trait Camera {
    /// Direction from the eye through `pos`, in world space.
    fn unproject(&self, pos: ScreenPos) -> WorldVector;
}

/// What the dispatcher needs from the renderer that owns it.
pub trait SceneRenderer {
    fn camera(&self) -> &dyn Camera;

    /// The color-keyed picking pass of the last rendered frame. `None` until one exists.
    fn picking_target(&self) -> Option<&dyn PickingTarget>;

    /// Listener registry of the collection owning the object drawn with `key`.
    fn object_events(&self, key: ColorKey) -> Option<Rc<ListenerRegistry>>;

    fn has_object(&self, key: ColorKey) -> bool {
        self.object_events(key).is_some()
    }
}
