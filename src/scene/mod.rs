mod camera;
mod dispatcher;
mod renderer;

pub use camera::PinholeCamera;
pub use dispatcher::InteractionDispatcher;
pub use renderer::{Camera, SceneRenderer};
