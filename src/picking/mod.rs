//! Object picking through a color-keyed off-screen target.
//!
//! Every pickable object is drawn into the picking target with a unique color. Reading the pixel
//! under the pointer and decoding it back into a [`ColorKey`] tells us which object is addressed,
//! with the all-zero key reserved for "nothing".

mod buffer;
mod color;
mod registry;
mod resolver;
mod transition;

pub use buffer::PickingBuffer;
pub use color::{ColorKey, PickingColor};
pub use registry::ColorRegistry;
pub use resolver::{PickingResolver, PickingTarget};
pub use transition::PickingTransition;

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PickingError {
    #[error("picking target is not initialized")]
    NotReady,

    #[error("pixel ({x}, {y}) is outside the {width}x{height} picking target")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("all color keys are in use")]
    Exhausted,

    #[error("invalid color key {0:?}, expected `r_g_b`")]
    InvalidKey(String),
}
